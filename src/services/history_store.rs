// src/services/history_store.rs
use std::{collections::BTreeMap, fmt::Debug, sync::Arc};

use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// One exchanged turn: what the user sent and what the counselor answered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryEntry {
    pub id: Uuid,
    /// Calendar day bucket, `YYYY-MM-DD` (UTC).
    pub date: String,
    pub timestamp: String,
    pub user_message: String,
    pub assistant_reply: String,
}

impl ChatHistoryEntry {
    pub fn new(
        date: NaiveDate,
        user_message: impl Into<String>,
        assistant_reply: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: date_key(date),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            user_message: user_message.into(),
            assistant_reply: assistant_reply.into(),
        }
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

const TEST_CHATS: [(&str, &str); 3] = [
    (
        "안녕하세요, 요즘 스트레스가 많아서 상담을 받고 싶어요.",
        "안녕하세요! 스트레스를 받고 계시는군요. 어떤 부분에서 가장 힘드신가요? 구체적으로 말씀해주시면 함께 해결방법을 찾아보겠습니다.",
    ),
    (
        "직장에서 업무량이 너무 많고 상사와의 관계도 어려워요.",
        "직장에서의 스트레스는 정말 힘드실 것 같습니다. 업무량 조절과 상사와의 소통 방법에 대해 함께 생각해보면 어떨까요? 먼저 우선순위를 정해서 업무를 체계적으로 정리해보시는 것을 추천드립니다.",
    ),
    (
        "집에 가서도 일 생각만 나고 잠도 잘 안와요.",
        "일과 개인 시간의 경계가 모호해진 것 같네요. 퇴근 후에는 의식적으로 일을 내려놓는 루틴을 만들어보세요. 명상이나 가벼운 운동, 독서 등 마음을 진정시키는 활동을 추천드립니다.",
    ),
];

/// Append-only, process-local chat log. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct HistoryStore {
    inner: Arc<RwLock<Vec<ChatHistoryEntry>>>,
}

impl Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore").finish_non_exhaustive()
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed turn under today's date.
    pub async fn record(
        &self,
        user_message: impl Into<String>,
        assistant_reply: impl Into<String>,
    ) -> ChatHistoryEntry {
        let entry = ChatHistoryEntry::new(today(), user_message, assistant_reply);
        self.push(entry.clone()).await;
        entry
    }

    pub async fn push(&self, entry: ChatHistoryEntry) {
        let mut guard = self.inner.write().await;
        guard.push(entry);
    }

    /// Entries of a single day, oldest first.
    pub async fn for_date(&self, date: &str) -> Vec<ChatHistoryEntry> {
        let guard = self.inner.read().await;
        guard.iter().filter(|e| e.date == date).cloned().collect()
    }

    pub async fn grouped_by_date(&self) -> BTreeMap<String, Vec<ChatHistoryEntry>> {
        let guard = self.inner.read().await;
        let mut grouped: BTreeMap<String, Vec<ChatHistoryEntry>> = BTreeMap::new();
        for entry in guard.iter() {
            grouped.entry(entry.date.clone()).or_default().push(entry.clone());
        }
        grouped
    }

    /// Append the canned work-stress conversation for `date`. Returns how many turns were added.
    pub async fn seed_test_chats(&self, date: NaiveDate) -> usize {
        let mut guard = self.inner.write().await;
        for (user, reply) in TEST_CHATS {
            guard.push(ChatHistoryEntry::new(date, user, reply));
        }
        TEST_CHATS.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
