// src/message.rs
use serde::{Deserialize, Serialize};

use crate::services::history_store::ChatHistoryEntry;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Deserialize, Default)]
pub struct ReportRequest {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub date: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct DayHistoryResponse {
    pub date: String,
    pub chats: Vec<ChatHistoryEntry>,
    pub count: usize,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedHistoryResponse {
    pub chat_history: std::collections::BTreeMap<String, Vec<ChatHistoryEntry>>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub success: bool,
    pub message: String,
    pub chat_count: usize,
}
