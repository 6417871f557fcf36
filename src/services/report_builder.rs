// src/services/report_builder.rs
use chrono::{Days, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{first_truthy, is_truthy};
use super::history_store::ChatHistoryEntry;

const DEFAULT_REPORT_TEXT: &str = "리포트가 생성되었습니다.";
const DEFAULT_FAILURE_MESSAGE: &str = "리포트 생성에 실패했습니다.";
const NO_RESPONSE_MESSAGE: &str = "외부 서버에서 응답을 받지 못했습니다.";
pub const NO_CHATS_MESSAGE: &str = "해당 날짜에 채팅 내역이 없습니다.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub success: bool,
    pub date: String,
    pub session_count: Value,
    pub three_line_summary: Value,
    pub professional_report: Value,
    pub psychological_state: Value,
    pub comparison_analysis: Value,
    pub recommendations: Value,
    pub feedback_checklist: Value,
    pub checklist_link: Value,
    pub generated_at: String,
    pub report_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFailure {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<Value>,
}

impl ReportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            report: None,
        }
    }

    /// Nothing was said on the requested day.
    pub fn no_chats() -> Self {
        Self {
            report: Some(Value::Null),
            ..Self::new(NO_CHATS_MESSAGE)
        }
    }
}

pub fn previous_day(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(1))
}

/// Full dialogue of a day, one block per turn.
pub fn transcript(entries: &[ChatHistoryEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("사용자: {}\n상담사: {}", e.user_message, e.assistant_reply))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn previous_session_summary(entries: &[ChatHistoryEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    Some(
        entries
            .iter()
            .map(|e| format!("{} {}", e.user_message, e.assistant_reply))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn pick(raw: &Value, keys: &[&str], default: Value) -> Value {
    first_truthy(raw, keys).cloned().unwrap_or(default)
}

fn pick_string(raw: &Value, keys: &[&str], default: impl FnOnce() -> String) -> String {
    match first_truthy(raw, keys) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => default(),
    }
}

/// Merge whatever the report service sent into the shape the client expects.
pub fn normalize(raw: &Value, target_date: &str, day_count: usize) -> Result<Report, ReportFailure> {
    if !is_truthy(raw) {
        return Err(ReportFailure::new(NO_RESPONSE_MESSAGE));
    }
    if raw.get("success") == Some(&Value::Bool(false)) {
        let message = raw
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_FAILURE_MESSAGE);
        return Err(ReportFailure::new(message));
    }

    Ok(Report {
        success: true,
        date: pick_string(raw, &["date"], || target_date.to_string()),
        session_count: pick(raw, &["session_count", "sessionCount"], json!(day_count)),
        three_line_summary: pick(
            raw,
            &["three_line_summary", "threeLlineSummary", "summary"],
            json!([]),
        ),
        professional_report: pick(
            raw,
            &["professional_report", "professionalReport", "report", "content"],
            json!(DEFAULT_REPORT_TEXT),
        ),
        psychological_state: pick(raw, &["psychological_state", "psychologicalState"], json!({})),
        comparison_analysis: pick(
            raw,
            &["comparison_analysis", "comparisonAnalysis", "analysis"],
            json!(""),
        ),
        recommendations: pick(raw, &["recommendations"], json!({})),
        feedback_checklist: pick(raw, &["feedback_checklist", "feedbackChecklist"], json!([])),
        checklist_link: pick(raw, &["checklist_link", "checklistLink"], json!("")),
        generated_at: pick_string(raw, &["generated_at", "generatedAt"], now_rfc3339),
        report_version: pick_string(raw, &["report_version", "reportVersion"], || {
            "v1.0".to_string()
        }),
    })
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn mood_line(count: usize) -> &'static str {
    if count > 5 {
        "활발한 대화를 나누셨네요!"
    } else if count > 2 {
        "의미있는 대화를 나누셨습니다."
    } else {
        "첫 대화를 시작하셨습니다."
    }
}

fn fallback_markdown(entries: &[ChatHistoryEntry]) -> String {
    let highlights = entries
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, e)| {
            format!(
                "**세션 {}:**\n- 사용자: {}\n- 상담사: {}\n",
                i + 1,
                clip(&e.user_message, 50),
                clip(&e.assistant_reply, 100)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "## 📊 상담 세션 분석\n\n\
         오늘 총 {count}회의 상담 세션이 진행되었습니다.\n\n\
         ## 💭 주요 대화 내용\n\n\
         {highlights}\n\n\
         ## 🌈 오늘의 소감\n\n\
         오늘도 마음자리와 함께 소중한 시간을 보내셨습니다. \n\
         {mood}\n\n\
         ## 📋 내일을 위한 제안\n\n\
         - 오늘의 대화를 되돌아보며 자신의 감정을 정리해보세요\n\
         - 충분한 휴식을 취하시기 바랍니다\n\
         - 필요하다면 언제든 마음자리와 대화를 이어가세요",
        count = entries.len(),
        mood = mood_line(entries.len()),
    )
}

/// Report assembled locally when the report service cannot be reached.
pub fn fallback(target_date: &str, entries: &[ChatHistoryEntry], has_previous: bool) -> Report {
    let count = entries.len();
    Report {
        success: true,
        date: target_date.to_string(),
        session_count: json!(count),
        three_line_summary: json!([
            format!("오늘 총 {count}회의 상담을 진행했습니다."),
            "마음자리와 의미있는 대화를 나누었습니다.",
            "꾸준한 자기 돌봄을 실천하고 계십니다.",
        ]),
        professional_report: Value::String(fallback_markdown(entries)),
        psychological_state: json!({
            "dominant_emotion": "보통",
            "confidence_level": 0.7,
        }),
        comparison_analysis: Value::String(
            if has_previous {
                "이전 세션과 비교하여 꾸준한 상담 참여를 보이고 있습니다."
            } else {
                "새로운 상담을 시작하셨습니다."
            }
            .to_string(),
        ),
        recommendations: json!({
            "youtube_videos": ["마음챙김 명상", "긍정적 사고 훈련"],
            "books": ["마음챙김의 힘", "감정 조절 기술"],
            "articles": ["스트레스 관리법", "자기 돌봄의 중요성"],
        }),
        feedback_checklist: json!([]),
        checklist_link: json!(""),
        generated_at: now_rfc3339(),
        report_version: "local-v1.0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<ChatHistoryEntry> {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        (0..n)
            .map(|i| ChatHistoryEntry::new(date, format!("user {i}"), format!("bot {i}")))
            .collect()
    }

    #[test]
    fn previous_day_crosses_month() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(previous_day(d), NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn transcript_and_previous_summary() {
        let e = entries(2);
        assert_eq!(
            transcript(&e),
            "사용자: user 0\n상담사: bot 0\n\n사용자: user 1\n상담사: bot 1"
        );
        assert_eq!(previous_session_summary(&e).as_deref(), Some("user 0 bot 0 user 1 bot 1"));
        assert_eq!(previous_session_summary(&[]), None);
    }

    #[test]
    fn normalize_accepts_camel_case_aliases() {
        let raw = json!({
            "sessionCount": 7,
            "summary": ["a", "b", "c"],
            "professionalReport": "text",
            "analysis": "better than yesterday",
            "reportVersion": "v2",
        });
        let report = normalize(&raw, "2024-05-01", 3).unwrap();
        assert_eq!(report.date, "2024-05-01");
        assert_eq!(report.session_count, json!(7));
        assert_eq!(report.three_line_summary, json!(["a", "b", "c"]));
        assert_eq!(report.professional_report, json!("text"));
        assert_eq!(report.comparison_analysis, json!("better than yesterday"));
        assert_eq!(report.psychological_state, json!({}));
        assert_eq!(report.report_version, "v2");
    }

    #[test]
    fn normalize_defaults_and_failures() {
        let report = normalize(&json!({ "session_count": 0, "content": "" }), "2024-05-01", 4).unwrap();
        assert_eq!(report.session_count, json!(4));
        assert_eq!(report.professional_report, json!(DEFAULT_REPORT_TEXT));
        assert_eq!(report.report_version, "v1.0");

        let failure = normalize(&json!({ "success": false }), "2024-05-01", 4).unwrap_err();
        assert!(!failure.success);
        assert_eq!(failure.message, DEFAULT_FAILURE_MESSAGE);

        let failure = normalize(&Value::Null, "2024-05-01", 4).unwrap_err();
        assert_eq!(failure.message, NO_RESPONSE_MESSAGE);
    }

    #[test]
    fn fallback_counts_and_clips() {
        let mut e = entries(6);
        e[0].user_message = "가".repeat(60);
        let report = fallback("2024-05-01", &e, true);
        assert_eq!(report.session_count, json!(6));
        assert_eq!(report.report_version, "local-v1.0");
        let body = report.professional_report.as_str().unwrap();
        assert!(body.contains(&format!("{}...", "가".repeat(50))));
        assert!(body.contains("**세션 3:**"));
        assert!(!body.contains("**세션 4:**"));
        assert!(body.contains("활발한 대화를 나누셨네요!"));
        assert!(report.comparison_analysis.as_str().unwrap().contains("이전 세션"));
    }

    #[test]
    fn normalize_passes_loose_session_counts_through() {
        let report = normalize(&json!({ "session_count": "5" }), "2024-05-01", 2).unwrap();
        assert_eq!(report.session_count, json!("5"));

        let report = normalize(&json!({ "sessionCount": 3.0 }), "2024-05-01", 2).unwrap();
        assert_eq!(report.session_count, json!(3.0));
    }

    #[test]
    fn falsy_body_counts_as_no_response() {
        for raw in [json!(false), json!(0), json!("")] {
            let failure = normalize(&raw, "2024-05-01", 2).unwrap_err();
            assert!(!failure.success);
            assert_eq!(failure.message, NO_RESPONSE_MESSAGE);
        }
    }

    #[test]
    fn fallback_mood_line_follows_count() {
        let body = |n| {
            fallback("2024-05-01", &entries(n), false)
                .professional_report
                .as_str()
                .unwrap()
                .to_string()
        };
        assert!(body(3).contains("의미있는 대화를 나누셨습니다."));
        assert!(body(1).contains("첫 대화를 시작하셨습니다."));
        assert!(!body(1).contains("**세션 2:**"));
    }

    #[test]
    fn fallback_clips_long_counselor_reply() {
        let mut e = entries(1);
        e[0].assistant_reply = "나".repeat(120);
        let report = fallback("2024-05-01", &e, false);
        let body = report.professional_report.as_str().unwrap();
        assert!(body.contains(&format!("- 상담사: {}...\n", "나".repeat(100))));
        assert!(!body.contains(&"나".repeat(101)));
    }

    #[test]
    fn no_chats_failure_serializes_null_report() {
        let json = serde_json::to_value(ReportFailure::no_chats()).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("report").is_some_and(Value::is_null));
    }
}
