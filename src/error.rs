// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub const CHAT_UNREACHABLE_REPLY: &str =
    "외부 상담 서버에 연결할 수 없습니다. 서버가 실행 중인지 확인해주세요.";
pub const CHAT_SERVER_ERROR_REPLY: &str = "서버 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";
pub const REPORT_ERROR_MESSAGE: &str = "리포트 생성 중 오류가 발생했습니다.";

/// Failure talking to an external chat or report service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("external service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("external service returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("external service request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("external service sent an unreadable body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl UpstreamError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, UpstreamError::Unreachable(_))
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            UpstreamError::Unreachable(err)
        } else if err.is_decode() {
            UpstreamError::Decode(err)
        } else if let Some(status) = err.status() {
            UpstreamError::Status(status)
        } else {
            UpstreamError::Request(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("missing or invalid admin key")]
    Unauthorized,
    #[error("chat upstream failed: {0}")]
    Chat(#[source] UpstreamError),
    #[error("report upstream failed: {0}")]
    Report(#[source] UpstreamError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "unauthorized" })),
            )
                .into_response(),
            // The chat client renders `reply` as a bot bubble, so errors keep that shape.
            AppError::Chat(err) => {
                let reply = if err.is_unreachable() {
                    CHAT_UNREACHABLE_REPLY
                } else {
                    CHAT_SERVER_ERROR_REPLY
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "reply": reply }))).into_response()
            }
            AppError::Report(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": REPORT_ERROR_MESSAGE,
                    "error": err.to_string(),
                })),
            )
                .into_response(),
        }
    }
}
