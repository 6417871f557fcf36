use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::{
    error::AppError,
    message::ReportRequest,
    services::{
        history_store::{date_key, today},
        report_builder::{
            ReportFailure, fallback, normalize, previous_day, previous_session_summary, transcript,
        },
        report_client::ReportRequestBody,
    },
    state::SharedState,
};

fn parse_date(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(today()),
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| AppError::BadRequest(format!("invalid date '{d}', expected YYYY-MM-DD"))),
    }
}

pub async fn generate_report_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ReportRequest>,
) -> Result<Response, AppError> {
    let target = parse_date(payload.date.as_deref())?;
    let date = date_key(target);

    let day_chats = state.history.for_date(&date).await;
    if day_chats.is_empty() {
        return Ok(Json(ReportFailure::no_chats()).into_response());
    }

    let previous = match previous_day(target) {
        Some(prev) => state.history.for_date(&date_key(prev)).await,
        None => Vec::new(),
    };
    let previous_summary = previous_session_summary(&previous);
    let has_previous = previous_summary.is_some();

    let body = ReportRequestBody {
        date: date.clone(),
        chat_history: transcript(&day_chats),
        chat_count: day_chats.len(),
        previous_session: previous_summary,
    };

    match state.reports.request(&body).await {
        Ok(raw) => match normalize(&raw, &date, day_chats.len()) {
            Ok(report) => Ok(Json(report).into_response()),
            Err(failure) => {
                warn!(%date, "report service declined: {}", failure.message);
                Ok(Json(failure).into_response())
            }
        },
        Err(err) if err.is_unreachable() => {
            warn!(%date, "report service unreachable, building local report: {err}");
            let report = fallback(&date, &day_chats, has_previous);
            info!(%date, sessions = %report.session_count, "local report generated");
            Ok(Json(report).into_response())
        }
        Err(err) => {
            error!(%date, "report generation failed: {err}");
            Err(AppError::Report(err))
        }
    }
}
