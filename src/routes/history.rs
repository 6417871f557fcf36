use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::{
    message::{DayHistoryResponse, GroupedHistoryResponse, HistoryQuery, SeedResponse},
    services::history_store::{date_key, today},
    state::SharedState,
};

// Debug listing: one day when `?date=` is given, otherwise every day grouped.
pub async fn chat_history_handler(
    State(state): State<SharedState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    match query.date.filter(|d| !d.trim().is_empty()) {
        Some(date) => {
            let chats = state.history.for_date(&date).await;
            let count = chats.len();
            Json(DayHistoryResponse { date, chats, count }).into_response()
        }
        None => Json(GroupedHistoryResponse {
            chat_history: state.history.grouped_by_date().await,
        })
        .into_response(),
    }
}

pub async fn add_test_chat_handler(State(state): State<SharedState>) -> Json<SeedResponse> {
    let day = today();
    let added = state.history.seed_test_chats(day).await;
    let date = date_key(day);
    info!(%date, added, "seeded test chats");

    Json(SeedResponse {
        success: true,
        message: format!("{added}개의 테스트 채팅이 {date} 날짜로 추가되었습니다."),
        chat_count: added,
    })
}
