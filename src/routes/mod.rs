// src/routes/mod.rs
pub mod chat;
pub mod history;
pub mod report;

use std::path::Path;

use crate::{error::AppError, state::SharedState};
use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use chat::chat_handler;
use history::{add_test_chat_handler, chat_history_handler};
use report::generate_report_handler;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router(state: SharedState, static_dir: impl AsRef<Path>) -> Router {
    let debug_routes = Router::new()
        .route("/chat-history", get(chat_history_handler))
        .route("/add-test-chat", post(add_test_chat_handler))
        .layer(middleware::from_fn_with_state(state.clone(), admin_key_middleware));

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/generate-report", post(generate_report_handler))
        .merge(debug_routes)
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}

/// Debug routes stay open unless an admin key is configured.
async fn admin_key_middleware(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.admin_key.as_deref() else {
        return Ok(next.run(req).await);
    };
    match req.headers().get("x-admin-key") {
        Some(val) if val == expected => Ok(next.run(req).await),
        _ => Err(AppError::Unauthorized),
    }
}
