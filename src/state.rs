// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::error::UpstreamError;
use crate::services::chat_client::ChatClient;
use crate::services::history_store::HistoryStore;
use crate::services::report_client::ReportClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub history: HistoryStore,
    pub chat: ChatClient,
    pub reports: ReportClient,
    pub admin_key: Option<String>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, UpstreamError> {
        Ok(Self {
            history: HistoryStore::new(),
            chat: ChatClient::from_config(config)?,
            reports: ReportClient::from_config(config)?,
            admin_key: config.admin_key.clone(),
        })
    }
}
