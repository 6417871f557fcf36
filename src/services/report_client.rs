// src/services/report_client.rs
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::UpstreamError;

/// Body sent to the report service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequestBody {
    pub date: String,
    pub chat_history: String,
    pub chat_count: usize,
    pub previous_session: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReportClient {
    http: Client,
    url: String,
}

impl ReportClient {
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(UpstreamError::Request)?;
        Ok(Self {
            http,
            url: config.report_url.clone(),
        })
    }

    /// Returns the raw JSON reply; shape is normalised by the report builder.
    pub async fn request(&self, body: &ReportRequestBody) -> Result<Value, UpstreamError> {
        debug!(url = %self.url, date = %body.date, chats = body.chat_count, "requesting report");
        let response = self.http.post(&self.url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }
        let raw = response.json::<Value>().await?;
        debug!("report service replied: {raw}");
        Ok(raw)
    }
}
