// src/services/chat_client.rs
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::config::{ChatProvider, Config};
use crate::error::UpstreamError;
use crate::services::first_truthy;

pub const NO_REPLY_TEXT: &str = "응답을 생성할 수 없습니다.";

/// Forwards a single user message to the configured LLM service.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    provider: ChatProvider,
}

impl ChatClient {
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(UpstreamError::Request)?;
        Ok(Self {
            http,
            provider: config.chat_provider.clone(),
        })
    }

    pub async fn reply(&self, message: &str) -> Result<String, UpstreamError> {
        let result = match &self.provider {
            ChatProvider::Counseling { url, api_key } => {
                self.counseling_reply(url, api_key, message).await
            }
            ChatProvider::OpenAi {
                base_url,
                api_key,
                model,
                system_prompt,
            } => {
                self.openai_reply(base_url, api_key, model, system_prompt, message)
                    .await
            }
        };

        if let Err(err) = &result {
            error!(provider = self.provider.name(), "chat upstream error: {err}");
        }
        result
    }

    async fn counseling_reply(
        &self,
        url: &str,
        api_key: &str,
        message: &str,
    ) -> Result<String, UpstreamError> {
        debug!(url, "forwarding message to counseling server");
        let body = self
            .post_json(url, api_key, &json!({ "message": message }))
            .await?;

        Ok(extract_counseling_reply(&body))
    }

    async fn openai_reply(
        &self,
        base_url: &str,
        api_key: &str,
        model: &str,
        system_prompt: &str,
        message: &str,
    ) -> Result<String, UpstreamError> {
        let url = format!("{base_url}/chat/completions");
        debug!(model, "forwarding message to OpenAI");
        let request = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": message },
            ],
        });
        let body = self.post_json(&url, api_key, &request).await?;

        Ok(extract_openai_reply(&body))
    }

    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &Value,
    ) -> Result<Value, UpstreamError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }
        Ok(response.json::<Value>().await?)
    }
}

/// Counseling servers have answered under several field names over time.
pub fn extract_counseling_reply(body: &Value) -> String {
    first_truthy(body, &["reply", "response", "message"])
        .map(display_text)
        .unwrap_or_else(|| NO_REPLY_TEXT.to_string())
}

pub fn extract_openai_reply(body: &Value) -> String {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| NO_REPLY_TEXT.to_string())
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counseling_reply_field_fallbacks() {
        assert_eq!(extract_counseling_reply(&json!({ "reply": "a", "response": "b" })), "a");
        assert_eq!(extract_counseling_reply(&json!({ "reply": "", "response": "b" })), "b");
        assert_eq!(extract_counseling_reply(&json!({ "message": "c" })), "c");
        assert_eq!(extract_counseling_reply(&json!({})), NO_REPLY_TEXT);
    }

    #[test]
    fn openai_reply_reads_first_choice() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "괜찮아요" } }]
        });
        assert_eq!(extract_openai_reply(&body), "괜찮아요");
        assert_eq!(extract_openai_reply(&json!({ "choices": [] })), NO_REPLY_TEXT);
    }
}
