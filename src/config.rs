// src/config.rs
use std::time::Duration;

use thiserror::Error;

const DEFAULT_COUNSELING_URL: &str = "http://127.0.0.1:5003/chat";
const DEFAULT_REPORT_URL: &str = "http://127.0.0.1:5004/report";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

pub const DEFAULT_SYSTEM_PROMPT: &str = "당신은 공감 능력이 뛰어나고 전문적인 심리상담사입니다. \
상담 답변을 2~4문장 이내로, 따뜻하고 담백한 일상어로 작성하세요. \
사용자의 표현을 요약·반영하고, 필요하면 부드러운 질문을 하나 덧붙이세요.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not set; it is required when CHAT_PROVIDER={provider}")]
    MissingKey {
        var: &'static str,
        provider: &'static str,
    },
    #[error("unknown CHAT_PROVIDER '{0}' (expected 'counseling' or 'openai')")]
    UnknownProvider(String),
    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

impl ConfigError {
    /// Setup hint printed next to the error when the server refuses to start.
    pub fn instructions(&self) -> &'static str {
        match self {
            ConfigError::MissingKey { var: "OPENAI_API_KEY", .. } => {
                "Add OPENAI_API_KEY=<your key> to .env, or set CHAT_PROVIDER=counseling."
            }
            ConfigError::MissingKey { .. } => {
                "Add COUNSELING_API_KEY=<key> to .env (any token accepted by the counseling server)."
            }
            ConfigError::UnknownProvider(_) => "Set CHAT_PROVIDER to 'counseling' or 'openai'.",
            ConfigError::Invalid { .. } => "Fix the value in .env or the environment.",
        }
    }
}

/// Which external service answers chat messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatProvider {
    Counseling {
        url: String,
        api_key: String,
    },
    OpenAi {
        base_url: String,
        api_key: String,
        model: String,
        system_prompt: String,
    },
}

impl ChatProvider {
    pub fn name(&self) -> &'static str {
        match self {
            ChatProvider::Counseling { .. } => "counseling",
            ChatProvider::OpenAi { .. } => "openai",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub chat_provider: ChatProvider,
    pub report_url: String,
    pub upstream_timeout: Duration,
    pub static_dir: String,
    pub admin_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let chat_provider = match get("CHAT_PROVIDER").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("counseling") => ChatProvider::Counseling {
                url: get("COUNSELING_CHAT_URL").unwrap_or_else(|| DEFAULT_COUNSELING_URL.to_string()),
                api_key: get("COUNSELING_API_KEY").ok_or(ConfigError::MissingKey {
                    var: "COUNSELING_API_KEY",
                    provider: "counseling",
                })?,
            },
            Some("openai") => ChatProvider::OpenAi {
                base_url: get("OPENAI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                api_key: get("OPENAI_API_KEY").ok_or(ConfigError::MissingKey {
                    var: "OPENAI_API_KEY",
                    provider: "openai",
                })?,
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                system_prompt: get("OPENAI_SYSTEM_PROMPT")
                    .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            },
            Some(other) => return Err(ConfigError::UnknownProvider(other.to_string())),
        };

        let port = match get("PORT") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: v })?,
            None => 8000,
        };

        let timeout_secs: u64 = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "UPSTREAM_TIMEOUT_SECS",
                value: v,
            })?,
            None => 120,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            chat_provider,
            report_url: get("REPORT_SERVICE_URL").unwrap_or_else(|| DEFAULT_REPORT_URL.to_string()),
            upstream_timeout: Duration::from_secs(timeout_secs),
            static_dir: get("STATIC_DIR").unwrap_or_else(|| "public".to_string()),
            admin_key: get("ADMIN_KEY"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn counseling_is_default_provider() {
        let cfg = Config::from_lookup(lookup(&[("COUNSELING_API_KEY", "k")])).unwrap();
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.chat_provider.name(), "counseling");
        assert_eq!(cfg.report_url, DEFAULT_REPORT_URL);
        assert!(cfg.admin_key.is_none());
    }

    #[test]
    fn missing_key_refuses_config() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { var: "COUNSELING_API_KEY", .. }));

        let err = Config::from_lookup(lookup(&[("CHAT_PROVIDER", "openai"), ("OPENAI_API_KEY", " ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { var: "OPENAI_API_KEY", .. }));
        assert!(err.instructions().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn openai_provider_reads_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("CHAT_PROVIDER", "OpenAI"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9999/v1/"),
            ("PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 9000);
        match cfg.chat_provider {
            ChatProvider::OpenAi { base_url, model, .. } => {
                assert_eq!(base_url, "http://localhost:9999/v1");
                assert_eq!(model, DEFAULT_OPENAI_MODEL);
            }
            other => panic!("unexpected provider {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_values() {
        let err = Config::from_lookup(lookup(&[("CHAT_PROVIDER", "mistral")])).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProvider(_)));

        let err = Config::from_lookup(lookup(&[("COUNSELING_API_KEY", "k"), ("PORT", "abc")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }
}
