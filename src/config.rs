//! Runtime configuration, loaded from environment variables.

use std::path::PathBuf;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Base URL of the OpenAI-compatible completion service.
    pub api_base_url: String,
    /// API key for the completion service.
    pub api_key: String,
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Per-request timeout for completion calls, in seconds.
    pub request_timeout_secs: u64,
    /// Path of the task store JSON file.
    pub store_path: PathBuf,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    /// suitable for local development.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3080);

        let api_base_url = std::env::var("LLM_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.302.ai/v1".to_string());

        let api_key = std::env::var("LLM_API_KEY").unwrap_or_default();

        let model =
            std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let request_timeout_secs = std::env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(120);

        let store_path = std::env::var("TASK_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".brandhouse/tasks.json"));

        Self {
            port,
            api_base_url,
            api_key,
            model,
            request_timeout_secs,
            store_path,
        }
    }
}
