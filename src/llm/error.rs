//! Completion-service error taxonomy with retry classification.

use std::time::Duration;
use thiserror::Error;

/// Broad classification of a completion-service failure, used to decide
/// whether a retry makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// 429 from the upstream service.
    RateLimited,
    /// 5xx from the upstream service.
    ServerError,
    /// 4xx other than 429; retrying will not help.
    ClientError,
    /// Connection failure or timeout before a response arrived.
    NetworkError,
    /// The response arrived but its body was not in the expected shape.
    ParseError,
}

impl std::fmt::Display for LlmErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LlmErrorKind::RateLimited => "rate_limited",
            LlmErrorKind::ServerError => "server_error",
            LlmErrorKind::ClientError => "client_error",
            LlmErrorKind::NetworkError => "network_error",
            LlmErrorKind::ParseError => "parse_error",
        };
        f.write_str(name)
    }
}

/// Classify an HTTP status code from the completion service.
pub fn classify_http_status(status: u16) -> LlmErrorKind {
    match status {
        429 => LlmErrorKind::RateLimited,
        500..=599 => LlmErrorKind::ServerError,
        400..=499 => LlmErrorKind::ClientError,
        _ => LlmErrorKind::ServerError,
    }
}

/// A completion-service failure.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub message: String,
    /// Server-suggested backoff, from a Retry-After header.
    pub retry_after: Option<Duration>,
}

impl LlmError {
    pub fn rate_limited(message: impl Into<String>, retry_after: Option<Duration>) -> Self {
        Self {
            kind: LlmErrorKind::RateLimited,
            message: message.into(),
            retry_after,
        }
    }

    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::ServerError,
            message: format!("HTTP {}: {}", status, message.into()),
            retry_after: None,
        }
    }

    pub fn client_error(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::ClientError,
            message: format!("HTTP {}: {}", status, message.into()),
            retry_after: None,
        }
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::NetworkError,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::ParseError,
            message: message.into(),
            retry_after: None,
        }
    }

    /// Backoff before the given retry attempt: the server hint when present,
    /// otherwise exponential starting at one second.
    pub fn suggested_delay(&self, attempt: u32) -> Duration {
        if let Some(retry_after) = self.retry_after {
            return retry_after;
        }
        Duration::from_secs(1u64 << attempt.min(5))
    }
}

/// Retry policy for transient completion failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub max_retry_duration: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            max_retry_duration: Duration::from_secs(60),
        }
    }
}

impl RetryConfig {
    /// Only rate limits, server errors, and network failures are worth
    /// retrying; client and parse errors are deterministic.
    pub fn should_retry(&self, error: &LlmError) -> bool {
        matches!(
            error.kind,
            LlmErrorKind::RateLimited | LlmErrorKind::ServerError | LlmErrorKind::NetworkError
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_http_status() {
        assert_eq!(classify_http_status(429), LlmErrorKind::RateLimited);
        assert_eq!(classify_http_status(500), LlmErrorKind::ServerError);
        assert_eq!(classify_http_status(503), LlmErrorKind::ServerError);
        assert_eq!(classify_http_status(400), LlmErrorKind::ClientError);
        assert_eq!(classify_http_status(404), LlmErrorKind::ClientError);
    }

    #[test]
    fn test_should_retry() {
        let config = RetryConfig::default();
        assert!(config.should_retry(&LlmError::rate_limited("slow down", None)));
        assert!(config.should_retry(&LlmError::server_error(500, "oops")));
        assert!(config.should_retry(&LlmError::network_error("timeout")));
        assert!(!config.should_retry(&LlmError::client_error(400, "bad request")));
        assert!(!config.should_retry(&LlmError::parse_error("not json")));
    }

    #[test]
    fn test_suggested_delay_prefers_server_hint() {
        let err = LlmError::rate_limited("slow down", Some(Duration::from_secs(7)));
        assert_eq!(err.suggested_delay(0), Duration::from_secs(7));

        let err = LlmError::server_error(500, "oops");
        assert_eq!(err.suggested_delay(0), Duration::from_secs(1));
        assert_eq!(err.suggested_delay(2), Duration::from_secs(4));
    }
}
