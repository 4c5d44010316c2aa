//! Error types for the Direct Line bridge.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use std::time::Duration;

use thiserror::Error;

/// Primary error type for all bridge operations.
#[derive(Error, Debug)]
pub enum DirectLineError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl DirectLineError {
    /// Create an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(e) if e.is_timeout() => ErrorCategory::Timeout,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::InvalidArgument(_) => ErrorCategory::InvalidArgument,
        }
    }

    /// Wait the server asked for before the next attempt, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited {
                retry_after_ms: Some(ms),
            } => Some(Duration::from_millis(*ms)),
            _ => None,
        }
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }

    /// Whether this error came from talking to the bot service (as opposed to
    /// local configuration or argument problems).
    pub fn is_transport(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Authentication
                | ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
                | ErrorCategory::Api
                | ErrorCategory::Serialization
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
            ErrorCategory::RateLimit => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Network => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Timeout => RecoverySuggestion::IncreaseTimeout,
            ErrorCategory::Server => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::InvalidArgument => RecoverySuggestion::CheckArguments,
            _ => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DirectLineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_maps_to_category() {
        assert_eq!(
            DirectLineError::api(401, "nope").category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            DirectLineError::api(429, "slow").category(),
            ErrorCategory::RateLimit
        );
        assert_eq!(
            DirectLineError::api(502, "bad gateway").category(),
            ErrorCategory::Server
        );
        assert_eq!(
            DirectLineError::api(404, "missing").category(),
            ErrorCategory::Api
        );
    }

    #[test]
    fn configuration_is_neither_retryable_nor_transport() {
        let err = DirectLineError::Configuration("missing secret".to_string());
        assert!(!err.is_retryable());
        assert!(!err.is_transport());
        assert_eq!(
            err.recovery_suggestion(),
            RecoverySuggestion::CheckConfiguration
        );
    }

    #[test]
    fn retry_after_only_comes_from_rate_limits() {
        let limited = DirectLineError::RateLimited {
            retry_after_ms: Some(1500),
        };
        assert_eq!(limited.retry_after(), Some(Duration::from_millis(1500)));
        assert_eq!(
            DirectLineError::RateLimited { retry_after_ms: None }.retry_after(),
            None
        );
        assert_eq!(DirectLineError::api(503, "busy").retry_after(), None);
    }

    #[test]
    fn server_errors_are_retryable_transport_errors() {
        let err = DirectLineError::api(503, "unavailable");
        assert!(err.is_retryable());
        assert!(err.is_transport());
    }
}
