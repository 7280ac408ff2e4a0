//! Error types shared by the chat and lead-form flows.

use thiserror::Error;

/// Form input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields.")]
    MissingFields(Vec<&'static str>),
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// Failure of a single webhook request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    #[error("webhook responded with status {0}")]
    HttpStatus(u16),
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for WebhookError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WebhookError::Transport("request timed out".to_string())
        } else if err.is_connect() {
            WebhookError::Transport(format!("could not connect to webhook: {}", err))
        } else {
            WebhookError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("unsupported store type: {0}")]
    UnsupportedBackend(String),
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("a message is already being sent")]
    Busy,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("webhook url is required (set --webhook-url or WEBHOOK_URL)")]
    MissingWebhookUrl,
    #[error("invalid webhook url '{url}': {reason}")]
    InvalidWebhookUrl { url: String, reason: String },
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_user_facing() {
        let err = ValidationError::MissingFields(vec!["fullName", "email"]);
        assert_eq!(err.to_string(), "Please fill in all required fields.");
        assert_eq!(
            ValidationError::InvalidEmail.to_string(),
            "Please enter a valid email address."
        );
    }

    #[test]
    fn webhook_error_display() {
        assert_eq!(
            WebhookError::HttpStatus(503).to_string(),
            "webhook responded with status 503"
        );
        assert_eq!(
            WebhookError::Transport("connection reset".into()).to_string(),
            "connection reset"
        );
    }

    #[test]
    fn chat_error_wraps_storage() {
        let err: ChatError = StorageError::UnsupportedBackend("sqlite".into()).into();
        assert_eq!(err.to_string(), "unsupported store type: sqlite");
        assert_eq!(ChatError::Busy.to_string(), "a message is already being sent");
    }
}
