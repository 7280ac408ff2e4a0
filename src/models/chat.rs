use serde::{ Serialize, Deserialize };
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageRecord {
    pub sender: Sender,
    pub message: String,
    pub timestamp: String,
}

impl ChatMessageRecord {
    pub fn new(sender: Sender, message: impl Into<String>) -> Self {
        Self {
            sender,
            message: message.into(),
            timestamp: super::iso_timestamp(),
        }
    }
}

/// Persisted transcript, oldest record first.
pub type ConversationHistory = Vec<ChatMessageRecord>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorIdentity {
    pub visitor_id: String,
    pub user_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_lowercase_sender() {
        let record = ChatMessageRecord {
            sender: Sender::Bot,
            message: "hello".into(),
            timestamp: "2024-05-01T10:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sender": "bot",
                "message": "hello",
                "timestamp": "2024-05-01T10:00:00.000Z"
            })
        );
    }

    #[test]
    fn new_record_carries_iso_timestamp() {
        let record = ChatMessageRecord::new(Sender::User, "hi");
        assert!(record.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
    }
}
