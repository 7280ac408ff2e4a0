use serde::{ Serialize, Deserialize };
use super::chat::ChatMessageRecord;
use super::lead::LeadSubmission;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    pub visitor_id: String,
    pub user_name: Option<String>,
    pub user_message: String,
    pub conversation_history: Vec<ChatMessageRecord>,
    pub timestamp: String,
}

/// Body POSTed to the webhook; the `type` field tells the two shapes apart.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WebhookPayload {
    #[serde(rename = "chat")] Chat(ChatPayload),
    #[serde(rename = "form")] Form(LeadSubmission),
}

impl WebhookPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            WebhookPayload::Chat(_) => "chat",
            WebhookPayload::Form(_) => "form",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

impl WebhookResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
