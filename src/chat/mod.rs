//! Chat widget session: transcript rendering, history persistence and the
//! round trip to the webhook.
//!
//! At most one message is in flight per session. While a message is being
//! sent the session is `Sending` and further submissions are rejected with
//! [`ChatError::Busy`] instead of racing the history write.

use log::{ debug, error, info, warn };
use serde_json::Value as JsonValue;
use std::sync::{ Arc, Mutex, MutexGuard };
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use crate::error::{ ChatError, StorageError, WebhookError };
use crate::history::ConversationLog;
use crate::models::chat::{ ChatMessageRecord, ConversationHistory, Sender };
use crate::models::iso_timestamp;
use crate::models::webhook::{ ChatPayload, WebhookPayload };
use crate::session::IdentityStore;
use crate::ui::View;
use crate::webhook::{ deliver, WebhookClient };

/// Response fields that may carry the bot reply, highest priority first.
pub const REPLY_FIELDS: [&str; 3] = ["message", "aiMessage", "reply"];

pub const ACKNOWLEDGEMENT: &str =
    "Thanks for your message! It has been received and we'll get back to you shortly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    Sending,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Blank input; nothing rendered or sent.
    Ignored,
    Replied(String),
    /// 2xx without a usable reply.
    Acknowledged,
    Failed(WebhookError),
    /// The conversation could not be written to storage; a notice was rendered.
    NotSaved(String),
}

/// First non-blank string under one of [`REPLY_FIELDS`] in a JSON object body.
pub fn extract_reply(body: &str) -> Option<String> {
    let value: JsonValue = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            debug!("Webhook reply is not JSON ({}), acknowledging instead", e);
            return None;
        }
    };
    let object = value.as_object()?;
    REPLY_FIELDS.iter()
        .filter_map(|field| object.get(*field))
        .filter_map(JsonValue::as_str)
        .find(|reply| !reply.trim().is_empty())
        .map(str::to_string)
}

pub fn status_notice(status: u16) -> String {
    format!("Sorry, the server responded with status {}. Please try again.", status)
}

pub fn transport_notice(reason: &str) -> String {
    format!("Sorry, there was an error sending your message: {}", reason)
}

pub fn storage_notice(reason: &str) -> String {
    format!("Sorry, we could not save your message: {}", reason)
}

pub struct ChatSession {
    identity: Arc<IdentityStore>,
    log: Arc<ConversationLog>,
    client: Arc<dyn WebhookClient>,
    view: Arc<dyn View>,
    reply_delay: Duration,
    state: Mutex<ChatState>,
    pending: Mutex<Option<CancellationToken>>,
}

/// Holds the single sending slot; releasing it re-enables the send control even
/// when the submission future is dropped midway.
struct SendingSlot<'a> {
    session: &'a ChatSession,
}

impl Drop for SendingSlot<'_> {
    fn drop(&mut self) {
        *lock(&self.session.pending) = None;
        *lock(&self.session.state) = ChatState::Idle;
        self.session.view.set_chat_busy(false);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ChatSession {
    pub fn new(
        identity: Arc<IdentityStore>,
        log: Arc<ConversationLog>,
        client: Arc<dyn WebhookClient>,
        view: Arc<dyn View>,
        reply_delay: Duration
    ) -> Self {
        Self {
            identity,
            log,
            client,
            view,
            reply_delay,
            state: Mutex::new(ChatState::Idle),
            pending: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ChatState {
        *lock(&self.state)
    }

    fn set_state(&self, state: ChatState) {
        debug!("chat state -> {:?}", state);
        *lock(&self.state) = state;
    }

    fn claim_slot(&self) -> Result<(SendingSlot<'_>, CancellationToken), ChatError> {
        let mut state = lock(&self.state);
        if *state != ChatState::Idle {
            return Err(ChatError::Busy);
        }
        *state = ChatState::Sending;
        drop(state);

        let token = CancellationToken::new();
        *lock(&self.pending) = Some(token.clone());
        self.view.set_chat_busy(true);
        Ok((SendingSlot { session: self }, token))
    }

    /// Aborts the outstanding request, if any. Returns whether one was pending.
    pub fn cancel_pending(&self) -> bool {
        match lock(&self.pending).as_ref() {
            Some(token) => {
                info!("Cancelling pending chat request");
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub async fn submit_user_message(&self, text: &str) -> Result<ChatOutcome, ChatError> {
        let message = text.trim();
        if message.is_empty() {
            return Ok(ChatOutcome::Ignored);
        }

        let (_slot, cancel) = self.claim_slot()?;

        self.view.append_transcript(Sender::User, message);
        self.view.clear_chat_input();
        let payload = match self.record_user_message(message).await {
            Ok(payload) => payload,
            Err(err) => return Ok(self.storage_failed(err)),
        };

        let result = tokio::select! {
            result = deliver(self.client.as_ref(), &payload) => result,
            _ = cancel.cancelled() => Err(WebhookError::Transport("request cancelled".to_string())),
        };
        // Nothing left to abort once the webhook has answered.
        lock(&self.pending).take();

        match result {
            Ok(response) => {
                self.set_state(ChatState::Success);
                match extract_reply(&response.body) {
                    Some(reply) => {
                        tokio::time::sleep(self.reply_delay).await;
                        self.view.append_transcript(Sender::Bot, &reply);
                        match self.log.append(ChatMessageRecord::new(Sender::Bot, reply.clone())).await {
                            Ok(_) => Ok(ChatOutcome::Replied(reply)),
                            Err(err) => Ok(self.storage_failed(err)),
                        }
                    }
                    None => {
                        self.view.append_transcript(Sender::Bot, ACKNOWLEDGEMENT);
                        Ok(ChatOutcome::Acknowledged)
                    }
                }
            }
            Err(err) => {
                self.set_state(ChatState::Failed);
                let notice = match &err {
                    WebhookError::HttpStatus(status) => {
                        warn!("Chat webhook {} responded with status {}", self.client.endpoint(), status);
                        status_notice(*status)
                    }
                    WebhookError::Transport(reason) => {
                        warn!("Chat webhook request failed: {}", reason);
                        transport_notice(reason)
                    }
                };
                self.view.append_transcript(Sender::Bot, &notice);
                Ok(ChatOutcome::Failed(err))
            }
        }
    }

    /// Persists the user entry and builds the request around the updated history.
    async fn record_user_message(&self, message: &str) -> Result<WebhookPayload, StorageError> {
        let history = self.log.append(ChatMessageRecord::new(Sender::User, message)).await?;
        Ok(
            WebhookPayload::Chat(ChatPayload {
                visitor_id: self.identity.get_or_create_visitor_id().await?,
                user_name: self.identity.get_user_name().await?,
                user_message: message.to_string(),
                conversation_history: history,
                timestamp: iso_timestamp(),
            })
        )
    }

    fn storage_failed(&self, err: StorageError) -> ChatOutcome {
        self.set_state(ChatState::Failed);
        error!("Chat history could not be saved: {}", err);
        let reason = err.to_string();
        self.view.append_transcript(Sender::Bot, &storage_notice(&reason));
        ChatOutcome::NotSaved(reason)
    }

    pub async fn history(&self) -> Result<ConversationHistory, ChatError> {
        Ok(self.log.load().await?)
    }

    /// Re-renders the persisted history, as on a page reload.
    pub async fn restore_transcript(&self) -> Result<usize, ChatError> {
        let history = self.log.load().await?;
        for record in &history {
            self.view.append_transcript(record.sender, &record.message);
        }
        Ok(history.len())
    }

    pub async fn clear_history(&self) -> Result<(), ChatError> {
        if self.state() == ChatState::Sending {
            return Err(ChatError::Busy);
        }
        Ok(self.log.clear().await?)
    }
}
