use log::info;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::chat::{ ChatOutcome, ChatSession };
use crate::config::Settings;
use crate::error::ChatError;
use crate::form::{ self, FormOutcome };
use crate::history::ConversationLog;
use crate::models::lead::LeadForm;
use crate::session::IdentityStore;
use crate::storage::{ initialize_store, KeyValueStore };
use crate::ui::{ self, View };
use crate::webhook::{ new_client, WebhookClient };

/// Everything one page needs: storage-backed identity and history, the webhook
/// client, the view, the chat session and the current form contents.
pub struct Concierge {
    settings: Settings,
    identity: Arc<IdentityStore>,
    client: Arc<dyn WebhookClient>,
    view: Arc<dyn View>,
    chat: ChatSession,
    form: Mutex<LeadForm>,
}

impl Concierge {
    pub fn new(settings: Settings, view: Arc<dyn View>) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let url = settings.webhook_url()?.clone();
        let store = initialize_store(&settings)?;
        let client = new_client(&url, settings.request_timeout)?;
        info!(
            "Webhook client configured: Endpoint={}, Timeout={:?}",
            url,
            settings.request_timeout
        );
        Ok(Self::with_parts(settings, store, client, view))
    }

    pub fn with_parts(
        settings: Settings,
        store: Arc<dyn KeyValueStore>,
        client: Arc<dyn WebhookClient>,
        view: Arc<dyn View>
    ) -> Self {
        let identity = Arc::new(IdentityStore::new(store.clone()));
        let log = Arc::new(ConversationLog::new(store));
        let chat = ChatSession::new(
            identity.clone(),
            log,
            client.clone(),
            view.clone(),
            settings.delays.reply
        );
        Self {
            settings,
            identity,
            client,
            view,
            chat,
            form: Mutex::new(LeadForm::default()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn identity(&self) -> &IdentityStore {
        &self.identity
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub async fn send_chat_message(&self, text: &str) -> Result<ChatOutcome, ChatError> {
        self.chat.submit_user_message(text).await
    }

    pub async fn select_service(&self, service: &str) {
        let mut form = self.form.lock().await;
        ui::select_service(&mut form, service, self.view.as_ref(), self.settings.delays.focus).await;
    }

    pub async fn edit_form<F>(&self, edit: F) where F: FnOnce(&mut LeadForm) {
        let mut form = self.form.lock().await;
        edit(&mut form);
    }

    pub async fn form(&self) -> LeadForm {
        self.form.lock().await.clone()
    }

    pub async fn submit_lead(&self) -> FormOutcome {
        let mut form = self.form.lock().await;
        form::submit_lead(
            &mut form,
            self.client.as_ref(),
            self.view.as_ref(),
            self.settings.delays.success_scroll
        ).await
    }
}
