mod http;

pub use http::HttpWebhookClient;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use crate::error::WebhookError;
use crate::models::webhook::{ WebhookPayload, WebhookResponse };

/// One POST per call, never retried.
#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// Sends the payload as JSON. A non-2xx status is still `Ok`; only a request
    /// that never completed is an error.
    async fn post(&self, payload: &WebhookPayload) -> Result<WebhookResponse, WebhookError>;

    fn endpoint(&self) -> &str;
}

/// Sends the payload and folds non-2xx statuses into `WebhookError::HttpStatus`.
pub async fn deliver(
    client: &dyn WebhookClient,
    payload: &WebhookPayload
) -> Result<WebhookResponse, WebhookError> {
    let response = client.post(payload).await?;
    if response.is_success() {
        Ok(response)
    } else {
        Err(WebhookError::HttpStatus(response.status))
    }
}

pub fn new_client(url: &Url, timeout: Duration) -> Result<Arc<dyn WebhookClient>, WebhookError> {
    let client = HttpWebhookClient::new(url.clone(), timeout)?;
    Ok(Arc::new(client))
}
