use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::Client as HttpClient;
use reqwest::header::{ ACCEPT, CONTENT_TYPE };
use std::time::Duration;
use url::Url;
use super::WebhookClient;
use crate::error::WebhookError;
use crate::models::webhook::{ WebhookPayload, WebhookResponse };

#[derive(Debug, Clone)]
pub struct HttpWebhookClient {
    http: HttpClient,
    url: Url,
}

impl HttpWebhookClient {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, WebhookError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    async fn post(&self, payload: &WebhookPayload) -> Result<WebhookResponse, WebhookError> {
        debug!("POST {} ({} payload)", self.url, payload.kind());
        let resp = self.http
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(payload)
            .send().await?;

        let status = resp.status().as_u16();
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                // Status already arrived; an unreadable body only matters for chat replies.
                warn!("Failed to read webhook response body: {}", e);
                String::new()
            }
        };
        debug!("Webhook answered {} with {} bytes", status, body.len());

        Ok(WebhookResponse { status, body })
    }

    fn endpoint(&self) -> &str {
        self.url.as_str()
    }
}
