#![allow(dead_code)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{ Json, Router };
use lead_concierge::concierge::Concierge;
use lead_concierge::config::{ Delays, Settings };
use lead_concierge::storage::{ KeyValueStore, MemoryStore };
use lead_concierge::ui::RecordingView;
use lead_concierge::webhook::new_client;
use serde_json::Value as JsonValue;
use std::sync::{ Arc, Mutex };
use std::time::Duration;

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: Arc<Mutex<Vec<JsonValue>>>,
}

pub struct MockWebhook {
    pub url: String,
    requests: Arc<Mutex<Vec<JsonValue>>>,
}

impl MockWebhook {
    pub fn requests(&self) -> Vec<JsonValue> {
        self.requests.lock().unwrap().clone()
    }
}

async fn hook(State(state): State<MockState>, Json(body): Json<JsonValue>) -> (StatusCode, String) {
    state.requests.lock().unwrap().push(body);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (state.status, state.body.clone())
}

pub async fn spawn_webhook(status: u16, body: &str) -> MockWebhook {
    spawn_slow_webhook(status, body, Duration::ZERO).await
}

pub async fn spawn_slow_webhook(status: u16, body: &str, delay: Duration) -> MockWebhook {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status: StatusCode::from_u16(status).expect("status"),
        body: body.to_string(),
        delay,
        requests: requests.clone(),
    };
    let app = Router::new().route("/webhook/test", post(hook)).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock webhook");
    });

    MockWebhook {
        url: format!("http://{}/webhook/test", addr),
        requests,
    }
}

/// A URL nothing is listening on.
pub async fn closed_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{}/webhook/test", addr)
}

pub fn concierge_with_store(
    url: &str,
    timeout: Duration,
    store: Arc<dyn KeyValueStore>
) -> (Concierge, Arc<RecordingView>) {
    let mut settings = Settings::new(url).expect("settings");
    settings.request_timeout = timeout;
    settings.delays = Delays::none();
    let client = new_client(settings.webhook_url().expect("url"), timeout).expect("client");
    let view = Arc::new(RecordingView::new());
    let concierge = Concierge::with_parts(settings, store, client, view.clone());
    (concierge, view)
}

pub fn concierge(url: &str) -> (Concierge, Arc<RecordingView>) {
    concierge_with_store(url, Duration::from_secs(5), Arc::new(MemoryStore::new()))
}
