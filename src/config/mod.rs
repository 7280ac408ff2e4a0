use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;
use crate::cli::Args;
use crate::error::{ ConfigError, StorageError };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    Memory,
    File,
    Redis,
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreType::Memory => write!(f, "memory"),
            StoreType::File => write!(f, "file"),
            StoreType::Redis => write!(f, "redis"),
        }
    }
}

impl FromStr for StoreType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreType::Memory),
            "file" => Ok(StoreType::File),
            "redis" => Ok(StoreType::Redis),
            _ => Err(StorageError::UnsupportedBackend(s.to_string())),
        }
    }
}

/// Fixed presentation delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    /// Before a bot reply appears in the transcript.
    pub reply: Duration,
    /// Before the success banner is scrolled into view.
    pub success_scroll: Duration,
    /// Before the problem-description field receives focus.
    pub focus: Duration,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            reply: Duration::from_millis(500),
            success_scroll: Duration::from_millis(100),
            focus: Duration::from_millis(500),
        }
    }
}

impl Delays {
    pub fn none() -> Self {
        Self {
            reply: Duration::ZERO,
            success_scroll: Duration::ZERO,
            focus: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Only the chat and lead commands need it.
    pub webhook_url: Option<Url>,
    pub request_timeout: Duration,
    pub store_type: StoreType,
    pub store_path: PathBuf,
    pub store_redis_url: String,
    pub store_redis_prefix: String,
    pub delays: Delays,
}

impl Settings {
    /// Settings with in-memory storage and the default delays.
    pub fn new(webhook_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            webhook_url: Some(parse_webhook_url(webhook_url)?),
            request_timeout: Duration::from_secs(30),
            store_type: StoreType::Memory,
            store_path: PathBuf::from(".lead-concierge/storage.json"),
            store_redis_url: "redis://127.0.0.1:6379".to_string(),
            store_redis_prefix: "concierge:".to_string(),
            delays: Delays::default(),
        })
    }

    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let webhook_url = match args.webhook_url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(raw) => Some(parse_webhook_url(raw)?),
            None => None,
        };
        if args.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            webhook_url,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            store_type: args.store_type.parse()?,
            store_path: PathBuf::from(&args.store_path),
            store_redis_url: args.store_redis_url.clone(),
            store_redis_prefix: args.store_redis_prefix.clone(),
            delays: Delays {
                reply: Duration::from_millis(args.reply_delay_ms),
                success_scroll: Duration::from_millis(args.success_scroll_delay_ms),
                focus: Duration::from_millis(args.focus_delay_ms),
            },
        })
    }

    pub fn webhook_url(&self) -> Result<&Url, ConfigError> {
        self.webhook_url.as_ref().ok_or(ConfigError::MissingWebhookUrl)
    }
}

/// The endpoint has to be an absolute http(s) URL with a host.
pub fn parse_webhook_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidWebhookUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}
