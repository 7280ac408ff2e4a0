//! Visitor identity persisted in the key-value store.

use chrono::Utc;
use log::info;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::Mutex;
use crate::error::StorageError;
use crate::models::chat::VisitorIdentity;
use crate::storage::KeyValueStore;

pub const VISITOR_ID_KEY: &str = "visitorId";
pub const USER_NAME_KEY: &str = "userName";

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// `visitor_<unix millis>_<9 random base-36 chars>`.
pub fn generate_visitor_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("visitor_{}_{}", Utc::now().timestamp_millis(), suffix)
}

pub struct IdentityStore {
    store: Arc<dyn KeyValueStore>,
    create_lock: Mutex<()>,
}

impl IdentityStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            create_lock: Mutex::new(()),
        }
    }

    pub async fn get_or_create_visitor_id(&self) -> Result<String, StorageError> {
        let _guard = self.create_lock.lock().await;
        if let Some(existing) = self.store.get(VISITOR_ID_KEY).await? {
            if !existing.is_empty() {
                return Ok(existing);
            }
        }
        let visitor_id = generate_visitor_id();
        self.store.set(VISITOR_ID_KEY, &visitor_id).await?;
        info!("New visitor id assigned: {}", visitor_id);
        Ok(visitor_id)
    }

    pub async fn get_user_name(&self) -> Result<Option<String>, StorageError> {
        Ok(self.store.get(USER_NAME_KEY).await?.filter(|name| !name.is_empty()))
    }

    /// Blank names clear the stored value.
    pub async fn set_user_name(&self, name: &str) -> Result<Option<String>, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            self.store.remove(USER_NAME_KEY).await?;
            return Ok(None);
        }
        self.store.set(USER_NAME_KEY, name).await?;
        Ok(Some(name.to_string()))
    }

    pub async fn identity(&self) -> Result<VisitorIdentity, StorageError> {
        Ok(VisitorIdentity {
            visitor_id: self.get_or_create_visitor_id().await?,
            user_name: self.get_user_name().await?,
        })
    }
}
