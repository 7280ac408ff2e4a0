mod file;
mod memory;
mod redis;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use self::redis::RedisStore;

use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use crate::config::{ Settings, StoreType };
use crate::error::StorageError;

/// String key-value storage scoped to one visitor, the way browser local storage is.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub fn create_store(settings: &Settings) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match settings.store_type {
        StoreType::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreType::File => Ok(Arc::new(FileStore::new(settings.store_path.clone()))),
        StoreType::Redis => {
            let store = RedisStore::new(&settings.store_redis_url, &settings.store_redis_prefix)?;
            Ok(Arc::new(store))
        }
    }
}

pub fn initialize_store(settings: &Settings) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match settings.store_type {
        StoreType::Memory => info!("Visitor state will be kept in memory only"),
        StoreType::File => info!("Visitor state will be stored in: {}", settings.store_path.display()),
        StoreType::Redis => info!(
            "Visitor state will be stored in: redis at {} (prefix '{}')",
            settings.store_redis_url,
            settings.store_redis_prefix
        ),
    }
    create_store(settings)
}
