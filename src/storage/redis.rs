use async_trait::async_trait;
use log::debug;
use redis::{ Client, AsyncCommands };
use crate::error::StorageError;
use super::KeyValueStore;

pub struct RedisStore {
    client: Client,
    key_prefix: String,
}

impl RedisStore {
    pub fn new(url: &str, key_prefix: &str) -> Result<Self, StorageError> {
        Ok(Self {
            client: Client::open(url)?,
            key_prefix: key_prefix.to_string(),
        })
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(self.key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.get_connection().await?;
        conn.set::<_, _, ()>(self.key(key), value).await?;
        debug!("Stored {} ({} bytes) in redis", self.key(key), value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.get_connection().await?;
        conn.del::<_, ()>(self.key(key)).await?;
        Ok(())
    }
}
