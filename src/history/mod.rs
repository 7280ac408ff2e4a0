use log::error;
use std::sync::Arc;
use tokio::sync::Mutex;
use crate::error::StorageError;
use crate::models::chat::{ ChatMessageRecord, ConversationHistory, Sender };
use crate::storage::KeyValueStore;

pub const HISTORY_KEY: &str = "chatHistory";

/// The persisted ConversationHistory. The whole list is stored as one JSON
/// value and overwritten on every append.
pub struct ConversationLog {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl ConversationLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn load(&self) -> Result<ConversationHistory, StorageError> {
        let raw = match self.store.get(HISTORY_KEY).await? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };
        match serde_json::from_str::<ConversationHistory>(&raw) {
            Ok(history) => Ok(history),
            Err(e) => {
                error!("Error parsing stored chat history, starting over: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Appends one record and returns the history as persisted.
    pub async fn append(&self, record: ChatMessageRecord) -> Result<ConversationHistory, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.load().await?;
        history.push(record);
        let json = serde_json::to_string(&history)?;
        self.store.set(HISTORY_KEY, &json).await?;
        Ok(history)
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(HISTORY_KEY).await
    }
}

pub fn format_history(history: &[ChatMessageRecord]) -> String {
    if history.is_empty() {
        return String::from("No conversation yet.\n");
    }
    let mut result = String::new();
    for record in history {
        let sender_display = match record.sender {
            Sender::User => "You",
            Sender::Bot => "Bot",
        };
        result.push_str(&format!("{} {}: {}\n", record.timestamp, sender_display, record.message));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn log() -> (ConversationLog, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (ConversationLog::new(store.clone()), store)
    }

    #[tokio::test]
    async fn empty_store_has_empty_history() {
        let (log, _) = log();
        assert!(log.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn alternating_appends_keep_order() {
        let (log, _) = log();
        let n = 5;
        for i in 0..n {
            log.append(ChatMessageRecord::new(Sender::User, format!("question {}", i))).await.unwrap();
            log.append(ChatMessageRecord::new(Sender::Bot, format!("answer {}", i))).await.unwrap();
        }

        let history = log.load().await.unwrap();
        assert_eq!(history.len(), 2 * n);
        for (i, pair) in history.chunks(2).enumerate() {
            assert_eq!(pair[0].sender, Sender::User);
            assert_eq!(pair[0].message, format!("question {}", i));
            assert_eq!(pair[1].sender, Sender::Bot);
            assert_eq!(pair[1].message, format!("answer {}", i));
        }
        assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn duplicates_are_kept() {
        let (log, _) = log();
        log.append(ChatMessageRecord::new(Sender::User, "same")).await.unwrap();
        let history = log.append(ChatMessageRecord::new(Sender::User, "same")).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_appends_are_not_lost() {
        let (log, _) = log();
        let log = Arc::new(log);
        let mut handles = Vec::new();
        for i in 0..20 {
            let log = log.clone();
            handles.push(tokio::spawn(async move {
                log.append(ChatMessageRecord::new(Sender::User, format!("m{}", i))).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(log.load().await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn corrupt_history_reads_as_empty() {
        let (log, store) = log();
        store.set(HISTORY_KEY, "[{\"sender\":").await.unwrap();
        assert!(log.load().await.unwrap().is_empty());
        log.append(ChatMessageRecord::new(Sender::User, "hi")).await.unwrap();
        assert_eq!(log.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clear_removes_history() {
        let (log, store) = log();
        log.append(ChatMessageRecord::new(Sender::User, "hi")).await.unwrap();
        log.clear().await.unwrap();
        assert_eq!(store.get(HISTORY_KEY).await.unwrap(), None);
    }

    #[test]
    fn formats_history_lines() {
        let history = vec![
            ChatMessageRecord {
                sender: Sender::User,
                message: "hi".into(),
                timestamp: "2024-05-01T10:00:00.000Z".into(),
            },
            ChatMessageRecord {
                sender: Sender::Bot,
                message: "hello".into(),
                timestamp: "2024-05-01T10:00:01.000Z".into(),
            },
        ];
        assert_eq!(
            format_history(&history),
            "2024-05-01T10:00:00.000Z You: hi\n2024-05-01T10:00:01.000Z Bot: hello\n"
        );
        assert_eq!(format_history(&[]), "No conversation yet.\n");
    }
}
