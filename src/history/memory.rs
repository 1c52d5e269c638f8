//! Non-persistent message store. Used when `Config::log_path` is empty
//! (spec §6: `LogPath ""` → in-memory store).

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{MessageStore, StoredMessage};
use crate::error::StorageError;

#[derive(Default)]
pub struct MemoryStore {
    messages: Mutex<Vec<(String, String, StoredMessage)>>, // (network, folded_target, msg)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn last_msg_id(
        &self,
        network: &str,
        folded_target: &str,
        at: DateTime<Utc>,
    ) -> Result<String, StorageError> {
        let messages = self.messages.lock().expect("memory store lock poisoned");
        Ok(messages
            .iter()
            .filter(|(n, t, m)| n == network && t == folded_target && m.at <= at)
            .max_by_key(|(_, _, m)| m.at)
            .map(|(_, _, m)| m.internal_id.clone())
            .unwrap_or_default())
    }

    async fn backlog_since(
        &self,
        network: &str,
        folded_target: &str,
        since_msg_id: &str,
    ) -> Result<Vec<StoredMessage>, StorageError> {
        let messages = self.messages.lock().expect("memory store lock poisoned");
        Ok(messages
            .iter()
            .filter(|(n, t, m)| n == network && t == folded_target && m.internal_id.as_str() > since_msg_id)
            .map(|(_, _, m)| m.clone())
            .collect())
    }

    async fn rename_network(&self, old_name: &str, new_name: &str) -> Result<(), StorageError> {
        let mut messages = self.messages.lock().expect("memory store lock poisoned");
        for (network, _, _) in messages.iter_mut() {
            if network == old_name {
                *network = new_name.to_string();
            }
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn has_persistent_store(&self) -> bool {
        false
    }
}
