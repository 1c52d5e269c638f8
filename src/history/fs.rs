//! Filesystem-backed, persistent message store: one append-only log file
//! per network/target, supporting directory rename on network rename
//! (spec §4.4 `updateNetwork` step 8).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;

use super::{MessageStore, StoredMessage};
use crate::error::StorageError;

pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn target_path(&self, network: &str, folded_target: &str) -> PathBuf {
        self.root
            .join(network)
            .join(format!("{}.log", sanitize(folded_target)))
    }

    async fn read_lines(path: &Path) -> Result<Vec<StoredMessage>, StorageError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(content.lines().filter_map(parse_line).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StorageError::MessageStore(e.to_string())),
        }
    }
}

fn sanitize(target: &str) -> String {
    target.replace(['/', '\\'], "_")
}

fn parse_line(line: &str) -> Option<StoredMessage> {
    let mut parts = line.splitn(3, '\t');
    let internal_id = parts.next()?.to_string();
    let at: DateTime<Utc> = parts.next()?.parse().ok()?;
    let raw = parts.next()?.to_string();
    Some(StoredMessage { internal_id, raw, at })
}

#[async_trait]
impl MessageStore for FsStore {
    async fn last_msg_id(
        &self,
        network: &str,
        folded_target: &str,
        at: DateTime<Utc>,
    ) -> Result<String, StorageError> {
        let path = self.target_path(network, folded_target);
        let messages = Self::read_lines(&path).await?;
        Ok(messages
            .into_iter()
            .filter(|m| m.at <= at)
            .max_by_key(|m| m.at)
            .map(|m| m.internal_id)
            .unwrap_or_default())
    }

    async fn backlog_since(
        &self,
        network: &str,
        folded_target: &str,
        since_msg_id: &str,
    ) -> Result<Vec<StoredMessage>, StorageError> {
        let path = self.target_path(network, folded_target);
        let messages = Self::read_lines(&path).await?;
        Ok(messages
            .into_iter()
            .filter(|m| m.internal_id.as_str() > since_msg_id)
            .collect())
    }

    async fn rename_network(&self, old_name: &str, new_name: &str) -> Result<(), StorageError> {
        let old_dir = self.root.join(old_name);
        if !old_dir.exists() {
            return Ok(());
        }
        let new_dir = self.root.join(new_name);
        tokio::fs::rename(&old_dir, &new_dir)
            .await
            .map_err(|e| StorageError::MessageStore(e.to_string()))
    }

    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn has_persistent_store(&self) -> bool {
        true
    }
}

impl FsStore {
    /// Appends one message, creating the network/target directory and file
    /// as needed. Not part of the `MessageStore` trait since the core
    /// reads backlog but writing happens from the (out-of-scope) codec
    /// layer; exposed here for the filesystem backend's own bookkeeping
    /// and for tests.
    pub async fn append(
        &self,
        network: &str,
        folded_target: &str,
        message: &StoredMessage,
    ) -> Result<(), StorageError> {
        let path = self.target_path(network, folded_target);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::MessageStore(e.to_string()))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StorageError::MessageStore(e.to_string()))?;
        let line = format!(
            "{}\t{}\t{}\n",
            message.internal_id,
            message.at.to_rfc3339(),
            message.raw
        );
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StorageError::MessageStore(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_then_last_msg_id_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        let msg = StoredMessage {
            internal_id: "5".to_string(),
            raw: "hello".to_string(),
            at: Utc::now(),
        };
        store.append("libera", "#foo", &msg).await.unwrap();
        let id = store.last_msg_id("libera", "#foo", Utc::now()).await.unwrap();
        assert_eq!(id, "5");
    }

    #[tokio::test]
    async fn rename_network_moves_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        let msg = StoredMessage {
            internal_id: "1".to_string(),
            raw: "hi".to_string(),
            at: Utc::now(),
        };
        store.append("liberachat", "#foo", &msg).await.unwrap();
        store.rename_network("liberachat", "libera").await.unwrap();
        assert!(dir.path().join("libera").exists());
        assert!(!dir.path().join("liberachat").exists());
        let id = store.last_msg_id("libera", "#foo", Utc::now()).await.unwrap();
        assert_eq!(id, "1");
    }

    #[test]
    fn is_persistent() {
        assert!(FsStore::new("/tmp").has_persistent_store());
    }
}
