//! The `MessageStore` capability (spec §6): `LastMsgID`, `RenameNetwork`,
//! `Close`, plus a `has_persistent_store()` capability flag so callers gate
//! receipt persistence and backlog replay on a flag rather than a runtime
//! type test (spec §9 design note).
//!
//! Modeled on the teacher's `history/` module split: a trait object
//! interface here, a null-ish in-memory implementation in [`memory`], and a
//! persistent filesystem-backed implementation in [`fs`].

mod fs;
mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageError;

/// Message history / backlog storage, keyed by network name and a
/// casemapping-folded target (channel or nick).
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// The last internal message id on `folded_target` at or before `at`.
    /// Returns the empty string when there is no history (spec §4.3 detach).
    async fn last_msg_id(
        &self,
        network: &str,
        folded_target: &str,
        at: DateTime<Utc>,
    ) -> Result<String, StorageError>;

    /// Replays messages strictly after `since_msg_id` on `folded_target`.
    async fn backlog_since(
        &self,
        network: &str,
        folded_target: &str,
        since_msg_id: &str,
    ) -> Result<Vec<StoredMessage>, StorageError>;

    /// Renames the on-disk tree for a network whose name changed
    /// (spec §4.4 `updateNetwork` step 8). A no-op for non-persistent stores.
    async fn rename_network(&self, old_name: &str, new_name: &str) -> Result<(), StorageError>;

    async fn close(&self) -> Result<(), StorageError>;

    /// Capability flag: gates receipt persistence and backlog replay.
    /// Expose as a flag rather than testing `dyn Any`/downcasting (spec §9).
    fn has_persistent_store(&self) -> bool;
}

/// One stored message, opaque payload plus an internal id ordering key.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub internal_id: String,
    pub raw: String,
    pub at: DateTime<Utc>,
}
