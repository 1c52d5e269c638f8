//! Channel records repository (spec §3 Channel record).

use sqlx::SqlitePool;

use crate::error::StorageError;
use crate::network::{ChannelRecord, DetachRelayPolicy};

pub struct ChannelRepository<'a> {
    pool: &'a SqlitePool,
}

fn policy_to_str(p: DetachRelayPolicy) -> &'static str {
    match p {
        DetachRelayPolicy::Default => "default",
        DetachRelayPolicy::Message => "message",
        DetachRelayPolicy::Highlight => "highlight",
        DetachRelayPolicy::None => "none",
    }
}

fn policy_from_str(s: &str) -> DetachRelayPolicy {
    match s {
        "message" => DetachRelayPolicy::Message,
        "highlight" => DetachRelayPolicy::Highlight,
        "none" => DetachRelayPolicy::None,
        _ => DetachRelayPolicy::Default,
    }
}

impl<'a> ChannelRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_network(&self, network_id: i64) -> Result<Vec<ChannelRecord>, StorageError> {
        let rows: Vec<(i64, String, bool, String, String)> = sqlx::query_as(
            r#"SELECT id, name, detached, detach_relay_policy, detached_internal_msg_id
               FROM channels WHERE network_id = ? ORDER BY id"#,
        )
        .bind(network_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name, detached, policy, msg_id)| ChannelRecord {
                id,
                name,
                detached,
                detach_relay_policy: policy_from_str(&policy),
                detached_internal_msg_id: msg_id,
            })
            .collect())
    }

    pub async fn upsert(&self, network_id: i64, ch: &ChannelRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"INSERT INTO channels (network_id, name, detached, detach_relay_policy, detached_internal_msg_id)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(network_id, name) DO UPDATE SET
                 detached = excluded.detached,
                 detach_relay_policy = excluded.detach_relay_policy,
                 detached_internal_msg_id = excluded.detached_internal_msg_id"#,
        )
        .bind(network_id)
        .bind(&ch.name)
        .bind(ch.detached)
        .bind(policy_to_str(ch.detach_relay_policy))
        .bind(&ch.detached_internal_msg_id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, network_id: i64, name: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM channels WHERE network_id = ? AND name = ?")
            .bind(network_id)
            .bind(name)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
