//! Delivery receipt persistence, the on-disk backing for a network's
//! [`crate::delivered::DeliveredStore`] (spec §4.2, §8 "graceful Stop
//! persists receipts").

use sqlx::SqlitePool;

use crate::error::StorageError;

pub struct DeliveryReceiptRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DeliveryReceiptRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_network(&self, network_id: i64) -> Result<Vec<(String, String, String)>, StorageError> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT target, client_name, msg_id FROM delivery_receipts WHERE network_id = ?",
        )
        .bind(network_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Persists every `(target, client, msg_id)` triple for a network in
    /// one transaction, replacing whatever was stored before.
    pub async fn store_all(
        &self,
        network_id: i64,
        receipts: &[(String, String, String)],
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM delivery_receipts WHERE network_id = ?")
            .bind(network_id)
            .execute(&mut *tx)
            .await?;
        for (target, client, msg_id) in receipts {
            sqlx::query(
                "INSERT INTO delivery_receipts (network_id, target, client_name, msg_id) VALUES (?, ?, ?, ?)",
            )
            .bind(network_id)
            .bind(target)
            .bind(client)
            .bind(msg_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
