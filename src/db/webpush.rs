//! Web push subscription persistence (SPEC_FULL.md supplement, spec §4.3
//! "Push fan-out").

use sqlx::SqlitePool;

use crate::error::StorageError;
use crate::network::collaborators::WebPushSubscription;

pub struct WebPushRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> WebPushRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<WebPushSubscription>, StorageError> {
        let rows: Vec<(i64, String, String, String, String)> = sqlx::query_as(
            "SELECT id, endpoint, key_vapid, key_auth, key_p256dh FROM webpush_subscriptions WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, endpoint, key_vapid, key_auth, key_p256dh)| WebPushSubscription {
                id,
                endpoint,
                key_vapid,
                key_auth,
                key_p256dh,
            })
            .collect())
    }

    pub async fn insert(&self, user_id: i64, sub: &WebPushSubscription) -> Result<i64, StorageError> {
        let result = sqlx::query(
            "INSERT INTO webpush_subscriptions (user_id, endpoint, key_vapid, key_auth, key_p256dh) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&sub.endpoint)
        .bind(&sub.key_vapid)
        .bind(&sub.key_auth)
        .bind(&sub.key_p256dh)
        .execute(self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Deletes a subscription the push notifier reported as expired (spec
    /// §4.3 "Push fan-out").
    pub async fn delete(&self, id: i64) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM webpush_subscriptions WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
