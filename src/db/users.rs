//! User records (spec §3 User record) and their repository.

use sqlx::SqlitePool;

use crate::error::StorageError;

/// The persistent fields of a User (spec §3).
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub admin: bool,
    /// The realname a network's submitted realname is compared against to
    /// detect "inherit" (spec §4.4 `updateNetwork` step 2). Distinct from
    /// `username` — the data model allows the two to differ.
    pub default_realname: Option<String>,
}

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<UserRecord>, StorageError> {
        let rows: Vec<(i64, String, String, bool, Option<String>)> = sqlx::query_as(
            "SELECT id, username, password_hash, admin, default_realname FROM users ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, username, password_hash, admin, default_realname)| UserRecord {
                id,
                username,
                password_hash,
                admin,
                default_realname,
            })
            .collect())
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        let row: Option<(i64, String, String, bool, Option<String>)> = sqlx::query_as(
            "SELECT id, username, password_hash, admin, default_realname FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(|(id, username, password_hash, admin, default_realname)| UserRecord {
            id,
            username,
            password_hash,
            admin,
            default_realname,
        }))
    }

    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        admin: bool,
        default_realname: Option<&str>,
    ) -> Result<UserRecord, StorageError> {
        let now = chrono::Utc::now().timestamp();
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, admin, default_realname, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(admin)
        .bind(default_realname)
        .bind(now)
        .execute(self.pool)
        .await?;
        Ok(UserRecord {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            admin,
            default_realname: default_realname.map(|s| s.to_string()),
        })
    }

    /// Updates password and/or admin flag (spec §4.4 `UserEvent::UserUpdate`).
    pub async fn update(
        &self,
        id: i64,
        password_hash: Option<&str>,
        admin: Option<bool>,
    ) -> Result<(), StorageError> {
        if let Some(hash) = password_hash {
            sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
                .bind(hash)
                .bind(id)
                .execute(self.pool)
                .await?;
        }
        if let Some(admin) = admin {
            sqlx::query("UPDATE users SET admin = ? WHERE id = ?")
                .bind(admin)
                .bind(id)
                .execute(self.pool)
                .await?;
        }
        Ok(())
    }
}
