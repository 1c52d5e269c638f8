//! The Database capability (spec §6): storage for users, networks, joined
//! channels, delivery receipts and web push subscriptions, behind an async
//! SQLite pool. Modeled on the teacher's `db/mod.rs`: a pool wrapper that
//! runs embedded migrations gated on table/column existence, handing out
//! one repository per entity.

mod channels;
mod networks;
mod receipts;
mod users;
mod webpush;

pub use channels::ChannelRepository;
pub use networks::NetworkRepository;
pub use receipts::DeliveryReceiptRepository;
pub use users::{UserRecord, UserRepository};
pub use webpush::WebPushRepository;

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::StorageError;

/// Database handle wrapping a pooled SQLite connection.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    pub async fn new(path: &str) -> Result<Self, StorageError> {
        let pool = if path == ":memory:" {
            let options = SqliteConnectOptions::new()
                .filename("file::memory:")
                .shared_cache(true)
                .create_if_missing(true);

            SqlitePoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(Some(Self::IDLE_TIMEOUT))
                .test_before_acquire(true)
                .connect_with(options)
                .await?
        } else {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(e) = std::fs::create_dir_all(parent) {
                        tracing::warn!(path = %parent.display(), error = %e, "failed to create database directory");
                    }
                }
            }

            let options = SqliteConnectOptions::new().filename(path).create_if_missing(true);

            SqlitePoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(Some(Self::IDLE_TIMEOUT))
                .test_before_acquire(true)
                .connect_with(options)
                .await?
        };

        info!(path = %path, "database connected");
        Self::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
        async fn table_exists(pool: &SqlitePool, table: &str) -> bool {
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?)",
            )
            .bind(table)
            .fetch_one(pool)
            .await
            .unwrap_or(false)
        }

        let core_tables = ["users", "networks", "channels", "delivery_receipts", "webpush_subscriptions"];
        let mut core_ok = true;
        for t in core_tables {
            if !table_exists(pool, t).await {
                core_ok = false;
                break;
            }
        }

        if !core_ok {
            Self::run_migration_file(pool, include_str!("../../migrations/001_init.sql")).await;
            info!("database migrations applied (001_init)");
        } else {
            info!("database already initialized");
        }

        Ok(())
    }

    async fn run_migration_file(pool: &SqlitePool, migration: &str) {
        for statement in migration.split(';') {
            let mut sql_lines: Vec<&str> = Vec::new();
            for line in statement.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with("--") {
                    continue;
                }
                sql_lines.push(line);
            }
            if sql_lines.is_empty() {
                continue;
            }
            let sql = sql_lines.join("\n");
            if let Err(e) = sqlx::query(&sql).execute(pool).await {
                let err_str = e.to_string();
                if !err_str.contains("already exists") {
                    tracing::warn!(sql = %sql, error = %e, "migration statement failed");
                }
            }
        }
    }

    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }

    pub fn networks(&self) -> NetworkRepository<'_> {
        NetworkRepository::new(&self.pool)
    }

    pub fn channels(&self) -> ChannelRepository<'_> {
        ChannelRepository::new(&self.pool)
    }

    pub fn receipts(&self) -> DeliveryReceiptRepository<'_> {
        DeliveryReceiptRepository::new(&self.pool)
    }

    pub fn webpush(&self) -> WebPushRepository<'_> {
        WebPushRepository::new(&self.pool)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
