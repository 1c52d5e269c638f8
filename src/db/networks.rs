//! Network records repository (spec §3 Network record), bridging the SQL
//! row shape to [`crate::network::NetworkRecord`].

use sqlx::SqlitePool;

use crate::error::StorageError;
use crate::network::{NetworkRecord, SaslConfig};
use slirc_proto::SaslMechanism;

pub struct NetworkRepository<'a> {
    pool: &'a SqlitePool,
}

type NetworkRow = (
    i64,
    i64,
    Option<String>,
    String,
    bool,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<Vec<u8>>,
);

fn row_to_record(row: NetworkRow) -> NetworkRecord {
    let (id, user_id, name, addr, enabled, nickname, realname, mechanism, plain_username, plain_password, opaque) =
        row;
    NetworkRecord {
        id,
        user_id,
        name,
        addr,
        enabled,
        nickname,
        realname,
        sasl: SaslConfig {
            mechanism: mechanism.map(|m| SaslMechanism::parse(&m)),
            plain_username,
            plain_password,
            opaque: opaque.unwrap_or_default(),
        },
    }
}

fn mechanism_to_str(m: &SaslMechanism) -> String {
    match m {
        SaslMechanism::Plain => "PLAIN".to_string(),
        SaslMechanism::External => "EXTERNAL".to_string(),
        SaslMechanism::ScramSha256 => "SCRAM-SHA-256".to_string(),
        SaslMechanism::Unknown(name) => name.clone(),
    }
}

impl<'a> NetworkRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<NetworkRecord>, StorageError> {
        let rows: Vec<NetworkRow> = sqlx::query_as(
            r#"SELECT id, user_id, name, addr, enabled, nickname, realname,
                      sasl_mechanism, sasl_plain_username, sasl_plain_password, sasl_opaque
               FROM networks WHERE user_id = ? ORDER BY id"#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_record).collect())
    }

    /// Names already in use by `user_id`'s other networks, for `checkNetwork`.
    pub async fn existing_names(&self, user_id: i64, exclude_id: Option<i64>) -> Result<Vec<String>, StorageError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM networks WHERE user_id = ? AND name IS NOT NULL AND id != ?",
        )
        .bind(user_id)
        .bind(exclude_id.unwrap_or(-1))
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|(n,)| n).collect())
    }

    pub async fn insert(&self, record: &NetworkRecord) -> Result<i64, StorageError> {
        let result = sqlx::query(
            r#"INSERT INTO networks
               (user_id, name, addr, enabled, nickname, realname,
                sasl_mechanism, sasl_plain_username, sasl_plain_password, sasl_opaque)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(record.user_id)
        .bind(&record.name)
        .bind(&record.addr)
        .bind(record.enabled)
        .bind(&record.nickname)
        .bind(&record.realname)
        .bind(record.sasl.mechanism.as_ref().map(mechanism_to_str))
        .bind(&record.sasl.plain_username)
        .bind(&record.sasl.plain_password)
        .bind(if record.sasl.opaque.is_empty() { None } else { Some(&record.sasl.opaque) })
        .execute(self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn update(&self, record: &NetworkRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"UPDATE networks SET
                 name = ?, addr = ?, enabled = ?, nickname = ?, realname = ?,
                 sasl_mechanism = ?, sasl_plain_username = ?, sasl_plain_password = ?, sasl_opaque = ?
               WHERE id = ?"#,
        )
        .bind(&record.name)
        .bind(&record.addr)
        .bind(record.enabled)
        .bind(&record.nickname)
        .bind(&record.realname)
        .bind(record.sasl.mechanism.as_ref().map(mechanism_to_str))
        .bind(&record.sasl.plain_username)
        .bind(&record.sasl.plain_password)
        .bind(if record.sasl.opaque.is_empty() { None } else { Some(&record.sasl.opaque) })
        .bind(record.id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM networks WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
