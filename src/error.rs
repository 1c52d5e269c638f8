//! Unified error handling for ircbnc.
//!
//! Mirrors the taxonomy in spec §7: each kind of failure gets its own enum,
//! and (following the teacher's `error.rs` convention) every variant has an
//! `error_code()` for metrics labeling and, where the taxonomy calls for a
//! client-visible reply, a `to_irc_reply()`.

use slirc_proto::{Command, Message, Prefix, Response};
use thiserror::Error;

/// Invalid network URL, duplicate name, or limit reached. Surfaced
/// synchronously to the caller of `updateNetwork`/`checkNetwork`.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("invalid network address: {0}")]
    InvalidNetworkAddr(String),

    #[error("invalid network name: {0}")]
    InvalidNetworkName(String),

    #[error("network name already in use: {0}")]
    DuplicateNetworkName(String),

    #[error("maximum number of networks reached")]
    NetworkLimitReached,
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidNetworkAddr(_) => "invalid_network_addr",
            Self::InvalidNetworkName(_) => "invalid_network_name",
            Self::DuplicateNetworkName(_) => "duplicate_network_name",
            Self::NetworkLimitReached => "network_limit_reached",
        }
    }
}

/// Failed IRC registration against an upstream. Carries a reason and a
/// temporary/permanent flag: permanent stops the reconnect loop, temporary
/// retries with backoff (spec §4.3 Registering state).
#[derive(Debug, Clone, Error)]
#[error("registration failed: {reason}")]
pub struct RegistrationError {
    pub reason: String,
    pub temporary: bool,
}

impl RegistrationError {
    pub fn temporary(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            temporary: true,
        }
    }

    pub fn permanent(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            temporary: false,
        }
    }

    pub fn error_code(&self) -> &'static str {
        if self.temporary {
            "registration_error_temporary"
        } else {
            "registration_error_permanent"
        }
    }
}

/// Connect/read failures against an upstream. Logged, broadcast once
/// (de-duplicated against the network's last error), retried.
#[derive(Debug, Clone, Error)]
#[error("upstream transient error: {0}")]
pub struct UpstreamTransientError(pub String);

impl UpstreamTransientError {
    pub fn error_code(&self) -> &'static str {
        "upstream_transient_error"
    }
}

/// Structured IRC errors raised by the (out-of-scope) downstream handler.
/// Rewritten with the server prefix and sent to the offending client; the
/// connection is NOT closed for these (spec §7).
#[derive(Debug, Clone, Error)]
pub enum DownstreamProtocolError {
    #[error("not registered")]
    NotRegistered,

    #[error("need more params for {0}")]
    NeedMoreParams(String),

    #[error("unknown command {0}")]
    UnknownCommand(String),
}

impl DownstreamProtocolError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotRegistered => "not_registered",
            Self::NeedMoreParams(_) => "need_more_params",
            Self::UnknownCommand(_) => "unknown_command",
        }
    }

    /// Convert to an IRC error reply, rewritten with the bouncer's own
    /// server prefix before being sent to the client.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str) -> Message {
        let (response, args) = match self {
            Self::NotRegistered => (
                Response::ERR_NOTREGISTERED,
                vec!["*".to_string(), "You have not registered".to_string()],
            ),
            Self::NeedMoreParams(cmd) => (
                Response::ERR_NEEDMOREPARAMS,
                vec![
                    nick.to_string(),
                    cmd.clone(),
                    "Not enough parameters".to_string(),
                ],
            ),
            Self::UnknownCommand(cmd) => (
                Response::ERR_UNKNOWNCOMMAND,
                vec![nick.to_string(), cmd.clone(), "Unknown command".to_string()],
            ),
        };

        Message {
            tags: None,
            prefix: Some(Prefix::ServerName(server_name.to_string())),
            command: Command::Response(response, args),
        }
    }
}

/// Unexpected handler failure. Logged; the downstream that triggered it is
/// closed (spec §7).
#[derive(Debug, Clone, Error)]
pub enum InternalError {
    #[error("internal error: {0}")]
    Other(String),
}

impl InternalError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Other(_) => "internal_error",
        }
    }
}

/// DB or message-store failure. Logged; the operation that caused it is
/// aborted (spec §7) — except in `detach`, where a `StorageError` capturing
/// `DetachedInternalMsgID` is non-fatal and only impairs future replay.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("message store error: {0}")]
    MessageStore(String),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "storage_database_error",
            Self::MessageStore(_) => "storage_message_store_error",
            Self::Migration(_) => "storage_migration_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_codes() {
        assert_eq!(
            ValidationError::NetworkLimitReached.error_code(),
            "network_limit_reached"
        );
    }

    #[test]
    fn registration_error_temporary_vs_permanent() {
        assert_eq!(
            RegistrationError::temporary("nickname in use").error_code(),
            "registration_error_temporary"
        );
        assert_eq!(
            RegistrationError::permanent("banned").error_code(),
            "registration_error_permanent"
        );
    }

    #[test]
    fn downstream_protocol_error_to_irc_reply() {
        let reply = DownstreamProtocolError::NotRegistered.to_irc_reply("bnc.local", "*");
        assert!(matches!(
            reply.command,
            Command::Response(Response::ERR_NOTREGISTERED, _)
        ));
    }
}
