//! The dispatcher's typed event union (spec §4.4, SPEC_FULL.md's "typed
//! event union" design note). A sealed variant set, matched exhaustively by
//! `User::handle_event` — unlike the source's "unknown event: fatal" case,
//! an unhandled variant here is a compile error, not a runtime panic.

use std::sync::Arc;

use slirc_proto::Message;
use tokio::sync::oneshot;

use crate::error::{
    DownstreamProtocolError, InternalError, RegistrationError, StorageError, UpstreamTransientError,
    ValidationError,
};
use crate::network::casemapping::Casemapping;
use crate::network::collaborators::UpstreamHandle;
use crate::network::record::NetworkRecord;

/// Outcome of `dc.welcome` / `dc.handleMessage` (spec §4.4
/// `DownstreamConnected`/`DownstreamMessage`): a structured IRC error is
/// sent back to the client without closing the connection, anything else
/// is logged and the downstream is closed.
#[derive(Debug)]
pub enum DownstreamHandlerError {
    Protocol(DownstreamProtocolError),
    Internal(InternalError),
}

/// Opaque handle to a downstream session. The core only needs identity and
/// the ability to route a message to it; the codec/session layer that
/// implements this lives outside the core's scope. Method names mirror the
/// collaborator hooks spec §6 names explicitly (`dc.welcome`,
/// `dc.handleMessage`, `dc.sendTargetBacklog`, `dc.updateSupportedCaps`,
/// `dc.updateNick`/`updateHost`/`updateRealname`/`updateAccount`).
pub trait DownstreamHandle: Send + Sync + std::fmt::Debug {
    fn id(&self) -> u64;
    /// The client name delivery receipts are keyed by (spec §4.2), distinct
    /// from the IRC nick — stable across nick changes within one connection.
    fn client_name(&self) -> String;
    /// `true` once the downstream negotiated `bouncer-networks-notify`.
    fn notifies_bouncer_networks(&self) -> bool;
    /// `true` once the downstream negotiated the multi-upstream capability.
    fn is_multi_upstream(&self) -> bool;
    /// The network id this downstream is bound to, if any.
    fn bound_network_id(&self) -> Option<i64>;
    /// Re-points a downstream at a different network id (spec §4.4
    /// `updateNetwork` step 6).
    fn set_bound_network_id(&self, network_id: i64);
    /// Whether this downstream is currently marked away.
    fn is_away(&self) -> bool;
    fn send(&self, msg: Message);
    /// Closes the connection; used for internal errors, password changes,
    /// and network deletion (spec §4.4, §7).
    fn close(&self);

    /// `dc.welcome`: send the post-registration burst. Errors classify per
    /// spec §4.4 `DownstreamConnected`.
    fn welcome(&self) -> Result<(), DownstreamHandlerError>;
    /// `dc.handleMessage`: dispatch one client-originated message.
    fn handle_message(&self, msg: &Message) -> Result<(), DownstreamHandlerError>;
    /// `dc.updateSupportedCaps`: refresh capability advertisement, called
    /// after an upstream connects or disconnects.
    fn update_supported_caps(&self);
    fn update_nick(&self, nick: &str);
    fn update_host(&self, host: &str);
    fn update_realname(&self, realname: &str);
    fn update_account(&self, account: Option<&str>);
    /// `forwardChannel`: send current topic/names for a just-(re)joined
    /// channel (spec §4.3 `attach` step 4).
    fn forward_channel(&self, network_id: i64, channel: &str);
    /// `dc.sendTargetBacklog`: replay history since `since_msg_id` on
    /// `target` (spec §4.3 `attach` step 4, §8 scenario 2).
    fn send_target_backlog(&self, network_id: i64, target: &str, since_msg_id: &str);
    /// Rekeys this downstream's own MONITOR set under a new casemapping
    /// (spec §4.3 "Casemapping update").
    fn update_monitor_casemapping(&self, cm: Casemapping);
}

/// Events posted onto one user's event queue (spec §4.4's event cases).
pub enum UserEvent {
    UpstreamConnected {
        network_id: i64,
        conn: Arc<dyn UpstreamHandle>,
    },
    UpstreamDisconnected {
        network_id: i64,
        conn_id: u64,
    },
    UpstreamConnectionError {
        network_id: i64,
        err: UpstreamTransientError,
    },
    UpstreamRegistrationError {
        network_id: i64,
        err: RegistrationError,
    },
    UpstreamError {
        network_id: i64,
        conn_id: u64,
        err: UpstreamTransientError,
    },
    UpstreamMessage {
        network_id: i64,
        conn_id: u64,
        msg: Message,
    },
    ChannelDetach {
        network_id: i64,
        conn_id: u64,
        name: String,
    },
    ChannelAttach {
        network_id: i64,
        conn_id: u64,
        name: String,
    },
    DownstreamConnected {
        downstream: Arc<dyn DownstreamHandle>,
    },
    DownstreamDisconnected {
        downstream_id: u64,
    },
    DownstreamMessage {
        downstream_id: u64,
        msg: Message,
    },
    Broadcast {
        msg: Message,
    },
    UserUpdate {
        password: Option<String>,
        admin: Option<bool>,
        done: oneshot::Sender<Result<(), StorageError>>,
    },
    /// `updateNetwork` (spec §4.4), invoked from the `UserUpdate` path or an
    /// admin surface (out of scope here — wiring it up is a codec/API
    /// concern). `submitted` carries the network's id when editing an
    /// existing one, or `0` to create a new one.
    NetworkUpdate {
        submitted: NetworkRecord,
        done: oneshot::Sender<Result<i64, NetworkUpdateError>>,
    },
    /// `deleteNetwork` (spec §4.4).
    NetworkDelete {
        network_id: i64,
        done: oneshot::Sender<Result<(), StorageError>>,
    },
    Stop {
        done: oneshot::Sender<()>,
    },
}

impl UserEvent {
    /// Stable variant name for metrics labels and trace spans — cheaper
    /// than formatting the `Debug` impl just to discard the payload.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpstreamConnected { .. } => "UpstreamConnected",
            Self::UpstreamDisconnected { .. } => "UpstreamDisconnected",
            Self::UpstreamConnectionError { .. } => "UpstreamConnectionError",
            Self::UpstreamRegistrationError { .. } => "UpstreamRegistrationError",
            Self::UpstreamError { .. } => "UpstreamError",
            Self::UpstreamMessage { .. } => "UpstreamMessage",
            Self::ChannelDetach { .. } => "ChannelDetach",
            Self::ChannelAttach { .. } => "ChannelAttach",
            Self::DownstreamConnected { .. } => "DownstreamConnected",
            Self::DownstreamDisconnected { .. } => "DownstreamDisconnected",
            Self::DownstreamMessage { .. } => "DownstreamMessage",
            Self::Broadcast { .. } => "Broadcast",
            Self::UserUpdate { .. } => "UserUpdate",
            Self::NetworkUpdate { .. } => "NetworkUpdate",
            Self::NetworkDelete { .. } => "NetworkDelete",
            Self::Stop { .. } => "Stop",
        }
    }
}

/// Failure modes of `NetworkUpdate`: either `checkNetwork` rejected the
/// submission, or persisting it failed.
#[derive(Debug)]
pub enum NetworkUpdateError {
    Validation(ValidationError),
    Storage(StorageError),
}

impl std::fmt::Display for NetworkUpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "{e}"),
            Self::Storage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for NetworkUpdateError {}

impl std::fmt::Debug for UserEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpstreamConnected { network_id, .. } => {
                write!(f, "UpstreamConnected{{network_id: {network_id}}}")
            }
            Self::UpstreamDisconnected { network_id, .. } => {
                write!(f, "UpstreamDisconnected{{network_id: {network_id}}}")
            }
            Self::UpstreamConnectionError { network_id, .. } => {
                write!(f, "UpstreamConnectionError{{network_id: {network_id}}}")
            }
            Self::UpstreamRegistrationError { network_id, .. } => {
                write!(f, "UpstreamRegistrationError{{network_id: {network_id}}}")
            }
            Self::UpstreamError { network_id, .. } => {
                write!(f, "UpstreamError{{network_id: {network_id}}}")
            }
            Self::UpstreamMessage { network_id, .. } => {
                write!(f, "UpstreamMessage{{network_id: {network_id}}}")
            }
            Self::ChannelDetach { network_id, name, .. } => {
                write!(f, "ChannelDetach{{network_id: {network_id}, name: {name}}}")
            }
            Self::ChannelAttach { network_id, name, .. } => {
                write!(f, "ChannelAttach{{network_id: {network_id}, name: {name}}}")
            }
            Self::DownstreamConnected { .. } => write!(f, "DownstreamConnected"),
            Self::DownstreamDisconnected { downstream_id } => {
                write!(f, "DownstreamDisconnected{{id: {downstream_id}}}")
            }
            Self::DownstreamMessage { downstream_id, .. } => {
                write!(f, "DownstreamMessage{{id: {downstream_id}}}")
            }
            Self::Broadcast { .. } => write!(f, "Broadcast"),
            Self::UserUpdate { .. } => write!(f, "UserUpdate"),
            Self::NetworkUpdate { submitted, .. } => {
                write!(f, "NetworkUpdate{{network_id: {}}}", submitted.id)
            }
            Self::NetworkDelete { network_id, .. } => {
                write!(f, "NetworkDelete{{network_id: {network_id}}}")
            }
            Self::Stop { .. } => write!(f, "Stop"),
        }
    }
}
