//! Contracts for collaborators explicitly out of this core's scope (spec
//! §1, §6): the wire codec, the transport connectors, identd registration
//! and web-push delivery. The core only ever calls through these traits;
//! it never constructs a socket or parses a byte of IRC itself.

use async_trait::async_trait;
use std::net::SocketAddr;

use crate::error::{RegistrationError, UpstreamTransientError};
use crate::network::casemapping::Casemapping;
use crate::network::record::NetworkRecord;
use slirc_proto::Message;

/// A live upstream connection handle. Opaque to the core beyond identity
/// and the ability to close it.
pub trait UpstreamHandle: Send + Sync + std::fmt::Debug {
    /// Stable identity used to detect the Stop/UpstreamConnected race
    /// (spec §9): a connection observed after Stop closed is not the same
    /// connection a later reconnect will produce.
    fn id(&self) -> u64;
    fn close(&self);
    /// The nick currently held on this connection, preferred over the
    /// network record's configured nickname for highlight detection
    /// (spec §4.3 "highlight detection").
    fn current_nick(&self) -> String;
    /// Host/realname/account refreshed onto downstreams alongside the nick
    /// after (re)connecting (spec §4.4 `UpstreamConnected`). `None` when the
    /// upstream hasn't reported one yet.
    fn current_host(&self) -> Option<String>;
    fn current_realname(&self) -> Option<String>;
    fn current_account(&self) -> Option<String>;
    /// Toggles the per-channel auto-detach timer the (out-of-scope) codec
    /// layer maintains (spec §4.3 detach/attach, SPEC_FULL.md's
    /// auto-detach timer supplement). `None` disables it, `Some(period)`
    /// (re)starts it.
    fn set_auto_detach_timer(&self, channel: &str, period: Option<std::time::Duration>);
    /// Whether this connection currently knows the upstream-side channel
    /// (used by `attach` to decide whether to call `forward_channel`).
    fn has_channel(&self, channel: &str) -> bool;
    /// `uc.updateAway`: refresh the upstream-side AWAY status from the
    /// union of all applicable downstreams' away state.
    fn update_away(&self, away: bool);
    /// `uc.updateMonitor`: refresh the upstream's MONITOR set.
    fn update_monitor(&self, nicks: &[String]);
    /// `uc.cancelPendingCommandsByDownstreamID`: abort in-flight upstream
    /// commands that were issued on behalf of one downstream (spec §4.4
    /// `DownstreamDisconnected`).
    fn cancel_pending_commands_by_downstream_id(&self, downstream_id: u64);
    /// `uc.abortPendingCommands`: abort every in-flight upstream command
    /// (spec §4.4 `UpstreamDisconnected`).
    fn abort_pending_commands(&self);
    /// Rekeys the upstream's joined-channels map, each channel's member
    /// map, and the upstream's own MONITOR set under a new casemapping
    /// (spec §4.3 "Casemapping update").
    fn update_casemapping(&self, cm: Casemapping);
}

/// Connects to, registers, and pumps messages from one upstream. The core
/// drives this state machine (see `network::reconnect`) but never touches
/// sockets directly.
#[async_trait]
pub trait UpstreamConnector: Send + Sync {
    /// `connectToUpstream`: dial the network's configured address, binding
    /// to `local_addr` when `Some` (deterministic egress selection).
    async fn connect(
        &self,
        record: &NetworkRecord,
        local_addr: Option<SocketAddr>,
    ) -> Result<Box<dyn UpstreamHandle>, UpstreamTransientError>;

    /// `register` + `runUntilRegistered`: perform the IRC handshake and
    /// block until registration completes or fails.
    async fn register(&self, conn: &dyn UpstreamHandle) -> Result<(), RegistrationError>;

    /// `readMessages`: pump wire events onto the user's event queue until
    /// the connection closes or errors. The core only needs to know that
    /// this ran to completion; the events it posted are what matter.
    async fn read_messages(&self, conn: &dyn UpstreamHandle) -> Result<(), UpstreamTransientError>;
}

/// One target (channel or query) that received text as a result of
/// handling an upstream message, reported back to the dispatcher so it can
/// run highlight detection and push fan-out itself (spec §4.3 "highlight
/// detection", "Push fan-out") — both stay core responsibilities owned by
/// `network::Network`, not the opaque wire codec, which has no access to
/// `Network::is_highlight`/`Network::push_fan_out`.
#[derive(Debug, Clone)]
pub struct DeliveredTarget {
    pub target: String,
    pub text: String,
}

/// `uc.handleMessage`: the opaque wire codec that interprets one message
/// received from an upstream (spec §4.4 `UpstreamMessage`). The dispatcher
/// only verifies the connection is still the live one before handing off;
/// everything the message does to channel/member state is this
/// collaborator's concern, not the core's. Returns the targets that
/// received text, for the dispatcher to check against highlight detection
/// and drive push fan-out.
#[async_trait]
pub trait UpstreamMessageHandler: Send + Sync {
    async fn handle_message(&self, network_id: i64, conn: &dyn UpstreamHandle, msg: Message) -> Vec<DeliveredTarget>;
}

/// identd registration for the lifetime of a connection (optional collaborator).
pub trait IdentdRegistrar: Send + Sync {
    fn register(&self, local: SocketAddr, remote: SocketAddr, ident: &str);
    fn unregister(&self, local: SocketAddr, remote: SocketAddr);
}

/// A single web-push subscription the core enumerates and never otherwise
/// inspects (spec SPEC_FULL.md supplement).
#[derive(Debug, Clone)]
pub struct WebPushSubscription {
    pub id: i64,
    pub endpoint: String,
    pub key_vapid: String,
    pub key_auth: String,
    pub key_p256dh: String,
}

/// A distinguished error indicating the push endpoint is gone and its
/// subscription should be deleted (spec §4.3 Push fan-out).
#[derive(Debug)]
pub struct PushSubscriptionExpired;

/// Delivers one push notification. The core fans this out per-subscription
/// and deletes the subscription on `Err(PushSubscriptionExpired)`.
#[async_trait]
pub trait PushNotifier: Send + Sync {
    async fn notify(
        &self,
        subscription: &WebPushSubscription,
        payload: &str,
    ) -> Result<(), PushSubscriptionExpired>;
}
