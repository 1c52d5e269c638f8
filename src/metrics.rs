//! Prometheus metrics for the bouncer core (SPEC_FULL.md Observability).
//!
//! Scoped to what this crate actually drives: user/network lifecycle,
//! upstream connection outcomes, downstream fan-out and the per-user
//! event queue the dispatcher reads from. The wire codec and transport
//! listeners report their own metrics through whatever registry they're
//! built with; this module doesn't reach into their concerns.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    /// Users with a running dispatcher.
    pub static ref ACTIVE_USERS: IntGauge = IntGauge::new(
        "ircbnc_active_users",
        "Users with a running dispatcher task"
    ).unwrap();

    /// Networks with a running reconnect task, across all users.
    pub static ref ACTIVE_NETWORKS: IntGauge = IntGauge::new(
        "ircbnc_active_networks",
        "Networks with a running reconnect task"
    ).unwrap();

    /// Networks currently holding a live upstream connection.
    pub static ref UPSTREAM_CONNECTED: IntGauge = IntGauge::new(
        "ircbnc_upstream_connected",
        "Networks currently connected to their upstream"
    ).unwrap();

    /// Downstream sessions currently attached to any user.
    pub static ref DOWNSTREAM_CONNECTIONS: IntGauge = IntGauge::new(
        "ircbnc_downstream_connections",
        "Downstream sessions currently attached"
    ).unwrap();

    /// Upstream connection attempts that failed before registration,
    /// labeled by failure stage ("connect", "register").
    pub static ref UPSTREAM_CONNECT_ERRORS: IntCounterVec = IntCounterVec::new(
        Opts::new("ircbnc_upstream_connect_errors_total", "Upstream connection attempts that failed"),
        &["stage"],
    ).unwrap();

    /// Upstream disconnects after a successful registration.
    pub static ref UPSTREAM_DISCONNECTS: IntCounter = IntCounter::new(
        "ircbnc_upstream_disconnects_total",
        "Upstream connections that dropped after registering"
    ).unwrap();

    /// Messages fanned out from one upstream event to downstreams.
    pub static ref DOWNSTREAM_FANOUT: IntCounter = IntCounter::new(
        "ircbnc_downstream_fanout_total",
        "Messages delivered to downstreams from upstream events"
    ).unwrap();

    /// Web push notifications attempted, labeled by outcome ("delivered", "expired", "failed").
    pub static ref PUSH_NOTIFICATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("ircbnc_push_notifications_total", "Web push notifications attempted"),
        &["outcome"],
    ).unwrap();

    /// User dispatcher tasks that exited abnormally rather than via `Stop`.
    pub static ref DISPATCHER_PANICS: IntCounter = IntCounter::new(
        "ircbnc_dispatcher_panics_total",
        "User dispatcher tasks that ended abnormally"
    ).unwrap();
}

/// Registers every metric. Call once at startup before anything records.
pub fn init() {
    REGISTRY.register(Box::new(ACTIVE_USERS.clone())).unwrap();
    REGISTRY.register(Box::new(ACTIVE_NETWORKS.clone())).unwrap();
    REGISTRY.register(Box::new(UPSTREAM_CONNECTED.clone())).unwrap();
    REGISTRY.register(Box::new(DOWNSTREAM_CONNECTIONS.clone())).unwrap();
    REGISTRY.register(Box::new(UPSTREAM_CONNECT_ERRORS.clone())).unwrap();
    REGISTRY.register(Box::new(UPSTREAM_DISCONNECTS.clone())).unwrap();
    REGISTRY.register(Box::new(DOWNSTREAM_FANOUT.clone())).unwrap();
    REGISTRY.register(Box::new(PUSH_NOTIFICATIONS.clone())).unwrap();
    REGISTRY.register(Box::new(DISPATCHER_PANICS.clone())).unwrap();
}

/// Gathers all metrics and encodes them in Prometheus text format, for the
/// (out-of-scope) `/metrics` HTTP handler to serve verbatim.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
