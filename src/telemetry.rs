//! Structured tracing spans carrying bouncer-specific context (user,
//! network, event kind), so dispatcher logs correlate across a user's
//! whole lifetime without threading IDs through every `tracing::info!`
//! call by hand.

use std::time::Instant;
use tracing::{span, Level, Span};

/// Bouncer-specific trace context: which user, which of their networks,
/// and what kind of event is being handled.
#[derive(Debug, Clone, Default)]
pub struct DispatchTraceContext {
    pub user_id: Option<i64>,
    pub network_id: Option<i64>,
    pub event: Option<String>,
}

impl DispatchTraceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_network(mut self, network_id: i64) -> Self {
        self.network_id = Some(network_id);
        self
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn into_span(self) -> Span {
        span!(
            Level::DEBUG,
            "dispatch",
            user_id = self.user_id,
            network_id = self.network_id,
            event = self.event.as_deref(),
        )
    }
}

/// Creates a span for one `UserEvent` handled by the dispatcher's run loop.
pub fn dispatch_span(user_id: i64, event: &str) -> Span {
    DispatchTraceContext::new().with_user(user_id).with_event(event).into_span()
}

/// Creates a span for one network's reconnect attempt.
pub fn reconnect_span(network_id: i64, attempt: u32) -> Span {
    span!(Level::INFO, "reconnect", network_id, attempt)
}

/// Guard logging a warning if the dispatch it wraps ran unexpectedly long.
/// Not tied to a metric: per-event-kind latency isn't part of this crate's
/// metric surface, just a log breadcrumb for investigating a stuck user.
pub struct DispatchTimer {
    event: &'static str,
    start: Instant,
}

impl DispatchTimer {
    pub fn start(event: &'static str) -> Self {
        Self { event, start: Instant::now() }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Drop for DispatchTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        if elapsed.as_millis() > 100 {
            tracing::warn!(event = self.event, elapsed_ms = elapsed.as_millis(), "slow dispatcher handler");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_context_with_all_fields() {
        let ctx = DispatchTraceContext::new().with_user(7).with_network(3).with_event("Stop");
        assert_eq!(ctx.user_id, Some(7));
        assert_eq!(ctx.network_id, Some(3));
        assert_eq!(ctx.event.as_deref(), Some("Stop"));
    }

    #[test]
    fn dispatch_timer_tracks_elapsed() {
        let timer = DispatchTimer::start("Stop");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.elapsed_secs() >= 0.005);
    }
}
