//! `Network`: one upstream IRC connection's runtime state, owned
//! exclusively by a `User` dispatcher (spec §4.3). This module wires
//! together the network's value objects — `NetworkRecord`, `ChannelRecord`,
//! `Casemapping`, `DeliveredStore` — and the reconnect state machine that
//! drives a connection's lifecycle.

pub mod addr;
pub mod casemapping;
pub mod channel;
pub mod collaborators;
pub mod record;
pub mod reconnect;

use std::collections::HashMap;
use std::sync::Arc;

pub use casemapping::Casemapping;
pub use channel::{ChannelRecord, DetachRelayPolicy};
pub use record::{check_network, host_of, network_attrs, NetworkRecord, SaslConfig};

use collaborators::{PushNotifier, PushSubscriptionExpired, UpstreamHandle, WebPushSubscription};

use crate::delivered::DeliveredStore;

/// Runtime state for one Network, held entirely within its owning `User`'s
/// single-threaded dispatcher loop — no locking needed (spec §5).
pub struct Network {
    pub record: NetworkRecord,
    pub casemapping: Casemapping,
    /// Channels joined upstream, keyed by the network's folded name.
    channels: HashMap<String, ChannelRecord>,
    pub delivered: DeliveredStore,
    pub conn: Option<Arc<dyn UpstreamHandle>>,
    pub last_error: Option<String>,
}

impl Network {
    pub fn new(record: NetworkRecord) -> Self {
        Self {
            record,
            casemapping: Casemapping::default(),
            channels: HashMap::new(),
            delivered: DeliveredStore::new(),
            conn: None,
            last_error: None,
        }
    }

    pub fn channel(&self, name: &str) -> Option<&ChannelRecord> {
        self.channels.get(&self.casemapping.fold(name))
    }

    pub fn channel_mut(&mut self, name: &str) -> Option<&mut ChannelRecord> {
        self.channels.get_mut(&self.casemapping.fold(name))
    }

    pub fn upsert_channel(&mut self, ch: ChannelRecord) {
        self.channels.insert(self.casemapping.fold(&ch.name), ch);
    }

    pub fn remove_channel(&mut self, name: &str) -> Option<ChannelRecord> {
        self.channels.remove(&self.casemapping.fold(name))
    }

    pub fn channels(&self) -> impl Iterator<Item = &ChannelRecord> {
        self.channels.values()
    }

    /// Marks a channel detached, recording the last seen internal message
    /// id so `attach` can compute backlog (spec §4.3 "detach-attach").
    pub fn detach(&mut self, name: &str, last_msg_id: String) {
        let folded = self.casemapping.fold(name);
        if let Some(ch) = self.channels.get_mut(&folded) {
            ch.detached = true;
            ch.detached_internal_msg_id = last_msg_id;
        }
    }

    /// Clears the detached flag, returning the internal message id backlog
    /// should resume from (the empty string if there is none to replay).
    pub fn attach(&mut self, name: &str) -> String {
        let folded = self.casemapping.fold(name);
        match self.channels.get_mut(&folded) {
            Some(ch) => {
                ch.detached = false;
                std::mem::take(&mut ch.detached_internal_msg_id)
            }
            None => String::new(),
        }
    }

    /// Applies a casemapping change learned from the upstream's ISUPPORT
    /// (spec §4.3 "casemapping update"): rekeys the channel map and the
    /// delivered store under the new fold. Last-write-wins on collision,
    /// same as `DeliveredStore::set_casemapping` (see DESIGN.md).
    pub fn update_casemapping(&mut self, cm: Casemapping) {
        if cm == self.casemapping {
            return;
        }
        let old = std::mem::take(&mut self.channels);
        for (_, ch) in old {
            self.channels.insert(cm.fold(&ch.name), ch);
        }
        self.delivered.set_casemapping(cm);
        self.casemapping = cm;
    }

    /// Whether `text` highlights the user's current nick, folded under this
    /// network's casemapping (spec §4.3 "highlight detection").
    pub fn is_highlight(&self, own_nick: &str, text: &str) -> bool {
        if own_nick.is_empty() {
            return false;
        }
        let folded_nick = self.casemapping.fold(own_nick);
        let folded_text = self.casemapping.fold(text);
        word_boundary_contains(&folded_text, &folded_nick)
    }

    /// Persists SASL credentials learned from a successful negotiation
    /// (spec §4.3 "SASL auto-save"): the dispatcher calls this after the
    /// upstream confirms `904`/`903`, then asks the Database capability to
    /// store the updated record.
    pub fn sasl_auto_save(&mut self, mechanism: slirc_proto::SaslMechanism, username: String, password: String) {
        self.record.sasl.mechanism = Some(mechanism);
        self.record.sasl.plain_username = Some(username);
        self.record.sasl.plain_password = Some(password);
    }

    /// Whether a downstream connection bound/capable as described should
    /// receive traffic for this network (spec §4.3 "applicable downstream"
    /// predicate): applicable iff it is bound to this network, or it is
    /// unbound AND advertises the multi-upstream capability. A downstream's
    /// own bound-network-id is authoritative regardless of whether
    /// multi-upstream is globally enabled (see DESIGN.md's Open Questions
    /// decided).
    pub fn is_applicable_downstream(
        &self,
        network_id: i64,
        bound_network_id: Option<i64>,
        is_multi_upstream: bool,
    ) -> bool {
        match bound_network_id {
            Some(bound) => bound == network_id,
            None => is_multi_upstream,
        }
    }

    /// Fans a payload out to every subscription, deleting any the notifier
    /// reports as expired (spec §4.3 "Push fan-out"). Returns the ids of
    /// subscriptions that should be deleted by the caller's Database
    /// capability.
    pub async fn push_fan_out(
        notifier: &dyn PushNotifier,
        subscriptions: &[WebPushSubscription],
        payload: &str,
    ) -> Vec<i64> {
        let mut expired = Vec::new();
        for sub in subscriptions {
            if let Err(PushSubscriptionExpired) = notifier.notify(sub, payload).await {
                expired.push(sub.id);
            }
        }
        expired
    }
}

/// Whether `haystack` contains `needle` at a word boundary (not embedded in
/// a longer token), the minimal contract spec §4.3 asks of highlight
/// detection: a message containing the user's nick as a substring of a
/// longer word does not count.
fn word_boundary_contains(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let is_word_char = |c: char| c.is_alphanumeric() || c == '_' || c == '-';
    let bytes = haystack.as_bytes();
    let needle_len = needle.len();
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let idx = start + pos;
        let before_ok = idx == 0 || !is_word_char(haystack[..idx].chars().last().unwrap());
        let after_idx = idx + needle_len;
        let after_ok = after_idx >= bytes.len() || !is_word_char(haystack[after_idx..].chars().next().unwrap());
        if before_ok && after_ok {
            return true;
        }
        start = idx + 1;
        if start >= haystack.len() {
            break;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> Network {
        Network::new(NetworkRecord {
            id: 1,
            user_id: 1,
            name: Some("libera".to_string()),
            addr: "ircs://irc.libera.chat".to_string(),
            enabled: true,
            nickname: None,
            realname: None,
            sasl: SaslConfig::default(),
        })
    }

    #[test]
    fn detach_then_attach_round_trips_backlog_marker() {
        let mut net = network();
        net.upsert_channel(ChannelRecord::new(1, "#foo"));
        net.detach("#foo", "42".to_string());
        assert!(net.channel("#foo").unwrap().detached);
        let resumed_from = net.attach("#foo");
        assert_eq!(resumed_from, "42");
        assert!(!net.channel("#foo").unwrap().detached);
    }

    #[test]
    fn update_casemapping_rekeys_channels_and_delivered_store() {
        let mut net = network();
        net.upsert_channel(ChannelRecord::new(1, "#Foo"));
        net.delivered.store_id(net.casemapping, "#Foo", "alice", "1");
        net.update_casemapping(Casemapping::Ascii);
        assert!(net.channel("#Foo").is_some());
        assert_eq!(net.delivered.load_id(Casemapping::Ascii, "#Foo", "alice"), "1");
    }

    #[test]
    fn update_casemapping_noop_when_unchanged() {
        let mut net = network();
        net.upsert_channel(ChannelRecord::new(1, "#Foo"));
        net.update_casemapping(Casemapping::Rfc1459);
        assert!(net.channel("#Foo").is_some());
    }

    #[test]
    fn highlight_requires_word_boundary() {
        let net = network();
        assert!(net.is_highlight("alice", "hey alice, you there?"));
        assert!(!net.is_highlight("alice", "alicexyz said hi"));
        assert!(!net.is_highlight("", "alice"));
    }

    #[test]
    fn applicable_downstream_honors_explicit_binding() {
        let net = network();
        assert!(net.is_applicable_downstream(1, Some(1), false));
        assert!(!net.is_applicable_downstream(1, Some(2), false));
        assert!(!net.is_applicable_downstream(1, Some(2), true));
    }

    #[test]
    fn unbound_downstream_applicable_only_if_multi_upstream() {
        let net = network();
        assert!(!net.is_applicable_downstream(1, None, false));
        assert!(net.is_applicable_downstream(1, None, true));
    }
}
