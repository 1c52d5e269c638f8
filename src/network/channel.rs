//! Channel records (spec §3 Channel record).

/// Relay policy for messages arriving on a detached channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetachRelayPolicy {
    #[default]
    Default,
    Message,
    Highlight,
    None,
}

/// A channel the user is (upstream-side) joined to, detached or not.
#[derive(Debug, Clone)]
pub struct ChannelRecord {
    pub id: i64,
    pub name: String,
    pub detached: bool,
    pub detach_relay_policy: DetachRelayPolicy,
    /// The last message id seen when detach happened, used to compute
    /// backlog on attach. Empty when not detached or never computed.
    pub detached_internal_msg_id: String,
}

impl ChannelRecord {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            detached: false,
            detach_relay_policy: DetachRelayPolicy::default(),
            detached_internal_msg_id: String::new(),
        }
    }

    /// Given the policy and whether an inbound message highlighted the
    /// user, decide whether to relay it to attached-but-bound downstreams
    /// of a detached channel (spec §4.3 "Detached relay decision").
    pub fn should_relay_while_detached(&self, highlighted: bool) -> bool {
        match self.detach_relay_policy {
            DetachRelayPolicy::Message => true,
            DetachRelayPolicy::Default | DetachRelayPolicy::Highlight => highlighted,
            DetachRelayPolicy::None => false,
        }
    }
}
