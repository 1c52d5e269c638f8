//! `DeliveredStore`: per-network checkpoint of the last message ID a given
//! downstream client has seen on a given target, used to compute backlog on
//! reconnect (spec §4.2).

use std::collections::HashMap;

use crate::network::Casemapping;

/// `target -> (clientName -> msgID)`, with the outer key folded by the
/// network's active casemapping. Owned exclusively by one `Network`, which
/// is itself exclusively owned by one `User` dispatcher — no internal
/// synchronization needed.
#[derive(Debug, Default, Clone)]
pub struct DeliveredStore {
    /// Folded target -> (original target, client -> msg id)
    targets: HashMap<String, (String, HashMap<String, String>)>,
}

impl DeliveredStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_target(&self, cm: Casemapping, target: &str) -> bool {
        self.targets.contains_key(&cm.fold(target))
    }

    /// Returns the stored id, or the empty string when absent.
    pub fn load_id(&self, cm: Casemapping, target: &str, client: &str) -> String {
        self.targets
            .get(&cm.fold(target))
            .and_then(|(_, clients)| clients.get(client))
            .cloned()
            .unwrap_or_default()
    }

    /// Upserts an id, allocating the inner map on first write for this target.
    pub fn store_id(&mut self, cm: Casemapping, target: &str, client: &str, id: &str) {
        let folded = cm.fold(target);
        let entry = self
            .targets
            .entry(folded)
            .or_insert_with(|| (target.to_string(), HashMap::new()));
        entry.1.insert(client.to_string(), id.to_string());
    }

    /// Visits each target using its original (pre-folding) key.
    pub fn for_each_target<F: FnMut(&str, &HashMap<String, String>)>(&self, mut f: F) {
        for (original, clients) in self.targets.values() {
            f(original, clients);
        }
    }

    /// Visits each distinct client name, unioning across all targets.
    pub fn for_each_client<F: FnMut(&str)>(&self, mut f: F) {
        let mut seen = std::collections::HashSet::new();
        for (_, clients) in self.targets.values() {
            for client in clients.keys() {
                if seen.insert(client.clone()) {
                    f(client);
                }
            }
        }
    }

    /// Recomputes all target keys under the new folding. Inner client-name
    /// keys are unchanged. If two targets fold together under the new
    /// mapping, the later one wins (last-write-wins; no conflict signal is
    /// raised — see spec §9 Open Questions and DESIGN.md).
    pub fn set_casemapping(&mut self, cm: Casemapping) {
        let old = std::mem::take(&mut self.targets);
        for (_, (original, clients)) in old {
            let folded = cm.fold(&original);
            self.targets.insert(folded, (original, clients));
        }
    }
}
