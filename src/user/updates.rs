//! `updateNetwork`, `deleteNetwork`, and `localTCPAddrForHost` (spec §4.4).
//! `checkNetwork` itself lives in [`crate::network::record`]; this module
//! is the dispatcher-side orchestration around it.

use std::net::{IpAddr, SocketAddr};

use tokio::sync::oneshot;
use tracing::warn;

use super::User;
use crate::config::Config;
use crate::error::{StorageError, ValidationError};
use crate::event::NetworkUpdateError;
use crate::network::addr::local_tcp_addr_for_host;
use crate::network::record::{check_network, network_attrs, NetworkRecord};
use crate::network::Network;
use slirc_proto::{Command, Message};

fn bouncer_network_message(network_id: i64, attrs: &str) -> Message {
    Command::Raw("BOUNCER".to_string(), vec![
        "NETWORK".to_string(),
        network_id.to_string(),
        attrs.to_string(),
    ])
    .into()
}

/// `localTCPAddrForHost`: resolves `record`'s host and picks a deterministic
/// egress address from `config.upstream_user_ips`, or `None` when no ranges
/// are configured, the address has no host (unix sockets), or resolution
/// fails (logged, not fatal — falls back to the default outbound address).
pub(crate) async fn resolve_local_addr(config: &Config, record: &NetworkRecord, user_id: i64) -> Option<SocketAddr> {
    if config.upstream_user_ips.is_empty() {
        return None;
    }
    let host = crate::network::host_of(&record.addr)?;

    let resolved: Vec<IpAddr> = match tokio::net::lookup_host((host.as_str(), 0)).await {
        Ok(iter) => iter.map(|sa| sa.ip()).collect(),
        Err(e) => {
            warn!(network_id = record.id, host = %host, error = %e, "failed to resolve upstream host for egress selection");
            return None;
        }
    };
    if resolved.is_empty() {
        return None;
    }

    match local_tcp_addr_for_host(&config.upstream_user_ips.0, &resolved, user_id) {
        Ok(addr) => addr,
        Err(e) => {
            warn!(network_id = record.id, error = %e, "failed to compute deterministic egress address");
            None
        }
    }
}

impl User {
    /// `updateNetwork` (spec §4.4). `submitted.id == 0` creates a network;
    /// any other id edits the network with that id.
    pub(crate) async fn on_network_update(
        &mut self,
        mut submitted: NetworkRecord,
        done: oneshot::Sender<Result<i64, NetworkUpdateError>>,
    ) {
        let is_create = submitted.id == 0;
        let exclude_id = if is_create { None } else { Some(submitted.id) };

        if is_create && !self.config.load().limits.allows_additional_network(self.networks.len()) {
            let _ = done.send(Err(NetworkUpdateError::Validation(ValidationError::NetworkLimitReached)));
            return;
        }

        let existing_names = match self.db.networks().existing_names(self.id, exclude_id).await {
            Ok(names) => names,
            Err(e) => {
                let _ = done.send(Err(NetworkUpdateError::Storage(e)));
                return;
            }
        };
        if let Err(e) = check_network(&submitted, &existing_names) {
            let _ = done.send(Err(NetworkUpdateError::Validation(e)));
            return;
        }

        // Preserve "inherit realname from the account" semantics (spec §4.4
        // `updateNetwork` step 2): submitting the user's configured default
        // realname is stored as empty.
        if submitted.realname.is_some() && submitted.realname == self.record.default_realname {
            submitted.realname = None;
        }
        submitted.user_id = self.id;

        if is_create {
            let new_id = match self.db.networks().insert(&submitted).await {
                Ok(id) => id,
                Err(e) => {
                    let _ = done.send(Err(NetworkUpdateError::Storage(e)));
                    return;
                }
            };
            submitted.id = new_id;
            self.spawn_network(Network::new(submitted.clone())).await;
            self.broadcast_network_attrs(&submitted);
            let _ = done.send(Ok(new_id));
            return;
        }

        if let Err(e) = self.db.networks().update(&submitted).await {
            let _ = done.send(Err(NetworkUpdateError::Storage(e)));
            return;
        }

        let old = self.network_index(submitted.id).map(|idx| self.networks.remove(idx));
        let new_id = submitted.id;

        if let Some(old) = old {
            crate::metrics::ACTIVE_NETWORKS.dec();
            self.stop_network(&old);
            if let Some(conn) = old.net.conn.clone() {
                // Synthesizes the bookkeeping `UpstreamDisconnected` would
                // perform (spec §4.4 updateNetwork step 5): abort in-flight
                // commands and cancel auto-detach timers before the
                // connection goes away for good.
                conn.abort_pending_commands();
                for ch in old.net.channels() {
                    conn.set_auto_detach_timer(&ch.name, None);
                }
                conn.close();
            }

            let old_name = old.net.record.name.clone();
            if self.history.has_persistent_store() && old_name != submitted.name {
                let old_display = old_name.unwrap_or_else(|| old.net.record.addr.clone());
                let new_display = submitted.name.clone().unwrap_or_else(|| submitted.addr.clone());
                if let Err(e) = self.history.rename_network(&old_display, &new_display).await {
                    warn!(network_id = new_id, error = %e, "failed to rename message store tree");
                }
            }

            for dc in &self.downstreams {
                if dc.bound_network_id() == Some(old.net.record.id) {
                    dc.set_bound_network_id(new_id);
                }
            }

            let mut new_net = Network::new(submitted.clone());
            for ch in old.net.channels() {
                new_net.upsert_channel(ch.clone());
            }
            self.spawn_network(new_net).await;
        } else {
            self.spawn_network(Network::new(submitted.clone())).await;
        }

        self.broadcast_network_attrs(&submitted);
        let _ = done.send(Ok(new_id));
    }

    /// `deleteNetwork` (spec §4.4).
    pub(crate) async fn on_network_delete(&mut self, network_id: i64, done: oneshot::Sender<Result<(), StorageError>>) {
        if let Err(e) = self.db.networks().delete(network_id).await {
            let _ = done.send(Err(e));
            return;
        }

        if let Some(idx) = self.network_index(network_id) {
            let slot = self.networks.remove(idx);
            crate::metrics::ACTIVE_NETWORKS.dec();
            self.stop_network(&slot);
            if let Some(conn) = &slot.net.conn {
                conn.close();
            }
        }

        let bound: Vec<_> = self
            .downstreams
            .iter()
            .filter(|d| d.bound_network_id() == Some(network_id))
            .cloned()
            .collect();
        for dc in bound {
            dc.close();
        }

        for dc in &self.downstreams {
            if dc.notifies_bouncer_networks() {
                dc.send(bouncer_network_message(network_id, "*"));
            }
        }
        let _ = done.send(Ok(()));
    }

    fn broadcast_network_attrs(&self, record: &NetworkRecord) {
        let attrs = network_attrs(record);
        for dc in &self.downstreams {
            if dc.notifies_bouncer_networks() {
                dc.send(bouncer_network_message(record.id, &attrs));
            }
        }
    }
}
