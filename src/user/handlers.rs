//! Event match arms for [`super::User`] (spec §4.4 "Event cases"). Each
//! function name mirrors the event variant it handles.

use std::sync::Arc;

use slirc_proto::{Command, Message};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::User;
use crate::error::{RegistrationError, StorageError, UpstreamTransientError};
use crate::event::{DownstreamHandle, DownstreamHandlerError, UserEvent};
use crate::network::collaborators::UpstreamHandle;
use crate::network::record::NetworkRecord;

/// The name used in human-readable NOTICEs and `MessageStore` lookups: the
/// configured network name, falling back to its address when unset.
fn network_display_name(record: &NetworkRecord) -> String {
    record.name.clone().unwrap_or_else(|| record.addr.clone())
}

/// Period an attached channel's auto-detach timer is reset to (spec §4.3
/// `attach` step 3). The exact duration is the out-of-scope codec
/// collaborator's concern; the core only needs a value to hand it.
const AUTO_DETACH_RESET_PERIOD: std::time::Duration = std::time::Duration::from_secs(600);

/// `BOUNCER NETWORK <id> <attrs>`-shaped broadcast (spec §6 wire surface).
fn bouncer_network_message(network_id: i64, attrs: &str) -> Message {
    Command::Raw("BOUNCER".to_string(), vec![
        "NETWORK".to_string(),
        network_id.to_string(),
        attrs.to_string(),
    ])
    .into()
}

impl User {
    pub(crate) async fn handle_event(&mut self, event: UserEvent) {
        match event {
            UserEvent::UpstreamConnected { network_id, conn } => {
                self.on_upstream_connected(network_id, conn).await
            }
            UserEvent::UpstreamDisconnected { network_id, conn_id } => {
                self.on_upstream_disconnected(network_id, conn_id).await
            }
            UserEvent::UpstreamConnectionError { network_id, err } => {
                self.on_upstream_connection_error(network_id, err).await
            }
            UserEvent::UpstreamRegistrationError { network_id, err } => {
                self.on_upstream_registration_error(network_id, err).await
            }
            UserEvent::UpstreamError { network_id, conn_id, err } => {
                self.on_upstream_error(network_id, conn_id, err).await
            }
            UserEvent::UpstreamMessage { network_id, conn_id, msg } => {
                self.on_upstream_message(network_id, conn_id, msg).await
            }
            UserEvent::ChannelDetach { network_id, conn_id, name } => {
                self.on_channel_detach(network_id, conn_id, name).await
            }
            UserEvent::ChannelAttach { network_id, conn_id, name } => {
                self.on_channel_attach(network_id, conn_id, name).await
            }
            UserEvent::DownstreamConnected { downstream } => {
                self.on_downstream_connected(downstream).await
            }
            UserEvent::DownstreamDisconnected { downstream_id } => {
                self.on_downstream_disconnected(downstream_id).await
            }
            UserEvent::DownstreamMessage { downstream_id, msg } => {
                self.on_downstream_message(downstream_id, msg).await
            }
            UserEvent::Broadcast { msg } => self.on_broadcast(msg),
            UserEvent::UserUpdate { password, admin, done } => {
                self.on_user_update(password, admin, done).await
            }
            UserEvent::NetworkUpdate { submitted, done } => self.on_network_update(submitted, done).await,
            UserEvent::NetworkDelete { network_id, done } => self.on_network_delete(network_id, done).await,
            UserEvent::Stop { done } => self.on_stop(done).await,
        }
    }

    /// `UpstreamConnected` (spec §4.4). Resolves the Stop/UpstreamConnected
    /// race: if Stop already landed for this network, the freshly-arrived
    /// connection is closed immediately instead of being adopted.
    async fn on_upstream_connected(&mut self, network_id: i64, conn: Arc<dyn UpstreamHandle>) {
        if self.is_stop_requested(network_id) {
            conn.close();
            return;
        }

        let downstreams: Vec<_> = self.applicable_downstreams(network_id).cloned().collect();
        let away = self.any_applicable_downstream_away(network_id);

        let display = match self.network_mut(network_id) {
            Some(net) => {
                net.conn = Some(conn.clone());
                net.last_error = None;
                network_display_name(&net.record)
            }
            None => {
                conn.close();
                return;
            }
        };

        crate::metrics::UPSTREAM_CONNECTED.inc();
        conn.update_away(away);
        // The set of nicks to MONITOR lives in downstream session state
        // (out of scope); this only triggers the refresh point.
        conn.update_monitor(&[]);

        for dc in &downstreams {
            dc.update_supported_caps();
            if !dc.notifies_bouncer_networks() {
                dc.send(Message::notice("*", format!("connected to {display}")));
            }
            dc.update_nick(&conn.current_nick());
            if let Some(host) = conn.current_host() {
                dc.update_host(&host);
            }
            if let Some(realname) = conn.current_realname() {
                dc.update_realname(&realname);
            }
            dc.update_account(conn.current_account().as_deref());
            if dc.notifies_bouncer_networks() {
                dc.send(bouncer_network_message(network_id, "state=connected error="));
            }
        }
    }

    /// `UpstreamDisconnected` (spec §4.4).
    async fn on_upstream_disconnected(&mut self, network_id: i64, conn_id: u64) {
        let (display, had_error) = match self.network_mut(network_id) {
            Some(net) => {
                if net.conn.as_ref().map(|c| c.id()) != Some(conn_id) {
                    return;
                }
                let conn = net.conn.take();
                if let Some(conn) = &conn {
                    crate::metrics::UPSTREAM_CONNECTED.dec();
                    crate::metrics::UPSTREAM_DISCONNECTS.inc();
                    conn.abort_pending_commands();
                    for ch in net.channels() {
                        conn.set_auto_detach_timer(&ch.name, None);
                    }
                }
                (network_display_name(&net.record), net.last_error.is_some())
            }
            None => return,
        };

        let downstreams: Vec<_> = self.applicable_downstreams(network_id).cloned().collect();
        for dc in &downstreams {
            dc.update_supported_caps();
        }
        for dc in &downstreams {
            if dc.notifies_bouncer_networks() {
                dc.send(bouncer_network_message(network_id, "state=disconnected"));
            } else if !had_error {
                dc.send(Message::notice("*", format!("disconnected from {display}")));
            }
        }
    }

    /// `UpstreamConnectionError` (spec §4.4); also backs
    /// `UpstreamRegistrationError`, which shares the same dedup-and-broadcast
    /// shape (both represent a failed attempt to reach `Running`).
    async fn on_upstream_connection_error(&mut self, network_id: i64, err: UpstreamTransientError) {
        crate::metrics::UPSTREAM_CONNECT_ERRORS.with_label_values(&["connect"]).inc();
        self.record_connection_failure(network_id, err).await;
    }

    async fn record_connection_failure(&mut self, network_id: i64, err: UpstreamTransientError) {
        let stopped = self.is_stop_requested(network_id);
        let (display, is_new) = match self.network_mut(network_id) {
            Some(net) => {
                let is_new = net.last_error.as_deref() != Some(err.0.as_str());
                net.last_error = Some(err.0.clone());
                (network_display_name(&net.record), is_new)
            }
            None => return,
        };
        let text = err.0;

        if !stopped && is_new {
            for dc in self.applicable_downstreams(network_id).cloned().collect::<Vec<_>>() {
                dc.send(Message::notice("*", format!("could not connect to {display}: {text}")));
            }
        }
        for dc in self.applicable_downstreams(network_id).cloned().collect::<Vec<_>>() {
            if dc.notifies_bouncer_networks() {
                dc.send(bouncer_network_message(network_id, &format!("error={text}")));
            }
        }
    }

    async fn on_upstream_registration_error(&mut self, network_id: i64, err: RegistrationError) {
        crate::metrics::UPSTREAM_CONNECT_ERRORS.with_label_values(&["register"]).inc();
        self.record_connection_failure(network_id, UpstreamTransientError(err.reason)).await;
    }

    /// `UpstreamError` (spec §4.4): like `UpstreamConnectionError` but
    /// always surfaces, since the upstream was previously up.
    async fn on_upstream_error(&mut self, network_id: i64, _conn_id: u64, err: UpstreamTransientError) {
        let display = match self.network_mut(network_id) {
            Some(net) => {
                net.last_error = Some(err.0.clone());
                network_display_name(&net.record)
            }
            None => return,
        };
        let text = err.0;

        for dc in self.applicable_downstreams(network_id).cloned().collect::<Vec<_>>() {
            if !dc.notifies_bouncer_networks() {
                dc.send(Message::notice("*", format!("disconnected from {display}: {text}")));
            } else {
                dc.send(bouncer_network_message(network_id, &format!("error={text}")));
            }
        }
    }

    /// `UpstreamMessage` (spec §4.4): drop on a stale/closed connection,
    /// otherwise delegate to the (out-of-scope) codec collaborator, then run
    /// highlight detection and push fan-out on the targets it reports back
    /// (spec §4.3 "highlight detection", "Push fan-out" — both stay core
    /// responsibilities, not the codec's).
    async fn on_upstream_message(&mut self, network_id: i64, conn_id: u64, msg: Message) {
        let conn = match self.network(network_id) {
            Some(net) if net.conn.as_ref().map(|c| c.id()) == Some(conn_id) => net.conn.clone(),
            _ => {
                debug!(network_id, conn_id, "dropping message from a closed upstream connection");
                return;
            }
        };
        let (Some(handler), Some(conn)) = (self.upstream_handler.clone(), conn) else {
            return;
        };
        let delivered = handler.handle_message(network_id, conn.as_ref(), msg).await;
        if delivered.is_empty() {
            return;
        }

        let own_nick = conn.current_nick();
        let highlighted: Vec<_> = match self.network(network_id) {
            Some(net) => delivered.into_iter().filter(|d| net.is_highlight(&own_nick, &d.text)).collect(),
            None => return,
        };
        if highlighted.is_empty() {
            return;
        }

        let Some(push) = self.push.clone() else {
            return;
        };
        let subscriptions = match self.db.webpush().list_for_user(self.id).await {
            Ok(subs) => subs,
            Err(e) => {
                warn!(user_id = self.id, error = %e, "failed to load push subscriptions");
                return;
            }
        };
        if subscriptions.is_empty() {
            return;
        }

        for target in &highlighted {
            let payload = format!("{}: {}", target.target, target.text);
            let expired = crate::network::Network::push_fan_out(push.as_ref(), &subscriptions, &payload).await;
            let delivered_count = (subscriptions.len() - expired.len()) as u64;
            crate::metrics::PUSH_NOTIFICATIONS.with_label_values(&["delivered"]).inc_by(delivered_count);
            if !expired.is_empty() {
                crate::metrics::PUSH_NOTIFICATIONS.with_label_values(&["expired"]).inc_by(expired.len() as u64);
            }
            for id in expired {
                if let Err(e) = self.db.webpush().delete(id).await {
                    warn!(user_id = self.id, subscription_id = id, error = %e, "failed to delete expired push subscription");
                }
            }
        }
    }

    /// `ChannelDetach` (spec §4.4, §4.3 "Detach / Attach").
    async fn on_channel_detach(&mut self, network_id: i64, conn_id: u64, name: String) {
        let conn = match self.network(network_id) {
            Some(net) if net.conn.as_ref().map(|c| c.id()) == Some(conn_id) => net.conn.clone(),
            _ => return,
        };
        let already_done = match self.network(network_id) {
            Some(net) => net.channel(&name).map(|ch| ch.detached).unwrap_or(true),
            None => return,
        };
        if already_done {
            return;
        }

        let last_msg_id = if self.history.has_persistent_store() {
            let (net_name, folded) = match self.network(network_id) {
                Some(net) => (network_display_name(&net.record), net.casemapping.fold(&name)),
                None => return,
            };
            match self.history.last_msg_id(&net_name, &folded, chrono::Utc::now()).await {
                Ok(id) => id,
                Err(e) => {
                    warn!(network_id, error = %e, "failed to compute last message id for detach");
                    String::new()
                }
            }
        } else {
            String::new()
        };

        let (record_id, ch) = match self.network_mut(network_id) {
            Some(net) => {
                net.detach(&name, last_msg_id);
                (net.record.id, net.channel(&name).cloned())
            }
            None => return,
        };
        if let Some(ch) = ch {
            if let Err(e) = self.db.channels().upsert(record_id, &ch).await {
                warn!(network_id, error = %e, "failed to persist detached channel");
            }
        }
        if let Some(conn) = conn {
            conn.set_auto_detach_timer(&name, None);
        }

        for dc in self.applicable_downstreams(network_id).cloned().collect::<Vec<_>>() {
            dc.send(Message::part_with_message(name.clone(), "Detach"));
        }
    }

    /// `ChannelAttach` (spec §4.4, §4.3 "Detach / Attach", §8 scenario 2).
    async fn on_channel_attach(&mut self, network_id: i64, conn_id: u64, name: String) {
        let conn = match self.network(network_id) {
            Some(net) if net.conn.as_ref().map(|c| c.id()) == Some(conn_id) => net.conn.clone(),
            _ => return,
        };
        let already_attached = match self.network(network_id) {
            Some(net) => net.channel(&name).map(|ch| !ch.detached).unwrap_or(true),
            None => return,
        };
        if already_attached {
            return;
        }

        let (record_id, resumed_from, ch) = match self.network_mut(network_id) {
            Some(net) => {
                let resumed_from = net.attach(&name);
                (net.record.id, resumed_from, net.channel(&name).cloned())
            }
            None => return,
        };
        if let Some(ch) = &ch {
            if let Err(e) = self.db.channels().upsert(record_id, ch).await {
                warn!(network_id, error = %e, "failed to persist attached channel");
            }
        }

        let has_upstream_channel = match &conn {
            Some(conn) => {
                conn.set_auto_detach_timer(&name, Some(AUTO_DETACH_RESET_PERIOD));
                conn.has_channel(&name)
            }
            None => false,
        };

        for dc in self.applicable_downstreams(network_id).cloned().collect::<Vec<_>>() {
            dc.send(Message::join(name.clone()));
            if has_upstream_channel {
                dc.forward_channel(network_id, &name);
            }
            if !resumed_from.is_empty() {
                dc.send_target_backlog(network_id, &name, &resumed_from);
            }
        }
    }

    /// `DownstreamConnected` (spec §4.4).
    async fn on_downstream_connected(&mut self, downstream: Arc<dyn DownstreamHandle>) {
        let bound = downstream.bound_network_id();
        if let Some(net) = bound.and_then(|id| self.network(id)) {
            downstream.update_monitor_casemapping(net.casemapping);
        }

        match downstream.welcome() {
            Ok(()) => {}
            Err(DownstreamHandlerError::Protocol(e)) => {
                let hostname = self.config.load().server.hostname.clone();
                downstream.send(e.to_irc_reply(&hostname, "*"));
                downstream.close();
                return;
            }
            Err(DownstreamHandlerError::Internal(e)) => {
                warn!(downstream_id = downstream.id(), error = ?e, "downstream welcome failed");
                downstream.send(Message::from(Command::ERROR("Internal server error".to_string())));
                downstream.close();
                return;
            }
        }

        self.downstreams.push(downstream.clone());

        let multi_upstream = downstream.is_multi_upstream();
        let visible_ids: Vec<i64> = self
            .networks
            .iter()
            .map(|s| s.net.record.id)
            .filter(|id| {
                self.network(*id)
                    .map(|n| n.is_applicable_downstream(*id, bound, multi_upstream))
                    .unwrap_or(false)
            })
            .collect();
        for id in visible_ids {
            if let Some(net) = self.network(id) {
                if let Some(err) = net.last_error.clone() {
                    let display = network_display_name(&net.record);
                    downstream.send(Message::notice("*", format!("disconnected from {display}: {err}")));
                }
            }
        }

        let ids: Vec<i64> = self.networks.iter().map(|s| s.net.record.id).collect();
        for id in ids {
            let away = self.any_applicable_downstream_away(id);
            if let Some(conn) = self.network(id).and_then(|n| n.conn.clone()) {
                conn.update_away(away);
            }
        }
    }

    /// `DownstreamDisconnected` (spec §4.4, §8 "graceful Stop persists
    /// receipts" — the same persistence path runs here per-disconnect).
    async fn on_downstream_disconnected(&mut self, downstream_id: u64) {
        let Some(idx) = self.downstreams.iter().position(|d| d.id() == downstream_id) else {
            return;
        };
        let dc = self.downstreams.remove(idx);
        let bound = dc.bound_network_id();
        let multi_upstream = dc.is_multi_upstream();

        let visible_ids: Vec<i64> = self
            .networks
            .iter()
            .map(|s| s.net.record.id)
            .filter(|id| {
                self.network(*id)
                    .map(|n| n.is_applicable_downstream(*id, bound, multi_upstream))
                    .unwrap_or(false)
            })
            .collect();

        if self.history.has_persistent_store() {
            for id in visible_ids {
                let receipts: Vec<(String, String, String)> = match self.network(id) {
                    Some(net) => {
                        let mut out = Vec::new();
                        net.delivered.for_each_target(|target, clients| {
                            for (client, msg_id) in clients {
                                out.push((target.to_string(), client.clone(), msg_id.clone()));
                            }
                        });
                        out
                    }
                    None => continue,
                };
                if let Err(e) = self.db.receipts().store_all(id, &receipts).await {
                    warn!(network_id = id, error = %e, "failed to persist delivery receipts");
                }
            }
        }

        let ids: Vec<i64> = self.networks.iter().map(|s| s.net.record.id).collect();
        for id in ids {
            if let Some(conn) = self.network(id).and_then(|n| n.conn.clone()) {
                conn.cancel_pending_commands_by_downstream_id(downstream_id);
                let away = self.any_applicable_downstream_away(id);
                conn.update_away(away);
                conn.update_monitor(&[]);
            }
        }
    }

    /// `DownstreamMessage` (spec §4.4).
    async fn on_downstream_message(&mut self, downstream_id: u64, msg: Message) {
        let Some(dc) = self.downstreams.iter().find(|d| d.id() == downstream_id).cloned() else {
            return;
        };
        match dc.handle_message(&msg) {
            Ok(()) => {}
            Err(DownstreamHandlerError::Protocol(e)) => {
                let hostname = self.config.load().server.hostname.clone();
                dc.send(e.to_irc_reply(&hostname, "*"));
            }
            Err(DownstreamHandlerError::Internal(e)) => {
                warn!(downstream_id, error = ?e, "downstream message handling failed");
                dc.close();
                if let Some(idx) = self.downstreams.iter().position(|d| d.id() == downstream_id) {
                    self.downstreams.remove(idx);
                }
            }
        }
    }

    /// `Broadcast` (spec §4.4).
    fn on_broadcast(&mut self, msg: Message) {
        for dc in &self.downstreams {
            dc.send(msg.clone());
        }
    }

    /// `UserUpdate` (spec §4.4). `password`, when set, is already the hashed
    /// form the Database capability stores.
    async fn on_user_update(
        &mut self,
        password: Option<String>,
        admin: Option<bool>,
        done: oneshot::Sender<Result<(), StorageError>>,
    ) {
        let result = self.db.users().update(self.id, password.as_deref(), admin).await;
        match &result {
            Ok(()) => {
                if let Some(hash) = &password {
                    self.record.password_hash = hash.clone();
                }
                if let Some(admin) = admin {
                    self.record.admin = admin;
                }
                if password.is_some() {
                    for dc in &self.downstreams {
                        dc.close();
                    }
                }
            }
            Err(e) => warn!(user_id = self.id, error = %e, "failed to persist user update"),
        }
        let _ = done.send(result);
    }

    /// `Stop` (spec §4.4, §5 "Cancellation and timeouts").
    async fn on_stop(&mut self, done: oneshot::Sender<()>) {
        for dc in &self.downstreams {
            dc.close();
        }
        for slot in &self.networks {
            self.stop_network(slot);
        }
        if self.history.has_persistent_store() {
            for slot in &self.networks {
                let mut receipts = Vec::new();
                slot.net.delivered.for_each_target(|target, clients| {
                    for (client, msg_id) in clients {
                        receipts.push((target.to_string(), client.clone(), msg_id.clone()));
                    }
                });
                if receipts.is_empty() {
                    continue;
                }
                if let Err(e) = self.db.receipts().store_all(slot.net.record.id, &receipts).await {
                    warn!(network_id = slot.net.record.id, error = %e, "failed to persist delivery receipts on stop");
                }
            }
        }
        let _ = done.send(());
    }
}
