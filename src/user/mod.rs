//! `User`: the per-user event dispatcher (spec §4.4, "THE CENTRAL
//! INVARIANT"). One task drains one bounded event queue; every mutation to
//! the user's networks, downstreams, and persisted state goes through it,
//! so nothing here needs locking (spec §5).
//!
//! Split the way the teacher splits its `state/actor/` module: this file
//! owns the struct, startup, and the run loop; [`handlers`] holds the event
//! match arms; [`updates`] holds `updateNetwork`/`deleteNetwork`/
//! `checkNetwork`/`localTCPAddrForHost`.

mod handlers;
mod updates;

pub use updates::resolve_local_addr;

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::db::{Database, UserRecord};
use crate::event::{DownstreamHandle, UserEvent};
use crate::history::MessageStore;
use crate::network::collaborators::{
    IdentdRegistrar, PushNotifier, UpstreamConnector, UpstreamMessageHandler,
};
use crate::network::reconnect::{self, ReconnectContext};
use crate::network::Network;

/// One Network plus the machinery needed to stop its reconnect task.
struct NetworkSlot {
    net: Network,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Dependencies a `User` needs for the lifetime of its dispatcher, bundled
/// the way the teacher bundles per-connection parameters into a context
/// struct rather than threading a dozen constructor arguments.
pub struct UserStartupContext {
    pub record: UserRecord,
    pub db: Database,
    pub history: Arc<dyn MessageStore>,
    pub connector: Arc<dyn UpstreamConnector>,
    pub identd: Option<Arc<dyn IdentdRegistrar>>,
    pub push: Option<Arc<dyn PushNotifier>>,
    pub upstream_handler: Option<Arc<dyn UpstreamMessageHandler>>,
    pub config: Arc<ArcSwap<Config>>,
}

pub struct User {
    id: i64,
    record: UserRecord,
    db: Database,
    history: Arc<dyn MessageStore>,
    connector: Arc<dyn UpstreamConnector>,
    identd: Option<Arc<dyn IdentdRegistrar>>,
    push: Option<Arc<dyn PushNotifier>>,
    upstream_handler: Option<Arc<dyn UpstreamMessageHandler>>,
    config: Arc<ArcSwap<Config>>,
    networks: Vec<NetworkSlot>,
    downstreams: Vec<Arc<dyn DownstreamHandle>>,
    events_tx: mpsc::Sender<UserEvent>,
}

/// Loads a user's networks, spawns its dispatcher task, and returns the
/// handle transports post events onto plus a join handle the caller (the
/// `Server` registry) supervises for panics (spec §4.5 "Panic inside a User
/// goroutine is recovered and logged; the user is removed from the
/// registry" — `JoinHandle::await` returning `Err` is this core's
/// equivalent of a recovered panic). Queue capacity comes from config
/// (spec §5: bounded, capacity 64 by default).
pub async fn spawn(
    ctx: UserStartupContext,
) -> Result<(mpsc::Sender<UserEvent>, JoinHandle<()>), crate::error::StorageError> {
    let capacity = ctx.config.load().timeouts.dispatcher_queue_capacity;
    let (events_tx, events_rx) = mpsc::channel(capacity);

    let mut user = User {
        id: ctx.record.id,
        record: ctx.record,
        db: ctx.db,
        history: ctx.history,
        connector: ctx.connector,
        identd: ctx.identd,
        push: ctx.push,
        upstream_handler: ctx.upstream_handler,
        config: ctx.config,
        networks: Vec::new(),
        downstreams: Vec::new(),
        events_tx: events_tx.clone(),
    };

    user.load_networks().await?;
    let handle = tokio::spawn(user.run(events_rx));
    Ok((events_tx, handle))
}

impl User {
    /// Startup: load every network for the user ordered by id, its channels
    /// and (if persistent) delivery receipts, then spawn its reconnect task
    /// (spec §4.4 "Startup").
    async fn load_networks(&mut self) -> Result<(), crate::error::StorageError> {
        let records = self.db.networks().list_for_user(self.id).await?;
        for record in records {
            let network_id = record.id;
            let mut net = Network::new(record);

            for ch in self.db.channels().list_for_network(network_id).await? {
                net.upsert_channel(ch);
            }

            if self.history.has_persistent_store() {
                for (target, client, msg_id) in self.db.receipts().list_for_network(network_id).await? {
                    net.delivered.store_id(net.casemapping, &target, &client, &msg_id);
                }
            }

            self.spawn_network(net).await;
        }
        Ok(())
    }

    /// Adds `net` to the in-memory list and spawns its reconnect task,
    /// computing a deterministic egress address when `UpstreamUserIPs` is
    /// configured (spec §4.4 `localTCPAddrForHost`).
    async fn spawn_network(&mut self, net: Network) {
        let network_id = net.record.id;
        let config = self.config.load_full();
        let local_addr = resolve_local_addr(&config, &net.record, self.id).await;

        let (stop_tx, stop_rx) = watch::channel(false);
        let ctx = ReconnectContext {
            network_id,
            record: net.record.clone(),
            connector: self.connector.clone(),
            identd: self.identd.clone(),
            events_tx: self.events_tx.clone(),
            stop_rx,
            local_addr,
        };
        let task = tokio::spawn(reconnect::run(ctx));

        crate::metrics::ACTIVE_NETWORKS.inc();
        self.networks.push(NetworkSlot { net, stop_tx, task });
    }

    /// Stops a network's reconnect task without removing it from the list
    /// (the caller decides whether to remove it).
    fn stop_network(&self, slot: &NetworkSlot) {
        let _ = slot.stop_tx.send(true);
    }

    /// Whether `Stop` has already been signalled for `network_id` — used to
    /// resolve the Stop/UpstreamConnected race (spec §9, SPEC_FULL.md).
    fn is_stop_requested(&self, network_id: i64) -> bool {
        self.networks
            .iter()
            .find(|s| s.net.record.id == network_id)
            .map(|s| *s.stop_tx.borrow())
            .unwrap_or(true)
    }

    fn network_index(&self, network_id: i64) -> Option<usize> {
        self.networks.iter().position(|s| s.net.record.id == network_id)
    }

    fn network_mut(&mut self, network_id: i64) -> Option<&mut Network> {
        self.networks
            .iter_mut()
            .find(|s| s.net.record.id == network_id)
            .map(|s| &mut s.net)
    }

    fn network(&self, network_id: i64) -> Option<&Network> {
        self.networks.iter().find(|s| s.net.record.id == network_id).map(|s| &s.net)
    }

    /// Downstreams currently applicable to `network_id` (spec §4.3
    /// "applicable-downstream predicate").
    fn applicable_downstreams(&self, network_id: i64) -> impl Iterator<Item = &Arc<dyn DownstreamHandle>> {
        self.networks.iter().find(|s| s.net.record.id == network_id).into_iter().flat_map(move |slot| {
            self.downstreams.iter().filter(move |dc| {
                slot.net.is_applicable_downstream(network_id, dc.bound_network_id(), dc.is_multi_upstream())
            })
        })
    }

    /// Whether any applicable downstream for `network_id` is currently away
    /// (spec §4.4 `uc.updateAway` refresh: the union across downstreams).
    fn any_applicable_downstream_away(&self, network_id: i64) -> bool {
        let mut any = false;
        let mut all_away = true;
        for dc in self.applicable_downstreams(network_id) {
            any = true;
            if !dc.is_away() {
                all_away = false;
            }
        }
        any && all_away
    }

    /// The dispatcher's run loop (spec §4.4): totally orders every mutation
    /// to this user's state through one task.
    async fn run(mut self, mut events_rx: mpsc::Receiver<UserEvent>) {
        info!(user_id = self.id, "user dispatcher started");
        crate::metrics::ACTIVE_USERS.inc();
        while let Some(event) = events_rx.recv().await {
            let stopping = matches!(event, UserEvent::Stop { .. });
            let span = crate::telemetry::dispatch_span(self.id, event.kind());
            let _enter = span.enter();
            self.handle_event(event).await;
            if stopping {
                break;
            }
        }
        for slot in &self.networks {
            slot.task.abort();
        }
        crate::metrics::ACTIVE_NETWORKS.sub(self.networks.len() as i64);
        crate::metrics::ACTIVE_USERS.dec();
        info!(user_id = self.id, "user dispatcher stopped");
    }
}
