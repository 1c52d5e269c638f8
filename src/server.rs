//! `Server`: the process-wide registry tying users to storage,
//! configuration and the out-of-scope collaborators (spec §4.5). One
//! `Server` per process; it owns the `username -> User` map and the
//! hot-swappable config snapshot every dispatcher reads from.

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::error::StorageError;
use crate::event::UserEvent;
use crate::history::MessageStore;
use crate::network::collaborators::{IdentdRegistrar, PushNotifier, UpstreamConnector, UpstreamMessageHandler};
use crate::user::{self, UserStartupContext};

/// Dependencies shared by every `User` dispatcher the `Server` spawns.
/// Bundled the way the teacher's `Matrix` constructor takes its
/// collaborators, so adding one doesn't change every call site.
pub struct ServerDeps {
    pub db: Database,
    pub history: Arc<dyn MessageStore>,
    pub connector: Arc<dyn UpstreamConnector>,
    pub identd: Option<Arc<dyn IdentdRegistrar>>,
    pub push: Option<Arc<dyn PushNotifier>>,
    pub upstream_handler: Option<Arc<dyn UpstreamMessageHandler>>,
}

/// The registry of running `User` dispatchers (spec §4.5). Holding the
/// queue sender, not the task itself, keeps `Server` free of per-user
/// locking: routing an event is a `DashMap` lookup plus a channel send.
pub struct Server {
    deps: ServerDeps,
    config: Arc<ArcSwap<Config>>,
    users: Arc<DashMap<String, mpsc::Sender<UserEvent>>>,
}

impl Server {
    pub fn new(config: Config, deps: ServerDeps) -> Self {
        Self {
            deps,
            config: Arc::new(ArcSwap::new(Arc::new(config))),
            users: Arc::new(DashMap::new()),
        }
    }

    /// Hot-swaps the config snapshot every dispatcher reads from. Takes
    /// effect on each `User`'s next config read; in-flight reconnect
    /// attempts finish with whatever snapshot they already loaded.
    pub fn reload_config(&self, config: Config) {
        self.config.store(Arc::new(config));
        info!("configuration reloaded");
    }

    pub fn config(&self) -> Arc<Config> {
        self.config.load_full()
    }

    /// Spawns one dispatcher per row in the `users` table (spec §4.5
    /// "Startup"). Continues past a single user's spawn failure so one
    /// corrupt record doesn't take the whole bouncer down.
    pub async fn start(&self) -> Result<(), StorageError> {
        let records = self.deps.db.users().list().await?;
        info!(count = records.len(), "starting user dispatchers");
        for record in records {
            self.spawn_user(record.id, record.username.clone()).await;
        }
        Ok(())
    }

    async fn spawn_user(&self, user_id: i64, username: String) {
        let record = match self.deps.db.users().find_by_username(&username).await {
            Ok(Some(r)) => r,
            Ok(None) => {
                warn!(user_id, username, "user disappeared before dispatcher could start");
                return;
            }
            Err(e) => {
                error!(user_id, username, error = %e, "failed to load user record");
                return;
            }
        };

        let ctx = UserStartupContext {
            record,
            db: self.deps.db.clone(),
            history: self.deps.history.clone(),
            connector: self.deps.connector.clone(),
            identd: self.deps.identd.clone(),
            push: self.deps.push.clone(),
            upstream_handler: self.deps.upstream_handler.clone(),
            config: self.config.clone(),
        };

        let (tx, handle) = match user::spawn(ctx).await {
            Ok(pair) => pair,
            Err(e) => {
                error!(user_id, username, error = %e, "failed to start user dispatcher");
                return;
            }
        };

        self.users.insert(username.clone(), tx);

        // Supervises the dispatcher task: a panic surfaces as `Err` from
        // `JoinHandle::await` (spec §4.5 "recovered and logged; the user
        // is removed from the registry").
        let users = self.users.clone();
        tokio::spawn(async move {
            if let Err(e) = handle.await {
                error!(user_id, username, error = %e, "user dispatcher task ended abnormally");
            }
            users.remove(&username);
        });
    }

    /// Registers a newly created account's dispatcher without restarting
    /// the others (used by the out-of-scope admin/registration surface).
    pub async fn spawn_new_user(&self, user_id: i64, username: String) {
        if self.users.contains_key(&username) {
            return;
        }
        self.spawn_user(user_id, username).await;
    }

    /// Looks up a running user's event queue by username.
    pub fn sender(&self, username: &str) -> Option<mpsc::Sender<UserEvent>> {
        self.users.get(username).map(|e| e.value().clone())
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Runs `f` over every currently-registered username.
    pub fn for_each_user(&self, mut f: impl FnMut(&str)) {
        for entry in self.users.iter() {
            f(entry.key());
        }
    }

    /// Sends `Stop` to every dispatcher and waits for each to drain and
    /// exit before closing the database (spec §4.5 "Shutdown").
    pub async fn shutdown(&self) {
        let senders: Vec<(String, mpsc::Sender<UserEvent>)> =
            self.users.iter().map(|e| (e.key().clone(), e.value().clone())).collect();

        info!(count = senders.len(), "shutting down user dispatchers");
        for (username, tx) in senders {
            let (done_tx, done_rx) = oneshot::channel();
            if tx.send(UserEvent::Stop { done: done_tx }).await.is_ok() {
                if let Err(e) = done_rx.await {
                    warn!(username, error = %e, "dispatcher dropped its stop acknowledgement");
                }
            }
        }
        self.users.clear();
        self.deps.db.close().await;
    }
}
