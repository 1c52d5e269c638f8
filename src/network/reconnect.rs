//! The Network reconnect state machine (spec §4.3 "Reconnect loop").
//!
//! One `tokio::spawn`ed task per Network, running independently of the
//! user's dispatcher; it only ever talks back to the dispatcher by posting
//! `UserEvent`s onto the bounded queue. Modeled on the teacher's
//! `network/connection/event_loop.rs` `tokio::select!` shape: a sleep/stop
//! race during `Waiting`, and a read/stop race during `Running`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::backoff::Backoff;
use crate::event::UserEvent;
use crate::network::collaborators::{IdentdRegistrar, UpstreamConnector, UpstreamHandle};
use crate::network::record::NetworkRecord;

/// Everything one reconnect task needs, grouped the way the teacher groups
/// per-connection parameters into a context struct rather than threading a
/// dozen arguments through every function.
pub struct ReconnectContext {
    pub network_id: i64,
    pub record: NetworkRecord,
    pub connector: Arc<dyn UpstreamConnector>,
    pub identd: Option<Arc<dyn IdentdRegistrar>>,
    pub events_tx: mpsc::Sender<UserEvent>,
    pub stop_rx: watch::Receiver<bool>,
    pub local_addr: Option<SocketAddr>,
}

/// Drives one Network's reconnect state machine to completion. Returns when
/// the stop signal closes (or was already set and `Enabled` was false).
pub async fn run(mut ctx: ReconnectContext) {
    if !ctx.record.enabled {
        debug!(network_id = ctx.network_id, "network disabled, not auto-connecting");
        return;
    }

    let mut backoff = Backoff::default();
    let mut last_try = Instant::now();

    loop {
        if *ctx.stop_rx.borrow() {
            return;
        }

        // Waiting: sleep out the remainder of the backoff delay, racing
        // against Stop.
        let delay = backoff.next().saturating_sub(last_try.elapsed());
        if !delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = ctx.stop_rx.changed() => {
                    if *ctx.stop_rx.borrow() {
                        return;
                    }
                }
            }
        }
        if *ctx.stop_rx.borrow() {
            return;
        }

        // Connecting.
        last_try = Instant::now();
        let conn = match ctx.connector.connect(&ctx.record, ctx.local_addr).await {
            Ok(conn) => conn,
            Err(err) => {
                let _ = ctx
                    .events_tx
                    .send(UserEvent::UpstreamConnectionError {
                        network_id: ctx.network_id,
                        err,
                    })
                    .await;
                continue;
            }
        };

        if let Some(identd) = &ctx.identd {
            if let Some(local) = ctx.local_addr {
                // Remote address isn't known to this generic loop; the
                // connector-specific handle would supply it in a full
                // implementation. Registration with a zero remote port is
                // a documented limitation of this core's identd contract.
                identd.register(local, local, &crate::ident::user_ident(ctx.record.user_id));
            }
        }

        // Registering.
        if let Err(err) = ctx.connector.register(conn.as_ref()).await {
            conn.close();
            let permanent = !err.temporary;
            let _ = ctx
                .events_tx
                .send(UserEvent::UpstreamRegistrationError {
                    network_id: ctx.network_id,
                    err,
                })
                .await;
            if permanent {
                return;
            }
            continue;
        }

        // Running.
        let conn: Arc<dyn UpstreamHandle> = Arc::from(conn);
        let _ = ctx
            .events_tx
            .send(UserEvent::UpstreamConnected {
                network_id: ctx.network_id,
                conn: conn.clone(),
            })
            .await;

        let read_result = tokio::select! {
            result = ctx.connector.read_messages(conn.as_ref()) => result,
            _ = ctx.stop_rx.changed() => {
                // Known race (spec §9): Stop may land between
                // UpstreamConnected and here. We still close the
                // connection ourselves; the dispatcher additionally
                // checks the stop signal when it processes
                // UpstreamConnected (see SPEC_FULL.md resolution).
                Ok(())
            }
        };

        if let Err(err) = read_result {
            let _ = ctx
                .events_tx
                .send(UserEvent::UpstreamError {
                    network_id: ctx.network_id,
                    conn_id: conn.id(),
                    err,
                })
                .await;
        }

        conn.close();
        let _ = ctx
            .events_tx
            .send(UserEvent::UpstreamDisconnected {
                network_id: ctx.network_id,
                conn_id: conn.id(),
            })
            .await;
        if let (Some(identd), Some(local)) = (&ctx.identd, ctx.local_addr) {
            identd.unregister(local, local);
        }
        backoff.reset();

        if *ctx.stop_rx.borrow() {
            return;
        }
        info!(network_id = ctx.network_id, "upstream disconnected, will retry");
    }
}
