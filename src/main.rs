//! `ircbncd` - the bouncer core's process entry point.
//!
//! Wires together config, tracing, the database, and the (out-of-scope)
//! wire-codec collaborators into a `Server`, then waits for SIGINT/SIGTERM
//! to run the spec §4.5 shutdown sequence. Sequenced the way the teacher's
//! `main.rs` does it: config loads before tracing (so `log_format` is
//! known), then validation, then storage, then the long-lived tasks.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use ircbnc::config::Config;
use ircbnc::db::Database;
use ircbnc::error::{RegistrationError, UpstreamTransientError};
use ircbnc::network::collaborators::{UpstreamConnector, UpstreamHandle};
use ircbnc::network::record::NetworkRecord;
use ircbnc::server::{Server, ServerDeps};

/// Placeholder for the wire-codec collaborator (spec §1: explicitly out of
/// scope for this core). A real deployment links in a crate that speaks the
/// upstream IRC handshake and swaps this out via `ServerDeps::connector`;
/// until one is wired in, every connect attempt fails, so the bouncer's
/// reconnect loop simply backs off forever rather than crashing.
struct UnconfiguredConnector;

#[async_trait]
impl UpstreamConnector for UnconfiguredConnector {
    async fn connect(
        &self,
        record: &NetworkRecord,
        _local_addr: Option<std::net::SocketAddr>,
    ) -> Result<Box<dyn UpstreamHandle>, UpstreamTransientError> {
        Err(UpstreamTransientError(format!(
            "no wire codec configured for network {}; link an UpstreamConnector implementation",
            record.addr
        )))
    }

    async fn register(&self, _conn: &dyn UpstreamHandle) -> Result<(), RegistrationError> {
        Err(RegistrationError::permanent("no wire codec configured"))
    }

    async fn read_messages(&self, _conn: &dyn UpstreamHandle) -> Result<(), UpstreamTransientError> {
        Ok(())
    }
}

/// Resolve the configuration path from CLI arguments.
/// Supports `-c <path>`, `--config <path>`, or a bare path.
/// Falls back to `config.toml` when no argument is provided.
fn resolve_config_path() -> String {
    let mut args = std::env::args().skip(1);

    match args.next() {
        Some(flag) if flag == "-c" || flag == "--config" => args.next().unwrap_or_else(|| {
            eprintln!("Missing path after {}", flag);
            std::process::exit(1);
        }),
        Some(path) => path,
        None => "config.toml".to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first (before tracing, so we know log_format).
    let config_path = resolve_config_path();
    let config = Config::load(&config_path).map_err(|e| {
        eprintln!("ERROR: failed to load config from {}: {}", config_path, e);
        e
    })?;

    // Initialize tracing based on config.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match config.log_format {
        ircbnc::config::LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(true)
                .json()
                .init();
        }
        ircbnc::config::LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(true)
                .init();
        }
    }

    // Validate configuration before we touch storage or spawn anything.
    if let Err(errors) = ircbnc::config::validate(&config) {
        for err in &errors {
            error!(error = %err, "configuration validation failed");
        }
        return Err(anyhow::anyhow!(
            "configuration validation failed with {} error(s)",
            errors.len()
        ));
    }

    info!(
        hostname = %config.server.hostname,
        title = %config.server.title,
        "starting ircbncd"
    );

    // Open the database.
    let db = Database::new(&config.database.path).await?;

    // History: filesystem-backed when log_path is set, in-memory otherwise
    // (spec §6 "LogPath ('' -> in-memory store)").
    let history: Arc<dyn ircbnc::history::MessageStore> = if config.log_path.is_empty() {
        info!("history backend: in-memory (non-persistent)");
        Arc::new(ircbnc::history::MemoryStore::new())
    } else {
        info!(path = %config.log_path, "history backend: filesystem");
        Arc::new(ircbnc::history::FsStore::new(&config.log_path))
    };

    let deps = ServerDeps {
        db: db.clone(),
        history,
        connector: Arc::new(UnconfiguredConnector),
        identd: None,
        push: None,
        upstream_handler: None,
    };

    let server = Arc::new(Server::new(config, deps));

    // Register metrics before anything records (spec SPEC_FULL.md Observability).
    ircbnc::metrics::init();

    // Spawn signal handler for graceful shutdown.
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = sigint.recv() => info!("received SIGINT, initiating graceful shutdown"),
            _ = sigterm.recv() => info!("received SIGTERM, initiating graceful shutdown"),
        }

        let _ = shutdown_tx.send(());
    });

    // Load every user's networks from storage and spawn their dispatchers
    // (spec §4.5 Server::Start).
    server.start().await?;
    info!(users = server.user_count(), "user dispatchers started");

    // Block until a shutdown signal arrives, then run the teardown sequence:
    // Stop every dispatcher, wait for drain, close storage (spec §4.5 Shutdown).
    let _ = (&mut shutdown_rx).await;
    server.shutdown().await;
    info!("shutdown complete");

    Ok(())
}
