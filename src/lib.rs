//! `ircbnc`: a multi-user IRC bouncer core. One dispatcher per user
//! (`user`), one reconnect state machine per upstream network (`network`),
//! a `Server` registry tying them to storage and configuration.
//!
//! The wire codec, transport listeners, SSO and push delivery are
//! deliberately out of scope here — this crate defines the collaborator
//! traits (`network::collaborators`, `event::DownstreamHandle`) they plug
//! into and drives them, but never parses a byte of IRC itself.

pub mod backoff;
pub mod config;
pub mod db;
pub mod delivered;
pub mod error;
pub mod event;
pub mod history;
pub mod ident;
pub mod metrics;
pub mod network;
pub mod server;
pub mod telemetry;
pub mod user;
