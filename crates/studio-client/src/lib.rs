// crates/studio-client/src/lib.rs
// ============================================================================
// Module: Studio Client Library
// Description: Session-holding client for the EdgeFirst Studio RPC service.
// Purpose: Expose async and blocking clients over an injected transport.
// Dependencies: async-trait, serde, serde_json, studio-core, thiserror, time,
//               tokio, toml, tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! Studio Client authenticates against a Studio server, keeps the session
//! token in a pluggable [`TokenStorage`], and offers typed list and get
//! operations over organizations, projects, datasets, experiments, training
//! and validation sessions, snapshots and tasks.
//!
//! - [`Client`] is the asynchronous client; [`BlockingClient`] wraps it.
//! - [`Transport`] is the wire seam. [`InMemoryStudio`] implements it locally.
//! - [`ClientConfig`] and [`Credentials`] build clients from TOML and the
//!   environment; [`init_logging`] installs an optional stderr subscriber.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod blocking;
pub mod client;
pub mod config;
pub mod logging;
pub mod memory;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use blocking::BlockingClient;
pub use client::Client;
pub use client::MAX_PAGES;
pub use config::ClientConfig;
pub use config::ConfigError;
pub use config::Credentials;
pub use config::LoggingConfig;
pub use config::Secret;
pub use config::StorageConfig;
pub use config::StorageKind;
pub use logging::init_logging;
pub use memory::InMemoryStudio;
pub use studio_core;
pub use studio_core::ClientError;
pub use studio_core::TokenStorage;
pub use transport::RpcRequest;
pub use transport::Transport;
pub use transport::TransportError;
pub use transport::decode_response;
