#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

//! # Realm Token Server
//!
//! Issues short-lived capability tokens and per-realm connection settings for
//! browser clients of a real-time calling platform, and serves the demo page,
//! docs and SDK bundles, optionally behind HTTP basic authentication.

/// Basic-auth gate
pub mod auth;

/// Per-realm connection settings for clients
pub mod client_config;

/// Server configuration and environment variables
pub mod config;

/// Realm credential store
pub mod credentials;

/// Startup errors
pub mod error;

/// HTTP routes and handlers
pub mod http;

/// Structured logging configuration
pub mod logging;

/// TLS utilities
pub mod security;

/// Whitelisted static file roots
pub mod static_files;

/// Capability tokens and relay credentials
pub mod token;
