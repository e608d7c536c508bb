//! Configuration module.
//!
//! Configuration comes from JSON files, inline JSON or stdin, with
//! environment variable overrides on top and compiled defaults underneath.
//!
//! # Module Structure
//!
//! - [`crate::config::types`]: Root `Config` struct
//! - [`realms`]: Realm allow-list, default realm and credential file location
//! - [`token`]: Capability token lifetime and outgoing grant
//! - [`relay`]: Access to the relay credential endpoint
//! - [`static_files`]: Static asset root
//! - [`security`]: CORS, basic-auth file and TLS
//! - [`logging`]: Logging configuration
//! - [`crate::config::loader`]: Configuration loading functions
//! - [`crate::config::validation`]: Configuration validation functions
//! - [`crate::config::defaults`]: Default value functions

pub mod defaults;
pub mod loader;
pub mod logging;
pub mod realms;
pub mod relay;
pub mod security;
pub mod static_files;
pub mod token;
pub mod types;
pub mod validation;

pub use loader::{load, ALLOWED_REALMS_ENV, DEFAULT_REALM_ENV};

pub use logging::{LogFormat, LogLevel, LoggingConfig};

pub use realms::RealmConfig;

pub use relay::RelayConfig;

pub use security::{ClientAuthMode, SecurityConfig, TlsServerConfig, TransportSecurityConfig};

pub use static_files::StaticFilesConfig;

pub use token::TokenConfig;

pub use types::Config;

pub use validation::validate_config;
