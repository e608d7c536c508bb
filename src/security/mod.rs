//! Transport security.
//!
//! HTTPS termination is available behind the `tls` cargo feature.

#[cfg(feature = "tls")]
pub mod tls;

#[cfg(feature = "tls")]
pub use tls::build_rustls_config;
