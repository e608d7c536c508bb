//! Errors that stop the server before it starts serving.

use std::path::PathBuf;
use thiserror::Error;

/// A local file the server depends on at startup could not be used.
#[derive(Debug, Error)]
pub enum StartupConfigError {
    #[error("failed to read {kind} file {path}: {source}")]
    Read {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {kind} file {path}: {source}")]
    Parse {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("none of the allowed realms ({allowed}) have credentials in {path}")]
    NoUsableRealms { allowed: String, path: PathBuf },
}
