//! HTTP basic authentication policy.
//!
//! The policy is fixed at startup: either every request passes, or every
//! request must carry the configured username and password.

use super::error::AuthError;
use crate::error::StartupConfigError;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use subtle::ConstantTimeEq;

const BASIC_AUTH_FILE_KIND: &str = "basic-auth";

/// Value of the `WWW-Authenticate` header sent with a 401.
pub const LOGIN_CHALLENGE: &str = "Basic realm=\"Please log in\"";

/// The single username/password pair the gate accepts.
#[derive(Clone, Deserialize)]
pub struct BasicAuthCredentials {
    pub username: String,
    pub password: String,
}

impl BasicAuthCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Read the optional basic-auth file. An absent file disables the gate.
pub fn load_basic_auth(path: &Path) -> Result<Option<BasicAuthCredentials>, StartupConfigError> {
    if !path.is_file() {
        tracing::info!(path = %path.display(), "No basic-auth file; authentication disabled");
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path).map_err(|source| StartupConfigError::Read {
        kind: BASIC_AUTH_FILE_KIND,
        path: path.to_path_buf(),
        source,
    })?;
    let credentials = serde_json::from_str::<BasicAuthCredentials>(&raw).map_err(|source| {
        StartupConfigError::Parse {
            kind: BASIC_AUTH_FILE_KIND,
            path: path.to_path_buf(),
            source,
        }
    })?;

    tracing::info!(
        path = %path.display(),
        username = %credentials.username,
        "Basic authentication enabled"
    );
    Ok(Some(credentials))
}

/// Constant-time string comparison.
fn secrets_match(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Whether requests must authenticate, and against what.
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    Disabled,
    Basic(BasicAuthCredentials),
}

impl AuthPolicy {
    #[must_use]
    pub fn from_credentials(credentials: Option<BasicAuthCredentials>) -> Self {
        credentials.map_or(Self::Disabled, Self::Basic)
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Basic(_))
    }

    /// Check a request's headers against the policy.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let Self::Basic(expected) = self else {
            return Ok(());
        };

        let header = headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?;
        let (username, password) = decode_basic(header.as_bytes())?;

        // Evaluate both halves so a wrong username costs the same as a wrong password.
        let user_ok = secrets_match(&username, &expected.username);
        let pass_ok = secrets_match(&password, &expected.password);
        if user_ok && pass_ok {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Split `Basic <base64(user:pass)>` into its parts.
fn decode_basic(raw: &[u8]) -> Result<(String, String), AuthError> {
    let value = std::str::from_utf8(raw).map_err(|_| AuthError::MalformedHeader)?;
    let (scheme, encoded) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::MalformedHeader);
    }

    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| AuthError::MalformedHeader)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedHeader)?;
    let (username, password) = decoded.split_once(':').ok_or(AuthError::MalformedHeader)?;

    Ok((username.to_string(), password.to_string()))
}
