use thiserror::Error;

/// Reasons the basic-auth gate turns a request away.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header; answered with a challenge (401).
    #[error("Authorization header missing")]
    MissingCredentials,
    /// Header present but not decodable as `Basic base64(user:pass)` (403).
    #[error("Malformed Authorization header")]
    MalformedHeader,
    /// Decoded credentials do not match the configured pair (403).
    #[error("Invalid credentials")]
    InvalidCredentials,
}
