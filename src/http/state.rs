use crate::static_files::StaticFiles;
use crate::token::TokenIssuer;

/// Everything request handlers read. Built once at startup and never mutated.
pub struct AppState {
    pub issuer: TokenIssuer,
    pub static_files: StaticFiles,
    /// Realm used when a request omits `realm`.
    pub default_realm: String,
}

impl AppState {
    pub fn new(
        issuer: TokenIssuer,
        static_files: StaticFiles,
        default_realm: impl Into<String>,
    ) -> Self {
        Self {
            issuer,
            static_files,
            default_realm: default_realm.into(),
        }
    }
}
