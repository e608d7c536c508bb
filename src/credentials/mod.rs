//! Per-realm account credentials loaded once at startup.

mod store;

pub use store::{Credential, CredentialStore, CREDENTIAL_FILE_KIND};
