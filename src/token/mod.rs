//! Token issuance: signed capability tokens plus best-effort relay credentials.

pub mod capability;
pub mod issuer;
pub mod relay;

pub use capability::{Capability, CapabilityClaims, CapabilityError};
pub use issuer::{IssueError, TokenIssuer, TokenResponse};
pub use relay::{
    api_base_for_realm, IceServer, PlatformRelayClient, RelayCredential, RelayCredentialSource,
    RelayError,
};
