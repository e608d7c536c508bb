pub mod basic;
pub mod error;
pub mod middleware;

pub use basic::{load_basic_auth, AuthPolicy, BasicAuthCredentials, LOGIN_CHALLENGE};
pub use error::AuthError;
pub use middleware::require_login;
