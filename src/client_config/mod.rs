//! Connection configuration handed to browser clients for a realm.

pub mod hostnames;
mod payload;

pub use hostnames::{event_gateway, ws_server, PRODUCTION_REALM};
pub use payload::{build_config, ConfigPayload};
