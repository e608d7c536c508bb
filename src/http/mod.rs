// HTTP surface
//
// - state: shared, read-only handler state
// - handlers: /token, /config and the static roots
// - routes: the route table, auth gate, CORS and tracing layers
// - error: mapping of domain errors to status codes

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::RealmQuery;
pub use routes::create_router;
pub use state::AppState;
