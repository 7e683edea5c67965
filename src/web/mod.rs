//! Web server module
//!
//! Exposes the search pipeline as a JSON REST API.

mod handlers;
mod routes;
mod state;

pub use handlers::{ApiError, SearchResponse, POPULAR_DOMAINS};
pub use routes::create_router;
pub use state::AppState;
