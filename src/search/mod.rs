//! Search pipeline module
//!
//! Validates a domain query, collects the most-starred repositories for it
//! and optionally enriches each one with its README.

mod executor;
mod models;

pub use executor::{SearchOptions, Searcher};
pub use models::*;
