//! HTTP networking module
//!
//! Owns the credentialed, pooled transport used to talk to the GitHub API.

mod client;
mod request;

pub use client::HttpClient;
pub use request::{ApiRequest, ApiResponse};
