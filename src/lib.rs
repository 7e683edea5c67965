//! readme-searcher: find the most-starred GitHub repositories for a topic
//! and fetch their READMEs.
//!
//! The core is the [`Searcher`] pipeline: a validated, paginated search
//! against the GitHub API followed by a bounded-concurrency README fan-out
//! that never lets one failed fetch sink the batch. A REST API ([`web`]) and
//! a command-line tool ([`cli`]) sit on top of it.

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod metrics;
pub mod network;
pub mod search;
pub mod web;

pub use config::Settings;
pub use error::{ErrorCategory, SearchError};
pub use host::{GitHub, RepositoryHost};
pub use metrics::Metrics;
pub use search::{EnrichmentOutcome, RepositorySummary, Searcher};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result limit used when the caller gives none
pub const DEFAULT_LIMIT: u32 = 5;

/// Largest result limit accepted
pub const MAX_LIMIT: u32 = 100;
