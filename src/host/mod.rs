//! Repository hosts
//!
//! The search pipeline talks to a host through the [`RepositoryHost`] trait;
//! [`GitHub`] is the production implementation.

mod github;
mod traits;

pub use github::GitHub;
pub use traits::RepositoryHost;
