//! Repository host trait

use crate::error::Result;
use crate::search::{RepositorySummary, SearchPage};
use async_trait::async_trait;

/// A platform that can search repositories and serve their READMEs.
///
/// Implementations must be shareable across concurrent README fetches; all
/// methods take `&self`.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Host name used in logs
    fn name(&self) -> &str;

    /// Whether requests run without a credential
    fn is_degraded(&self) -> bool {
        false
    }

    /// Largest page the search endpoint accepts
    fn max_page_size(&self) -> u32 {
        100
    }

    /// Fetch one page of repositories for `query`, most-starred first.
    /// `page` is 1-indexed.
    async fn search_page(&self, query: &str, page: u32, per_page: u32) -> Result<SearchPage>;

    /// Fetch the README of `repo`. `Ok(None)` means the repository has none.
    async fn fetch_readme(&self, repo: &RepositorySummary) -> Result<Option<String>>;
}
