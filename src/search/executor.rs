//! Search execution and README enrichment

use super::models::{is_ranked, EnrichmentOutcome, RepositorySummary, SearchRequest, UnavailableReason};
use crate::config::{Pagination, SearchSettings, Settings};
use crate::error::Result;
use crate::host::{GitHub, RepositoryHost};
use crate::metrics::Metrics;
use crate::network::HttpClient;
use anyhow::Context;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Tunables for the pipeline
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub max_limit: u32,
    pub page_size: u32,
    pub max_pages: u32,
    pub pagination: Pagination,
    /// Maximum README fetches in flight
    pub readme_concurrency: usize,
    /// Timeout for one README fetch
    pub readme_timeout: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        let settings = SearchSettings::default();
        Self {
            max_limit: settings.max_limit,
            page_size: settings.page_size,
            max_pages: settings.max_pages,
            pagination: settings.pagination,
            readme_concurrency: settings.readme_concurrency,
            readme_timeout: Duration::from_secs(10),
        }
    }
}

impl TryFrom<&SearchSettings> for SearchOptions {
    type Error = anyhow::Error;

    fn try_from(settings: &SearchSettings) -> anyhow::Result<Self> {
        let readme_timeout = Duration::try_from_secs_f64(settings.readme_timeout)
            .with_context(|| {
                format!("invalid search.readme_timeout: {}", settings.readme_timeout)
            })?;

        Ok(Self {
            max_limit: settings.max_limit,
            page_size: settings.page_size,
            max_pages: settings.max_pages,
            pagination: settings.pagination,
            readme_concurrency: settings.readme_concurrency.max(1),
            readme_timeout,
        })
    }
}

/// Search-and-enrich pipeline
pub struct Searcher {
    /// Host the searches run against
    host: Arc<dyn RepositoryHost>,
    options: SearchOptions,
    /// Statistics sink, if the caller wants counts
    stats: Option<Arc<Metrics>>,
}

impl Searcher {
    /// Create a pipeline over an arbitrary host
    pub fn new(host: Arc<dyn RepositoryHost>, options: SearchOptions) -> Self {
        Self {
            host,
            options,
            stats: None,
        }
    }

    /// Open a GitHub transport and build a pipeline over it.
    ///
    /// The transport lives as long as the returned value.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let options = SearchOptions::try_from(&settings.search)?;
        let client = HttpClient::open(&settings.github, &settings.outgoing)?;
        let host = Arc::new(GitHub::new(client));
        Ok(Self::new(host, options))
    }

    /// Report completed searches to `stats`
    pub fn with_stats(mut self, stats: Arc<Metrics>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Whether the host runs without a credential
    pub fn is_degraded(&self) -> bool {
        self.host.is_degraded()
    }

    /// Release the host transport now rather than at end of scope
    pub fn close(self) {
        debug!("Closing {} pipeline", self.host.name());
    }

    /// Search for repositories, most-starred first, without READMEs.
    ///
    /// Input is validated before any request is made. Any page failure aborts
    /// the call; no partial results are returned.
    pub async fn search(&self, domain: &str, limit: i64) -> Result<Vec<RepositorySummary>> {
        let request = SearchRequest::new(domain, limit, self.options.max_limit)?;
        let limit = request.limit as usize;
        let start = Instant::now();

        let page_size = self.options.page_size.clamp(1, self.host.max_page_size());
        let per_page = request.limit.min(page_size);
        let max_pages = match self.options.pagination {
            Pagination::Auto => self.options.max_pages.max(1),
            Pagination::SinglePage => 1,
        };

        let mut repositories: Vec<RepositorySummary> = Vec::with_capacity(limit);
        let mut seen = HashSet::new();
        let mut page = 1;

        while repositories.len() < limit && page <= max_pages {
            let result = self.host.search_page(&request.domain, page, per_page).await?;
            let received = result.items.len();

            // Results can shift between pages while we paginate
            for item in result.items {
                if seen.insert(item.full_name.clone()) {
                    repositories.push(item);
                }
            }

            debug!(
                "Page {} for '{}' returned {} items ({} of {} reported)",
                page,
                request.domain,
                received,
                repositories.len(),
                result.total_count
            );

            if (received as u32) < per_page
                || (result.total_count > 0 && repositories.len() as u64 >= result.total_count)
            {
                break;
            }
            page += 1;
        }

        repositories.truncate(limit);

        if !is_ranked(&repositories) {
            warn!(
                "{} returned results for '{}' out of star order; re-sorting",
                self.host.name(),
                request.domain
            );
            repositories.sort_by(|a, b| b.stars.cmp(&a.stars));
        }
        for repo in repositories.iter_mut() {
            repo.readme = None;
        }

        info!(
            "Found {} repositories for '{}' in {:?}",
            repositories.len(),
            request.domain,
            start.elapsed()
        );

        Ok(repositories)
    }

    /// Fetch the README of every summary concurrently.
    ///
    /// Output has the input's length and order. Individual failures become
    /// [`EnrichmentOutcome::Unavailable`] and never affect siblings.
    pub async fn enrich(&self, summaries: Vec<RepositorySummary>) -> Vec<RepositorySummary> {
        if summaries.is_empty() {
            return summaries;
        }

        let start = Instant::now();
        let concurrency = self.options.readme_concurrency.max(1);
        let fetch_timeout = self.options.readme_timeout;

        // Completion order is arbitrary; each result lands in its input slot
        let mut slots: Vec<Option<EnrichmentOutcome>> = vec![None; summaries.len()];
        {
            // Each fetch owns its summary and a handle on the host
            let host = &self.host;
            let fetches = summaries.iter().cloned().enumerate().map(move |(index, repo)| {
                let host = Arc::clone(host);
                async move {
                    let outcome = match timeout(fetch_timeout, host.fetch_readme(&repo)).await {
                        Ok(Ok(Some(content))) => EnrichmentOutcome::Found { content },
                        Ok(Ok(None)) => {
                            debug!("No README for {}", repo.full_name);
                            EnrichmentOutcome::NotFound
                        }
                        Ok(Err(e)) => {
                            warn!("Could not get README for {}: {}", repo.full_name, e);
                            EnrichmentOutcome::from(e)
                        }
                        Err(_) => {
                            warn!(
                                "README fetch for {} timed out after {:?}",
                                repo.full_name, fetch_timeout
                            );
                            EnrichmentOutcome::Unavailable {
                                reason: UnavailableReason::Timeout,
                            }
                        }
                    };
                    (index, outcome)
                }
            });

            let mut results = stream::iter(fetches).buffer_unordered(concurrency);
            while let Some((index, outcome)) = results.next().await {
                slots[index] = Some(outcome);
            }
        }

        let enriched: Vec<RepositorySummary> = summaries
            .into_iter()
            .zip(slots)
            .map(|(repo, outcome)| {
                repo.with_readme(outcome.unwrap_or(EnrichmentOutcome::Unavailable {
                    reason: UnavailableReason::Transport,
                }))
            })
            .collect();

        let unavailable = enriched
            .iter()
            .filter(|r| r.readme.as_ref().is_some_and(EnrichmentOutcome::is_unavailable))
            .count();
        info!(
            "Fetched {} READMEs in {:?} ({} unavailable)",
            enriched.len(),
            start.elapsed(),
            unavailable
        );

        enriched
    }

    /// Search and attach READMEs
    pub async fn search_and_get_readmes(
        &self,
        domain: &str,
        limit: i64,
    ) -> Result<Vec<RepositorySummary>> {
        let repositories = self.search(domain, limit).await?;
        let repositories = self.enrich(repositories).await;

        if let Some(ref stats) = self.stats {
            stats.record_search(domain.trim(), repositories.len());
            stats.record_readmes(&repositories);
        }

        Ok(repositories)
    }

    /// Search without READMEs, for callers that prefer latency
    pub async fn search_fast(&self, domain: &str, limit: i64) -> Result<Vec<RepositorySummary>> {
        let repositories = self.search(domain, limit).await?;

        if let Some(ref stats) = self.stats {
            stats.record_search(domain.trim(), repositories.len());
        }

        Ok(repositories)
    }
}
