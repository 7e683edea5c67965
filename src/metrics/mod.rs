//! Metrics collection module
//!
//! Tracks search volume, popular domains and README enrichment outcomes.
//! A single [`Metrics`] is created at process start and handed to the
//! pipeline; nothing reads it as a global.

use crate::search::{EnrichmentOutcome, RepositorySummary};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Number of domains reported in a snapshot
const TOP_DOMAINS: usize = 10;

/// Distinct domains counted per process; searches for new domains past this
/// still count towards the totals
const MAX_TRACKED_DOMAINS: usize = 1000;

/// Search statistics collector
#[derive(Debug)]
pub struct Metrics {
    total_searches: AtomicU64,
    total_repositories_found: AtomicU64,
    readmes_found: AtomicU64,
    readmes_missing: AtomicU64,
    readmes_unavailable: AtomicU64,
    /// Searches per domain, at most `MAX_TRACKED_DOMAINS` entries
    searched_domains: RwLock<HashMap<String, u64>>,
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_searches: u64,
    pub total_repositories_found: u64,
    pub average_repositories_per_search: f64,
    pub most_searched_domains: Vec<String>,
    pub readmes_found: u64,
    pub readmes_missing: u64,
    pub readmes_unavailable: u64,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            total_repositories_found: AtomicU64::new(0),
            readmes_found: AtomicU64::new(0),
            readmes_missing: AtomicU64::new(0),
            readmes_unavailable: AtomicU64::new(0),
            searched_domains: RwLock::new(HashMap::new()),
        }
    }

    /// Record a completed search
    pub fn record_search(&self, domain: &str, found: usize) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
        self.total_repositories_found
            .fetch_add(found as u64, Ordering::Relaxed);

        let mut domains = match self.searched_domains.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(count) = domains.get_mut(domain) {
            *count += 1;
        } else if domains.len() < MAX_TRACKED_DOMAINS {
            domains.insert(domain.to_string(), 1);
        }
    }

    /// Record README outcomes of an enriched result set
    pub fn record_readmes(&self, summaries: &[RepositorySummary]) {
        for outcome in summaries.iter().filter_map(|s| s.readme.as_ref()) {
            let counter = match outcome {
                EnrichmentOutcome::Found { .. } => &self.readmes_found,
                EnrichmentOutcome::NotFound => &self.readmes_missing,
                EnrichmentOutcome::Unavailable { .. } => &self.readmes_unavailable,
            };
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get total searches
    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Most searched domains, by count then name
    pub fn most_searched_domains(&self, n: usize) -> Vec<String> {
        let domains = match self.searched_domains.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut counts: Vec<(&String, &u64)> = domains.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        counts
            .into_iter()
            .take(n)
            .map(|(domain, _)| domain.clone())
            .collect()
    }

    /// Take a snapshot of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        let total_searches = self.get_total_searches();
        let total_repositories_found = self.total_repositories_found.load(Ordering::Relaxed);

        let average = if total_searches == 0 {
            0.0
        } else {
            let raw = total_repositories_found as f64 / total_searches as f64;
            (raw * 100.0).round() / 100.0
        };

        StatsSnapshot {
            total_searches,
            total_repositories_found,
            average_repositories_per_search: average,
            most_searched_domains: self.most_searched_domains(TOP_DOMAINS),
            readmes_found: self.readmes_found.load(Ordering::Relaxed),
            readmes_missing: self.readmes_missing.load(Ordering::Relaxed),
            readmes_unavailable: self.readmes_unavailable.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
