//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::search::Searcher;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search pipeline; owns the GitHub transport
    pub searcher: Arc<Searcher>,
    /// Search statistics, also attached to the pipeline
    pub stats: Arc<Metrics>,
}

impl AppState {
    /// Create new application state, opening the GitHub transport
    pub fn new(settings: Settings, stats: Arc<Metrics>) -> anyhow::Result<Self> {
        let searcher = Searcher::from_settings(&settings)?.with_stats(stats.clone());
        Ok(Self::with_searcher(settings, searcher, stats))
    }

    /// Create state around an existing pipeline
    pub fn with_searcher(settings: Settings, searcher: Searcher, stats: Arc<Metrics>) -> Self {
        Self {
            settings: Arc::new(settings),
            searcher: Arc::new(searcher),
            stats,
        }
    }

    /// Limit applied when a request gives none
    pub fn default_limit(&self) -> i64 {
        i64::from(self.settings.search.default_limit)
    }
}
