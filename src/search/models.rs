//! Search request and result data models

use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One ranked repository search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// Unique `owner/name` identifier
    pub full_name: String,
    /// Owner login
    pub owner: String,
    /// Repository name
    pub name: String,
    pub description: Option<String>,
    /// Stargazer count, the ranking key
    pub stars: u64,
    /// Primary language
    pub language: Option<String>,
    /// Canonical web URL
    pub url: String,
    /// README outcome; `None` until enrichment has run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<EnrichmentOutcome>,
}

impl RepositorySummary {
    /// README text, if enrichment found one
    pub fn readme_content(&self) -> Option<&str> {
        match self.readme {
            Some(EnrichmentOutcome::Found { ref content }) => Some(content),
            _ => None,
        }
    }

    pub(crate) fn with_readme(mut self, outcome: EnrichmentOutcome) -> Self {
        self.readme = Some(outcome);
        self
    }
}

/// Per-item result of a README fetch. Always data, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnrichmentOutcome {
    /// README text, untruncated
    Found { content: String },
    /// The repository has no README
    NotFound,
    /// The fetch failed
    Unavailable { reason: UnavailableReason },
}

impl EnrichmentOutcome {
    /// Short status label
    pub fn status(&self) -> &'static str {
        match self {
            EnrichmentOutcome::Found { .. } => "found",
            EnrichmentOutcome::NotFound => "not_found",
            EnrichmentOutcome::Unavailable { .. } => "unavailable",
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, EnrichmentOutcome::Unavailable { .. })
    }
}

impl From<SearchError> for EnrichmentOutcome {
    fn from(err: SearchError) -> Self {
        let reason = match err {
            SearchError::Timeout => UnavailableReason::Timeout,
            SearchError::RateLimited { .. } => UnavailableReason::RateLimited,
            SearchError::Transport(_) => UnavailableReason::Transport,
            SearchError::InvalidResponse(_) => UnavailableReason::Decode,
            SearchError::Authentication(_)
            | SearchError::Validation(_)
            | SearchError::UpstreamStatus { .. } => UnavailableReason::UpstreamStatus,
        };
        EnrichmentOutcome::Unavailable { reason }
    }
}

/// Why a README could not be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    Timeout,
    RateLimited,
    Transport,
    UpstreamStatus,
    Decode,
}

impl UnavailableReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnavailableReason::Timeout => "timeout",
            UnavailableReason::RateLimited => "rate_limited",
            UnavailableReason::Transport => "transport",
            UnavailableReason::UpstreamStatus => "upstream_status",
            UnavailableReason::Decode => "decode",
        }
    }
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat, serialization-friendly view of a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryRecord {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub stars: u64,
    pub language: Option<String>,
    pub url: String,
    pub readme_content: Option<String>,
    /// `found`, `not_found`, `unavailable` or `skipped`
    pub readme_status: String,
    /// Reason when the README is unavailable
    pub readme_error: Option<String>,
}

impl From<&RepositorySummary> for RepositoryRecord {
    fn from(repo: &RepositorySummary) -> Self {
        let (readme_status, readme_error) = match repo.readme {
            None => ("skipped", None),
            Some(EnrichmentOutcome::Unavailable { reason }) => {
                ("unavailable", Some(reason.to_string()))
            }
            Some(ref outcome) => (outcome.status(), None),
        };

        Self {
            name: repo.name.clone(),
            full_name: repo.full_name.clone(),
            description: repo.description.clone(),
            stars: repo.stars,
            language: repo.language.clone(),
            url: repo.url.clone(),
            readme_content: repo.readme_content().map(String::from),
            readme_status: readme_status.to_string(),
            readme_error,
        }
    }
}

/// Validated search parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Trimmed, non-empty domain
    pub domain: String,
    /// Result limit in `[1, max_limit]`
    pub limit: u32,
}

impl SearchRequest {
    /// Validate raw caller input.
    ///
    /// `limit` is signed so that negative values coming from outer surfaces are
    /// rejected here rather than silently wrapping.
    pub fn new(domain: &str, limit: i64, max_limit: u32) -> Result<Self, SearchError> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(SearchError::validation("domain must not be empty"));
        }
        if limit < 1 {
            return Err(SearchError::validation(format!(
                "limit must be at least 1, got {}",
                limit
            )));
        }
        if limit > i64::from(max_limit) {
            return Err(SearchError::validation(format!(
                "limit must be at most {}, got {}",
                max_limit, limit
            )));
        }

        Ok(Self {
            domain: domain.to_string(),
            limit: limit as u32,
        })
    }
}

/// One page of search results as returned by the host
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Total matches the host reports for the query
    pub total_count: u64,
    pub items: Vec<RepositorySummary>,
}

/// Whether a sequence is ordered non-increasing by stars
pub fn is_ranked(summaries: &[RepositorySummary]) -> bool {
    summaries.windows(2).all(|w| w[0].stars >= w[1].stars)
}

#[cfg(test)]
pub(crate) fn summary(full_name: &str, stars: u64) -> RepositorySummary {
    let (owner, name) = full_name.split_once('/').unwrap_or(("owner", full_name));
    RepositorySummary {
        full_name: full_name.to_string(),
        owner: owner.to_string(),
        name: name.to_string(),
        description: Some(format!("{} description", name)),
        stars,
        language: Some("Rust".to_string()),
        url: format!("https://github.com/{}", full_name),
        readme: None,
    }
}
