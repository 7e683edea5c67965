//! HTTP request handlers

use super::state::AppState;
use crate::error::{ErrorCategory, SearchError};
use crate::metrics::StatsSnapshot;
use crate::search::{RepositoryRecord, RepositorySummary};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Suggested search domains served by `/domains`
pub const POPULAR_DOMAINS: &[&str] = &[
    "machine learning",
    "artificial intelligence",
    "web development",
    "mobile development",
    "data science",
    "blockchain",
    "cybersecurity",
    "devops",
    "react",
    "vue",
    "angular",
    "python",
    "javascript",
    "typescript",
    "go",
    "rust",
    "docker",
    "kubernetes",
    "microservices",
    "api development",
    "database",
    "cloud computing",
    "serverless",
    "game development",
    "computer vision",
    "natural language processing",
    "deep learning",
];

/// JSON body for `POST /search`
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub domain: String,
    pub limit: Option<i64>,
}

/// Query parameters for `GET /search`
#[derive(Debug, Deserialize)]
pub struct KeywordParams {
    pub keywords: Option<String>,
    pub limit: Option<i64>,
}

/// Query parameters for the path-based search routes
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// Search results response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub domain: String,
    pub repositories: Vec<RepositoryRecord>,
    pub total_count: usize,
}

impl SearchResponse {
    fn new(domain: &str, repositories: &[RepositorySummary]) -> Self {
        Self {
            domain: domain.trim().to_string(),
            repositories: repositories.iter().map(RepositoryRecord::from).collect(),
            total_count: repositories.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub api_connected: bool,
    pub github_token_configured: bool,
    pub degraded: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorCategory,
    message: String,
}

/// Pipeline error rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub SearchError);

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Authentication => StatusCode::UNAUTHORIZED,
            ErrorCategory::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorCategory::Transport if matches!(self.0, SearchError::Timeout) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            ErrorCategory::Transport | ErrorCategory::Upstream => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Search error: {}", self.0);
        } else {
            tracing::warn!("Search rejected: {}", self.0);
        }

        let body = ErrorBody {
            error: self.0.category(),
            message: self.0.to_string(),
        };
        let mut response = (status, Json(body)).into_response();

        if let SearchError::RateLimited {
            reset_at: Some(reset_at),
        } = self.0
        {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            let wait = reset_at.saturating_sub(now);
            if let Ok(value) = HeaderValue::from_str(&wait.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

/// Service description
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    let prefix = state.settings.server.route_prefix();
    Json(serde_json::json!({
        "message": "GitHub README Searcher API",
        "version": crate::VERSION,
        "port": state.settings.server.port,
        "endpoints": {
            "search": format!("{}/search?keywords=python&limit=2", prefix),
            "search_path": format!("{}/search/{{domain}}?limit=2", prefix),
            "search_no_readme": format!("{}/search/{{domain}}/no-readme?limit=2", prefix),
            "health": format!("{}/health", prefix),
            "domains": format!("{}/domains", prefix),
            "stats": format!("{}/stats", prefix),
        }
    }))
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let github_token_configured = state.settings.has_token();

    // Probe the API with a minimal search when we have a credential
    let api_connected = if github_token_configured {
        match state.searcher.search("test", 1).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Health check failed: {}", e);
                false
            }
        }
    } else {
        false
    };

    Json(HealthResponse {
        status: if github_token_configured {
            "healthy"
        } else {
            "degraded"
        },
        version: crate::VERSION,
        api_connected,
        github_token_configured,
        degraded: state.searcher.is_degraded(),
    })
}

/// `POST /search`
pub async fn search_json(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> Result<Json<SearchResponse>, ApiError> {
    let limit = body.limit.unwrap_or_else(|| state.default_limit());
    with_readmes(&state, &body.domain, limit).await
}

/// `GET /search?keywords=...`
pub async fn search_keywords(
    State(state): State<AppState>,
    Query(params): Query<KeywordParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let keywords = params.keywords.unwrap_or_default();
    let limit = params.limit.unwrap_or_else(|| state.default_limit());
    with_readmes(&state, &keywords, limit).await
}

/// `GET /search/:domain`
pub async fn search_domain(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Query(params): Query<LimitParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let limit = params.limit.unwrap_or_else(|| state.default_limit());
    with_readmes(&state, &domain, limit).await
}

/// `GET /search/:domain/no-readme`
pub async fn search_domain_no_readme(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Query(params): Query<LimitParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let limit = params.limit.unwrap_or_else(|| state.default_limit());
    let repositories = state.searcher.search_fast(&domain, limit).await?;
    Ok(Json(SearchResponse::new(&domain, &repositories)))
}

async fn with_readmes(
    state: &AppState,
    domain: &str,
    limit: i64,
) -> Result<Json<SearchResponse>, ApiError> {
    let repositories = state.searcher.search_and_get_readmes(domain, limit).await?;
    Ok(Json(SearchResponse::new(domain, &repositories)))
}

/// Popular search domains
pub async fn domains() -> impl IntoResponse {
    Json(serde_json::json!({
        "popular_domains": POPULAR_DOMAINS,
        "total_count": POPULAR_DOMAINS.len(),
        "description": "Popular technology domains for GitHub repository search"
    }))
}

/// Usage statistics
pub async fn stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.stats.snapshot())
}
