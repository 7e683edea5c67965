//! GitHub host implementation
//!
//! Uses GitHub's official REST API to search for repositories and read their
//! READMEs.

use super::traits::RepositoryHost;
use crate::error::{Result, SearchError};
use crate::network::{ApiRequest, ApiResponse, HttpClient};
use crate::search::{RepositorySummary, SearchPage};
use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use tracing::debug;

/// GitHub search page size cap
const MAX_PER_PAGE: u32 = 100;

/// GitHub repository search and README retrieval
#[derive(Clone)]
pub struct GitHub {
    client: HttpClient,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    items: Vec<RepositoryItem>,
}

#[derive(Debug, Deserialize)]
struct RepositoryItem {
    name: String,
    full_name: String,
    owner: Option<Owner>,
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    language: Option<String>,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ReadmeBody {
    #[serde(default)]
    content: String,
    encoding: Option<String>,
}

impl GitHub {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build the request for one page of a stars-descending search
    pub fn search_request(&self, query: &str, page: u32, per_page: u32) -> ApiRequest {
        ApiRequest::get(self.client.endpoint("/search/repositories"))
            .param("q", query)
            .param("sort", "stars")
            .param("order", "desc")
            .param("per_page", per_page.clamp(1, MAX_PER_PAGE))
            .param("page", page.max(1))
    }

    /// Parse a search response into a page of summaries
    pub fn parse_search(&self, response: &ApiResponse) -> Result<SearchPage> {
        if !response.is_success() {
            return Err(classify_failure(response));
        }

        let body: SearchBody = response.json()?;
        let items = body.items.into_iter().map(RepositorySummary::from).collect();

        Ok(SearchPage {
            total_count: body.total_count,
            items,
        })
    }

    /// Build the README request for `owner/name`
    pub fn readme_request(&self, owner: &str, name: &str) -> ApiRequest {
        let path = format!(
            "/repos/{}/{}/readme",
            urlencoding::encode(owner),
            urlencoding::encode(name)
        );
        ApiRequest::get(self.client.endpoint(&path))
    }

    /// Parse a README response. A 404 is `Ok(None)`.
    pub fn parse_readme(&self, response: &ApiResponse) -> Result<Option<String>> {
        if response.is_not_found() {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(classify_failure(response));
        }

        let body: ReadmeBody = response.json()?;
        decode_content(&body.content, body.encoding.as_deref()).map(Some)
    }
}

#[async_trait]
impl RepositoryHost for GitHub {
    fn name(&self) -> &str {
        "github"
    }

    fn is_degraded(&self) -> bool {
        self.client.is_degraded()
    }

    fn max_page_size(&self) -> u32 {
        MAX_PER_PAGE
    }

    async fn search_page(&self, query: &str, page: u32, per_page: u32) -> Result<SearchPage> {
        let request = self.search_request(query, page, per_page);
        debug!(
            "GitHub search '{}' page {} ({} per page)",
            query,
            page,
            request.get_param("per_page").unwrap_or_default()
        );
        let response = self.client.execute(request).await?;
        self.parse_search(&response)
    }

    async fn fetch_readme(&self, repo: &RepositorySummary) -> Result<Option<String>> {
        let request = self.readme_request(&repo.owner, &repo.name);
        let response = self.client.execute(request).await?;
        self.parse_readme(&response)
    }
}

impl From<RepositoryItem> for RepositorySummary {
    fn from(item: RepositoryItem) -> Self {
        let owner = match item.owner {
            Some(owner) => owner.login,
            None => item
                .full_name
                .split_once('/')
                .map(|(owner, _)| owner.to_string())
                .unwrap_or_default(),
        };

        RepositorySummary {
            full_name: item.full_name,
            owner,
            name: item.name,
            description: item.description.filter(|d| !d.trim().is_empty()),
            stars: item.stargazers_count,
            language: item.language.filter(|l| !l.is_empty()),
            url: item.html_url,
            readme: None,
        }
    }
}

/// Map a non-success response onto the error taxonomy
fn classify_failure(response: &ApiResponse) -> SearchError {
    if response.is_rate_limited() {
        return SearchError::RateLimited {
            reset_at: response.rate_limit_reset(),
        };
    }

    let message = response.message();
    match response.status {
        401 | 403 => SearchError::Authentication(message),
        422 => SearchError::Validation(message),
        status => SearchError::UpstreamStatus { status, message },
    }
}

/// Decode README content. GitHub sends base64 wrapped at 60 columns.
fn decode_content(content: &str, encoding: Option<&str>) -> Result<String> {
    match encoding {
        Some("base64") | None => {
            let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(compact)
                .map_err(|e| SearchError::InvalidResponse(format!("README base64: {}", e)))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        Some(_) => Ok(content.to_string()),
    }
}
