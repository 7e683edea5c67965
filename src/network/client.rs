//! Pooled HTTP transport for the GitHub API

use super::request::{ApiRequest, ApiResponse};
use crate::config::{GitHubSettings, OutgoingSettings};
use crate::error::SearchError;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// HTTP client bound to one API endpoint and one credential.
///
/// The underlying connection pool lives as long as this value and its
/// clones; dropping the last handle releases every socket.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    authenticated: bool,
}

impl HttpClient {
    /// Open a transport from settings.
    ///
    /// A missing token is not an error: the client runs in degraded mode.
    pub fn open(github: &GitHubSettings, outgoing: &OutgoingSettings) -> Result<Self> {
        let base_url = url::Url::parse(&github.api_url)
            .with_context(|| format!("invalid GitHub API url: {}", github.api_url))?;
        let base_url = base_url.as_str().trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&github.user_agent).context("invalid user agent")?,
        );

        let token = github
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("GitHub token contains invalid characters")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        } else {
            warn!("No GitHub token configured; using unauthenticated requests");
        }

        let request_timeout = Duration::try_from_secs_f64(outgoing.request_timeout)
            .with_context(|| {
                format!("invalid outgoing.request_timeout: {}", outgoing.request_timeout)
            })?;
        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .pool_max_idle_per_host(outgoing.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // Proxy settings
        if let Some(ref proxy_url) = outgoing.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = outgoing.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = outgoing.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;
        debug!("Opened HTTP transport for {}", base_url);

        Ok(Self {
            client,
            base_url,
            authenticated: token.is_some(),
        })
    }

    /// Whether requests run without a credential
    pub fn is_degraded(&self) -> bool {
        !self.authenticated
    }

    /// Absolute URL for an API path such as `/search/repositories`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Execute a request
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, SearchError> {
        let mut req_builder = self.client.get(&request.url);

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    async fn parse_response(response: Response) -> Result<ApiResponse, SearchError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.as_str().to_ascii_lowercase(), v.to_string());
            }
        }

        let text = response.text().await?;

        Ok(ApiResponse {
            status,
            headers,
            text,
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_without_token_is_degraded() {
        let client = HttpClient::open(&GitHubSettings::default(), &OutgoingSettings::default())
            .unwrap();
        assert!(client.is_degraded());
        assert_eq!(
            client.endpoint("search/repositories"),
            "https://api.github.com/search/repositories"
        );
    }

    #[test]
    fn test_open_with_token() {
        let github = GitHubSettings {
            token: Some("ghp_example".to_string()),
            api_url: "http://127.0.0.1:9000/".to_string(),
            ..Default::default()
        };
        let client = HttpClient::open(&github, &OutgoingSettings::default()).unwrap();
        assert!(!client.is_degraded());
        assert_eq!(
            client.endpoint("/search/repositories"),
            "http://127.0.0.1:9000/search/repositories"
        );
    }

    #[test]
    fn test_open_rejects_bad_url() {
        let github = GitHubSettings {
            api_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(HttpClient::open(&github, &OutgoingSettings::default()).is_err());
    }

    #[test]
    fn test_open_rejects_bad_timeout() {
        for bad in [-5.0, f64::NAN] {
            let outgoing = OutgoingSettings {
                request_timeout: bad,
                ..Default::default()
            };
            let err = HttpClient::open(&GitHubSettings::default(), &outgoing)
                .err()
                .unwrap();
            assert!(err.to_string().contains("request_timeout"));
        }
    }
}
