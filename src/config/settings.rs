//! Settings structures for readme-searcher configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure, loadable from `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub github: GitHubSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub display: DisplaySettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("GITHUB_TOKEN") {
            if !val.trim().is_empty() {
                self.github.token = Some(val.trim().to_string());
            }
        }
        if let Ok(val) = std::env::var("GITHUB_HOST") {
            self.github.api_url = val;
        }
        if let Ok(val) = std::env::var("HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("DEBUG") {
            self.general.debug = val.eq_ignore_ascii_case("true");
        }
        if let Ok(val) = std::env::var("LOG_LEVEL") {
            self.general.log_level = val.to_lowercase();
        }
    }

    /// Tracing filter directive used when RUST_LOG is not set
    pub fn log_filter(&self) -> &str {
        if self.general.debug {
            "debug"
        } else {
            self.general.log_level.as_str()
        }
    }

    /// Whether a GitHub token is configured
    pub fn has_token(&self) -> bool {
        self.github
            .token
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false)
    }

    /// Check the settings for problems that do not prevent startup
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.has_token() {
            warnings.push(
                "GITHUB_TOKEN not set; running unauthenticated with stricter rate limits"
                    .to_string(),
            );
        }
        if self.search.max_limit == 0 {
            warnings.push("search.max_limit is 0; every search will be rejected".to_string());
        }
        if self.search.default_limit > self.search.max_limit {
            warnings.push(format!(
                "search.default_limit ({}) exceeds search.max_limit ({})",
                self.search.default_limit, self.search.max_limit
            ));
        }
        if self.search.readme_concurrency == 0 {
            warnings.push("search.readme_concurrency is 0; using 1".to_string());
        }
        for (name, secs) in [
            ("search.readme_timeout", self.search.readme_timeout),
            ("outgoing.request_timeout", self.outgoing.request_timeout),
        ] {
            if !secs.is_finite() || secs <= 0.0 {
                warnings.push(format!("{} must be a positive number of seconds, got {}", name, secs));
            }
        }
        if !self.server.api_prefix.is_empty() && !self.server.api_prefix.starts_with('/') {
            warnings.push(format!(
                "server.api_prefix should start with '/'; serving under {}",
                self.server.route_prefix()
            ));
        }
        if url::Url::parse(&self.github.api_url).is_err() {
            warnings.push(format!("github.api_url is not a valid URL: {}", self.github.api_url));
        }

        warnings
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log at debug level regardless of `log_level`
    pub debug: bool,
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Prefix all API routes are mounted under
    pub api_prefix: String,
}

impl ServerSettings {
    /// API prefix with one leading slash and no trailing slash; empty mounts
    /// the routes at the root
    pub fn route_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5088,
            api_prefix: "/api/v1".to_string(),
        }
    }
}

/// GitHub API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    /// Base URL of the REST API
    pub api_url: String,
    /// Bearer token; absent means degraded (unauthenticated) mode
    pub token: Option<String>,
    /// User-Agent sent with every request (GitHub rejects requests without one)
    pub user_agent: String,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: None,
            user_agent: format!("readme-searcher/{}", crate::VERSION),
        }
    }
}

/// How the search stage fills a result limit larger than one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pagination {
    /// Fetch sequential pages until the limit is met
    #[default]
    Auto,
    /// Only ever fetch the first page
    SinglePage,
}

/// Search pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Limit used when the caller gives none
    pub default_limit: u32,
    /// Largest accepted limit
    pub max_limit: u32,
    /// Items requested per search page (GitHub caps this at 100)
    pub page_size: u32,
    /// Upper bound on pages fetched for one search
    pub max_pages: u32,
    /// Pagination policy
    pub pagination: Pagination,
    /// Maximum README fetches in flight
    pub readme_concurrency: usize,
    /// Timeout for a single README fetch in seconds
    pub readme_timeout: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: crate::DEFAULT_LIMIT,
            max_limit: crate::MAX_LIMIT,
            page_size: 100,
            max_pages: 10,
            pagination: Pagination::Auto,
            readme_concurrency: 8,
            readme_timeout: 10.0,
        }
    }
}

/// Outgoing HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Idle connections kept per host
    pub pool_maxsize: usize,
    /// Proxy configuration
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 20,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub all: Option<String>,
    pub http: Option<String>,
    pub https: Option<String>,
}

/// Output rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// README characters shown before a preview is cut off
    pub max_readme_length: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            max_readme_length: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5088);
        assert_eq!(settings.github.api_url, "https://api.github.com");
        assert_eq!(settings.search.max_limit, 100);
        assert_eq!(settings.search.pagination, Pagination::Auto);
        assert!(!settings.has_token());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "search:\n  pagination: single_page\n  readme_concurrency: 4\ngithub:\n  token: abc\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.search.pagination, Pagination::SinglePage);
        assert_eq!(settings.search.readme_concurrency, 4);
        assert_eq!(settings.search.page_size, 100);
        assert_eq!(settings.server.api_prefix, "/api/v1");
        assert!(settings.has_token());
    }

    #[test]
    fn test_validate_warns_without_token() {
        let settings = Settings::default();
        let warnings = settings.validate();
        assert!(warnings.iter().any(|w| w.contains("GITHUB_TOKEN")));

        let mut settings = Settings::default();
        settings.github.token = Some("token".to_string());
        assert!(settings.validate().is_empty());
    }

    #[test]
    fn test_validate_flags_bad_timeouts() {
        let yaml = "search:\n  readme_timeout: -1\noutgoing:\n  request_timeout: .nan\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        let warnings = settings.validate();
        assert!(warnings.iter().any(|w| w.contains("search.readme_timeout")));
        assert!(warnings.iter().any(|w| w.contains("outgoing.request_timeout")));
    }

    #[test]
    fn test_route_prefix_is_normalised() {
        let mut server = ServerSettings::default();
        assert_eq!(server.route_prefix(), "/api/v1");

        server.api_prefix = "api/v1/".to_string();
        assert_eq!(server.route_prefix(), "/api/v1");

        server.api_prefix = "/".to_string();
        assert_eq!(server.route_prefix(), "");

        let mut settings = Settings::default();
        settings.github.token = Some("token".to_string());
        settings.server.api_prefix = "api".to_string();
        assert!(settings.validate().iter().any(|w| w.contains("api_prefix")));
    }

    #[test]
    fn test_debug_overrides_log_level() {
        let mut settings = Settings::default();
        assert_eq!(settings.log_filter(), "info");
        settings.general.log_level = "warn".to_string();
        assert_eq!(settings.log_filter(), "warn");
        settings.general.debug = true;
        assert_eq!(settings.log_filter(), "debug");
    }

    #[test]
    fn test_blank_token_is_not_configured() {
        let mut settings = Settings::default();
        settings.github.token = Some("   ".to_string());
        assert!(!settings.has_token());
    }
}
