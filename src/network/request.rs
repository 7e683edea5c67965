//! Request and response values exchanged with the GitHub API

use crate::error::SearchError;
use std::collections::HashMap;

/// HTTP GET request to be made against the API
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// URL to request
    pub url: String,
    /// Query parameters, in order
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: Vec::new(),
        }
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Look up a query parameter value
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response from the API
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, lowercase names
    pub headers: HashMap<String, String>,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl ApiResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, SearchError> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Check if response indicates quota exhaustion.
    ///
    /// GitHub answers primary rate limits with 403 and
    /// `x-ratelimit-remaining: 0`, secondary limits with 403 or 429 and a
    /// message mentioning the rate limit.
    pub fn is_rate_limited(&self) -> bool {
        match self.status {
            429 => true,
            403 => {
                self.rate_limit_remaining() == Some(0)
                    || self.text.to_lowercase().contains("rate limit")
            }
            _ => false,
        }
    }

    /// Remaining requests in the current window, if reported
    pub fn rate_limit_remaining(&self) -> Option<u64> {
        self.header("x-ratelimit-remaining")
            .and_then(|v| v.trim().parse().ok())
    }

    /// Unix time at which the quota resets, if reported
    pub fn rate_limit_reset(&self) -> Option<u64> {
        self.header("x-ratelimit-reset")
            .and_then(|v| v.trim().parse().ok())
    }

    /// Get a header by (case-insensitive) name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// Human readable error message: the API's `message` field if present,
    /// otherwise the start of the body.
    pub fn message(&self) -> String {
        serde_json::from_str::<serde_json::Value>(&self.text)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_else(|| self.text.chars().take(200).collect())
    }
}
