//! Loader types
//!
//! Declarative endpoint definition types for YAML parsing.

use crate::error::Result;
use crate::fetch::{Endpoint, HttpPageFetcher, DEFAULT_CURSOR_PATH, DEFAULT_ITEMS_PATH};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::pagination::{AggregationRequest, AggregatorConfig, DEFAULT_CURSOR_PARAM};
use crate::types::{BackoffType, Method, Params};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Endpoint Definition
// ============================================================================

/// One cursor-paginated list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EndpointDefinition {
    /// Endpoint name, used in logs
    pub name: String,
    /// Base URL for all requests
    pub base_url: String,
    /// Path of the list endpoint
    pub path: String,
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// Request field carrying the cursor
    #[serde(default = "default_cursor_param")]
    pub cursor_param: String,
    /// Response path of the items
    #[serde(default = "default_items_path")]
    pub items_path: String,
    /// Response path of the next cursor
    #[serde(default = "default_cursor_path")]
    pub cursor_path: String,
    /// Headers sent with every page request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Params sent with every page request
    #[serde(default)]
    pub params: Params,
    /// Params sent with the first page request only
    #[serde(default)]
    pub first_page_params: Option<Params>,
    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpDefinition,
}

fn default_cursor_param() -> String {
    DEFAULT_CURSOR_PARAM.to_string()
}

fn default_items_path() -> String {
    DEFAULT_ITEMS_PATH.to_string()
}

fn default_cursor_path() -> String {
    DEFAULT_CURSOR_PATH.to_string()
}

impl EndpointDefinition {
    /// Request seeded with the definition's params
    pub fn request(&self) -> AggregationRequest {
        AggregationRequest {
            params: self.params.clone(),
            first_page_params: self.first_page_params.clone(),
        }
    }

    /// Endpoint location and response layout
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            path: self.path.clone(),
            method: self.method,
            items_path: self.items_path.clone(),
            cursor_path: self.cursor_path.clone(),
            headers: HashMap::new(),
        }
    }

    /// Aggregator settings
    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig::new().with_cursor_param(&self.cursor_param)
    }

    /// HTTP client settings; definition headers become default headers
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_millis(self.http.max_backoff_ms),
            );

        builder = match &self.http.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        builder.build()
    }

    /// Build a ready-to-use fetcher
    pub fn fetcher(&self) -> Result<HttpPageFetcher> {
        let client = HttpClient::with_config(self.http_config())?;
        Ok(HttpPageFetcher::new(Arc::new(client), self.endpoint()))
    }
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpDefinition {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum number of retries per page
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff strategy between retries
    #[serde(default)]
    pub backoff: BackoffType,
    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,
    /// Maximum backoff in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
    /// Rate limit; omitted means unlimited
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
            rate_limit: None,
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    100
}

fn default_max_backoff() -> u64 {
    60_000
}
