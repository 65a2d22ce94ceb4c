//! HTTP-backed page fetcher
//!
//! Wraps one list endpoint. `GET` endpoints receive the request params as a
//! query string, `POST` endpoints as a JSON body; either way the cursor is
//! just another param.

use crate::cancel::CancellationSignal;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{JsonPage, PageFetcher};
use crate::types::{JsonValue, Method, Params};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Default JSON path of the items array in a response
pub const DEFAULT_ITEMS_PATH: &str = "items";

/// Default JSON path of the next cursor in a response
pub const DEFAULT_CURSOR_PATH: &str = "nextCursor";

/// Location and response layout of a list endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Path (relative to the client's base URL) or absolute URL
    pub path: String,
    /// HTTP method
    pub method: Method,
    /// Where the items live in a response
    pub items_path: String,
    /// Where the next cursor lives in a response
    pub cursor_path: String,
    /// Extra headers for this endpoint
    pub headers: HashMap<String, String>,
}

impl Endpoint {
    /// Create a `GET` endpoint with the default response layout
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::GET,
            items_path: DEFAULT_ITEMS_PATH.to_string(),
            cursor_path: DEFAULT_CURSOR_PATH.to_string(),
            headers: HashMap::new(),
        }
    }

    /// Set the HTTP method
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the items path
    #[must_use]
    pub fn items_path(mut self, path: impl Into<String>) -> Self {
        self.items_path = path.into();
        self
    }

    /// Set the cursor path
    #[must_use]
    pub fn cursor_path(mut self, path: impl Into<String>) -> Self {
        self.cursor_path = path.into();
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// [`PageFetcher`] for a REST list endpoint
#[derive(Debug)]
pub struct HttpPageFetcher {
    client: Arc<HttpClient>,
    endpoint: Endpoint,
    abort: Option<CancellationSignal>,
}

impl HttpPageFetcher {
    /// Create a fetcher for `endpoint`
    pub fn new(client: Arc<HttpClient>, endpoint: Endpoint) -> Self {
        Self {
            client,
            endpoint,
            abort: None,
        }
    }

    /// Abort in-flight requests when `signal` is cancelled
    ///
    /// An aborted request fails with [`Error::Aborted`], which the aggregator
    /// propagates like any other fetch failure. Use a separate signal from
    /// the one given to the aggregator to keep partial results on a
    /// cooperative stop.
    #[must_use]
    pub fn with_abort_signal(mut self, signal: CancellationSignal) -> Self {
        self.abort = Some(signal);
        self
    }

    /// Get the endpoint
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Build the request for one page
    pub fn request_config(&self, params: Params) -> RequestConfig {
        let mut config = RequestConfig::new();
        for (key, value) in &self.endpoint.headers {
            config = config.header(key, value);
        }

        match self.endpoint.method {
            Method::GET => {
                for (key, value) in params {
                    if let Some(rendered) = query_value(value) {
                        config = config.query(key, rendered);
                    }
                }
                config
            }
            Method::POST => config.json(JsonValue::Object(params)),
        }
    }

    async fn fetch_body(&self, params: Params) -> Result<JsonValue> {
        let config = self.request_config(params);
        let method = self.endpoint.method.into();
        let request = self
            .client
            .request_json::<JsonValue>(method, &self.endpoint.path, config);

        match &self.abort {
            Some(signal) => {
                tokio::select! {
                    biased;
                    () = signal.cancelled() => Err(Error::Aborted),
                    body = request => body,
                }
            }
            None => request.await,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    type Response = JsonPage;

    async fn fetch_page(&self, params: Params) -> Result<JsonPage> {
        let body = self.fetch_body(params).await?;
        let page = JsonPage::from_body(
            body,
            &self.endpoint.items_path,
            &self.endpoint.cursor_path,
        )?;
        debug!(
            path = %self.endpoint.path,
            items = page.items.len(),
            has_more = page.has_more(),
            "Decoded page"
        );
        Ok(page)
    }
}

/// Render a param for a query string; nulls are dropped
fn query_value(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
