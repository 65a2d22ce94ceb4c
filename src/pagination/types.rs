//! Pagination types and traits
//!
//! Defines the page shape abstraction, the request that seeds an
//! aggregation and the merged result it produces.

use crate::error::{Error, Result};
use crate::types::{JsonValue, OptionStringExt, Params};
use serde::{Deserialize, Serialize};

/// Default name of the parameter carrying the cursor
pub const DEFAULT_CURSOR_PARAM: &str = "cursor";

// ============================================================================
// Page
// ============================================================================

/// One response from a paginated endpoint, normalized
///
/// `metadata` holds any fields that ride alongside the items (column
/// descriptors, units, ids). Only the first page's metadata survives
/// aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T, M = ()> {
    /// Items in server order
    pub items: Vec<T>,
    /// Cursor for the next page; `None` or empty ends the stream
    pub next_cursor: Option<String>,
    /// Payload fields carried alongside the items
    pub metadata: M,
}

impl<T> Page<T> {
    /// Create a page with no cursor and no metadata
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
            metadata: (),
        }
    }
}

impl<T, M> Page<T, M> {
    /// Set the next cursor
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.next_cursor = Some(cursor.into());
        self
    }

    /// Replace the metadata
    pub fn with_metadata<N>(self, metadata: N) -> Page<T, N> {
        Page {
            items: self.items,
            next_cursor: self.next_cursor,
            metadata,
        }
    }

    /// Whether the server reported another page
    pub fn has_more(&self) -> bool {
        self.next_cursor.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// Adapter from an endpoint's response shape to a [`Page`]
///
/// Keeps the aggregation loop shape-agnostic: each endpoint shape only has
/// to say where its items, cursor and metadata live.
pub trait PagedResponse {
    /// Element type accumulated across pages
    type Item;
    /// Fields captured from the first page only
    type Metadata;

    /// The raw next cursor, if any
    fn next_cursor(&self) -> Option<&str>;

    /// Split the response into items, cursor and metadata
    fn into_page(self) -> Page<Self::Item, Self::Metadata>;
}

impl<T, M> PagedResponse for Page<T, M> {
    type Item = T;
    type Metadata = M;

    fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    fn into_page(self) -> Page<T, M> {
        self
    }
}

// ============================================================================
// Aggregation Request
// ============================================================================

/// Parameters for one aggregation call
///
/// `params` go out with every page fetch. `first_page_params` are merged on
/// top of them for the first fetch only and win on key collision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationRequest {
    /// Fields sent with every page
    #[serde(default)]
    pub params: Params,
    /// Fields sent with the first page only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_page_params: Option<Params>,
}

impl AggregationRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a request from an existing parameter map
    pub fn from_params(params: Params) -> Self {
        Self {
            params,
            first_page_params: None,
        }
    }

    /// Create a request from a JSON value, which must be an object
    pub fn from_value(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(params) => Ok(Self::from_params(params)),
            JsonValue::Null => Ok(Self::new()),
            other => Err(Error::invalid_value(
                "params",
                format!("expected a JSON object, got {other}"),
            )),
        }
    }

    /// Add a parameter sent with every page
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a parameter sent with the first page only
    #[must_use]
    pub fn first_page_param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.first_page_params
            .get_or_insert_with(Params::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replace the first-page parameters
    #[must_use]
    pub fn with_first_page_params(mut self, params: Params) -> Self {
        self.first_page_params = Some(params);
        self
    }

    /// Build the parameters for one fetch
    ///
    /// Merge order: `params`, then the cursor, then `first_page_params` when
    /// `first_page` is set. The request itself is left untouched.
    pub fn params_for(&self, cursor: Option<&str>, first_page: bool, cursor_param: &str) -> Params {
        let mut merged = self.params.clone();
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            merged.insert(cursor_param.to_string(), JsonValue::from(cursor));
        }
        if first_page {
            if let Some(extra) = &self.first_page_params {
                for (key, value) in extra {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
        merged
    }
}

// ============================================================================
// Aggregated Result
// ============================================================================

/// Counters for a single aggregation call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationStats {
    /// Page fetches that completed
    pub pages_fetched: usize,
    /// Items accumulated across all pages
    pub items_fetched: usize,
    /// Cancellation cut the cursor chain short
    pub cancelled: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl AggregationStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one fetched page
    pub fn add_page(&mut self, items: usize) {
        self.pages_fetched += 1;
        self.items_fetched += items;
    }

    /// Record that cancellation stopped the loop
    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Concatenation of every fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedResult<T, M = ()> {
    /// Items of all pages, in fetch order
    pub items: Vec<T>,
    /// Metadata of the first page; `None` if nothing was fetched
    pub metadata: Option<M>,
    /// Counters for this call
    pub stats: AggregationStats,
}

impl<T, M> AggregatedResult<T, M> {
    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items were accumulated
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the cursor chain was exhausted (not cut short by cancellation)
    pub fn is_complete(&self) -> bool {
        !self.stats.cancelled
    }

    /// Drop metadata and stats
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T, M> Default for AggregatedResult<T, M> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            metadata: None,
            stats: AggregationStats::default(),
        }
    }
}

// ============================================================================
// Aggregator Config
// ============================================================================

/// Configuration for a [`super::CursorAggregator`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Name of the request field that carries the cursor
    pub cursor_param: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            cursor_param: DEFAULT_CURSOR_PARAM.to_string(),
        }
    }
}

impl AggregatorConfig {
    /// Create a default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cursor parameter name
    #[must_use]
    pub fn with_cursor_param(mut self, name: impl Into<String>) -> Self {
        self.cursor_param = name.into();
        self
    }
}

/// Normalize a server cursor: empty and absent both end the stream
pub fn normalize_cursor(cursor: Option<String>) -> Option<String> {
    cursor.none_if_empty()
}
