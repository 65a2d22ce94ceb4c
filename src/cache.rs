//! Memoization of aggregated results
//!
//! An [`AggregationCache`] belongs to the caller, typically one per
//! endpoint. Entries are keyed by the canonical JSON of the request, so two
//! requests with the same params in a different order share an entry. Only
//! complete results are stored: a cancelled aggregation is handed back to
//! its caller but never memoized.

use crate::error::Result;
use crate::pagination::{AggregatedResult, AggregationRequest};
use crate::types::{JsonObject, JsonValue};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Per-request memo of aggregated results
#[derive(Debug)]
pub struct AggregationCache<T, M = ()> {
    entries: RwLock<HashMap<String, Arc<AggregatedResult<T, M>>>>,
}

impl<T, M> Default for AggregationCache<T, M> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<T, M> AggregationCache<T, M> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached result
    pub async fn get(&self, request: &AggregationRequest) -> Option<Arc<AggregatedResult<T, M>>> {
        self.entries.read().await.get(&cache_key(request)).cloned()
    }

    /// Return the cached result for `request`, or run `aggregate` and cache
    /// its result if it completed
    ///
    /// Concurrent misses on the same key each run `aggregate`; the last
    /// complete result wins.
    pub async fn get_or_aggregate<F, Fut>(
        &self,
        request: &AggregationRequest,
        aggregate: F,
    ) -> Result<Arc<AggregatedResult<T, M>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AggregatedResult<T, M>>>,
    {
        let key = cache_key(request);
        if let Some(hit) = self.entries.read().await.get(&key).cloned() {
            debug!(key = %key, "Aggregation cache hit");
            return Ok(hit);
        }

        let result = Arc::new(aggregate().await?);
        if result.is_complete() {
            self.entries.write().await.insert(key, Arc::clone(&result));
        }
        Ok(result)
    }

    /// Drop the entry for `request`; returns whether one existed
    pub async fn invalidate(&self, request: &AggregationRequest) -> bool {
        self.entries
            .write()
            .await
            .remove(&cache_key(request))
            .is_some()
    }

    /// Drop every entry
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of cached results
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Canonical key of a request: its JSON with object keys sorted
pub fn cache_key(request: &AggregationRequest) -> String {
    let mut key = JsonObject::new();
    key.insert(
        "params".to_string(),
        canonicalize(&JsonValue::Object(request.params.clone())),
    );
    if let Some(first) = &request.first_page_params {
        key.insert(
            "first_page_params".to_string(),
            canonicalize(&JsonValue::Object(first.clone())),
        );
    }
    JsonValue::Object(key).to_string()
}

fn canonicalize(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let sorted: BTreeMap<&String, JsonValue> =
                map.iter().map(|(k, v)| (k, canonicalize(v))).collect();
            JsonValue::Object(sorted.into_iter().map(|(k, v)| (k.clone(), v)).collect())
        }
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
