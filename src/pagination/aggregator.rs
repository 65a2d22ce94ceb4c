//! Cursor aggregation loop
//!
//! Drives a page fetch operation along its cursor chain and concatenates the
//! pages. Fetches are strictly sequential since each cursor is only known
//! once the previous page has resolved.

use super::fetcher::{AggregatedFrom, PageFetcher};
use super::types::{
    normalize_cursor, AggregatedResult, AggregationRequest, AggregationStats, AggregatorConfig,
    PagedResponse,
};
use crate::cancel::CancellationSignal;
use crate::error::Result;
use crate::types::Params;
use futures::future::try_join_all;
use std::future::Future;
use std::time::Instant;
use tracing::debug;

/// Assembles complete result sets from a cursor-paginated endpoint
#[derive(Debug, Clone, Default)]
pub struct CursorAggregator {
    config: AggregatorConfig,
}

impl CursorAggregator {
    /// Create an aggregator with the default `cursor` parameter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator with a custom config
    pub fn with_config(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Get the config
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Aggregate every page of a [`PageFetcher`]
    pub async fn aggregate<P>(
        &self,
        fetcher: &P,
        request: &AggregationRequest,
        signal: Option<&CancellationSignal>,
    ) -> Result<AggregatedFrom<P>>
    where
        P: PageFetcher + ?Sized,
    {
        self.aggregate_with(move |params| fetcher.fetch_page(params), request, signal)
            .await
    }

    /// Aggregate every page of a fetch closure
    ///
    /// Stops when the server returns no cursor (or an empty one) or when
    /// `signal` is cancelled. Cancellation is checked before each fetch and
    /// right after each fetch resolves; once seen, no further fetch is issued
    /// and the items gathered so far are returned. A failed fetch is returned
    /// unchanged and discards everything accumulated.
    pub async fn aggregate_with<F, Fut, R>(
        &self,
        fetch_page: F,
        request: &AggregationRequest,
        signal: Option<&CancellationSignal>,
    ) -> Result<AggregatedResult<R::Item, R::Metadata>>
    where
        F: Fn(Params) -> Fut,
        Fut: Future<Output = Result<R>>,
        R: PagedResponse,
    {
        let start = Instant::now();
        let is_cancelled = || signal.is_some_and(CancellationSignal::is_cancelled);

        let mut stats = AggregationStats::new();
        let mut items = Vec::new();
        let mut metadata = None;
        let mut cursor: Option<String> = None;
        let mut first_page = true;

        loop {
            if is_cancelled() {
                stats.mark_cancelled();
                break;
            }

            let params =
                request.params_for(cursor.as_deref(), first_page, &self.config.cursor_param);
            let page = fetch_page(params).await?.into_page();

            let count = page.items.len();
            stats.add_page(count);
            debug!(
                page = stats.pages_fetched,
                items = count,
                total = stats.items_fetched,
                "Fetched page"
            );

            items.extend(page.items);
            if metadata.is_none() {
                metadata = Some(page.metadata);
            }
            cursor = normalize_cursor(page.next_cursor);
            first_page = false;

            // Cancelled while the fetch was in flight
            if cursor.is_some() && is_cancelled() {
                stats.mark_cancelled();
                cursor = None;
            }

            if cursor.is_none() {
                break;
            }
        }

        stats.set_duration(start.elapsed().as_millis() as u64);
        debug!(
            pages = stats.pages_fetched,
            items = stats.items_fetched,
            cancelled = stats.cancelled,
            "Aggregation finished"
        );

        Ok(AggregatedResult {
            items,
            metadata,
            stats,
        })
    }

    /// Run several independent aggregations against one fetcher concurrently
    ///
    /// Each aggregation stays sequential internally. Results come back in
    /// request order; the first failure fails the batch.
    pub async fn aggregate_many<P>(
        &self,
        fetcher: &P,
        requests: &[AggregationRequest],
        signal: Option<&CancellationSignal>,
    ) -> Result<Vec<AggregatedFrom<P>>>
    where
        P: PageFetcher + ?Sized,
    {
        try_join_all(
            requests
                .iter()
                .map(|request| self.aggregate(fetcher, request, signal)),
        )
        .await
    }
}

/// Aggregate every page of a fetch closure using the default `cursor` parameter
///
/// ```rust,ignore
/// use cursor_aggregator::{aggregate, AggregationRequest};
///
/// let request = AggregationRequest::new().param("limit", 1000);
/// let result = aggregate(
///     |params| async move { api.list_jobs(params).await },
///     &request,
///     None,
/// )
/// .await?;
/// ```
pub async fn aggregate<F, Fut, R>(
    fetch_page: F,
    request: &AggregationRequest,
    signal: Option<&CancellationSignal>,
) -> Result<AggregatedResult<R::Item, R::Metadata>>
where
    F: Fn(Params) -> Fut,
    Fut: Future<Output = Result<R>>,
    R: PagedResponse,
{
    CursorAggregator::new()
        .aggregate_with(fetch_page, request, signal)
        .await
}
