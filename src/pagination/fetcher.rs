//! Page fetcher trait
//!
//! A [`PageFetcher`] wraps one paginated endpoint. Given the merged request
//! parameters (cursor included) it returns one page. Retries, timeouts and
//! in-flight aborts are the fetcher's business, never the aggregator's.

use super::types::{AggregatedResult, PagedResponse};
use crate::error::Result;
use crate::types::Params;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// One paginated endpoint
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Shape of one response
    type Response: PagedResponse + Send;

    /// Fetch a single page
    async fn fetch_page(&self, params: Params) -> Result<Self::Response>;
}

#[async_trait]
impl<P: PageFetcher + ?Sized> PageFetcher for Arc<P> {
    type Response = P::Response;

    async fn fetch_page(&self, params: Params) -> Result<Self::Response> {
        (**self).fetch_page(params).await
    }
}

/// Closure-backed fetcher
///
/// Lets an `async` closure stand in wherever a [`PageFetcher`] is expected,
/// e.g. [`super::CursorAggregator::aggregate_many`] or an `Arc<dyn PageFetcher>`.
pub struct FnFetcher<F> {
    fetch: F,
}

impl<F> FnFetcher<F> {
    /// Wrap a fetch closure
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

impl<F> std::fmt::Debug for FnFetcher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFetcher").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut, R> PageFetcher for FnFetcher<F>
where
    F: Fn(Params) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R>> + Send,
    R: PagedResponse + Send,
{
    type Response = R;

    async fn fetch_page(&self, params: Params) -> Result<R> {
        (self.fetch)(params).await
    }
}

/// Aggregated result type produced from a fetcher
pub type AggregatedFrom<P> = AggregatedResult<
    <<P as PageFetcher>::Response as PagedResponse>::Item,
    <<P as PageFetcher>::Response as PagedResponse>::Metadata,
>;
