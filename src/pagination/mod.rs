//! Pagination module
//!
//! Cursor aggregation over paginated list endpoints.
//!
//! # Overview
//!
//! A [`PageFetcher`] (or any `Fn(Params) -> Future`) returns one page per
//! call. The [`CursorAggregator`] threads the cursor from each page into the
//! next request and concatenates the items until the server stops returning
//! a cursor or the caller cancels. Endpoint payloads are adapted through
//! [`PagedResponse`] so the loop never depends on a response shape.

mod aggregator;
mod fetcher;
mod shapes;
mod types;

pub use aggregator::{aggregate, CursorAggregator};
pub use fetcher::{AggregatedFrom, FnFetcher, PageFetcher};
pub use shapes::{
    DepthMeasurementColumn, DepthMeasurementData, DepthMeasurementHeader, DepthMeasurementRow,
    DistanceUnit, ItemsWithCursor, JsonPage, MeasurementSource,
};
pub use types::{
    normalize_cursor, AggregatedResult, AggregationRequest, AggregationStats, AggregatorConfig,
    Page, PagedResponse, DEFAULT_CURSOR_PARAM,
};
