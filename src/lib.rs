// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # Cursor Aggregator
//!
//! Assemble complete result sets from cursor-paginated APIs.
//!
//! ## Features
//!
//! - **Cursor Following**: Fetch page after page until the server stops
//!   handing out a cursor
//! - **Cooperative Cancellation**: Stop between pages and keep what was
//!   collected
//! - **Typed Pages**: Any response implementing [`PagedResponse`], with
//!   metadata taken from the first page
//! - **REST Endpoints**: GET/POST fetchers with retry, backoff and rate limiting
//! - **YAML Definitions**: Describe an endpoint once, fetch it from the CLI
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cursor_aggregator::{load_endpoint, CancellationSignal, CursorAggregator, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let definition = load_endpoint("endpoints/jobs.yaml")?;
//!     let fetcher = definition.fetcher()?;
//!
//!     let signal = CancellationSignal::new();
//!     let result = CursorAggregator::with_config(definition.aggregator_config())
//!         .aggregate(&fetcher, &definition.request(), Some(&signal))
//!         .await?;
//!
//!     println!("{} items in {} pages", result.len(), result.stats.pages_fetched);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    CursorAggregator                      │
//! │  params + cursor → fetch_page → items, nextCursor, meta  │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴─────┬────────────┬─────────┐
//! │ PageFetcher  │      HTTP         │   Cancel   │  Cache  │
//! ├──────────────┼───────────────────┼────────────┼─────────┤
//! │ Closures     │ GET / POST        │ Signal     │ Per     │
//! │ HttpPage-    │ Retry + Backoff   │ Listeners  │ request │
//! │  Fetcher     │ Rate Limit        │ Abort      │         │
//! └──────────────┴───────────────────┴────────────┴─────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Cooperative cancellation signal
pub mod cancel;

/// Cursor aggregation
pub mod pagination;

/// HTTP client with retry and rate limiting
pub mod http;

/// REST page fetcher
pub mod fetch;

/// Memoization of aggregated results
pub mod cache;

/// YAML loader for endpoint definitions
pub mod loader;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use cache::AggregationCache;
pub use cancel::CancellationSignal;
pub use fetch::{Endpoint, HttpPageFetcher};
pub use loader::{load_endpoint, load_endpoint_from_str, EndpointDefinition};
pub use pagination::{
    aggregate, AggregatedResult, AggregationRequest, AggregatorConfig, CursorAggregator, FnFetcher,
    Page, PageFetcher, PagedResponse,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
