//! Fetch module
//!
//! Page fetchers backed by real endpoints.
//!
//! # Overview
//!
//! - `Endpoint` - path, method and response layout of a list endpoint
//! - `HttpPageFetcher` - `PageFetcher` that calls the endpoint through
//!   `HttpClient` and splits each body into a `JsonPage`

mod endpoint;

pub use endpoint::{Endpoint, HttpPageFetcher, DEFAULT_CURSOR_PATH, DEFAULT_ITEMS_PATH};
