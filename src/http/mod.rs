//! HTTP client module
//!
//! Transport used by [`crate::fetch::HttpPageFetcher`].
//!
//! # Features
//!
//! - **Automatic Retries**: 429, 5xx, timeouts and refused connections
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
