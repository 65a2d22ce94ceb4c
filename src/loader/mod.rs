//! YAML Loader module
//!
//! Parse endpoint definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `EndpointDefinition` - Declarative list endpoint specification
//! - `HttpDefinition` - Retry, backoff and rate limit settings
//! - YAML parsing with validation

mod parser;
mod types;

pub use parser::{load_endpoint, load_endpoint_from_str, validate_endpoint};
pub use types::{EndpointDefinition, HttpDefinition};

#[cfg(test)]
mod tests;
