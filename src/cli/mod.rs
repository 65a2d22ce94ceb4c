//! CLI module
//!
//! Command-line interface for aggregating cursor-paginated endpoints.
//!
//! # Commands
//!
//! - `fetch` - Follow the cursor chain and print the combined result
//! - `validate` - Check an endpoint definition

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
