//! CLI runner - executes commands

use crate::cancel::CancellationSignal;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::error::{Error, Result, ResultExt};
use crate::loader::{load_endpoint, EndpointDefinition};
use crate::pagination::{AggregationRequest, CursorAggregator};
use crate::types::{JsonValue, Params};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                params_json,
                first_page_json,
                output,
            } => {
                self.fetch(
                    params_json.as_deref(),
                    first_page_json.as_deref(),
                    output.as_deref(),
                )
                .await
            }
            Commands::Validate => self.validate(),
        }
    }

    /// Load endpoint definition
    fn load_endpoint(&self) -> Result<EndpointDefinition> {
        let path = self
            .cli
            .endpoint
            .as_ref()
            .ok_or_else(|| Error::config("Endpoint file not specified (use -e flag)"))?;
        load_endpoint(path)
    }

    /// Aggregate every page of the endpoint
    ///
    /// The first Ctrl-C stops after the page in flight and keeps what was
    /// collected; a second one aborts the request and fails the command.
    async fn fetch(
        &self,
        params_json: Option<&str>,
        first_page_json: Option<&str>,
        output: Option<&Path>,
    ) -> Result<()> {
        let definition = self.load_endpoint()?;
        let request = build_request(&definition, params_json, first_page_json)?;

        let abort = CancellationSignal::new();
        let stop = abort.child();
        let fetcher = definition.fetcher()?.with_abort_signal(abort.clone());
        let aggregator = CursorAggregator::with_config(definition.aggregator_config());

        info!(endpoint = %definition.name, path = %definition.path, "Starting aggregation");
        let start = Instant::now();

        let watcher = watch_interrupts(stop.clone(), abort);
        let result = aggregator.aggregate(&fetcher, &request, Some(&stop)).await;
        watcher.abort();
        let result = result?;

        info!(
            endpoint = %definition.name,
            pages = result.stats.pages_fetched,
            items = result.stats.items_fetched,
            complete = result.is_complete(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Aggregation finished"
        );
        if !result.is_complete() {
            warn!(endpoint = %definition.name, "Aggregation cancelled, writing partial result");
        }

        let rendered = self.render(&result.to_json())?;
        write_output(&rendered, output)
    }

    /// Validate endpoint definition
    fn validate(&self) -> Result<()> {
        let definition = self.load_endpoint()?;

        let message = json!({
            "name": definition.name,
            "valid": true,
            "method": definition.method,
            "url": endpoint_url(&definition),
            "cursor_param": definition.cursor_param,
        });
        println!("{}", self.render(&message)?);

        Ok(())
    }

    /// Serialize in the selected format
    fn render(&self, value: &JsonValue) -> Result<String> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        Ok(rendered)
    }
}

/// Absolute URL of the endpoint, joined the way the HTTP client joins it
fn endpoint_url(definition: &EndpointDefinition) -> String {
    format!(
        "{}/{}",
        definition.base_url.trim_end_matches('/'),
        definition.path.trim_start_matches('/')
    )
}

/// Build the request from the definition and command-line overrides
///
/// `--params-json` is merged over the definition's params;
/// `--first-page-json` replaces the definition's first-page params.
fn build_request(
    definition: &EndpointDefinition,
    params_json: Option<&str>,
    first_page_json: Option<&str>,
) -> Result<AggregationRequest> {
    let mut request = definition.request();

    if let Some(inline) = params_json {
        for (key, value) in parse_params(inline, "params-json")? {
            request.params.insert(key, value);
        }
    }
    if let Some(inline) = first_page_json {
        request = request.with_first_page_params(parse_params(inline, "first-page-json")?);
    }

    Ok(request)
}

fn parse_params(inline: &str, field: &str) -> Result<Params> {
    let value: JsonValue = serde_json::from_str(inline)
        .map_err(|e| Error::invalid_value(field, format!("invalid JSON: {e}")))?;
    match value {
        JsonValue::Object(params) => Ok(params),
        other => Err(Error::invalid_value(
            field,
            format!("expected a JSON object, got {other}"),
        )),
    }
}

fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("Failed to write result to '{}'", path.display()))?;
            info!(path = %path.display(), "Wrote result");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Map Ctrl-C presses onto the two signals
fn watch_interrupts(stop: CancellationSignal, abort: CancellationSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupted, finishing current page (Ctrl-C again to abort)");
        stop.cancel();

        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupted again, aborting request");
        abort.cancel();
    })
}
