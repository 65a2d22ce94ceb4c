//! YAML parser for endpoint definitions
//!
//! Parses and validates endpoint YAML files.

use crate::error::{Error, Result};
use crate::loader::types::EndpointDefinition;
use std::fs;
use std::path::Path;
use url::Url;

/// Load an endpoint definition from a YAML file
pub fn load_endpoint(path: impl AsRef<Path>) -> Result<EndpointDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read endpoint file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_endpoint_from_str(&content)
}

/// Load an endpoint definition from a YAML string
pub fn load_endpoint_from_str(yaml: &str) -> Result<EndpointDefinition> {
    let def: EndpointDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse endpoint YAML: {e}")))?;

    validate_endpoint(&def)?;
    Ok(def)
}

/// Validate an endpoint definition
pub fn validate_endpoint(def: &EndpointDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Endpoint name cannot be empty"));
    }

    if def.base_url.is_empty() {
        return Err(Error::missing_field("base_url"));
    }
    let base = Url::parse(&def.base_url)?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(Error::invalid_value(
            "base_url",
            format!("unsupported scheme '{}'", base.scheme()),
        ));
    }

    if def.path.is_empty() {
        return Err(Error::config(format!(
            "Endpoint '{}' path cannot be empty",
            def.name
        )));
    }

    for (field, value) in [
        ("cursor_param", &def.cursor_param),
        ("items_path", &def.items_path),
        ("cursor_path", &def.cursor_path),
    ] {
        if value.is_empty() {
            return Err(Error::invalid_value(field, "cannot be empty"));
        }
    }

    if let Some(limit) = &def.http.rate_limit {
        if limit.requests_per_second == 0 {
            return Err(Error::invalid_value(
                "http.rate_limit.requests_per_second",
                "must be greater than zero",
            ));
        }
    }

    Ok(())
}
