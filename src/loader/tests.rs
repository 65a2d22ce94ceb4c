//! Tests for YAML loader module

use super::*;
use crate::error::Error;
use crate::types::{BackoffType, Method};
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use test_case::test_case;

// ============================================================================
// Basic Loading Tests
// ============================================================================

#[test]
fn test_load_minimal_endpoint() {
    let yaml = r"
name: jobs
base_url: https://api.example.com
path: /jobs
";

    let def = load_endpoint_from_str(yaml).unwrap();
    assert_eq!(def.name, "jobs");
    assert_eq!(def.method, Method::GET);
    assert_eq!(def.cursor_param, "cursor");
    assert_eq!(def.items_path, "items");
    assert_eq!(def.cursor_path, "nextCursor");
    assert!(def.params.is_empty());
    assert!(def.first_page_params.is_none());
    assert_eq!(def.http.timeout_secs, 30);
    assert!(def.http.rate_limit.is_none());
}

#[test]
fn test_load_full_endpoint() {
    let yaml = r"
name: depth-measurements
base_url: https://wells.example.com/api/v1
path: /measurements/data
method: POST
cursor_param: cursor
items_path: rows
cursor_path: nextCursor
headers:
  api-key: secret
params:
  sequenceExternalId: seq-1
  limit: 1000
  depthRange:
    min: 0
    max: 3000
first_page_params:
  limit: 5
http:
  timeout_secs: 10
  max_retries: 5
  backoff: linear
  initial_backoff_ms: 250
  max_backoff_ms: 5000
  rate_limit:
    requests_per_second: 4
    burst_size: 2
  user_agent: wells-cli/1.0
";

    let def = load_endpoint_from_str(yaml).unwrap();
    assert_eq!(def.method, Method::POST);
    assert_eq!(def.items_path, "rows");

    let request = def.request();
    assert_eq!(request.params["depthRange"], json!({"min": 0, "max": 3000}));
    assert_eq!(request.first_page_params.unwrap()["limit"], json!(5));

    let http = def.http_config();
    assert_eq!(http.base_url.as_deref(), Some("https://wells.example.com/api/v1"));
    assert_eq!(http.timeout, Duration::from_secs(10));
    assert_eq!(http.max_retries, 5);
    assert_eq!(http.backoff_type, BackoffType::Linear);
    assert_eq!(http.initial_backoff, Duration::from_millis(250));
    assert_eq!(http.max_backoff, Duration::from_secs(5));
    assert_eq!(http.rate_limit.unwrap().burst_size, 2);
    assert_eq!(http.user_agent, "wells-cli/1.0");
    assert_eq!(
        http.default_headers.get("api-key"),
        Some(&"secret".to_string())
    );

    let endpoint = def.endpoint();
    assert_eq!(endpoint.path, "/measurements/data");
    assert_eq!(endpoint.method, Method::POST);
    assert_eq!(def.aggregator_config().cursor_param, "cursor");
}

#[test]
fn test_definition_builds_fetcher() {
    let def = load_endpoint_from_str(
        "name: jobs\nbase_url: https://api.example.com\npath: /jobs\nitems_path: data\n",
    )
    .unwrap();

    let fetcher = def.fetcher().unwrap();
    assert_eq!(fetcher.endpoint().items_path, "data");
}

#[test]
fn test_load_endpoint_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "name: models\nbase_url: https://api.example.com\npath: /3d/models"
    )
    .unwrap();

    let def = load_endpoint(file.path()).unwrap();
    assert_eq!(def.path, "/3d/models");
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_endpoint(dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test_case("name: ''\nbase_url: https://a.io\npath: /x\n" ; "empty name")]
#[test_case("name: x\nbase_url: ''\npath: /x\n" ; "empty base url")]
#[test_case("name: x\nbase_url: not a url\npath: /x\n" ; "unparseable base url")]
#[test_case("name: x\nbase_url: ftp://a.io\npath: /x\n" ; "unsupported scheme")]
#[test_case("name: x\nbase_url: https://a.io\npath: ''\n" ; "empty path")]
#[test_case("name: x\nbase_url: https://a.io\npath: /x\ncursor_param: ''\n" ; "empty cursor param")]
#[test_case("name: x\nbase_url: https://a.io\npath: /x\nitems_path: ''\n" ; "empty items path")]
#[test_case("name: x\nbase_url: https://a.io\npath: /x\nparams: [1, 2]\n" ; "params not a mapping")]
#[test_case("name: x\nbase_url: https://a.io\npath: /x\nmethod: DELETE\n" ; "unsupported method")]
#[test_case(
    "name: x\nbase_url: https://a.io\npath: /x\nhttp:\n  rate_limit:\n    requests_per_second: 0\n    burst_size: 1\n" ;
    "zero rate limit"
)]
fn test_validation_rejects(yaml: &str) {
    assert!(load_endpoint_from_str(yaml).is_err());
}

#[test]
fn test_validation_error_kinds() {
    let err = load_endpoint_from_str("name: x\nbase_url: ''\npath: /x\n").unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { .. }));

    let err = load_endpoint_from_str("name: x\nbase_url: not a url\npath: /x\n").unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));

    let err = load_endpoint_from_str("name: x\nbase_url: https://a.io\npath: /x\ncursor_path: ''\n")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid config value for 'cursor_path': cannot be empty"
    );
}
