//! Response shapes
//!
//! Adapters from concrete endpoint payloads to [`Page`]:
//!
//! - [`ItemsWithCursor`] - the common `{ "items": [...], "nextCursor": "..." }`
//! - [`DepthMeasurementData`] - rows plus column/unit descriptors and a cursor
//! - [`JsonPage`] - untyped bodies with configurable item and cursor paths

use super::types::{AggregatedResult, Page, PagedResponse};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

// ============================================================================
// Items With Cursor
// ============================================================================

/// The generic list response shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsWithCursor<T> {
    /// Items of this page
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Cursor for the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> PagedResponse for ItemsWithCursor<T> {
    type Item = T;
    type Metadata = ();

    fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    fn into_page(self) -> Page<T> {
        Page {
            items: self.items,
            next_cursor: self.next_cursor,
            metadata: (),
        }
    }
}

// ============================================================================
// Depth Measurement Data
// ============================================================================

/// Where a measurement sequence comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementSource {
    pub asset_external_id: String,
    pub source_name: String,
}

/// Unit of the depth axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceUnit {
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
}

/// One value column of a measurement sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthMeasurementColumn {
    pub external_id: String,
    pub measurement_type: String,
    #[serde(default)]
    pub unit: String,
}

/// One depth sample; `values` line up with the columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthMeasurementRow {
    pub row_number: u64,
    pub depth: f64,
    #[serde(default)]
    pub values: Vec<JsonValue>,
}

/// Descriptor fields of a depth measurement payload
///
/// Identical on every page by protocol; only the first page's copy is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthMeasurementHeader {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MeasurementSource>,
    pub depth_unit: DistanceUnit,
    #[serde(default)]
    pub columns: Vec<DepthMeasurementColumn>,
}

/// Depth measurement payload: rows paged by cursor, descriptors alongside
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthMeasurementData {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MeasurementSource>,
    pub depth_unit: DistanceUnit,
    #[serde(default)]
    pub columns: Vec<DepthMeasurementColumn>,
    #[serde(default)]
    pub rows: Vec<DepthMeasurementRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl DepthMeasurementData {
    /// Reassemble one payload from an aggregation: first page's descriptors
    /// plus every row. Returns `None` when no page was fetched.
    pub fn from_aggregated(
        result: AggregatedResult<DepthMeasurementRow, DepthMeasurementHeader>,
    ) -> Option<Self> {
        let header = result.metadata?;
        Some(Self {
            id: header.id,
            source: header.source,
            depth_unit: header.depth_unit,
            columns: header.columns,
            rows: result.items,
            next_cursor: None,
        })
    }
}

impl PagedResponse for DepthMeasurementData {
    type Item = DepthMeasurementRow;
    type Metadata = DepthMeasurementHeader;

    fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    fn into_page(self) -> Page<DepthMeasurementRow, DepthMeasurementHeader> {
        Page {
            items: self.rows,
            next_cursor: self.next_cursor,
            metadata: DepthMeasurementHeader {
                id: self.id,
                source: self.source,
                depth_unit: self.depth_unit,
                columns: self.columns,
            },
        }
    }
}

// ============================================================================
// Untyped JSON
// ============================================================================

/// A JSON response split into items, cursor and the remaining body fields
pub type JsonPage = Page<JsonValue, JsonObject>;

impl JsonPage {
    /// Split a response body
    ///
    /// `items_path` and `cursor_path` are dot paths (`items`,
    /// `data.rows`, `$.meta.next`). Item paths containing `*` are resolved
    /// as JSONPath. A missing items field yields an empty page, a single
    /// object one item, and a scalar is an extraction error. A missing or
    /// non-scalar cursor ends the stream. The metadata is the body object
    /// with both fields removed; for JSONPath items the whole top-level
    /// field the path starts from is removed.
    pub fn from_body(body: JsonValue, items_path: &str, cursor_path: &str) -> Result<Self> {
        let items = extract_items(&body, items_path)?;
        let next_cursor = match lookup(&body, cursor_path) {
            Some(JsonValue::String(s)) => Some(s.clone()),
            Some(JsonValue::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let mut metadata = match body {
            JsonValue::Object(map) => map,
            _ => JsonObject::new(),
        };
        if items_path.contains('*') {
            if let Some(root) = jsonpath_root(items_path) {
                metadata.remove(root);
            }
        } else {
            remove_path(&mut metadata, items_path);
        }
        remove_path(&mut metadata, cursor_path);

        Ok(Page {
            items,
            next_cursor,
            metadata,
        })
    }
}

impl AggregatedResult<JsonValue, JsonObject> {
    /// Render as `{ ...first page metadata, "items": [...] }`
    pub fn to_json(&self) -> JsonValue {
        let mut object = self.metadata.clone().unwrap_or_default();
        object.insert("items".to_string(), JsonValue::Array(self.items.clone()));
        JsonValue::Object(object)
    }
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    path.split('.').filter(|part| !part.is_empty())
}

/// Resolve a dot path; numeric segments index into arrays
fn lookup<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut current = value;
    for part in path_segments(path) {
        current = match current {
            JsonValue::Object(map) => map.get(part)?,
            JsonValue::Array(arr) => arr.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Top-level field a JSONPath starts from: `groups` for `$.groups[*].items`
fn jsonpath_root(path: &str) -> Option<&str> {
    let rest = path.strip_prefix('$').unwrap_or(path);
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    let end = rest.find(['.', '[']).unwrap_or(rest.len());
    let root = &rest[..end];
    (!root.is_empty() && root != "*").then_some(root)
}

fn remove_path(object: &mut JsonObject, path: &str) {
    let segments: Vec<&str> = path_segments(path).collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };

    let mut current = object;
    for part in parents {
        match current.get_mut(*part) {
            Some(JsonValue::Object(child)) => current = child,
            _ => return,
        }
    }
    current.remove(*leaf);
}

fn extract_items(body: &JsonValue, path: &str) -> Result<Vec<JsonValue>> {
    if path.contains('*') {
        return extract_with_jsonpath(body, path);
    }
    match lookup(body, path) {
        Some(JsonValue::Array(arr)) => Ok(arr.clone()),
        Some(JsonValue::Null) | None => Ok(vec![]),
        Some(object @ JsonValue::Object(_)) => Ok(vec![object.clone()]),
        Some(scalar) => Err(Error::extraction(
            path,
            format!("expected an array or object, got {scalar}"),
        )),
    }
}

/// Extract items using jsonpath-rust
fn extract_with_jsonpath(value: &JsonValue, path: &str) -> Result<Vec<JsonValue>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::JsonPath {
        message: format!("Invalid JSONPath: {e}"),
    })?;

    match jp.find(value) {
        JsonValue::Array(arr) => Ok(arr),
        JsonValue::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}
