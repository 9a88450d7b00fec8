//! Common types for the client SDK

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Name the service gives a workspace's entry for itself
pub const WORKSPACE_SELF_NAME: &str = "Workspace";

/// Metadata for one asset as returned by the service.
///
/// The client only looks at `id` and `name`; everything else is passed
/// through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRecord(Map<String, Value>);

impl AssetRecord {
    /// Wrap a raw JSON object
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Asset identifier
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Asset name
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Look up any field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow all fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take all fields
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// Serialize onto a single line
    pub fn to_single_line(&self) -> String {
        serde_json::to_string(&self.0)
            .unwrap_or_default()
            .replace('\n', " ")
    }
}

impl From<Map<String, Value>> for AssetRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// One page of a workspace listing
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorkspaceContents {
    /// Total item count reported by the service, when present
    #[serde(default)]
    pub count: Option<u64>,
    /// Records in this page
    #[serde(default)]
    pub items: Vec<AssetRecord>,
}

/// Body answered by both upload endpoints
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssetIdResponse {
    pub asset_id: Option<String>,
}

/// Body for initiating a multipart upload
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InitiateMultipartRequest<'a> {
    pub name: &'a str,
    pub size: u64,
    pub workspace_id: &'a str,
}

/// `metadata` field of a single-shot upload
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SingleUploadMetadata<'a> {
    pub workspace_id: &'a str,
}

/// Body for a bulk detail request
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkDetailsRequest<'a> {
    pub asset_ids: &'a [String],
    pub fields: &'a [String],
}

/// The bulk endpoint may answer with either a list or a keyed object
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum BulkDetailsResponse {
    List(Vec<AssetRecord>),
    Wrapped { items: Vec<AssetRecord> },
    Keyed(HashMap<String, AssetRecord>),
}

impl BulkDetailsResponse {
    pub fn into_map(self) -> HashMap<String, AssetRecord> {
        match self {
            Self::List(items) | Self::Wrapped { items } => items
                .into_iter()
                .filter_map(|record| record.id().map(str::to_string).map(|id| (id, record)))
                .collect(),
            Self::Keyed(map) => map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_accessors() {
        let record: AssetRecord = serde_json::from_value(json!({
            "id": "abc123",
            "name": "clip.mov",
            "size": 42
        }))
        .unwrap();

        assert_eq!(record.id(), Some("abc123"));
        assert_eq!(record.name(), Some("clip.mov"));
        assert_eq!(record.get("size"), Some(&json!(42)));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_single_line_has_no_newlines() {
        let record: AssetRecord = serde_json::from_value(json!({
            "id": "abc",
            "description": "line one\nline two"
        }))
        .unwrap();

        let line = record.to_single_line();
        assert!(!line.contains('\n'));
        assert!(line.contains("abc"));
    }

    #[test]
    fn test_bulk_response_shapes() {
        let list: BulkDetailsResponse =
            serde_json::from_value(json!([{"id": "a", "name": "one"}, {"id": "b"}])).unwrap();
        let map = list.into_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"].name(), Some("one"));

        let wrapped: BulkDetailsResponse =
            serde_json::from_value(json!({"items": [{"id": "c"}]})).unwrap();
        assert!(wrapped.into_map().contains_key("c"));

        let keyed: BulkDetailsResponse =
            serde_json::from_value(json!({"d": {"name": "four"}})).unwrap();
        assert_eq!(keyed.into_map()["d"].name(), Some("four"));
    }
}
