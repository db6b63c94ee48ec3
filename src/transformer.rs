//! Final document shape and path normalization.
//!
//! Denormalized operation records carry their own path and method inside the
//! `root` group. The transformer regroups them into the path-keyed, then
//! method-keyed layout of the output document and flattens the remaining root
//! fields into the operation object.

use crate::assembler::DenormalizedOperation;
use crate::schema::Schema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Operations of one path, keyed by lowercase HTTP method.
pub type PathItem = IndexMap<String, Value>;

/// The `components` section of the output document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    /// Every named schema accumulated during the run
    pub schemas: IndexMap<String, Schema>,
}

/// The terminal artifact of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Normalized path → HTTP method → operation object
    pub paths: IndexMap<String, PathItem>,
    /// Referenced and force-registered schemas
    pub components: Components,
}

/// Regroups denormalized operation records into the output layout.
pub struct DocumentTransformer;

impl DocumentTransformer {
    /// Group records by path (first-seen order), key them by method (last
    /// record wins), and flatten each into an operation object.
    pub fn normalize_paths(records: Vec<DenormalizedOperation>) -> IndexMap<String, PathItem> {
        let mut paths: IndexMap<String, PathItem> = IndexMap::new();
        for record in records {
            let (path, method) = match route_of(&record) {
                Some(route) => route,
                None => continue,
            };
            let operation = flatten_record(record);
            paths
                .entry(path)
                .or_insert_with(PathItem::new)
                .insert(method, operation);
        }
        paths
    }
}

fn route_of(record: &DenormalizedOperation) -> Option<(String, String)> {
    let root = record.get("root")?.as_object()?;
    let path = root.get("path")?.as_str()?.to_string();
    let method = root
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or("get")
        .to_string();
    Some((path, method))
}

/// Build the operation object: every non-root group first, then the root
/// fields with `method` and `path` stripped.
fn flatten_record(mut record: DenormalizedOperation) -> Value {
    let root = record.remove("root");
    let mut operation = Map::new();
    for (key, value) in record {
        operation.insert(key, value);
    }
    if let Some(Value::Object(root)) = root {
        for (key, value) in root {
            if key != "method" && key != "path" {
                operation.insert(key, value);
            }
        }
    }
    Value::Object(operation)
}
