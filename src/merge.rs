//! Layered metadata merging.
//!
//! One operation description is assembled from three scopes: application-wide,
//! controller-level, and method-level. Method values win over controller
//! values, which win over global values, but collection-shaped values are
//! combined rather than replaced. Controller-scope fragments that carry a
//! merge-depth hint are kept aside as chunks and reconciled recursively up to
//! that depth.

use serde_json::{Map, Value};

/// One independently declared controller-scope fragment with its own merge depth.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Fragment keys to reconcile against the method scope
    pub fragment: Map<String, Value>,
    /// How many nested levels to reconcile before the base rule applies
    pub depth: usize,
}

/// Controller-scope metadata: directly folded fields plus depth-hinted chunks.
#[derive(Debug, Clone, Default)]
pub struct GlobalMetadata {
    /// Fields folded from depth-less explorer results, later results winning
    pub fields: Map<String, Value>,
    /// Depth-hinted fragments, oldest first
    pub chunks: Vec<Chunk>,
}

/// Shape of a fragment value, decided once per merge step.
enum Shape<'a> {
    Sequence(&'a Vec<Value>),
    Mapping(&'a Map<String, Value>),
    Scalar,
}

fn shape(value: &Value) -> Shape<'_> {
    match value {
        Value::Array(items) => Shape::Sequence(items),
        Value::Object(map) => Shape::Mapping(map),
        _ => Shape::Scalar,
    }
}

/// Merge controller-scope metadata into method-scope metadata.
///
/// Chunks apply first, oldest first, then the directly folded fields, so later
/// declarations can still override earlier ones. Only keys already present in
/// the method scope are reconciled; the assembler is responsible for carrying
/// global-only keys into the final record.
pub fn merge_metadata(
    global: &GlobalMetadata,
    mut method: Map<String, Value>,
) -> Map<String, Value> {
    if let Some(Value::Object(root)) = method.get_mut("root") {
        if !root.contains_key("parameters") {
            root.insert("parameters".to_string(), Value::Array(Vec::new()));
        }
    }

    for chunk in &global.chunks {
        method = apply_scope(&chunk.fragment, Some(chunk.depth), method);
    }
    apply_scope(&global.fields, None, method)
}

/// Reconcile every method-scope key against one fragment of global metadata.
fn apply_scope(
    scope: &Map<String, Value>,
    depth: Option<usize>,
    method: Map<String, Value>,
) -> Map<String, Value> {
    method
        .into_iter()
        .map(|(key, value)| {
            let merged = match scope.get(&key) {
                None | Some(Value::Null) => value,
                Some(global_value) => match depth {
                    Some(depth) => deep_merge_metadata(global_value, &value, depth),
                    None => merge_values(global_value, &value),
                },
            };
            (key, merged)
        })
        .collect()
}

/// Recursively reconcile two values, bounded by the remaining depth.
///
/// While depth remains and both sides are mappings, keys present in both are
/// reconciled one level deeper and method-only keys pass through untouched. At
/// the depth bound, or whenever either side stops being a mapping, the base
/// combination rule of [`merge_values`] applies.
pub fn deep_merge_metadata(global: &Value, method: &Value, remaining: usize) -> Value {
    if remaining == 0 {
        return merge_values(global, method);
    }
    match (shape(method), shape(global)) {
        (Shape::Mapping(method_map), Shape::Mapping(global_map)) => {
            let merged = method_map
                .iter()
                .map(|(key, value)| {
                    let merged = match global_map.get(key) {
                        Some(global_value) => {
                            deep_merge_metadata(global_value, value, remaining - 1)
                        }
                        None => value.clone(),
                    };
                    (key.clone(), merged)
                })
                .collect();
            Value::Object(merged)
        }
        _ => merge_values(global, method),
    }
}

/// Base combination rule for two values from different scopes.
///
/// Sequences concatenate global-then-method, preserving order, never
/// de-duplicating. Mappings shallow-merge with method values winning on key
/// collision. Anything else resolves to the method value.
pub fn merge_values(global: &Value, method: &Value) -> Value {
    match (shape(global), shape(method)) {
        (Shape::Sequence(global_items), Shape::Sequence(method_items)) => {
            Value::Array(global_items.iter().chain(method_items).cloned().collect())
        }
        (Shape::Mapping(global_map), Shape::Mapping(method_map)) => {
            let mut merged = global_map.clone();
            for (key, value) in method_map {
                merged.insert(key.clone(), value.clone());
            }
            Value::Object(merged)
        }
        _ => method.clone(),
    }
}
