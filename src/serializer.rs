//! Serialization helpers for the generated document.
//!
//! The scan itself never serializes anything; rendering is the host's
//! business. These helpers cover the common case of dumping the document to a
//! string or a file for tooling to pick up.

use crate::transformer::Document;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serialize a generated document to YAML.
pub fn serialize_yaml(document: &Document) -> Result<String> {
    debug!("Serializing document to YAML");
    serde_yaml::to_string(document).context("Failed to serialize document to YAML")
}

/// Serialize a generated document to pretty-printed JSON.
pub fn serialize_json(document: &Document) -> Result<String> {
    debug!("Serializing document to JSON");
    serde_json::to_string_pretty(document).context("Failed to serialize document to JSON")
}

/// Write serialized content to a file, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing document to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::{Components, DocumentTransformer};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn test_document() -> Document {
        let record = match json!({
            "responses": {"200": {"description": "ok"}},
            "root": {"method": "get", "path": "/cats", "operationId": "CatsController_findAll",
                     "parameters": []}
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        Document {
            paths: DocumentTransformer::normalize_paths(vec![record]),
            components: Components::default(),
        }
    }

    #[test]
    fn test_serialize_yaml_structure() {
        let yaml = serialize_yaml(&test_document()).unwrap();

        assert!(yaml.contains("paths:"));
        assert!(yaml.contains("/cats:"));
        assert!(yaml.contains("get:"));
        assert!(yaml.contains("operationId: CatsController_findAll"));
        assert!(yaml.contains("components:"));
    }

    #[test]
    fn test_serialize_json_structure() {
        let json = serialize_json(&test_document()).unwrap();

        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["paths"]["/cats"]["get"].is_object());
        assert_eq!(
            parsed["paths"]["/cats"]["get"]["operationId"],
            json!("CatsController_findAll")
        );
        // Pretty printing spreads the document over multiple lines.
        assert!(json.lines().count() > 5);
    }

    #[test]
    fn test_document_roundtrips_through_json() {
        let document = test_document();
        let json = serialize_json(&document).unwrap();
        let deserialized: Document = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.paths.len(), document.paths.len());
        assert!(deserialized.paths.contains_key("/cats"));
    }

    #[test]
    fn test_document_roundtrips_through_yaml() {
        let document = test_document();
        let yaml = serialize_yaml(&document).unwrap();
        let deserialized: Document = serde_yaml::from_str(&yaml).unwrap();

        assert!(deserialized.paths.contains_key("/cats"));
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out").join("openapi.json");

        let json = serialize_json(&test_document()).unwrap();
        write_to_file(&json, &file_path).unwrap();

        let content = std::fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, json);
    }
}
