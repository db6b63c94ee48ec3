//! Named data-model schemas and their registry.
//!
//! The registry accumulates every model referenced during one generation run.
//! It is owned by the run and written additively: entries are only ever added,
//! and re-registering a name is a no-op.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Structural description of a data model, in OpenAPI schema form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, integer, object, array, ...)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Properties for object types, in declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Property>>,
    /// Required property names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Enum values for enum types
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Reference to another registry entry
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Format for primitive types (e.g., "int32", "int64", "float", "double")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Schema {
    /// An object schema with no properties yet
    pub fn object() -> Self {
        Self {
            schema_type: Some("object".to_string()),
            ..Self::empty()
        }
    }

    /// A primitive schema of the given type
    pub fn primitive(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Self::empty()
        }
    }

    /// A `$ref` to another registry entry by model name
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("#/components/schemas/{}", name)),
            ..Self::empty()
        }
    }

    fn empty() -> Self {
        Self {
            schema_type: None,
            properties: None,
            required: None,
            items: None,
            enum_values: None,
            reference: None,
            format: None,
        }
    }
}

/// Property definition for object schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// The type of the property
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// Reference to another registry entry
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Items schema for array properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Format for primitive types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Property {
    /// A primitive property of the given type
    pub fn primitive(property_type: &str) -> Self {
        Self {
            property_type: Some(property_type.to_string()),
            reference: None,
            items: None,
            format: None,
        }
    }

    /// A `$ref` property pointing at another registry entry by model name
    pub fn reference(name: &str) -> Self {
        Self {
            property_type: None,
            reference: Some(format!("#/components/schemas/{}", name)),
            items: None,
            format: None,
        }
    }
}

/// A named data model as the host registers it: name plus structural schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Registry key; globally unique within one generation run
    pub name: String,
    /// Structural description of the model
    pub schema: Schema,
}

impl ModelDescriptor {
    /// Create a model descriptor
    pub fn new(name: &str, schema: Schema) -> Self {
        Self {
            name: name.to_string(),
            schema,
        }
    }
}

/// Accumulator of named schemas for one generation run.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, Schema>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model by name.
    ///
    /// Registering a name that is already present leaves the first entry in
    /// place; collisions are not detected or rejected.
    pub fn register(&mut self, model: &ModelDescriptor) {
        if self.schemas.contains_key(&model.name) {
            debug!("Schema for {} already registered", model.name);
            return;
        }
        self.schemas.insert(model.name.clone(), model.schema.clone());
    }

    /// Whether a model name has been registered
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// All registered schemas, in registration order
    pub fn schemas(&self) -> &IndexMap<String, Schema> {
        &self.schemas
    }

    /// Consume the registry, yielding the schema map
    pub fn into_schemas(self) -> IndexMap<String, Schema> {
        self.schemas
    }
}
