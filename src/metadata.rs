//! Per-declaration metadata store.
//!
//! Every module, controller, and route handler registered with this library
//! carries a [`Metadata`] bag: an ordered mapping from well-known keys to JSON
//! values, populated by the host application at registration time. The library
//! only ever reads it; how the host fills it in (macros, builders, hand-written
//! registration code) is opaque to the document generator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Route path of a handler or controller (string or array of strings)
pub const PATH_KEY: &str = "path";
/// HTTP verb of a handler (lowercase string)
pub const METHOD_KEY: &str = "method";
/// API version of a handler or controller (string or array of strings)
pub const VERSION_KEY: &str = "version";
/// Filesystem-style mount path of a module
pub const MODULE_PATH_KEY: &str = "modulePath";

/// Operation-level descriptive fields (summary, description, deprecated, ...)
pub const API_OPERATION_KEY: &str = "openapi/operation";
/// Parameter list of a handler (array of parameter objects)
pub const API_PARAMETERS_KEY: &str = "openapi/parameters";
/// Response descriptors keyed by status code or "default"
pub const API_RESPONSES_KEY: &str = "openapi/responses";
/// Security requirements (array)
pub const API_SECURITY_KEY: &str = "openapi/security";
/// Tags (array of strings)
pub const API_TAGS_KEY: &str = "openapi/tags";
/// Controller-wide header declarations (array of header objects)
pub const API_HEADERS_KEY: &str = "openapi/headers";
/// Extra data models to force-register (array of model descriptors)
pub const API_EXTRA_MODELS_KEY: &str = "openapi/extraModels";
/// Accepted request MIME types (array of strings)
pub const API_CONSUMES_KEY: &str = "openapi/consumes";
/// Vendor extension fields spread into the operation root (object)
pub const API_EXTENSION_KEY: &str = "openapi/extension";
/// Controller exclusion flag (`true` drops the whole controller)
pub const API_EXCLUDE_CONTROLLER_KEY: &str = "openapi/excludeController";
/// Endpoint exclusion flag (`{"disable": true}` drops the handler)
pub const API_EXCLUDE_ENDPOINT_KEY: &str = "openapi/excludeEndpoint";

/// Opaque key/value annotation bundle attached to one declaration.
///
/// Keys are the `*_KEY` constants of this module; values are arbitrary JSON
/// fragments. Insertion order is preserved so that repeated declarations are
/// seen in the order the host registered them.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    values: IndexMap<String, Value>,
}

impl Metadata {
    /// Create an empty metadata bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a value under a key, consuming and returning the bag
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.set(key, value);
        self
    }

    /// Attach a value under a key, replacing any previous value
    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    /// Read the value attached under a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Read a string value attached under a key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }
}

/// The location an operation parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Query string parameter (e.g., `?page=1`)
    Query,
    /// Path parameter embedded in the URL (e.g., `/cats/{id}`)
    Path,
    /// HTTP header parameter
    Header,
    /// Request body (migrated into `requestBody` during assembly)
    Body,
}

/// Typed payload for one entry of [`API_PARAMETERS_KEY`].
///
/// Hosts may also attach raw JSON under that key; this struct only exists so
/// registration code and tests do not hand-write the objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterObject {
    /// Parameter name; absent for body parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Where the parameter is read from
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the parameter is required
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Inline schema or `$ref` object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// Example values keyed by example name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Value>,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterObject {
    /// Serialize into the JSON value stored in a metadata bag
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("parameter object is always serializable")
    }
}

/// Typed payload for one entry of [`API_HEADERS_KEY`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderObject {
    /// Header name
    pub name: String,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the header is required
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Schema; defaults to `{"type": "string"}` during exploration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl HeaderObject {
    /// Serialize into the JSON value stored in a metadata bag
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("header object is always serializable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let mut metadata = Metadata::new();
        metadata.set(PATH_KEY, json!("cats"));

        assert_eq!(metadata.get(PATH_KEY), Some(&json!("cats")));
        assert_eq!(metadata.get_str(PATH_KEY), Some("cats"));
        assert!(metadata.get(METHOD_KEY).is_none());
    }

    #[test]
    fn test_with_chains_and_overwrites() {
        let metadata = Metadata::new()
            .with(PATH_KEY, json!("cats"))
            .with(METHOD_KEY, json!("get"))
            .with(PATH_KEY, json!("dogs"));

        assert_eq!(metadata.get_str(PATH_KEY), Some("dogs"));
        assert_eq!(metadata.get_str(METHOD_KEY), Some("get"));
    }

    #[test]
    fn test_parameter_object_serializes_location_as_in() {
        let param = ParameterObject {
            name: Some("id".to_string()),
            location: ParameterLocation::Path,
            required: Some(true),
            schema: Some(json!({"type": "string"})),
            examples: None,
            description: None,
        };

        let value = param.to_value();
        assert_eq!(value["in"], "path");
        assert_eq!(value["name"], "id");
        assert!(value.get("examples").is_none());
    }

    #[test]
    fn test_header_object_omits_absent_fields() {
        let header = HeaderObject {
            name: "X-Request-Id".to_string(),
            description: None,
            required: None,
            schema: None,
        };

        let value = header.to_value();
        assert_eq!(value, json!({"name": "X-Request-Id"}));
    }
}
