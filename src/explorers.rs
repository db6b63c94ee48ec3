//! Field explorers.
//!
//! One pure function per metadata concern. Method-scope explorers return a
//! fragment object or array, or `None` when the declaration carries no
//! relevant annotation; absence contributes nothing and never overwrites a
//! merged value. Controller-scope explorers return a [`GlobalFragment`], which
//! the assembler folds directly or keeps aside as a depth-hinted chunk.

use crate::config::{ApplicationConfig, VersioningKind};
use crate::error::{Error, Result};
use crate::metadata::{
    Metadata, API_EXCLUDE_CONTROLLER_KEY, API_EXCLUDE_ENDPOINT_KEY, API_EXTENSION_KEY,
    API_EXTRA_MODELS_KEY, API_HEADERS_KEY, API_OPERATION_KEY, API_PARAMETERS_KEY,
    API_RESPONSES_KEY, API_SECURITY_KEY, API_TAGS_KEY, METHOD_KEY, PATH_KEY, VERSION_KEY,
};
use crate::registry::{ControllerRecord, RouteHandler};
use crate::route_path::{validate_route_path, RoutePathFactory, RoutePathMetadata};
use crate::schema::ModelDescriptor;
use serde_json::{Map, Value};

/// Merge depth of controller-wide header declarations: deep enough to reach
/// `root.parameters` and concatenate with the method's own parameter list.
const HEADER_CHUNK_DEPTH: usize = 4;

/// One controller-scope explorer result.
#[derive(Debug, Clone)]
pub struct GlobalFragment {
    /// Fragment keys contributed by the explorer
    pub fragment: Map<String, Value>,
    /// When present, the fragment becomes a chunk merged up to this depth
    pub depth: Option<usize>,
}

impl GlobalFragment {
    fn plain(fragment: Map<String, Value>) -> Self {
        Self {
            fragment,
            depth: None,
        }
    }
}

/// Resolve the route path, HTTP verb, and operation identifier of a handler.
///
/// Returns `None` when the method carries no path annotation, which excludes
/// it from the document entirely.
pub fn explore_route_path_and_method(
    controller: &ControllerRecord,
    handler: &RouteHandler,
    route_paths: &RoutePathFactory,
    operation_id_factory: &dyn Fn(&str, &str) -> String,
    global_prefix: &str,
    module_path: Option<&str>,
    config: &ApplicationConfig,
) -> Result<Option<Value>> {
    let method_path = match head_path(handler.metadata.get(PATH_KEY)) {
        Some(path) => path,
        None => return Ok(None),
    };
    let request_method = handler.metadata.get_str(METHOD_KEY).unwrap_or("get");

    let controller_version = match config.versioning() {
        Some(versioning) if versioning.kind == VersioningKind::Uri => {
            version_list(controller.metadata.get(VERSION_KEY))
        }
        _ => Vec::new(),
    };
    let all_route_paths = route_paths.create(&RoutePathMetadata {
        global_prefix: global_prefix.to_string(),
        module_path: module_path.map(str::to_string),
        ctrl_path: head_path(controller.metadata.get(PATH_KEY)),
        method_path,
        method_version: version_list(handler.metadata.get(VERSION_KEY)),
        controller_version,
    });
    let head = all_route_paths.first().map(String::as_str).unwrap_or("");
    let full_path = validate_route_path(head)?;

    let mut fragment = Map::new();
    fragment.insert("method".to_string(), Value::String(request_method.to_string()));
    let rendered = if full_path.is_empty() {
        "/".to_string()
    } else {
        full_path
    };
    fragment.insert("path".to_string(), Value::String(rendered));
    fragment.insert(
        "operationId".to_string(),
        Value::String(operation_id_factory(&controller.name, &handler.name)),
    );
    if let Some(Value::Object(extension)) = handler.metadata.get(API_EXTENSION_KEY) {
        for (key, value) in extension {
            fragment.insert(key.clone(), value.clone());
        }
    }
    Ok(Some(Value::Object(fragment)))
}

/// Operation-level descriptive fields of a handler (summary, description, ...)
pub fn explore_api_operation_metadata(handler: &RouteHandler) -> Option<Value> {
    handler.metadata.get(API_OPERATION_KEY).cloned()
}

/// Declared parameters of a handler, wrapped under the `parameters` key
pub fn explore_api_parameters_metadata(handler: &RouteHandler) -> Option<Value> {
    let parameters = handler.metadata.get(API_PARAMETERS_KEY)?;
    let mut fragment = Map::new();
    fragment.insert("parameters".to_string(), parameters.clone());
    Some(Value::Object(fragment))
}

/// Security requirements declared on a handler
pub fn explore_api_security_metadata(handler: &RouteHandler) -> Option<Value> {
    handler.metadata.get(API_SECURITY_KEY).cloned()
}

/// Tags declared on a handler
pub fn explore_api_tags_metadata(handler: &RouteHandler) -> Option<Value> {
    handler.metadata.get(API_TAGS_KEY).cloned()
}

/// Response descriptors declared on a handler, keyed by status code
pub fn explore_api_response_metadata(handler: &RouteHandler) -> Option<Value> {
    handler.metadata.get(API_RESPONSES_KEY).cloned()
}

/// Tags declared on the controller, applied to every handler
pub fn explore_global_api_tags_metadata(controller: &ControllerRecord) -> Option<GlobalFragment> {
    let tags = controller.metadata.get(API_TAGS_KEY)?;
    let mut fragment = Map::new();
    fragment.insert("tags".to_string(), tags.clone());
    Some(GlobalFragment::plain(fragment))
}

/// Security requirements declared on the controller
pub fn explore_global_api_security_metadata(
    controller: &ControllerRecord,
) -> Option<GlobalFragment> {
    let security = controller.metadata.get(API_SECURITY_KEY)?;
    let mut fragment = Map::new();
    fragment.insert("security".to_string(), security.clone());
    Some(GlobalFragment::plain(fragment))
}

/// Response descriptors declared on the controller
pub fn explore_global_api_response_metadata(
    controller: &ControllerRecord,
) -> Option<GlobalFragment> {
    let responses = controller.metadata.get(API_RESPONSES_KEY)?;
    let mut fragment = Map::new();
    fragment.insert("responses".to_string(), responses.clone());
    Some(GlobalFragment::plain(fragment))
}

/// Controller-wide header declarations, contributed as header parameters.
///
/// Returns a depth-hinted chunk so the headers concatenate with each handler's
/// own parameter list instead of replacing it.
pub fn explore_global_api_header_metadata(
    controller: &ControllerRecord,
) -> Option<GlobalFragment> {
    let headers = controller.metadata.get(API_HEADERS_KEY)?.as_array()?;
    let parameters: Vec<Value> = headers.iter().map(header_to_parameter).collect();

    let mut root = Map::new();
    root.insert("parameters".to_string(), Value::Array(parameters));
    let mut fragment = Map::new();
    fragment.insert("root".to_string(), Value::Object(root));
    Some(GlobalFragment {
        fragment,
        depth: Some(HEADER_CHUNK_DEPTH),
    })
}

fn header_to_parameter(header: &Value) -> Value {
    let mut parameter = match header {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    parameter.insert("in".to_string(), Value::String("header".to_string()));
    if !parameter.contains_key("schema") {
        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String("string".to_string()));
        parameter.insert("schema".to_string(), Value::Object(schema));
    }
    Value::Object(parameter)
}

/// Whether the whole controller is excluded from the document
pub fn explore_api_exclude_controller_metadata(controller: &ControllerRecord) -> bool {
    controller.metadata.get(API_EXCLUDE_CONTROLLER_KEY) == Some(&Value::Bool(true))
}

/// Whether one handler is excluded from the document
pub fn explore_api_exclude_endpoint_metadata(handler: &RouteHandler) -> bool {
    handler
        .metadata
        .get(API_EXCLUDE_ENDPOINT_KEY)
        .and_then(|value| value.get("disable"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Extra models to force-register, read from either scope's metadata bag.
///
/// A value of the wrong shape is a host programming error and aborts the scan.
pub fn explore_api_extra_models_metadata(metadata: &Metadata) -> Result<Vec<ModelDescriptor>> {
    match metadata.get(API_EXTRA_MODELS_KEY) {
        None => Ok(Vec::new()),
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|err| Error::InvalidMetadata {
                key: API_EXTRA_MODELS_KEY.to_string(),
                message: err.to_string(),
            })
        }
    }
}

fn head_path(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(path) => Some(path.clone()),
        Value::Array(paths) => paths.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn version_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(version)) => vec![version.clone()],
        Some(Value::Array(versions)) => versions
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
