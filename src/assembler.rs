//! Per-controller document assembly.
//!
//! For one controller, the assembler runs every field explorer over every
//! route handler, merges the results against the controller-scope metadata,
//! migrates body parameters into request bodies, and yields one denormalized
//! operation record per documented route. Extra models encountered along the
//! way are registered into the schema registry the assembler owns.

use crate::config::{ApplicationConfig, OperationIdFactory};
use crate::error::Result;
use crate::explorers::{
    explore_api_exclude_controller_metadata, explore_api_exclude_endpoint_metadata,
    explore_api_extra_models_metadata, explore_api_operation_metadata,
    explore_api_parameters_metadata, explore_api_response_metadata,
    explore_api_security_metadata, explore_api_tags_metadata,
    explore_global_api_header_metadata, explore_global_api_response_metadata,
    explore_global_api_security_metadata, explore_global_api_tags_metadata,
    explore_route_path_and_method, GlobalFragment,
};
use crate::merge::{merge_metadata, Chunk, GlobalMetadata};
use crate::metadata::{Metadata, API_CONSUMES_KEY};
use crate::registry::{ControllerRecord, RouteHandler};
use crate::route_path::RoutePathFactory;
use crate::schema::SchemaRegistry;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// One explored route before path normalization.
///
/// Keys are the metadata groups: `root` (path, method, operation id,
/// parameters, request body, extensions), `security`, `tags`, and `responses`.
pub type DenormalizedOperation = Map<String, Value>;

/// Assembles operation records for one controller at a time.
pub struct DocumentAssembler {
    schemas: SchemaRegistry,
    operation_id_factory: OperationIdFactory,
}

impl DocumentAssembler {
    /// Create an assembler with the default operation-id derivation
    pub fn new() -> Self {
        Self {
            schemas: SchemaRegistry::new(),
            operation_id_factory: Box::new(default_operation_id),
        }
    }

    /// Replace the operation-id derivation, consuming and returning the assembler
    pub fn with_operation_id_factory(mut self, factory: OperationIdFactory) -> Self {
        self.operation_id_factory = factory;
        self
    }

    /// Replace the operation-id derivation in place
    pub fn set_operation_id_factory(&mut self, factory: OperationIdFactory) {
        self.operation_id_factory = factory;
    }

    /// Schemas registered so far in this run
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Mutable access to the schema registry, for force-registered models
    pub fn schemas_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.schemas
    }

    /// Consume the assembler, yielding the schema registry
    pub fn into_schemas(self) -> SchemaRegistry {
        self.schemas
    }

    /// Explore one controller into denormalized operation records.
    ///
    /// Handlers without a route path annotation are silently dropped, as are
    /// excluded handlers; an excluded controller yields no records at all.
    pub fn explore_controller(
        &mut self,
        controller: &ControllerRecord,
        config: &ApplicationConfig,
        module_path: Option<&str>,
        global_prefix: &str,
    ) -> Result<Vec<DenormalizedOperation>> {
        if explore_api_exclude_controller_metadata(controller) {
            debug!("Controller {} is excluded, skipping", controller.name);
            return Ok(Vec::new());
        }
        debug!("Exploring controller: {}", controller.name);

        let global_metadata = explore_global_metadata(controller);
        for model in explore_api_extra_models_metadata(&controller.metadata)? {
            self.schemas.register(&model);
        }
        let route_paths = RoutePathFactory::new(config);

        let mut records = Vec::new();
        let mut seen = HashSet::new();
        for handler in &controller.handlers {
            if !seen.insert(handler.name.as_str()) {
                continue;
            }
            if explore_api_exclude_endpoint_metadata(handler) {
                debug!("Endpoint {} is excluded, skipping", handler.name);
                continue;
            }
            for model in explore_api_extra_models_metadata(&handler.metadata)? {
                self.schemas.register(&model);
            }

            let method_metadata = self.explore_method_metadata(
                controller,
                handler,
                &route_paths,
                module_path,
                global_prefix,
                config,
            )?;
            let merged = merge_metadata(&global_metadata, method_metadata);

            let mut record = DenormalizedOperation::new();
            record.insert("responses".to_string(), Value::Object(Map::new()));
            for (key, value) in &global_metadata.fields {
                record.insert(key.clone(), value.clone());
            }
            for (key, value) in merged {
                record.insert(key, value);
            }
            migrate_operation_schema(&mut record, controller, handler);
            records.push(record);
        }

        records.retain(has_route_path);
        Ok(records)
    }

    /// Run the method-scope explorer groups and fold each into one fragment.
    fn explore_method_metadata(
        &self,
        controller: &ControllerRecord,
        handler: &RouteHandler,
        route_paths: &RoutePathFactory,
        module_path: Option<&str>,
        global_prefix: &str,
        config: &ApplicationConfig,
    ) -> Result<Map<String, Value>> {
        let root = fold_group(vec![
            explore_route_path_and_method(
                controller,
                handler,
                route_paths,
                self.operation_id_factory.as_ref(),
                global_prefix,
                module_path,
                config,
            )?,
            explore_api_operation_metadata(handler),
            explore_api_parameters_metadata(handler),
        ]);
        let security = fold_group(vec![explore_api_security_metadata(handler)]);
        let tags = fold_group(vec![explore_api_tags_metadata(handler)]);
        let responses = fold_group(vec![explore_api_response_metadata(handler)]);

        let mut method_metadata = Map::new();
        let groups = [
            ("root", root),
            ("security", security),
            ("tags", tags),
            ("responses", responses),
        ];
        for (key, group) in groups {
            if !group_is_empty(&group) {
                method_metadata.insert(key.to_string(), group);
            }
        }
        Ok(method_metadata)
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Default operation identifier: `{controller}_{method}`, or the bare method
/// name when the controller name is empty.
fn default_operation_id(controller_key: &str, method_key: &str) -> String {
    if controller_key.is_empty() {
        method_key.to_string()
    } else {
        format!("{}_{}", controller_key, method_key)
    }
}

/// Fold controller-scope explorer results into one [`GlobalMetadata`].
///
/// Depth-less fragments merge directly, later explorers winning on key
/// collision; depth-hinted fragments are appended to the chunk list instead.
fn explore_global_metadata(controller: &ControllerRecord) -> GlobalMetadata {
    type GlobalExplorer = fn(&ControllerRecord) -> Option<GlobalFragment>;
    let global_explorers: [GlobalExplorer; 4] = [
        explore_global_api_tags_metadata,
        explore_global_api_security_metadata,
        explore_global_api_response_metadata,
        explore_global_api_header_metadata,
    ];

    let mut global = GlobalMetadata::default();
    for explored in global_explorers
        .iter()
        .filter_map(|explorer| explorer(controller))
    {
        match explored.depth {
            Some(depth) => global.chunks.push(Chunk {
                fragment: explored.fragment,
                depth,
            }),
            None => {
                for (key, value) in explored.fragment {
                    global.fields.insert(key, value);
                }
            }
        }
    }
    global
}

/// Fold one explorer group's results into a single fragment.
///
/// Absent results contribute nothing. Arrays concatenate onto an array
/// accumulator and replace anything else; objects merge onto an object
/// accumulator with later results winning.
fn fold_group(results: Vec<Option<Value>>) -> Value {
    let mut accumulated = Value::Object(Map::new());
    for explored in results.into_iter().flatten() {
        accumulated = match (accumulated, explored) {
            (Value::Array(mut existing), Value::Array(items)) => {
                existing.extend(items);
                Value::Array(existing)
            }
            (_, Value::Array(items)) => Value::Array(items),
            (Value::Object(mut existing), Value::Object(map)) => {
                for (key, value) in map {
                    existing.insert(key, value);
                }
                Value::Object(existing)
            }
            (_, explored) => explored,
        };
    }
    accumulated
}

fn group_is_empty(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Null => true,
        _ => false,
    }
}

fn has_route_path(record: &DenormalizedOperation) -> bool {
    record
        .get("root")
        .and_then(|root| root.get("path"))
        .and_then(Value::as_str)
        .map_or(false, |path| !path.is_empty())
}

/// Move a body-location parameter into the operation's request body.
///
/// The first `in: "body"` parameter is removed from the parameter list; its
/// schema and examples are wrapped under a per-MIME-type content map built
/// from the union of class-level and method-level consumes annotations,
/// defaulting to `application/json`.
fn migrate_operation_schema(
    record: &mut DenormalizedOperation,
    controller: &ControllerRecord,
    handler: &RouteHandler,
) {
    let root = match record.get_mut("root") {
        Some(Value::Object(root)) => root,
        _ => return,
    };
    let parameters = match root.get_mut("parameters") {
        Some(Value::Array(parameters)) => parameters,
        _ => return,
    };
    let body_index = match parameters.iter().position(is_body_parameter) {
        Some(index) => index,
        None => return,
    };
    let body = match parameters.remove(body_index) {
        Value::Object(body) => body,
        _ => return,
    };

    let mut consumes = merge_and_uniq(
        read_consumes(&controller.metadata),
        read_consumes(&handler.metadata),
    );
    if consumes.is_empty() {
        consumes.push("application/json".to_string());
    }

    let mut request_body = Map::new();
    for (key, value) in &body {
        if !matches!(key.as_str(), "schema" | "in" | "name" | "examples") {
            request_body.insert(key.clone(), value.clone());
        }
    }
    let mut media = Map::new();
    for key in ["schema", "examples"] {
        if let Some(value) = body.get(key) {
            media.insert(key.to_string(), value.clone());
        }
    }
    let mut content = Map::new();
    for mime in consumes {
        content.insert(mime, Value::Object(media.clone()));
    }
    request_body.insert("content".to_string(), Value::Object(content));
    root.insert("requestBody".to_string(), Value::Object(request_body));
}

fn is_body_parameter(parameter: &Value) -> bool {
    parameter.get("in").and_then(Value::as_str) == Some("body")
}

fn read_consumes(metadata: &Metadata) -> Vec<String> {
    match metadata.get(API_CONSUMES_KEY) {
        Some(Value::String(mime)) => vec![mime.clone()],
        Some(Value::Array(mimes)) => mimes
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Union of two MIME-type lists, de-duplicated, order preserved.
fn merge_and_uniq(first: Vec<String>, second: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|mime| seen.insert(mime.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        API_EXCLUDE_CONTROLLER_KEY, API_EXCLUDE_ENDPOINT_KEY, API_EXTRA_MODELS_KEY,
        API_HEADERS_KEY, API_OPERATION_KEY, API_PARAMETERS_KEY, API_RESPONSES_KEY,
        API_SECURITY_KEY, API_TAGS_KEY, METHOD_KEY, PATH_KEY,
    };
    use crate::schema::{ModelDescriptor, Schema};
    use serde_json::json;

    fn get_handler(name: &str, path: &str) -> RouteHandler {
        RouteHandler::new(
            name,
            Metadata::new()
                .with(PATH_KEY, json!(path))
                .with(METHOD_KEY, json!("get")),
        )
    }

    fn explore(
        assembler: &mut DocumentAssembler,
        controller: &ControllerRecord,
    ) -> Vec<DenormalizedOperation> {
        assembler
            .explore_controller(controller, &ApplicationConfig::new(), None, "")
            .unwrap()
    }

    #[test]
    fn test_default_operation_id() {
        assert_eq!(default_operation_id("CatsController", "findOne"), "CatsController_findOne");
        assert_eq!(default_operation_id("", "findOne"), "findOne");
    }

    #[test]
    fn test_operation_id_factory_override() {
        let controller = ControllerRecord::new("CatsController", Metadata::new())
            .with_handler(get_handler("findAll", "cats"));

        let mut assembler = DocumentAssembler::new().with_operation_id_factory(Box::new(
            |controller_key, method_key| format!("{}.{}", controller_key, method_key),
        ));
        let records = explore(&mut assembler, &controller);

        assert_eq!(records[0]["root"]["operationId"], json!("CatsController.findAll"));
    }

    #[test]
    fn test_excluded_controller_yields_nothing() {
        let controller = ControllerRecord::new(
            "InternalController",
            Metadata::new().with(API_EXCLUDE_CONTROLLER_KEY, json!(true)),
        )
        .with_handler(get_handler("findAll", "internal"));

        let records = explore(&mut DocumentAssembler::new(), &controller);
        assert!(records.is_empty());
    }

    #[test]
    fn test_excluded_endpoint_yields_no_record() {
        let mut handler = get_handler("hidden", "hidden");
        handler
            .metadata
            .set(API_EXCLUDE_ENDPOINT_KEY, json!({"disable": true}));
        let controller = ControllerRecord::new("CatsController", Metadata::new())
            .with_handler(handler)
            .with_handler(get_handler("findAll", "cats"));

        let records = explore(&mut DocumentAssembler::new(), &controller);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["root"]["path"], json!("/cats"));
    }

    #[test]
    fn test_handler_without_path_is_dropped() {
        let annotated_only = RouteHandler::new(
            "helper",
            Metadata::new().with(API_OPERATION_KEY, json!({"summary": "not a route"})),
        );
        let controller = ControllerRecord::new("CatsController", Metadata::new())
            .with_handler(annotated_only)
            .with_handler(get_handler("findAll", "cats"));

        let records = explore(&mut DocumentAssembler::new(), &controller);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["root"]["operationId"], json!("CatsController_findAll"));
    }

    #[test]
    fn test_duplicate_handler_names_suppressed_first_wins() {
        let controller = ControllerRecord::new("CatsController", Metadata::new())
            .with_handler(get_handler("findAll", "cats"))
            .with_handler(get_handler("findAll", "felines"));

        let records = explore(&mut DocumentAssembler::new(), &controller);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["root"]["path"], json!("/cats"));
    }

    #[test]
    fn test_parameters_default_to_empty_list() {
        let controller = ControllerRecord::new("CatsController", Metadata::new())
            .with_handler(get_handler("findAll", "cats"));

        let records = explore(&mut DocumentAssembler::new(), &controller);
        assert_eq!(records[0]["root"]["parameters"], json!([]));
        assert_eq!(records[0]["responses"], json!({}));
    }

    #[test]
    fn test_controller_tags_concatenate_with_method_tags() {
        let mut handler = get_handler("findAll", "cats");
        handler.metadata.set(API_TAGS_KEY, json!(["list"]));
        let controller = ControllerRecord::new(
            "CatsController",
            Metadata::new().with(API_TAGS_KEY, json!(["cats"])),
        )
        .with_handler(handler);

        let records = explore(&mut DocumentAssembler::new(), &controller);
        assert_eq!(records[0]["tags"], json!(["cats", "list"]));
    }

    #[test]
    fn test_controller_metadata_applies_without_method_counterpart() {
        let controller = ControllerRecord::new(
            "CatsController",
            Metadata::new()
                .with(API_TAGS_KEY, json!(["cats"]))
                .with(API_SECURITY_KEY, json!([{"bearer": []}])),
        )
        .with_handler(get_handler("findAll", "cats"));

        let records = explore(&mut DocumentAssembler::new(), &controller);
        assert_eq!(records[0]["tags"], json!(["cats"]));
        assert_eq!(records[0]["security"], json!([{"bearer": []}]));
    }

    #[test]
    fn test_method_responses_override_controller_responses() {
        let mut handler = get_handler("findAll", "cats");
        handler.metadata.set(
            API_RESPONSES_KEY,
            json!({"200": {"description": "ok"}, "403": {"description": "forbidden"}}),
        );
        let controller = ControllerRecord::new(
            "CatsController",
            Metadata::new().with(
                API_RESPONSES_KEY,
                json!({"403": {"description": "controller forbidden"}, "500": {"description": "boom"}}),
            ),
        )
        .with_handler(handler);

        let records = explore(&mut DocumentAssembler::new(), &controller);
        assert_eq!(
            records[0]["responses"],
            json!({
                "403": {"description": "forbidden"},
                "500": {"description": "boom"},
                "200": {"description": "ok"}
            })
        );
    }

    #[test]
    fn test_controller_headers_prepend_to_method_parameters() {
        let mut handler = get_handler("findOne", ":id");
        handler.metadata.set(
            API_PARAMETERS_KEY,
            json!([{"name": "id", "in": "path", "required": true}]),
        );
        let controller = ControllerRecord::new(
            "CatsController",
            Metadata::new().with(API_HEADERS_KEY, json!([{"name": "X-Tenant"}])),
        )
        .with_handler(handler);

        let records = explore(&mut DocumentAssembler::new(), &controller);
        let parameters = records[0]["root"]["parameters"].as_array().unwrap();
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0]["name"], json!("X-Tenant"));
        assert_eq!(parameters[0]["in"], json!("header"));
        assert_eq!(parameters[1]["name"], json!("id"));
    }

    #[test]
    fn test_body_parameter_migrates_into_request_body() {
        let mut handler = get_handler("create", "cats");
        handler.metadata.set(METHOD_KEY, json!("post"));
        handler.metadata.set(
            API_PARAMETERS_KEY,
            json!([
                {"in": "body", "required": true, "schema": {"$ref": "#/components/schemas/Cat"},
                 "examples": {"siamese": {"value": {"name": "Mia"}}}},
                {"name": "q", "in": "query"}
            ]),
        );
        let controller =
            ControllerRecord::new("CatsController", Metadata::new()).with_handler(handler);

        let records = explore(&mut DocumentAssembler::new(), &controller);
        let root = &records[0]["root"];

        assert_eq!(root["parameters"], json!([{"name": "q", "in": "query"}]));
        assert_eq!(
            root["requestBody"],
            json!({
                "required": true,
                "content": {
                    "application/json": {
                        "schema": {"$ref": "#/components/schemas/Cat"},
                        "examples": {"siamese": {"value": {"name": "Mia"}}}
                    }
                }
            })
        );
    }

    #[test]
    fn test_consumes_union_spans_class_and_method() {
        let mut handler = get_handler("create", "cats");
        handler.metadata.set(METHOD_KEY, json!("post"));
        handler
            .metadata
            .set(API_CONSUMES_KEY, json!(["application/json", "text/csv"]));
        handler
            .metadata
            .set(API_PARAMETERS_KEY, json!([{"in": "body", "schema": {"type": "string"}}]));
        let controller = ControllerRecord::new(
            "CatsController",
            Metadata::new().with(API_CONSUMES_KEY, json!(["application/json"])),
        )
        .with_handler(handler);

        let records = explore(&mut DocumentAssembler::new(), &controller);
        let content = records[0]["root"]["requestBody"]["content"]
            .as_object()
            .unwrap();
        let mimes: Vec<&String> = content.keys().collect();
        assert_eq!(mimes, vec!["application/json", "text/csv"]);
    }

    #[test]
    fn test_no_body_parameter_no_request_body() {
        let controller = ControllerRecord::new("CatsController", Metadata::new())
            .with_handler(get_handler("findAll", "cats"));

        let records = explore(&mut DocumentAssembler::new(), &controller);
        assert!(records[0]["root"].get("requestBody").is_none());
    }

    #[test]
    fn test_extra_models_register_from_both_scopes() {
        let mut handler = get_handler("findAll", "cats");
        handler.metadata.set(
            API_EXTRA_MODELS_KEY,
            serde_json::to_value(vec![ModelDescriptor::new("Toy", Schema::object())]).unwrap(),
        );
        let controller = ControllerRecord::new(
            "CatsController",
            Metadata::new().with(
                API_EXTRA_MODELS_KEY,
                serde_json::to_value(vec![ModelDescriptor::new("Cat", Schema::object())]).unwrap(),
            ),
        )
        .with_handler(handler);

        let mut assembler = DocumentAssembler::new();
        explore(&mut assembler, &controller);

        assert!(assembler.schemas().contains("Cat"));
        assert!(assembler.schemas().contains("Toy"));
    }

    #[test]
    fn test_merge_and_uniq_preserves_first_occurrence() {
        let merged = merge_and_uniq(
            vec!["application/json".to_string(), "text/csv".to_string()],
            vec!["text/csv".to_string(), "application/xml".to_string()],
        );
        assert_eq!(merged, vec!["application/json", "text/csv", "application/xml"]);
    }

    #[test]
    fn test_fold_group_array_and_object_rules() {
        let folded = fold_group(vec![
            Some(json!(["a"])),
            None,
            Some(json!(["b"])),
        ]);
        assert_eq!(folded, json!(["a", "b"]));

        let folded = fold_group(vec![
            Some(json!({"summary": "first", "deprecated": true})),
            Some(json!({"summary": "second"})),
        ]);
        assert_eq!(folded, json!({"summary": "second", "deprecated": true}));

        assert!(group_is_empty(&fold_group(vec![None, None])));
    }
}
