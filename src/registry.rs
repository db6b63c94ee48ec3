//! Host application registry.
//!
//! The document generator does not reflect over live objects. Instead the host
//! registers an explicit graph at startup: modules own controllers, controllers
//! own route-handler descriptors, and every node carries its own [`Metadata`]
//! bag. Inherited handlers are simply listed by the host in declaration order;
//! the assembler suppresses duplicate names first-wins.

use crate::metadata::Metadata;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// HTTP methods a route handler can be documented with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
    /// HTTP OPTIONS method
    Options,
    /// HTTP HEAD method
    Head,
}

impl HttpMethod {
    /// Lowercase wire form used in metadata values and the output document
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }
}

/// One route-handler descriptor: a named controller method and its annotations.
#[derive(Debug, Clone, Default)]
pub struct RouteHandler {
    /// Method name, used for operation-id derivation and duplicate suppression
    pub name: String,
    /// Annotations attached to the method
    pub metadata: Metadata,
}

impl RouteHandler {
    /// Create a handler descriptor
    pub fn new(name: &str, metadata: Metadata) -> Self {
        Self {
            name: name.to_string(),
            metadata,
        }
    }
}

/// One controller: a named class-like unit owning route handlers.
#[derive(Debug, Clone, Default)]
pub struct ControllerRecord {
    /// Controller name, used for operation-id derivation
    pub name: String,
    /// Annotations attached to the controller itself
    pub metadata: Metadata,
    /// Route handlers in declaration order, inherited ones included
    pub handlers: Vec<RouteHandler>,
}

impl ControllerRecord {
    /// Create a controller descriptor
    pub fn new(name: &str, metadata: Metadata) -> Self {
        Self {
            name: name.to_string(),
            metadata,
            handlers: Vec::new(),
        }
    }

    /// Append a route handler, consuming and returning the record
    pub fn with_handler(mut self, handler: RouteHandler) -> Self {
        self.handlers.push(handler);
        self
    }
}

/// One module: a named unit owning controllers and referencing related modules.
#[derive(Debug, Clone, Default)]
pub struct ModuleRecord {
    /// Module identity within the graph
    pub name: String,
    /// Annotations attached to the module (notably its mount path)
    pub metadata: Metadata,
    /// Controllers owned by this module
    pub controllers: Vec<ControllerRecord>,
    /// Names of related modules, resolved through the graph during deep scans
    pub related: Vec<String>,
    /// Globally-scoped modules are skipped by deep scans
    pub is_global: bool,
}

impl ModuleRecord {
    /// Create a module descriptor
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Replace the module metadata, consuming and returning the record
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Append a controller, consuming and returning the record
    pub fn with_controller(mut self, controller: ControllerRecord) -> Self {
        self.controllers.push(controller);
        self
    }

    /// Reference a related module by name, consuming and returning the record
    pub fn with_related(mut self, name: &str) -> Self {
        self.related.push(name.to_string());
        self
    }

    /// Mark the module as globally scoped
    pub fn global(mut self) -> Self {
        self.is_global = true;
        self
    }
}

/// The module graph handed over by the host application.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: IndexMap<String, ModuleRecord>,
}

impl ModuleGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module, consuming and returning the graph
    pub fn with_module(mut self, module: ModuleRecord) -> Self {
        self.insert(module);
        self
    }

    /// Register a module, replacing any previous one with the same name
    pub fn insert(&mut self, module: ModuleRecord) {
        self.modules.insert(module.name.clone(), module);
    }

    /// Look up a module by name
    pub fn get(&self, name: &str) -> Option<&ModuleRecord> {
        self.modules.get(name)
    }

    /// All modules in registration order
    pub fn modules(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_wire_form() {
        assert_eq!(HttpMethod::Get.as_str(), "get");
        assert_eq!(HttpMethod::Delete.as_str(), "delete");
        assert_eq!(serde_json::to_value(HttpMethod::Patch).unwrap(), json!("patch"));
    }

    #[test]
    fn test_graph_preserves_registration_order() {
        let graph = ModuleGraph::new()
            .with_module(ModuleRecord::new("cats"))
            .with_module(ModuleRecord::new("dogs"));

        let names: Vec<&str> = graph.modules().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["cats", "dogs"]);
    }

    #[test]
    fn test_graph_lookup_by_name() {
        let graph = ModuleGraph::new().with_module(
            ModuleRecord::new("cats")
                .with_controller(ControllerRecord::new("CatsController", Metadata::new())),
        );

        let module = graph.get("cats").unwrap();
        assert_eq!(module.controllers.len(), 1);
        assert!(graph.get("dogs").is_none());
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut graph = ModuleGraph::new();
        graph.insert(ModuleRecord::new("cats"));
        graph.insert(ModuleRecord::new("cats").global());

        assert_eq!(graph.modules().count(), 1);
        assert!(graph.get("cats").unwrap().is_global);
    }
}
