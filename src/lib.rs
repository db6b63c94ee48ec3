//! OpenAPI document generation from registered controller metadata.
//!
//! This library builds an OpenAPI 3.0-style document by walking an in-memory
//! registry of application components at startup. The host registers its
//! modules, controllers, and route handlers as explicit descriptors, each
//! carrying an opaque key/value annotation bundle; the library discovers the
//! annotations, reconciles them across the application, controller, and method
//! scopes, and synthesizes one normalized operation per documented route.
//!
//! # Architecture
//!
//! The modules work together as a pipeline:
//!
//! 1. [`metadata`] - Per-declaration annotation store and well-known keys
//! 2. [`registry`] - Module/controller/handler descriptors handed over by the host
//! 3. [`config`] - Application routing configuration and scan options
//! 4. [`route_path`] - Route path combination and `{param}` normalization
//! 5. [`explorers`] - One pure exploration function per metadata concern
//! 6. [`merge`] - Depth-bounded, layered metadata merging across scopes
//! 7. [`schema`] - Named data-model schemas and their per-run registry
//! 8. [`assembler`] - Per-controller operation assembly and body migration
//! 9. [`transformer`] - Path-keyed normalization into the final document
//! 10. [`scanner`] - Application-wide scan orchestration
//! 11. [`serializer`] - YAML/JSON rendering helpers for the result
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_metadata::{
//!     config::{ApplicationConfig, ScanOptions},
//!     metadata::{Metadata, METHOD_KEY, PATH_KEY},
//!     registry::{ControllerRecord, ModuleGraph, ModuleRecord, RouteHandler},
//!     scanner::DocumentScanner,
//!     serializer::serialize_yaml,
//! };
//! use serde_json::json;
//!
//! // Register what would normally be derived from the host framework's
//! // dependency-injection container.
//! let controller = ControllerRecord::new(
//!     "CatsController",
//!     Metadata::new().with(PATH_KEY, json!("cats")),
//! )
//! .with_handler(RouteHandler::new(
//!     "findAll",
//!     Metadata::new()
//!         .with(PATH_KEY, json!("/"))
//!         .with(METHOD_KEY, json!("get")),
//! ));
//! let graph = ModuleGraph::new()
//!     .with_module(ModuleRecord::new("cats").with_controller(controller));
//!
//! // One synchronous pass produces the terminal document.
//! let config = ApplicationConfig::new().with_global_prefix("api");
//! let mut scanner = DocumentScanner::new();
//! let document = scanner
//!     .scan_application(&graph, &config, ScanOptions::default())
//!     .unwrap();
//!
//! let yaml = serialize_yaml(&document).unwrap();
//! println!("{}", yaml);
//! ```

pub mod metadata;
pub mod registry;
pub mod config;
pub mod route_path;
pub mod explorers;
pub mod merge;
pub mod schema;
pub mod assembler;
pub mod transformer;
pub mod scanner;
pub mod serializer;
pub mod error;
