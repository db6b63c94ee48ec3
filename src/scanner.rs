//! Application-wide document scan.
//!
//! One scan is a single synchronous pass over the module graph the host hands
//! over at startup: enumerate modules, explore each controller, stream every
//! record into one flat list, and normalize it into the final document. Any
//! failure aborts the whole scan; there is no partial document.

use crate::assembler::{DenormalizedOperation, DocumentAssembler};
use crate::config::{ApplicationConfig, ScanOptions};
use crate::error::Result;
use crate::metadata::MODULE_PATH_KEY;
use crate::registry::{ControllerRecord, ModuleGraph, ModuleRecord};
use crate::route_path::strip_last_slash;
use crate::transformer::{Components, Document, DocumentTransformer};
use log::debug;

/// Scans a module graph into one OpenAPI-style document.
pub struct DocumentScanner {
    assembler: DocumentAssembler,
}

impl DocumentScanner {
    /// Create a scanner with a fresh schema registry
    pub fn new() -> Self {
        Self {
            assembler: DocumentAssembler::new(),
        }
    }

    /// Run one generation pass over the application's module graph.
    ///
    /// Modules outside the `include` list are skipped entirely. With
    /// `deep_scan_routes`, the routes of each module's related, non-global
    /// modules are explored before the module's own controllers.
    pub fn scan_application(
        &mut self,
        graph: &ModuleGraph,
        config: &ApplicationConfig,
        options: ScanOptions,
    ) -> Result<Document> {
        let ScanOptions {
            deep_scan_routes,
            include,
            extra_models,
            ignore_global_prefix,
            operation_id_factory,
        } = options;

        if let Some(factory) = operation_id_factory {
            self.assembler.set_operation_id_factory(factory);
        }
        let global_prefix = if ignore_global_prefix {
            String::new()
        } else {
            strip_last_slash(config.global_prefix()).to_string()
        };

        let mut denormalized: Vec<DenormalizedOperation> = Vec::new();
        for module in graph
            .modules()
            .filter(|module| include.is_empty() || include.contains(&module.name))
        {
            debug!("Scanning module: {}", module.name);
            if deep_scan_routes {
                for related_name in &module.related {
                    let related = match graph.get(related_name) {
                        Some(related) => related,
                        None => {
                            debug!("Related module {} is not registered, skipping", related_name);
                            continue;
                        }
                    };
                    if related.is_global {
                        continue;
                    }
                    denormalized.extend(self.scan_module_routes(
                        &related.controllers,
                        module_path_of(related),
                        &global_prefix,
                        config,
                    )?);
                }
            }
            denormalized.extend(self.scan_module_routes(
                &module.controllers,
                module_path_of(module),
                &global_prefix,
                config,
            )?);
        }

        for model in &extra_models {
            self.assembler.schemas_mut().register(model);
        }

        Ok(Document {
            paths: DocumentTransformer::normalize_paths(denormalized),
            components: Components {
                schemas: self.assembler.schemas().schemas().clone(),
            },
        })
    }

    fn scan_module_routes(
        &mut self,
        controllers: &[ControllerRecord],
        module_path: Option<String>,
        global_prefix: &str,
        config: &ApplicationConfig,
    ) -> Result<Vec<DenormalizedOperation>> {
        let mut records = Vec::new();
        for controller in controllers {
            records.extend(self.assembler.explore_controller(
                controller,
                config,
                module_path.as_deref(),
                global_prefix,
            )?);
        }
        Ok(records)
    }
}

impl Default for DocumentScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn module_path_of(module: &ModuleRecord) -> Option<String> {
    module
        .metadata
        .get_str(MODULE_PATH_KEY)
        .map(str::to_string)
}
