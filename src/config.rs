//! Host configuration consumed by the document generator.

use crate::schema::ModelDescriptor;

/// Produces the final operation identifier from controller and method names.
pub type OperationIdFactory = Box<dyn Fn(&str, &str) -> String>;

/// How the host application versions its routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersioningKind {
    /// Version travels in the URI (the only kind that contributes a path segment)
    Uri,
    /// Version travels in a request header
    Header,
    /// Version travels in the `Accept` media type
    MediaType,
}

/// Versioning configuration of the host application.
#[derive(Debug, Clone)]
pub struct VersioningOptions {
    /// Which versioning scheme is active
    pub kind: VersioningKind,
    /// Prefix prepended to the version in URI paths (e.g., `v` yields `/v1`)
    pub prefix: String,
}

impl VersioningOptions {
    /// URI versioning with the conventional `v` prefix
    pub fn uri() -> Self {
        Self {
            kind: VersioningKind::Uri,
            prefix: "v".to_string(),
        }
    }
}

/// Application-wide routing configuration supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct ApplicationConfig {
    global_prefix: String,
    versioning: Option<VersioningOptions>,
}

impl ApplicationConfig {
    /// Create a configuration with no global prefix and no versioning
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global URL prefix (e.g., `api`), consuming and returning the config
    pub fn with_global_prefix(mut self, prefix: &str) -> Self {
        self.global_prefix = prefix.to_string();
        self
    }

    /// Enable versioning, consuming and returning the config
    pub fn with_versioning(mut self, versioning: VersioningOptions) -> Self {
        self.versioning = Some(versioning);
        self
    }

    /// The global URL prefix, empty when unset
    pub fn global_prefix(&self) -> &str {
        &self.global_prefix
    }

    /// The active versioning configuration, if any
    pub fn versioning(&self) -> Option<&VersioningOptions> {
        self.versioning.as_ref()
    }
}

/// Options controlling one document-generation run.
#[derive(Default)]
pub struct ScanOptions {
    /// Also scan routes of modules related to each scanned module
    pub deep_scan_routes: bool,
    /// Restrict the scan to these module names; empty means all modules
    pub include: Vec<String>,
    /// Models to force-register even when no operation references them
    pub extra_models: Vec<ModelDescriptor>,
    /// Leave the global prefix out of every computed path
    pub ignore_global_prefix: bool,
    /// Replaces the default `{controller}_{method}` operation-id derivation
    pub operation_id_factory: Option<OperationIdFactory>,
}
