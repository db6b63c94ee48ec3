//! Route path construction and normalization.
//!
//! Combines the global prefix, URI version, module path, controller path, and
//! method path into final route paths, and rewrites `:param` placeholders into
//! the `{param}` syntax the output document uses.

use crate::config::{ApplicationConfig, VersioningKind};
use crate::error::{Error, Result};

/// Everything that contributes to one handler's route paths.
#[derive(Debug, Clone, Default)]
pub struct RoutePathMetadata {
    /// Application-wide URL prefix, already stripped of its last slash
    pub global_prefix: String,
    /// Mount path of the module owning the controller
    pub module_path: Option<String>,
    /// Path annotation of the controller
    pub ctrl_path: Option<String>,
    /// Path annotation of the method
    pub method_path: String,
    /// Version annotations of the method, in declaration order
    pub method_version: Vec<String>,
    /// Version annotations of the controller, in declaration order
    pub controller_version: Vec<String>,
}

/// Builds final route paths from the host's routing configuration.
pub struct RoutePathFactory<'a> {
    config: &'a ApplicationConfig,
}

impl<'a> RoutePathFactory<'a> {
    /// Create a factory bound to the application configuration
    pub fn new(config: &'a ApplicationConfig) -> Self {
        Self { config }
    }

    /// Combine all path contributions into candidate route paths.
    ///
    /// Returns one path per applicable version, or a single unversioned path.
    /// The method version wins over the controller version; versions only
    /// contribute a segment under URI versioning.
    pub fn create(&self, metadata: &RoutePathMetadata) -> Vec<String> {
        let versions = match self.config.versioning() {
            Some(versioning) if versioning.kind == VersioningKind::Uri => {
                let versions = if metadata.method_version.is_empty() {
                    &metadata.controller_version
                } else {
                    &metadata.method_version
                };
                versions
                    .iter()
                    .map(|v| Some(format!("{}{}", versioning.prefix, v)))
                    .collect()
            }
            _ => Vec::new(),
        };
        let versions = if versions.is_empty() {
            vec![None]
        } else {
            versions
        };

        versions
            .into_iter()
            .map(|version| {
                join_segments(&[
                    Some(metadata.global_prefix.as_str()),
                    version.as_deref(),
                    metadata.module_path.as_deref(),
                    metadata.ctrl_path.as_deref(),
                    Some(metadata.method_path.as_str()),
                ])
            })
            .collect()
    }
}

/// Parse a combined path into segments and normalize `:param` to `{param}`.
///
/// An all-empty path yields the empty string; the caller decides how to render
/// it. A segment that fails to parse aborts the scan.
pub fn validate_route_path(path: &str) -> Result<String> {
    let mut converted = Vec::new();
    for segment in path.split('/') {
        converted.push(convert_segment(path, segment)?);
    }
    let path_with_params = converted.join("/");

    if path_with_params == "/" {
        return Ok(String::new());
    }
    Ok(add_leading_slash(&path_with_params))
}

fn convert_segment(path: &str, segment: &str) -> Result<String> {
    let braces = segment.matches('{').count();
    if braces != segment.matches('}').count() || braces > 1 {
        return Err(Error::MalformedPath {
            path: path.to_string(),
            message: format!("unbalanced braces in segment '{}'", segment),
        });
    }
    if let Some(name) = segment.strip_prefix(':') {
        if name.is_empty() {
            return Err(Error::MalformedPath {
                path: path.to_string(),
                message: "empty parameter name".to_string(),
            });
        }
        return Ok(format!("{{{}}}", name));
    }
    Ok(segment.to_string())
}

/// Concatenate path segments, skipping empty ones, with no trailing slash.
fn join_segments(segments: &[Option<&str>]) -> String {
    let parts: Vec<&str> = segments
        .iter()
        .flatten()
        .flat_map(|segment| segment.split('/'))
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Prepend a slash unless the path is empty or already starts with one.
pub fn add_leading_slash(path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Drop a single trailing slash, if present.
pub fn strip_last_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VersioningOptions;

    fn factory_metadata(method_path: &str) -> RoutePathMetadata {
        RoutePathMetadata {
            method_path: method_path.to_string(),
            ..RoutePathMetadata::default()
        }
    }

    #[test]
    fn test_create_combines_all_contributions() {
        let config = ApplicationConfig::new();
        let factory = RoutePathFactory::new(&config);

        let paths = factory.create(&RoutePathMetadata {
            global_prefix: "api".to_string(),
            module_path: Some("/admin".to_string()),
            ctrl_path: Some("cats".to_string()),
            method_path: "/:id".to_string(),
            ..RoutePathMetadata::default()
        });

        assert_eq!(paths, vec!["/api/admin/cats/:id"]);
    }

    #[test]
    fn test_create_skips_empty_contributions() {
        let config = ApplicationConfig::new();
        let factory = RoutePathFactory::new(&config);

        let paths = factory.create(&factory_metadata("cats"));
        assert_eq!(paths, vec!["/cats"]);

        let paths = factory.create(&factory_metadata("/"));
        assert_eq!(paths, vec![""]);
    }

    #[test]
    fn test_create_applies_uri_version() {
        let config = ApplicationConfig::new()
            .with_global_prefix("api")
            .with_versioning(VersioningOptions::uri());
        let factory = RoutePathFactory::new(&config);

        let mut metadata = factory_metadata("cats");
        metadata.global_prefix = "api".to_string();
        metadata.controller_version = vec!["1".to_string()];
        assert_eq!(factory.create(&metadata), vec!["/api/v1/cats"]);

        // The method version wins over the controller version.
        metadata.method_version = vec!["2".to_string()];
        assert_eq!(factory.create(&metadata), vec!["/api/v2/cats"]);
    }

    #[test]
    fn test_create_emits_one_path_per_version() {
        let config = ApplicationConfig::new().with_versioning(VersioningOptions::uri());
        let factory = RoutePathFactory::new(&config);

        let mut metadata = factory_metadata("cats");
        metadata.method_version = vec!["1".to_string(), "2".to_string()];
        assert_eq!(factory.create(&metadata), vec!["/v1/cats", "/v2/cats"]);
    }

    #[test]
    fn test_version_ignored_without_uri_versioning() {
        let config = ApplicationConfig::new();
        let factory = RoutePathFactory::new(&config);

        let mut metadata = factory_metadata("cats");
        metadata.method_version = vec!["1".to_string()];
        assert_eq!(factory.create(&metadata), vec!["/cats"]);
    }

    #[test]
    fn test_validate_converts_param_syntax() {
        assert_eq!(
            validate_route_path("/cats/:id").unwrap(),
            "/cats/{id}".to_string()
        );
        assert_eq!(
            validate_route_path("/cats/:id/toys/:toyId").unwrap(),
            "/cats/{id}/toys/{toyId}".to_string()
        );
    }

    #[test]
    fn test_validate_keeps_curly_syntax() {
        assert_eq!(
            validate_route_path("/cats/{id}").unwrap(),
            "/cats/{id}".to_string()
        );
    }

    #[test]
    fn test_validate_empty_path() {
        assert_eq!(validate_route_path("").unwrap(), "");
        assert_eq!(validate_route_path("/").unwrap(), "");
    }

    #[test]
    fn test_validate_rejects_empty_parameter_name() {
        let err = validate_route_path("/cats/:").unwrap_err();
        assert!(matches!(err, Error::MalformedPath { .. }));
    }

    #[test]
    fn test_validate_rejects_unbalanced_braces() {
        let err = validate_route_path("/cats/{id").unwrap_err();
        assert!(matches!(err, Error::MalformedPath { .. }));
    }

    #[test]
    fn test_slash_helpers() {
        assert_eq!(add_leading_slash("cats"), "/cats");
        assert_eq!(add_leading_slash("/cats"), "/cats");
        assert_eq!(add_leading_slash(""), "");
        assert_eq!(strip_last_slash("/api/"), "/api");
        assert_eq!(strip_last_slash("/api"), "/api");
    }
}
