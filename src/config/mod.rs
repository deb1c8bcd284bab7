//! Routing configuration: schema, validation, normalization.

mod data;
mod error;
mod routes;
mod validate;

use std::path::Path;

pub use data::{DataQueryConfig, QueryKind, RouteData};
pub use error::{ConfigDiagnostic, ConfigDiagnostics};
pub use routes::{
    CollectionConfig, Controller, DEFAULT_COLLECTION_LIMIT, DEFAULT_TAXONOMY_LIMIT, Entries,
    Limit, RouteConfig, RoutesConfig, TaxonomiesConfig, TaxonomyConfig, TaxonomyKind,
    TaxonomySpec,
};
pub use validate::{CollectionEntry, ResolvedDataQuery, RouteEntry, Routing};

/// Load a routing configuration from a TOML file.
///
/// Parse failures surface as a single diagnostic; a missing file is not an
/// error and yields the default routing input (`{}`).
pub fn load_routes_file(path: &Path) -> Result<RoutesConfig, ConfigDiagnostics> {
    if !path.exists() {
        return Ok(RoutesConfig::default());
    }

    let raw = std::fs::read_to_string(path).map_err(|e| {
        let mut diags = ConfigDiagnostics::new();
        diags.error(
            path.display().to_string(),
            format!("failed to read config: {e}"),
        );
        diags
    })?;

    toml::from_str(&raw).map_err(|e| {
        let mut diags = ConfigDiagnostics::new();
        diags.error(path.display().to_string(), format!("{e}"));
        diags
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_routes_file(&dir.path().join("routes.toml")).unwrap();
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_load_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[collections.\"/blog/\"]").unwrap();
        writeln!(file, "permalink = \"/blog/{{slug}}/\"").unwrap();

        let config = load_routes_file(&path).unwrap();
        assert_eq!(config.collections.len(), 1);
    }

    #[test]
    fn test_load_invalid_toml_is_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        std::fs::write(&path, "not [ valid toml").unwrap();

        let err = load_routes_file(&path).unwrap_err();
        assert!(err.has_errors());
    }
}
