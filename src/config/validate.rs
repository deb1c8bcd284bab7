//! RoutesConfig validation and normalization.
//!
//! `RoutesConfig::into_routing` turns the raw serde shape into the
//! [`Routing`] model the router chain and collector consume: defaults
//! applied, taxonomy shorthand expanded, data queries resolved, and every
//! template and filter expression checked.

use crate::core::UrlPath;
use crate::filter;
use crate::resource::ResourceKind;
use crate::router::pattern::{ALLOWED_PARAMS, has_colon_params, template_params};

use super::data::QueryKind;
use super::error::ConfigDiagnostics;
use super::routes::{
    CollectionConfig, Limit, RouteConfig, RoutesConfig, TaxonomyConfig, TaxonomyKind,
};

// ============================================================================
// Normalized model
// ============================================================================

/// A data query resolved from config
#[derive(Debug, Clone)]
pub struct ResolvedDataQuery {
    pub name: String,
    pub kind: QueryKind,
    pub resource: ResourceKind,
    pub slug: Option<String>,
    /// Whether this query claims its slug for redirect precedence.
    pub redirect: bool,
    pub filter: Option<String>,
    pub limit: Option<Limit>,
    pub order: Option<String>,
}

/// A validated named route
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub path: UrlPath,
    pub config: RouteConfig,
    pub data: Vec<ResolvedDataQuery>,
}

/// A validated collection
#[derive(Debug, Clone)]
pub struct CollectionEntry {
    pub path: UrlPath,
    pub config: CollectionConfig,
}

/// The normalized routing model
///
/// Defaults are already applied: `collections` is never empty and both
/// taxonomies are always present.
#[derive(Debug, Clone)]
pub struct Routing {
    pub routes: Vec<RouteEntry>,
    pub collections: Vec<CollectionEntry>,
    pub taxonomies: Vec<(TaxonomyKind, TaxonomyConfig)>,
}

impl RoutesConfig {
    /// Validate and normalize into the engine's routing model.
    pub fn into_routing(self) -> Result<Routing, ConfigDiagnostics> {
        let mut diags = ConfigDiagnostics::new();

        let routes = self.validate_routes(&mut diags);
        let collections = self.validate_collections(&mut diags);
        let taxonomies = self.validate_taxonomies(&mut diags);

        diags.into_result()?;
        Ok(Routing {
            routes,
            collections,
            taxonomies,
        })
    }

    fn validate_routes(&self, diags: &mut ConfigDiagnostics) -> Vec<RouteEntry> {
        let mut entries = Vec::with_capacity(self.routes.len());

        for (key, config) in self.routes.iter() {
            let field = format!("routes.{key}");

            if !key.starts_with('/') {
                diags.error(&field, "route paths must start with `/`");
                continue;
            }
            if has_colon_params(key) {
                diags.error_with_hint(
                    &field,
                    "route paths are literal; `:param` notation is not allowed",
                    "use a collection permalink with `{param}` placeholders instead",
                );
                continue;
            }

            if let Some(filter) = &config.filter {
                check_filter(diags, &format!("{field}.filter"), filter);
            }
            if let Some(limit) = config.limit {
                check_limit(diags, &format!("{field}.limit"), limit);
            }

            let mut data = Vec::new();
            if let Some(route_data) = &config.data {
                match route_data.entries() {
                    Err(message) => diags.error(format!("{field}.data"), message),
                    Ok(raw) => {
                        for (name, query) in raw {
                            let data_field = format!("{field}.data.{name}");
                            let Ok(resource) = query.resource.parse::<ResourceKind>() else {
                                diags.error_with_hint(
                                    &data_field,
                                    format!("unknown resource `{}`", query.resource),
                                    "valid resources: post, page, author, tag",
                                );
                                continue;
                            };
                            if query.kind == QueryKind::Read && query.slug.is_none() {
                                diags.error(&data_field, "read queries need a `slug`");
                                continue;
                            }
                            if let Some(filter) = &query.filter {
                                check_filter(diags, &format!("{data_field}.filter"), filter);
                            }
                            data.push(ResolvedDataQuery {
                                name,
                                kind: query.kind,
                                resource,
                                slug: query.slug.clone(),
                                redirect: query.redirect.unwrap_or(query.kind == QueryKind::Read),
                                filter: query.filter.clone(),
                                limit: query.limit,
                                order: query.order.clone(),
                            });
                        }
                    }
                }
            }

            entries.push(RouteEntry {
                path: UrlPath::from_page(key),
                config: config.clone(),
                data,
            });
        }

        entries
    }

    fn validate_collections(&self, diags: &mut ConfigDiagnostics) -> Vec<CollectionEntry> {
        let mut entries = Vec::new();

        // Empty section falls back to the default root collection
        let defaults;
        let configured: &[(String, CollectionConfig)] = if self.collections.is_empty() {
            defaults = [("/".to_string(), CollectionConfig::default_root())];
            &defaults
        } else {
            &self.collections.0
        };

        let mut seen_filters: Vec<&str> = Vec::new();
        for (key, config) in configured {
            let field = format!("collections.{key}");

            if !key.starts_with('/') {
                diags.error(&field, "collection paths must start with `/`");
                continue;
            }

            check_permalink(diags, &format!("{field}.permalink"), &config.permalink, true);
            check_limit(diags, &format!("{field}.limit"), config.limit);

            if let Some(filter) = &config.filter {
                check_filter(diags, &format!("{field}.filter"), filter);
            }

            // One post belongs to at most one collection; identical filters
            // would always claim the same posts.
            let filter_key = config.filter.as_deref().unwrap_or("");
            if seen_filters.contains(&filter_key) {
                diags.error_with_hint(
                    &format!("{field}.filter"),
                    "Collections must be unique",
                    "two collections share the same filter; tighten one of them",
                );
            }
            seen_filters.push(filter_key);

            entries.push(CollectionEntry {
                path: UrlPath::from_page(key),
                config: config.clone(),
            });
        }

        entries
    }

    fn validate_taxonomies(
        &self,
        diags: &mut ConfigDiagnostics,
    ) -> Vec<(TaxonomyKind, TaxonomyConfig)> {
        let specs = [
            (TaxonomyKind::Tag, self.taxonomies.tag.clone()),
            (TaxonomyKind::Author, self.taxonomies.author.clone()),
        ];

        specs
            .into_iter()
            .map(|(kind, spec)| {
                let config = match spec {
                    Some(spec) => spec.expand(kind),
                    None => kind.default_config(),
                };
                let field = format!("taxonomies.{}", kind.as_str());

                check_permalink(diags, &format!("{field}.permalink"), &config.permalink, true);
                check_limit(diags, &format!("{field}.limit"), config.limit);
                if !template_params(&config.permalink).iter().any(|p| p == "slug") {
                    diags.error(
                        format!("{field}.permalink"),
                        "taxonomy permalinks must contain `{slug}`",
                    );
                }

                if !config.filter.contains("%s") {
                    diags.error_with_hint(
                        format!("{field}.filter"),
                        "taxonomy filters need a `%s` slug placeholder",
                        format!("for example `{}`", kind.default_filter()),
                    );
                } else {
                    check_filter(
                        diags,
                        &format!("{field}.filter"),
                        &config.filter.replace("%s", "sample"),
                    );
                }

                (kind, config)
            })
            .collect()
    }
}

fn check_limit(diags: &mut ConfigDiagnostics, field: &str, limit: Limit) {
    if limit == Limit::Count(0) {
        diags.error_with_hint(
            field,
            "limit must be at least 1",
            "use `\"all\"` for an unbounded listing",
        );
    }
}

fn check_permalink(diags: &mut ConfigDiagnostics, field: &str, template: &str, require_param: bool) {
    if !template.starts_with('/') {
        diags.error(field, "permalinks must start with `/`");
        return;
    }
    if has_colon_params(template) {
        diags.error_with_hint(
            field,
            "permalinks use `{param}` placeholders, not `:param`",
            "replace `:slug` with `{slug}`",
        );
        return;
    }

    let params = template_params(template);
    if require_param && params.is_empty() {
        diags.error(field, "permalinks need at least one `{param}` placeholder");
    }
    for param in &params {
        if !ALLOWED_PARAMS.contains(&param.as_str()) {
            diags.error_with_hint(
                field,
                format!("unknown permalink variable `{{{param}}}`"),
                format!("valid variables: {}", ALLOWED_PARAMS.join(", ")),
            );
        }
    }
}

fn check_filter(diags: &mut ConfigDiagnostics, field: &str, source: &str) {
    if let Err(e) = filter::parse(source) {
        diags.error(field, format!("invalid filter expression: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routing(toml: &str) -> Result<Routing, ConfigDiagnostics> {
        let config: RoutesConfig = toml::from_str(toml).unwrap();
        config.into_routing()
    }

    #[test]
    fn test_empty_config_gets_defaults() {
        let routing = routing("").unwrap();
        assert!(routing.routes.is_empty());
        assert_eq!(routing.collections.len(), 1);
        assert_eq!(routing.collections[0].path, "/");
        assert_eq!(routing.collections[0].config.permalink, "/{slug}/");
        assert_eq!(routing.taxonomies.len(), 2);
        assert_eq!(routing.taxonomies[0].0, TaxonomyKind::Tag);
        assert_eq!(routing.taxonomies[0].1.filter, "tags:'%s'");
        assert_eq!(routing.taxonomies[1].0, TaxonomyKind::Author);
    }

    #[test]
    fn test_colon_param_permalink_rejected() {
        let err = routing(
            r#"
            [collections."/blog/"]
            permalink = "/blog/:slug/"
        "#,
        )
        .unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err.errors()[0].message.contains("{param}"));
    }

    #[test]
    fn test_unknown_permalink_variable_rejected() {
        let err = routing(
            r#"
            [collections."/blog/"]
            permalink = "/blog/{category}/{slug}/"
        "#,
        )
        .unwrap_err();
        assert!(err.errors()[0].message.contains("category"));
    }

    #[test]
    fn test_duplicate_collection_filters_rejected() {
        let err = routing(
            r#"
            [collections."/a/"]
            permalink = "/a/{slug}/"
            filter = "tag:photo"
            [collections."/b/"]
            permalink = "/b/{slug}/"
            filter = "tag:photo"
        "#,
        )
        .unwrap_err();
        assert!(
            err.errors()
                .iter()
                .any(|e| e.message.contains("Collections must be unique"))
        );
    }

    #[test]
    fn test_taxonomy_filter_needs_placeholder() {
        let err = routing(
            r#"
            [taxonomies]
            tag = { permalink = "/tag/{slug}/", filter = "tags:fixed" }
        "#,
        )
        .unwrap_err();
        assert!(err.errors()[0].message.contains("%s"));
    }

    #[test]
    fn test_short_form_data_resolves() {
        let routing = routing(
            r#"
            [routes."/about/team/"]
            template = "team"
            data = "page.team"
        "#,
        )
        .unwrap();
        let route = &routing.routes[0];
        assert_eq!(route.path, "/about/team/");
        assert_eq!(route.data.len(), 1);
        let query = &route.data[0];
        assert_eq!(query.resource, ResourceKind::Page);
        assert_eq!(query.slug.as_deref(), Some("team"));
        assert!(query.redirect); // read queries claim their slug by default
    }

    #[test]
    fn test_browse_data_defaults_no_redirect() {
        let routing = routing(
            r#"
            [routes."/people/".data.authors]
            type = "browse"
            resource = "author"
            limit = 5
        "#,
        )
        .unwrap();
        let query = &routing.routes[0].data[0];
        assert_eq!(query.kind, QueryKind::Browse);
        assert!(!query.redirect);
    }

    #[test]
    fn test_bad_filter_expression_reported() {
        let err = routing(
            r#"
            [routes."/features/"]
            controller = "channel"
            filter = "tag:"
        "#,
        )
        .unwrap_err();
        assert!(err.errors()[0].message.contains("invalid filter"));
    }

    #[test]
    fn test_read_query_requires_slug() {
        let err = routing(
            r#"
            [routes."/x/".data.thing]
            resource = "page"
        "#,
        )
        .unwrap_err();
        assert!(err.errors()[0].message.contains("slug"));
    }
}
