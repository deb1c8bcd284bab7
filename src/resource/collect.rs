//! Resource collection: raw content nodes in, Resources out.
//!
//! For each node the collector computes a stable ID, dynamic variables, the
//! canonical public URL, and the set of filter expressions the entity
//! matches across the whole routing configuration. Collection-time errors
//! abort the whole build.

use std::collections::BTreeSet;

use crate::config::{QueryKind, Routing};
use crate::core::{RouteError, RouteResult, UrlPath};
use crate::filter::FilterCache;
use crate::router::pattern::render_template;
use crate::utils::{DateTimeUtc, hash};

use super::kind::ResourceKind;
use super::node::RawNode;
use super::resource::{LocatorMeta, Resource};
use super::vars::{DynamicVars, match_target};

/// Content-store paths of the two singleton resources.
pub const CONFIG_PATH: &str = "config";
pub const ROUTES_PATH: &str = "routes";

/// Raw nodes grouped by kind, as pulled from the content source
#[derive(Debug, Default)]
pub struct NodeSet {
    pub posts: Vec<RawNode>,
    pub pages: Vec<RawNode>,
    pub authors: Vec<RawNode>,
    pub tags: Vec<RawNode>,
}

impl NodeSet {
    pub fn len(&self) -> usize {
        self.posts.len() + self.pages.len() + self.authors.len() + self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns raw content nodes into Resources
pub struct Collector<'a> {
    routing: &'a Routing,
    filters: &'a FilterCache,
    collected_at: DateTimeUtc,
}

impl<'a> Collector<'a> {
    pub fn new(routing: &'a Routing, filters: &'a FilterCache, collected_at: DateTimeUtc) -> Self {
        Self {
            routing,
            filters,
            collected_at,
        }
    }

    /// Collect every node plus the config/routes singletons.
    ///
    /// The output length is always `nodes.len() + 2`.
    pub fn collect(&self, nodes: NodeSet) -> RouteResult<Vec<Resource>> {
        let mut resources = Vec::with_capacity(nodes.len() + 2);

        let groups = [
            (ResourceKind::Post, nodes.posts),
            (ResourceKind::Page, nodes.pages),
            (ResourceKind::Author, nodes.authors),
            (ResourceKind::Tag, nodes.tags),
        ];
        for (kind, group) in groups {
            for node in group {
                resources.push(self.collect_one(kind, node)?);
            }
        }

        resources.push(Resource::singleton(
            ResourceKind::Config,
            hash::stable_id(CONFIG_PATH),
            CONFIG_PATH,
        ));
        resources.push(Resource::singleton(
            ResourceKind::Routes,
            hash::stable_id(ROUTES_PATH),
            ROUTES_PATH,
        ));

        Ok(resources)
    }

    /// Collect a single locator node.
    pub fn collect_one(&self, kind: ResourceKind, node: RawNode) -> RouteResult<Resource> {
        if node.path.is_empty() {
            return Err(RouteError::parse("node without a content path"));
        }

        let id = node
            .parsed_id()?
            .unwrap_or_else(|| hash::stable_id(&node.path));
        let vars = DynamicVars::compute(&node, self.collected_at);
        let target = match_target(&node, &vars);

        let url = self.canonical_url(kind, id, &vars, &target)?;
        let filters = self.matched_filters(&node, &target)?;
        let time = node.updated_at.as_deref().and_then(DateTimeUtc::parse);

        let meta = LocatorMeta {
            breadcrumbs: url.segments().iter().map(|s| s.to_string()).collect(),
            relative_path: node.path.trim_start_matches('/').to_string(),
            filters,
            url,
            vars,
        };

        Ok(Resource {
            id,
            kind,
            path: node.path.clone(),
            time,
            node,
            meta: Some(meta),
        })
    }

    /// Compute the canonical public path for an entity.
    ///
    /// Posts take the permalink of the collection whose filter claims them;
    /// pages take the implicit `/{slug}/` form; tags and authors take their
    /// taxonomy permalink. Everything else falls back to `/{id}`.
    fn canonical_url(
        &self,
        kind: ResourceKind,
        id: u64,
        vars: &DynamicVars,
        target: &serde_json::Value,
    ) -> RouteResult<UrlPath> {
        let lookup = |name: &str| {
            if name == "id" {
                Some(id.to_string())
            } else {
                vars.get(name).map(str::to_string)
            }
        };
        let fallback = || UrlPath::from_page(&format!("/{id}"));

        match kind {
            ResourceKind::Post => {
                let mut matched = None;
                let mut matches = 0usize;
                for entry in &self.routing.collections {
                    let claims = match entry.config.filter.as_deref() {
                        None => true,
                        Some(filter) => self.filters.matches(filter, target)?,
                    };
                    if claims {
                        matches += 1;
                        if matched.is_none() {
                            matched = Some(entry);
                        }
                    }
                }
                if matches > 1 {
                    return Err(RouteError::validation_with_help(
                        format!(
                            "Collections must be unique: post `{}` matches {matches} collection filters",
                            vars.slug
                        ),
                        "tighten the collection filters so each post belongs to one collection",
                    ));
                }
                Ok(matched
                    .and_then(|entry| render_template(&entry.config.permalink, lookup))
                    .unwrap_or_else(fallback))
            }
            ResourceKind::Page => {
                if vars.slug.is_empty() {
                    Ok(fallback())
                } else {
                    Ok(UrlPath::from_page(&format!("/{}", vars.slug)))
                }
            }
            ResourceKind::Tag | ResourceKind::Author => {
                let taxonomy = self
                    .routing
                    .taxonomies
                    .iter()
                    .find(|(tk, _)| tk.resource_kind() == kind);
                Ok(taxonomy
                    .and_then(|(_, config)| render_template(&config.permalink, lookup))
                    .unwrap_or_else(fallback))
            }
            ResourceKind::Config | ResourceKind::Routes => Err(RouteError::absurd(
                "canonical_url called on a non-locator resource",
            )),
        }
    }

    /// Evaluate the entity against every filter expression in the routing
    /// configuration; matches land in the resource's filter set.
    fn matched_filters(
        &self,
        node: &RawNode,
        target: &serde_json::Value,
    ) -> RouteResult<BTreeSet<String>> {
        let mut matched = BTreeSet::new();

        let check = |filters: &FilterCache, source: &str, matched: &mut BTreeSet<String>| {
            match filters.matches(source, target) {
                Ok(true) => {
                    matched.insert(source.to_string());
                    Ok(())
                }
                Ok(false) => Ok(()),
                Err(e) => Err(e),
            }
        };

        for route in &self.routing.routes {
            if let Some(filter) = &route.config.filter {
                check(self.filters, filter, &mut matched)?;
            }
            for query in &route.data {
                if query.kind == QueryKind::Browse
                    && let Some(filter) = &query.filter
                {
                    check(self.filters, filter, &mut matched)?;
                }
            }
        }

        for entry in &self.routing.collections {
            if let Some(filter) = &entry.config.filter {
                check(self.filters, filter, &mut matched)?;
            }
        }

        // Taxonomy filter templates are instantiated per slug of the entity
        // under test: tag slugs for the tag taxonomy, author slugs for the
        // author taxonomy.
        for (kind, config) in &self.routing.taxonomies {
            let refs = match kind.resource_kind() {
                ResourceKind::Tag => &node.tags,
                ResourceKind::Author => &node.authors,
                _ => continue,
            };
            for node_ref in refs {
                let instantiated = config.filter.replace("%s", &node_ref.slug);
                check(self.filters, &instantiated, &mut matched)?;
            }
        }

        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoutesConfig;
    use crate::resource::node::NodeRef;

    fn routing(toml: &str) -> Routing {
        let config: RoutesConfig = toml::from_str(toml).unwrap();
        config.into_routing().unwrap()
    }

    fn post(path: &str, slug: &str, tags: &[&str]) -> RawNode {
        RawNode {
            path: path.to_string(),
            slug: Some(slug.to_string()),
            date: Some("2024-03-01".to_string()),
            tags: tags.iter().map(|t| NodeRef::new(*t)).collect(),
            ..Default::default()
        }
    }

    fn collected_at() -> DateTimeUtc {
        DateTimeUtc::from_ymd(2025, 1, 1)
    }

    #[test]
    fn test_collect_count_formula() {
        let routing = routing("");
        let filters = FilterCache::new();
        let collector = Collector::new(&routing, &filters, collected_at());

        let nodes = NodeSet {
            posts: vec![post("posts/a", "a", &[]), post("posts/b", "b", &[])],
            pages: vec![post("pages/about", "about", &[])],
            authors: vec![post("authors/sam", "sam", &[])],
            tags: vec![post("tags/photo", "photo", &[])],
        };
        let count = nodes.len();

        let resources = collector.collect(nodes).unwrap();
        // |posts| + |pages| + |authors| + |tags| + config + routes
        assert_eq!(resources.len(), count + 2);
        assert!(resources.iter().any(|r| r.kind == ResourceKind::Config));
        assert!(resources.iter().any(|r| r.kind == ResourceKind::Routes));
    }

    #[test]
    fn test_default_collection_post_url() {
        let routing = routing("");
        let filters = FilterCache::new();
        let collector = Collector::new(&routing, &filters, collected_at());

        let resource = collector
            .collect_one(ResourceKind::Post, post("posts/hello", "hello", &[]))
            .unwrap();
        assert_eq!(resource.url().unwrap(), "/hello/");
    }

    #[test]
    fn test_dated_permalink_decomposition() {
        let routing = routing(
            r#"
            [collections."/blog/"]
            permalink = "/blog/{year}/{month}/{day}/{slug}/"
        "#,
        );
        let filters = FilterCache::new();
        let collector = Collector::new(&routing, &filters, collected_at());

        let resource = collector
            .collect_one(ResourceKind::Post, post("posts/hello", "hello", &[]))
            .unwrap();
        // date 2024-03-01: year=2024, month=03, day=01
        assert_eq!(resource.url().unwrap(), "/blog/2024/03/01/hello/");
    }

    #[test]
    fn test_unmatched_post_falls_back_to_id() {
        let routing = routing(
            r#"
            [collections."/blog/"]
            permalink = "/blog/{slug}/"
            filter = "tag:featured-only"
        "#,
        );
        let filters = FilterCache::new();
        let collector = Collector::new(&routing, &filters, collected_at());

        let resource = collector
            .collect_one(ResourceKind::Post, post("posts/hello", "hello", &[]))
            .unwrap();
        assert_eq!(resource.url().unwrap().as_str(), format!("/{}/", resource.id));
    }

    #[test]
    fn test_two_collections_claiming_one_post_is_validation_error() {
        let routing = routing(
            r#"
            [collections."/a/"]
            permalink = "/a/{slug}/"
            filter = "tag:photo"
            [collections."/b/"]
            permalink = "/b/{slug}/"
            filter = "featured:false"
        "#,
        );
        let filters = FilterCache::new();
        let collector = Collector::new(&routing, &filters, collected_at());

        let err = collector
            .collect_one(ResourceKind::Post, post("posts/x", "x", &["photo"]))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(format!("{err}").contains("Collections must be unique"));
    }

    #[test]
    fn test_page_url_is_slug() {
        let routing = routing("");
        let filters = FilterCache::new();
        let collector = Collector::new(&routing, &filters, collected_at());

        let resource = collector
            .collect_one(ResourceKind::Page, post("pages/about", "about", &[]))
            .unwrap();
        assert_eq!(resource.url().unwrap(), "/about/");
        assert_eq!(
            resource.meta.as_ref().unwrap().breadcrumbs,
            vec!["about".to_string()]
        );
    }

    #[test]
    fn test_taxonomy_url() {
        let routing = routing("");
        let filters = FilterCache::new();
        let collector = Collector::new(&routing, &filters, collected_at());

        let resource = collector
            .collect_one(ResourceKind::Tag, post("tags/photo", "photo", &[]))
            .unwrap();
        assert_eq!(resource.url().unwrap(), "/tag/photo/");

        let resource = collector
            .collect_one(ResourceKind::Author, post("authors/sam", "sam", &[]))
            .unwrap();
        assert_eq!(resource.url().unwrap(), "/author/sam/");
    }

    #[test]
    fn test_filter_set_collects_taxonomy_instantiations() {
        let routing = routing("");
        let filters = FilterCache::new();
        let collector = Collector::new(&routing, &filters, collected_at());

        let resource = collector
            .collect_one(
                ResourceKind::Post,
                post("posts/x", "x", &["photo", "travel"]),
            )
            .unwrap();
        let matched = &resource.meta.as_ref().unwrap().filters;
        assert!(matched.contains("tags:'photo'"));
        assert!(matched.contains("tags:'travel'"));
    }

    #[test]
    fn test_filter_set_deduplicates_equivalent_routes() {
        // Two routes with the identical filter expression: the string must
        // appear once in the resource's filter set.
        let routing = routing(
            r#"
            [routes."/one/"]
            controller = "channel"
            filter = "primary_tag:tag-1"
            [routes."/two/"]
            controller = "channel"
            filter = "primary_tag:tag-1"
        "#,
        );
        let filters = FilterCache::new();
        let collector = Collector::new(&routing, &filters, collected_at());

        let resource = collector
            .collect_one(ResourceKind::Post, post("posts/x", "x", &["tag-1"]))
            .unwrap();
        let matched = &resource.meta.as_ref().unwrap().filters;
        assert_eq!(
            matched.iter().filter(|f| *f == "primary_tag:tag-1").count(),
            1
        );
    }

    #[test]
    fn test_explicit_numeric_id_passes_through() {
        let routing = routing("");
        let filters = FilterCache::new();
        let collector = Collector::new(&routing, &filters, collected_at());

        let mut node = post("posts/x", "x", &[]);
        node.id = Some(serde_json::json!(42));
        let resource = collector.collect_one(ResourceKind::Post, node).unwrap();
        assert_eq!(resource.id, 42);
    }

    #[test]
    fn test_bad_id_is_parse_error() {
        let routing = routing("");
        let filters = FilterCache::new();
        let collector = Collector::new(&routing, &filters, collected_at());

        let mut node = post("posts/x", "x", &[]);
        node.id = Some(serde_json::json!("nope"));
        let err = collector.collect_one(ResourceKind::Post, node).unwrap_err();
        assert!(matches!(err, RouteError::Parse { .. }));
    }

    #[test]
    fn test_id_stable_across_collections() {
        let routing = routing("");
        let filters = FilterCache::new();
        let collector = Collector::new(&routing, &filters, collected_at());

        let a = collector
            .collect_one(ResourceKind::Post, post("posts/x", "x", &[]))
            .unwrap();
        let b = collector
            .collect_one(ResourceKind::Post, post("posts/x", "x", &[]))
            .unwrap();
        assert_eq!(a.id, b.id);
    }
}
