//! Taxonomy routers (tag, author).
//!
//! A taxonomy matches its permalink pattern (and paging variant) as a
//! channel, instantiating the filter template with the matched slug.

use crate::config::{Limit, TaxonomyConfig, TaxonomyKind};
use crate::core::{RouteResult, UrlPath};
use crate::resource::{Resource, ResourceKind};

use super::context::{DataMap, DataQuery, Request, RoutingContext};
use super::paths::{matching_post_count, push_paging_paths};
use super::pattern::PathPattern;

/// One taxonomy's channel router
#[derive(Debug)]
pub struct TaxonomyRouter {
    kind: TaxonomyKind,
    pattern: PathPattern,
    paging: PathPattern,
    /// Filter template with a `%s` slug placeholder.
    filter_template: String,
    limit: Limit,
}

impl TaxonomyRouter {
    pub fn new(kind: TaxonomyKind, config: &TaxonomyConfig) -> RouteResult<Self> {
        Ok(Self {
            kind,
            pattern: PathPattern::template(&config.permalink)?,
            paging: PathPattern::template_paging(&config.permalink)?,
            filter_template: config.filter.clone(),
            limit: config.limit,
        })
    }

    pub fn handle(&self, path: &UrlPath) -> Option<RoutingContext> {
        let params = self
            .pattern
            .matches(path)
            .or_else(|| self.paging.matches(path))?;
        let request = Request::with_params(path.clone(), params);
        let slug = request.param("slug")?.to_string();
        let page = request.page();

        let mut data = DataMap::new();
        data.insert(
            self.kind.as_str(),
            DataQuery::read_slug(self.kind.resource_kind(), slug.clone(), false),
        );
        data.insert("posts", DataQuery::Browse {
            resource: ResourceKind::Post,
            filter: Some(self.filter_template.replace("%s", &slug)),
            limit: self.limit,
            order: None,
            page,
        });

        Some(RoutingContext::Channel {
            request,
            templates: vec![self.kind.as_str().to_string(), "index".to_string()],
            data,
        })
    }

    /// Every term contributes its canonical path plus paging variants for
    /// the posts its instantiated filter matches.
    pub fn resolve_paths(&self, resources: &[Resource], out: &mut Vec<UrlPath>) {
        for term in resources
            .iter()
            .filter(|r| r.kind == self.kind.resource_kind())
        {
            let Some((url, slug)) = term.url().zip(term.slug()) else {
                continue;
            };
            out.push(url.clone());

            let filter = self.filter_template.replace("%s", slug);
            let matching = matching_post_count(resources, Some(&filter));
            push_paging_paths(url, matching, self.limit, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RoutesConfig, Routing};

    fn default_routing() -> Routing {
        let config: RoutesConfig = toml::from_str("").unwrap();
        config.into_routing().unwrap()
    }

    fn tag_router() -> TaxonomyRouter {
        let routing = default_routing();
        let (kind, config) = &routing.taxonomies[0];
        TaxonomyRouter::new(*kind, config).unwrap()
    }

    #[test]
    fn test_channel_match_instantiates_filter() {
        let router = tag_router();
        let context = router.handle(&UrlPath::from_page("/tag/photo/")).unwrap();
        let RoutingContext::Channel { data, templates, .. } = &context else {
            panic!("expected channel, got {context}");
        };
        assert_eq!(templates, &["tag".to_string(), "index".to_string()]);

        let Some(DataQuery::Browse { filter, page, .. }) = data.get("posts") else {
            panic!("expected posts browse query");
        };
        assert_eq!(filter.as_deref(), Some("tags:'photo'"));
        assert_eq!(*page, 1);

        let Some(DataQuery::Read { resource, vars, .. }) = data.get("tag") else {
            panic!("expected tag read query");
        };
        assert_eq!(*resource, ResourceKind::Tag);
        assert_eq!(vars.get("slug").map(String::as_str), Some("photo"));
    }

    #[test]
    fn test_paging_match() {
        let router = tag_router();
        let context = router
            .handle(&UrlPath::from_page("/tag/photo/page/2/"))
            .unwrap();
        let Some(DataQuery::Browse { page, filter, .. }) = context.data().unwrap().get("posts")
        else {
            panic!("expected posts browse query");
        };
        assert_eq!(*page, 2);
        assert_eq!(filter.as_deref(), Some("tags:'photo'"));
    }

    #[test]
    fn test_no_match_outside_namespace() {
        let router = tag_router();
        assert!(router.handle(&UrlPath::from_page("/author/sam/")).is_none());
        assert!(router.handle(&UrlPath::from_page("/tag/")).is_none());
    }
}
