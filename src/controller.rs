//! The controller: routing contexts in, render context out.
//!
//! The router chain hands back candidate contexts in precedence order. The
//! controller runs each candidate's data queries until one yields usable
//! data: a `NotFound` moves on to the next candidate, anything else is
//! fatal. Redirect and internal contexts resolve immediately, they carry no
//! queries.

use serde::Serialize;

use crate::core::{RouteError, RouteResult};
use crate::debug;
use crate::query::QueryProcessor;
use crate::resource::JsonMap;
use crate::router::{Pagination, RoutingContext};
use crate::source::ContentSource;

/// Everything the external renderer needs for one page
#[derive(Debug, Serialize)]
pub struct RenderContext {
    pub context: RoutingContext,
    /// Query results keyed by their configured names.
    pub data: JsonMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Binds routing contexts to query results
#[derive(Debug)]
pub struct Controller<'a, S> {
    processor: &'a QueryProcessor<S>,
}

impl<'a, S: ContentSource> Controller<'a, S> {
    pub fn new(processor: &'a QueryProcessor<S>) -> Self {
        Self { processor }
    }

    /// Try candidate contexts in order until one yields data.
    pub async fn render(&self, candidates: Vec<RoutingContext>) -> RouteResult<RenderContext> {
        let total = candidates.len();

        for (index, context) in candidates.into_iter().enumerate() {
            if context.is_redirect() || context.is_internal() {
                return Ok(RenderContext {
                    context,
                    data: JsonMap::new(),
                    pagination: None,
                });
            }

            match self.resolve(&context).await {
                Ok((data, pagination)) => {
                    return Ok(RenderContext {
                        context,
                        data,
                        pagination,
                    });
                }
                Err(e) if e.is_not_found() => {
                    debug!("resolve"; "candidate {}/{total} for {} missed: {e}",
                        index + 1, context.request().path);
                }
                Err(e) => return Err(e),
            }
        }

        Err(RouteError::not_found("page for request"))
    }

    /// Run every data query of one candidate.
    async fn resolve(&self, context: &RoutingContext) -> RouteResult<(JsonMap, Option<Pagination>)> {
        let mut data = JsonMap::new();
        let mut pagination = None;

        if let Some(queries) = context.data() {
            for (name, query) in queries.iter() {
                let (value, query_pagination) = self.processor.run(query).await?;
                data.insert(name.clone(), value);
                if pagination.is_none() {
                    pagination = query_pagination;
                }
            }
        }

        Ok((data, pagination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoutesConfig;
    use crate::core::UrlPath;
    use crate::filter::FilterCache;
    use crate::load::Loader;
    use crate::resource::{Collector, NodeSet, RawNode, Repository, ResourceKind};
    use crate::router::RouterChain;
    use crate::utils::DateTimeUtc;
    use std::sync::Arc;

    struct EmptySource;

    impl ContentSource for EmptySource {
        async fn fetch_by_relative_path(
            &self,
            _kind: ResourceKind,
            relative_path: &str,
        ) -> RouteResult<RawNode> {
            Err(RouteError::not_found(format!("node `{relative_path}`")))
        }

        async fn fetch_all(
            &self,
            _kind: ResourceKind,
            _filter: Option<&str>,
        ) -> RouteResult<Vec<RawNode>> {
            Ok(Vec::new())
        }
    }

    fn node(path: &str, slug: &str) -> RawNode {
        RawNode {
            path: path.to_string(),
            slug: Some(slug.to_string()),
            title: Some(slug.to_uppercase()),
            date: Some("2024-06-15".to_string()),
            ..Default::default()
        }
    }

    fn site(toml: &str, nodes: NodeSet) -> (RouterChain, QueryProcessor<EmptySource>) {
        let config: RoutesConfig = toml::from_str(toml).unwrap();
        let routing = config.into_routing().unwrap();
        let chain = RouterChain::from_routing(&routing).unwrap();

        let filters = FilterCache::new();
        let resources = Collector::new(&routing, &filters, DateTimeUtc::from_ymd(2025, 1, 1))
            .collect(nodes)
            .unwrap();
        let repository = Arc::new(Repository::new());
        repository.set_many(resources);

        let loader = Loader::with_default_limiter(repository.clone(), Arc::new(EmptySource), true);
        (chain, QueryProcessor::new(repository, loader))
    }

    #[tokio::test]
    async fn test_fallback_to_static_page_candidate() {
        let (chain, processor) = site("", NodeSet {
            pages: vec![node("pages/about.json", "about")],
            ..Default::default()
        });
        let controller = Controller::new(&processor);

        // the collection's post-entry candidate misses, the page candidate hits
        let candidates = chain.handle(&UrlPath::from_page("/about/"));
        assert_eq!(candidates.len(), 2);
        let render = controller.render(candidates).await.unwrap();

        assert_eq!(render.context.kind_str(), "entry");
        assert_eq!(render.data["page"]["slug"], "about");
        assert!(render.pagination.is_none());
    }

    #[tokio::test]
    async fn test_all_candidates_missing_is_not_found() {
        let (chain, processor) = site("", NodeSet::default());
        let controller = Controller::new(&processor);

        let candidates = chain.handle(&UrlPath::from_page("/nowhere/"));
        let err = controller.render(candidates).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_collection_listing_carries_pagination() {
        let (chain, processor) = site("", NodeSet {
            posts: vec![
                node("posts/a.json", "a"),
                node("posts/b.json", "b"),
                node("posts/c.json", "c"),
            ],
            ..Default::default()
        });
        let controller = Controller::new(&processor);

        let candidates = chain.handle(&UrlPath::from_page("/"));
        let render = controller.render(candidates).await.unwrap();

        assert_eq!(render.context.kind_str(), "collection");
        let posts = render.data["posts"].as_array().unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(render.pagination.as_ref().unwrap().total, 3);
    }

    #[tokio::test]
    async fn test_redirect_candidate_short_circuits() {
        let (chain, processor) = site(
            r#"
            [routes."/about/team/"]
            data = "page.team"
        "#,
            NodeSet {
                pages: vec![node("pages/team.json", "team")],
                ..Default::default()
            },
        );
        let controller = Controller::new(&processor);

        let candidates = chain.handle(&UrlPath::from_page("/team/"));
        let render = controller.render(candidates).await.unwrap();
        assert!(render.context.is_redirect());
        assert!(render.data.is_empty());
    }

    #[tokio::test]
    async fn test_custom_route_resolves_named_queries() {
        let (chain, processor) = site(
            r#"
            [routes."/about/team/"]
            template = "team"
            data = "page.team"
        "#,
            NodeSet {
                pages: vec![node("pages/team.json", "team")],
                ..Default::default()
            },
        );
        let controller = Controller::new(&processor);

        let candidates = chain.handle(&UrlPath::from_page("/about/team/"));
        let render = controller.render(candidates).await.unwrap();
        assert_eq!(render.context.kind_str(), "custom");
        assert_eq!(render.data["page"]["slug"], "team");
    }
}
