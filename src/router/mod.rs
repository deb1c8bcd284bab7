//! The router chain.
//!
//! An ordered list of router variants, evaluated in strict precedence
//! order: admin, named routes, collections, taxonomies, then the
//! static-page catch-all. `handle` collects *all* matching contexts in
//! registration order; the controller tries them until one yields data.
//!
//! Evaluation is synchronous and side-effect-free: the same chain instance
//! can serve concurrent requests.

pub mod pattern;

mod admin;
mod collection;
mod context;
mod ownership;
mod paths;
mod static_page;
mod static_route;
mod taxonomy;

pub use admin::ADMIN_PATH;
pub use context::{DataMap, DataQuery, Pagination, Request, RoutingContext};
pub use ownership::SlugClaim;

use crate::config::Routing;
use crate::core::{RouteResult, UrlPath};
use crate::debug;
use crate::resource::Resource;

use admin::AdminRouter;
use collection::CollectionRouter;
use static_page::StaticPageRouter;
use static_route::StaticRouter;
use taxonomy::TaxonomyRouter;

/// A router in the chain
///
/// A closed set of variants dispatched by match; precedence lives in the
/// chain's list order, not in the variants themselves.
#[derive(Debug)]
pub enum Router {
    Admin(AdminRouter),
    Route(StaticRouter),
    Collection(CollectionRouter),
    Taxonomy(TaxonomyRouter),
    Pages(StaticPageRouter),
}

impl Router {
    /// Match one path against one router. `higher` holds the routers
    /// registered before this one, for dominant-claim checks.
    fn handle(&self, path: &UrlPath, higher: &[Router]) -> Option<RoutingContext> {
        match self {
            Self::Admin(router) => router.handle(path),
            Self::Route(router) => router.handle(path),
            Self::Collection(router) => router.handle(path, higher),
            Self::Taxonomy(router) => router.handle(path),
            Self::Pages(router) => router.handle(path, higher),
        }
    }

    /// The slugs this router owns for redirect precedence.
    pub fn claims(&self) -> &[SlugClaim] {
        match self {
            Self::Route(router) => router.claims(),
            _ => &[],
        }
    }

    fn resolve_paths(
        &self,
        higher: &[Router],
        resources: &[Resource],
        claimed: &mut rustc_hash::FxHashSet<u64>,
        out: &mut Vec<UrlPath>,
    ) {
        match self {
            Self::Admin(router) => router.resolve_paths(out),
            Self::Route(router) => router.resolve_paths(resources, out),
            Self::Collection(router) => router.resolve_paths(higher, resources, claimed, out),
            Self::Taxonomy(router) => router.resolve_paths(resources, out),
            Self::Pages(router) => router.resolve_paths(higher, resources, out),
        }
    }
}

/// The ordered router chain
#[derive(Debug)]
pub struct RouterChain {
    routers: Vec<Router>,
}

impl RouterChain {
    /// Build the chain from a validated routing model.
    pub fn from_routing(routing: &Routing) -> RouteResult<Self> {
        let mut routers = Vec::with_capacity(
            routing.routes.len() + routing.collections.len() + routing.taxonomies.len() + 2,
        );

        routers.push(Router::Admin(AdminRouter::new()?));
        for entry in &routing.routes {
            routers.push(Router::Route(StaticRouter::new(entry)?));
        }
        for entry in &routing.collections {
            routers.push(Router::Collection(CollectionRouter::new(entry)?));
        }
        for (kind, config) in &routing.taxonomies {
            routers.push(Router::Taxonomy(TaxonomyRouter::new(*kind, config)?));
        }
        routers.push(Router::Pages(StaticPageRouter::new()?));

        Ok(Self { routers })
    }

    /// Resolve a request path to every matching context, in registration
    /// order.
    pub fn handle(&self, path: &UrlPath) -> Vec<RoutingContext> {
        let contexts: Vec<RoutingContext> = self
            .routers
            .iter()
            .enumerate()
            .filter_map(|(index, router)| router.handle(path, &self.routers[..index]))
            .collect();

        debug!("resolve"; "{path} -> {} context(s)", contexts.len());
        contexts
    }

    /// Resolve a pre-split request path.
    pub fn handle_segments<I, S>(&self, segments: I) -> Vec<RoutingContext>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.handle(&UrlPath::from_segments(segments))
    }

    /// Enumerate the full static path list for a build.
    pub fn resolve_paths(&self, resources: &[Resource]) -> Vec<UrlPath> {
        paths::resolve_paths(&self.routers, resources)
    }
}
