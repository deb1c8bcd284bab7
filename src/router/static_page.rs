//! The static-page catch-all router.
//!
//! Registered last: any path no other router resolved is assumed to be a
//! static page. Dominant-router claims are checked first, so an explicit
//! route can steal a slug away from the generic matcher.

use crate::core::{RouteResult, UrlPath};
use crate::resource::{Resource, ResourceKind};

use super::Router;
use super::context::{DataMap, DataQuery, Request, RoutingContext};
use super::ownership::dominant_claim;
use super::pattern::PathPattern;

/// Catch-all matcher returning page entries
#[derive(Debug)]
pub struct StaticPageRouter {
    pattern: PathPattern,
}

impl StaticPageRouter {
    pub fn new() -> RouteResult<Self> {
        Ok(Self {
            pattern: PathPattern::catch_all()?,
        })
    }

    pub fn handle(&self, path: &UrlPath, higher: &[Router]) -> Option<RoutingContext> {
        let params = self.pattern.matches(path)?;
        let request = Request::with_params(path.clone(), params);
        let slug = request.param("slug")?.to_string();

        if let Some(claim) = dominant_claim(higher, ResourceKind::Page, &slug)
            && claim.redirect
        {
            return Some(RoutingContext::Redirect {
                destination: claim.base.clone(),
                permanent: true,
                request,
            });
        }

        let mut data = DataMap::new();
        data.insert(
            "page",
            DataQuery::read_slug(ResourceKind::Page, slug, false),
        );

        Some(RoutingContext::Entry {
            resource: ResourceKind::Page,
            request,
            templates: vec!["page".to_string()],
            data,
        })
    }

    /// One path per page resource whose slug no higher router claims.
    pub fn resolve_paths(&self, higher: &[Router], resources: &[Resource], out: &mut Vec<UrlPath>) {
        for page in resources.iter().filter(|r| r.kind == ResourceKind::Page) {
            let owned = page
                .slug()
                .and_then(|slug| dominant_claim(higher, ResourceKind::Page, slug))
                .is_some();
            if owned {
                continue;
            }
            if let Some(url) = page.url() {
                out.push(url.clone());
            }
        }
    }
}
