//! Collection routers.
//!
//! A collection matches its literal path (and paging variant) as a post
//! listing, and its permalink pattern as a single-post entry. Entry matches
//! defer to dominant-router claims before resolving.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::{CollectionEntry, Limit};
use crate::core::{RouteResult, UrlPath};
use crate::resource::{Resource, ResourceKind};

use super::Router;
use super::context::{DataMap, DataQuery, Request, RoutingContext};
use super::ownership::dominant_claim;
use super::paths::{matching_post_count, matching_posts, push_paging_paths};
use super::pattern::PathPattern;

/// One configured collection of posts
#[derive(Debug)]
pub struct CollectionRouter {
    path: UrlPath,
    literal: PathPattern,
    paging: PathPattern,
    /// The permalink pattern, matched as a post entry.
    entry: PathPattern,
    filter: Option<String>,
    limit: Limit,
    order: Option<String>,
    templates: Vec<String>,
}

impl CollectionRouter {
    pub fn new(entry: &CollectionEntry) -> RouteResult<Self> {
        Ok(Self {
            literal: PathPattern::literal(&entry.path)?,
            paging: PathPattern::paging(&entry.path)?,
            entry: PathPattern::template(&entry.config.permalink)?,
            filter: entry.config.filter.clone(),
            limit: entry.config.limit,
            order: entry.config.order.clone(),
            templates: entry.config.templates.clone(),
            path: entry.path.clone(),
        })
    }

    pub fn handle(&self, path: &UrlPath, higher: &[Router]) -> Option<RoutingContext> {
        // Listing: the collection path itself or a /page/N variant
        let listing_params = if self.literal.is_match(path) {
            Some(FxHashMap::default())
        } else {
            self.paging.matches(path)
        };
        if let Some(params) = listing_params {
            let request = Request::with_params(path.clone(), params);
            let page = request.page();

            let mut data = DataMap::new();
            data.insert("posts", DataQuery::Browse {
                resource: ResourceKind::Post,
                filter: self.filter.clone(),
                limit: self.limit,
                order: self.order.clone(),
                page,
            });

            let mut templates = self.templates.clone();
            templates.push("index".to_string());
            return Some(RoutingContext::Collection {
                request,
                templates,
                data,
            });
        }

        // Entry: the permalink pattern
        let params = self.entry.matches(path)?;
        let request = Request::with_params(path.clone(), params);

        if let Some(slug) = request.param("slug")
            && let Some(claim) = dominant_claim(higher, ResourceKind::Post, slug)
            && claim.redirect
        {
            return Some(RoutingContext::Redirect {
                destination: claim.base.clone(),
                permanent: true,
                request,
            });
        }

        let mut templates = self.templates.clone();
        templates.push("post".to_string());
        let mut data = DataMap::new();
        data.insert("post", DataQuery::Read {
            resource: ResourceKind::Post,
            vars: request.params.clone(),
            redirect: false,
        });

        Some(RoutingContext::Entry {
            resource: ResourceKind::Post,
            request,
            templates,
            data,
        })
    }

    pub fn resolve_paths(
        &self,
        higher: &[Router],
        resources: &[Resource],
        claimed: &mut FxHashSet<u64>,
        out: &mut Vec<UrlPath>,
    ) {
        out.push(self.path.clone());
        push_paging_paths(
            &self.path,
            matching_post_count(resources, self.filter.as_deref()),
            self.limit,
            out,
        );

        for post in matching_posts(resources, self.filter.as_deref()) {
            if !claimed.insert(post.id) {
                continue;
            }
            let owned = post
                .slug()
                .and_then(|slug| dominant_claim(higher, ResourceKind::Post, slug))
                .is_some();
            if owned {
                continue;
            }
            if let Some(url) = post.url() {
                out.push(url.clone());
            }
        }
    }
}
