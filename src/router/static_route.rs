//! Routers for configured named routes.
//!
//! Each `routes` entry matches its literal path and the `/page/:page`
//! paging variant. A `controller = "channel"` route answers with a filtered
//! post listing; anything else is a custom page backed by its configured
//! data queries.

use rustc_hash::FxHashMap;

use crate::config::{Controller, Limit, QueryKind, ResolvedDataQuery, RouteEntry};
use crate::core::{RouteResult, UrlPath};
use crate::resource::{Resource, ResourceKind};

use super::context::{DataMap, DataQuery, Request, RoutingContext};
use super::ownership::{SlugClaim, claims_from_queries};
use super::paths::{matching_post_count, push_paging_paths};
use super::pattern::PathPattern;

/// One configured named route
#[derive(Debug)]
pub struct StaticRouter {
    path: UrlPath,
    literal: PathPattern,
    paging: PathPattern,
    /// Listing settings when the route is a channel.
    channel: Option<ChannelSettings>,
    template: Option<String>,
    data: Vec<ResolvedDataQuery>,
    claims: Vec<SlugClaim>,
}

#[derive(Debug)]
struct ChannelSettings {
    filter: Option<String>,
    limit: Limit,
    order: Option<String>,
}

impl StaticRouter {
    pub fn new(entry: &RouteEntry) -> RouteResult<Self> {
        let channel = (entry.config.controller == Some(Controller::Channel)).then(|| {
            ChannelSettings {
                filter: entry.config.filter.clone(),
                limit: entry.config.limit.unwrap_or_default(),
                order: entry.config.order.clone(),
            }
        });

        Ok(Self {
            literal: PathPattern::literal(&entry.path)?,
            paging: PathPattern::paging(&entry.path)?,
            channel,
            template: entry.config.template.clone(),
            claims: claims_from_queries(&entry.path, &entry.data),
            data: entry.data.clone(),
            path: entry.path.clone(),
        })
    }

    pub fn claims(&self) -> &[SlugClaim] {
        &self.claims
    }

    pub fn handle(&self, path: &UrlPath) -> Option<RoutingContext> {
        let params = if self.literal.is_match(path) {
            FxHashMap::default()
        } else {
            self.paging.matches(path)?
        };
        let request = Request::with_params(path.clone(), params);
        let page = request.page();

        let mut data = DataMap::new();
        if let Some(channel) = &self.channel {
            data.insert("posts", DataQuery::Browse {
                resource: ResourceKind::Post,
                filter: channel.filter.clone(),
                limit: channel.limit,
                order: channel.order.clone(),
                page,
            });
        }
        for query in &self.data {
            data.insert(query.name.clone(), configured_query(query));
        }

        let mut templates: Vec<String> = self.template.iter().cloned().collect();
        Some(if self.channel.is_some() {
            templates.push("index".to_string());
            RoutingContext::Channel {
                request,
                templates,
                data,
            }
        } else {
            RoutingContext::Custom {
                request,
                templates,
                data,
            }
        })
    }

    pub fn resolve_paths(&self, resources: &[Resource], out: &mut Vec<UrlPath>) {
        out.push(self.path.clone());

        if let Some(channel) = &self.channel {
            let matching = matching_post_count(resources, channel.filter.as_deref());
            push_paging_paths(&self.path, matching, channel.limit, out);
        }
    }
}

/// Lower a configured data query into its context form.
fn configured_query(query: &ResolvedDataQuery) -> DataQuery {
    match query.kind {
        QueryKind::Read => {
            let mut vars = FxHashMap::default();
            if let Some(slug) = &query.slug {
                vars.insert("slug".to_string(), slug.clone());
            }
            DataQuery::Read {
                resource: query.resource,
                vars,
                redirect: query.redirect,
            }
        }
        QueryKind::Browse => DataQuery::Browse {
            resource: query.resource,
            filter: query.filter.clone(),
            limit: query.limit.unwrap_or_default(),
            order: query.order.clone(),
            page: 1,
        },
    }
}
