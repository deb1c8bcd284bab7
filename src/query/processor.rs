//! Read and browse query execution.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::config::Limit;
use crate::core::{RouteError, RouteResult};
use crate::load::Loader;
use crate::resource::{JsonMap, Repository, Resource, ResourceKind};
use crate::router::{DataQuery, Pagination};
use crate::source::ContentSource;

use super::entity::project;
use super::order::{cmp_entities, parse_order};

/// A browse query in executable form
#[derive(Debug, Clone)]
pub struct BrowseQuery {
    pub resource: ResourceKind,
    pub filter: Option<String>,
    pub limit: Limit,
    pub order: Option<String>,
    pub page: u32,
}

impl BrowseQuery {
    /// Lower a context data query; read queries have no browse form.
    pub fn from_data(query: &DataQuery) -> Option<Self> {
        let DataQuery::Browse {
            resource,
            filter,
            limit,
            order,
            page,
        } = query
        else {
            return None;
        };
        Some(Self {
            resource: *resource,
            filter: filter.clone(),
            limit: *limit,
            order: order.clone(),
            page: *page,
        })
    }
}

/// A loaded single-entity result
#[derive(Debug)]
pub struct ReadOutcome {
    pub resource: Resource,
    pub entity: JsonMap,
}

/// A loaded, paginated list result
#[derive(Debug)]
pub struct BrowseOutcome {
    pub resources: Vec<Resource>,
    pub entities: Vec<JsonMap>,
    pub pagination: Pagination,
}

/// Executes data queries against the repository and loader
#[derive(Debug)]
pub struct QueryProcessor<S> {
    repository: Arc<Repository>,
    loader: Loader<S>,
}

impl<S: ContentSource> QueryProcessor<S> {
    pub fn new(repository: Arc<Repository>, loader: Loader<S>) -> Self {
        Self { repository, loader }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Look up exactly one resource by partial dynamic-variable match and
    /// load it.
    pub async fn read(
        &self,
        resource: ResourceKind,
        vars: &FxHashMap<String, String>,
    ) -> RouteResult<ReadOutcome> {
        let found = self.repository.find(resource, vars).ok_or_else(|| {
            let mut wanted: Vec<String> = vars.iter().map(|(k, v)| format!("{k}={v}")).collect();
            wanted.sort_unstable();
            RouteError::not_found(format!("{resource} matching {}", wanted.join(", ")))
        })?;

        let loaded = self.loader.batch().load(&found).await?;
        Ok(ReadOutcome {
            entity: project(&loaded),
            resource: loaded,
        })
    }

    /// Filter, sort, paginate, and load a list of resources.
    pub async fn browse(&self, query: &BrowseQuery) -> RouteResult<BrowseOutcome> {
        let all = self.repository.find_all(Some(query.resource));

        // Membership comes from the precomputed filter set
        let filtered: Vec<Resource> = all
            .into_iter()
            .filter(|resource| match &query.filter {
                None => true,
                Some(filter) => resource
                    .meta
                    .as_ref()
                    .is_some_and(|meta| meta.filters.contains(filter.as_str())),
            })
            .collect();
        let total = filtered.len();

        // Sort entities, then carry the order back onto the resources
        let mut pairs: Vec<(Resource, JsonMap)> = filtered
            .into_iter()
            .map(|resource| {
                let entity = project(&resource);
                (resource, entity)
            })
            .collect();
        if let Some(order) = &query.order {
            let specs = parse_order(order);
            if !specs.is_empty() {
                pairs.sort_by(|a, b| cmp_entities(&a.1, &b.1, &specs));
            }
        }

        let sliced: Vec<Resource> = match Pagination::slice_bounds(query.page, query.limit) {
            None => pairs.into_iter().map(|(resource, _)| resource).collect(),
            Some((start, end)) => pairs
                .into_iter()
                .skip(start)
                .take(end - start)
                .map(|(resource, _)| resource)
                .collect(),
        };

        let loaded = self.loader.batch().load_many(&sliced).await?;
        let entities = loaded.iter().map(project).collect();

        Ok(BrowseOutcome {
            entities,
            pagination: Pagination::compute(query.page, query.limit, total),
            resources: loaded,
        })
    }

    /// Run a context data query, producing its JSON payload.
    pub async fn run(&self, query: &DataQuery) -> RouteResult<(Value, Option<Pagination>)> {
        match query {
            DataQuery::Read { resource, vars, .. } => {
                let outcome = self.read(*resource, vars).await?;
                Ok((Value::Object(outcome.entity), None))
            }
            DataQuery::Browse { .. } => {
                let browse = BrowseQuery::from_data(query)
                    .ok_or_else(|| RouteError::absurd("browse query lowering failed"))?;
                let outcome = self.browse(&browse).await?;
                let entities = outcome.entities.into_iter().map(Value::Object).collect();
                Ok((Value::Array(entities), Some(outcome.pagination)))
            }
        }
    }
}
