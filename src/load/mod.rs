//! Two-tier resource loading.
//!
//! Tier 1 is the repository cache; hits are accepted as-is only during the
//! build phase, otherwise they revalidate against the source. Tier 2 is the
//! content source, guarded by an injected concurrency limiter and per-batch
//! fetch coalescing: within one [`LoadBatch`], a resource ID has at most one
//! fetch in flight, and later requests attach to it.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{OnceCell, Semaphore};

use crate::core::{RouteError, RouteResult};
use crate::resource::{Repository, Resource};
use crate::source::ContentSource;

/// Default bound on concurrent outbound source fetches.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 100;

/// Loads and refreshes resources through the cache tiers
#[derive(Debug)]
pub struct Loader<S> {
    repository: Arc<Repository>,
    source: Arc<S>,
    /// Rate limiter for outbound fetches, not a correctness lock.
    limiter: Arc<Semaphore>,
    /// During the build phase, repository hits skip revalidation.
    build_phase: bool,
}

impl<S: ContentSource> Loader<S> {
    pub fn new(
        repository: Arc<Repository>,
        source: Arc<S>,
        limiter: Arc<Semaphore>,
        build_phase: bool,
    ) -> Self {
        Self {
            repository,
            source,
            limiter,
            build_phase,
        }
    }

    /// A loader with the default fetch-concurrency bound.
    pub fn with_default_limiter(
        repository: Arc<Repository>,
        source: Arc<S>,
        build_phase: bool,
    ) -> Self {
        Self::new(
            repository,
            source,
            Arc::new(Semaphore::new(DEFAULT_FETCH_CONCURRENCY)),
            build_phase,
        )
    }

    /// Open a coalescing batch. One logical operation (a query, a page
    /// render) shares one batch.
    pub fn batch(&self) -> LoadBatch<'_, S> {
        LoadBatch {
            loader: self,
            pending: DashMap::default(),
        }
    }
}

/// One logical batch of loads with per-ID fetch coalescing
#[derive(Debug)]
pub struct LoadBatch<'a, S> {
    loader: &'a Loader<S>,
    pending: DashMap<u64, Arc<OnceCell<Resource>>>,
}

impl<S: ContentSource> LoadBatch<'_, S> {
    /// Load one resource, refreshing it from the source when the cache
    /// tier cannot answer.
    pub async fn load(&self, resource: &Resource) -> RouteResult<Resource> {
        if self.loader.build_phase
            && let Some(hit) = self.loader.repository.get(resource.id)
        {
            return Ok(hit);
        }

        let cell = self.pending.entry(resource.id).or_default().clone();
        let loaded = cell.get_or_try_init(|| self.fetch(resource)).await?;
        Ok(loaded.clone())
    }

    /// Load several resources concurrently within this batch.
    pub async fn load_many(&self, resources: &[Resource]) -> RouteResult<Vec<Resource>> {
        futures::future::try_join_all(resources.iter().map(|resource| self.load(resource))).await
    }

    async fn fetch(&self, resource: &Resource) -> RouteResult<Resource> {
        let _permit = self
            .loader
            .limiter
            .acquire()
            .await
            .map_err(|_| RouteError::absurd("fetch limiter closed"))?;

        let relative = resource
            .meta
            .as_ref()
            .map_or(resource.path.as_str(), |meta| meta.relative_path.as_str());

        let node = self
            .loader
            .source
            .fetch_by_relative_path(resource.kind, relative)
            .await?;
        let time = self.loader.source.last_modified(relative).await?;

        let fresh = resource.refreshed(node, time);
        self.loader.repository.set(fresh.clone());
        Ok(fresh)
    }
}
