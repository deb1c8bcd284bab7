//! Shared resource store.
//!
//! A keyed map of immutable Resource values. Writes are last-write-wins
//! with no transactions; readers always see complete values because `set`
//! replaces whole resources.

use std::time::SystemTime;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::kind::ResourceKind;
use super::resource::Resource;

/// Key/value store of Resources keyed by ID
#[derive(Debug, Default)]
pub struct Repository {
    resources: RwLock<FxHashMap<u64, Resource>>,
    /// Insertion order, for deterministic iteration and store-order sorts.
    order: RwLock<Vec<u64>>,
    /// Bumped on every write.
    updated_at: RwLock<Option<SystemTime>>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a resource.
    pub fn set(&self, resource: Resource) {
        let id = resource.id;
        let mut resources = self.resources.write();
        if resources.insert(id, resource).is_none() {
            self.order.write().push(id);
        }
        drop(resources);
        *self.updated_at.write() = Some(SystemTime::now());
    }

    /// Bulk insert; bumps the update marker once.
    pub fn set_many(&self, batch: Vec<Resource>) {
        {
            let mut resources = self.resources.write();
            let mut order = self.order.write();
            for resource in batch {
                let id = resource.id;
                if resources.insert(id, resource).is_none() {
                    order.push(id);
                }
            }
        }
        *self.updated_at.write() = Some(SystemTime::now());
    }

    pub fn get(&self, id: u64) -> Option<Resource> {
        self.resources.read().get(&id).cloned()
    }

    /// Fetch several resources, skipping unknown IDs.
    pub fn get_many(&self, ids: &[u64]) -> Vec<Resource> {
        let resources = self.resources.read();
        ids.iter()
            .filter_map(|id| resources.get(id).cloned())
            .collect()
    }

    /// Find the first resource of a kind matching all given dynamic
    /// variables (partial match).
    pub fn find(&self, kind: ResourceKind, vars: &FxHashMap<String, String>) -> Option<Resource> {
        let resources = self.resources.read();
        let order = self.order.read();
        order
            .iter()
            .filter_map(|id| resources.get(id))
            .find(|r| r.kind == kind && r.matches_vars(vars))
            .cloned()
    }

    /// All resources, optionally restricted to one kind, in insertion order.
    pub fn find_all(&self, kind: Option<ResourceKind>) -> Vec<Resource> {
        let resources = self.resources.read();
        let order = self.order.read();
        order
            .iter()
            .filter_map(|id| resources.get(id))
            .filter(|r| kind.is_none_or(|k| r.kind == k))
            .cloned()
            .collect()
    }

    /// Milliseconds elapsed between the last update and `from`.
    ///
    /// `None` when the store has never been written, or when `from`
    /// precedes the last update.
    pub fn since_last_update(&self, from: SystemTime) -> Option<u128> {
        let updated_at = (*self.updated_at.read())?;
        from.duration_since(updated_at).ok().map(|d| d.as_millis())
    }

    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }

    pub fn clear(&self) {
        self.resources.write().clear();
        self.order.write().clear();
        *self.updated_at.write() = None;
    }
}
