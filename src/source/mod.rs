//! The content-source contract.
//!
//! The engine never talks to a content store directly; everything goes
//! through this trait. Implementations are used generically (no trait
//! objects), so `async fn` methods are fine at the seam.

mod fs;

pub use fs::FsSource;

use crate::core::RouteResult;
use crate::resource::{RawNode, ResourceKind};
use crate::utils::DateTimeUtc;

/// A store of raw content nodes
///
/// `fetch_by_relative_path` must fail with [`crate::core::RouteError::NotFound`]
/// when the node is gone, so the loader can surface a recoverable miss.
#[allow(async_fn_in_trait)] // consumed generically, never as a trait object
pub trait ContentSource {
    /// Fetch one node by its store-relative path.
    async fn fetch_by_relative_path(
        &self,
        kind: ResourceKind,
        relative_path: &str,
    ) -> RouteResult<RawNode>;

    /// Fetch every node of a kind. `filter` is advisory; sources may
    /// ignore it and return a superset.
    async fn fetch_all(&self, kind: ResourceKind, filter: Option<&str>)
    -> RouteResult<Vec<RawNode>>;

    /// Last-modified timestamp for a node, when the store tracks one.
    async fn last_modified(&self, _relative_path: &str) -> RouteResult<Option<DateTimeUtc>> {
        Ok(None)
    }
}
