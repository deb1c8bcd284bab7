//! The Resource value type.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::kind::ResourceKind;
use super::node::RawNode;
use super::vars::DynamicVars;
use crate::core::UrlPath;
use crate::utils::DateTimeUtc;

/// Metadata carried by locator resources (post/page/author/tag)
#[derive(Debug, Clone, Serialize)]
pub struct LocatorMeta {
    #[serde(flatten)]
    pub vars: DynamicVars,
    /// URL path segments, outermost first.
    pub breadcrumbs: Vec<String>,
    /// Content-store path relative to the store root.
    pub relative_path: String,
    /// Filter expressions this resource matches, deduplicated.
    pub filters: BTreeSet<String>,
    /// Computed public path.
    pub url: UrlPath,
}

/// A collected resource
///
/// Immutable once stored; refreshes replace the whole value.
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    /// Stable integer ID, unique across kinds.
    pub id: u64,
    pub kind: ResourceKind,
    /// Raw content-store path.
    pub path: String,
    /// Last-modified timestamp, when the source provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTimeUtc>,
    /// Raw node payload.
    pub node: RawNode,
    /// Locator metadata; `None` for config/routes singletons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<LocatorMeta>,
}

impl Resource {
    /// Create a non-locator singleton resource (config, routes).
    pub fn singleton(kind: ResourceKind, id: u64, path: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            path: path.into(),
            time: None,
            node: RawNode::default(),
            meta: None,
        }
    }

    /// Look up a dynamic variable by name. `id` is always available.
    pub fn dynamic_var(&self, name: &str) -> Option<String> {
        if name == "id" {
            return Some(self.id.to_string());
        }
        self.meta
            .as_ref()
            .and_then(|meta| meta.vars.get(name))
            .map(str::to_string)
    }

    /// Check a partial dynamic-variable match (used by `Repository::find`).
    pub fn matches_vars(&self, wanted: &FxHashMap<String, String>) -> bool {
        wanted
            .iter()
            .all(|(name, value)| self.dynamic_var(name).as_deref() == Some(value))
    }

    /// The computed public path, for locator resources.
    pub fn url(&self) -> Option<&UrlPath> {
        self.meta.as_ref().map(|meta| &meta.url)
    }

    /// The resource's slug, for locator resources.
    pub fn slug(&self) -> Option<&str> {
        self.meta.as_ref().map(|meta| meta.vars.slug.as_str())
    }

    /// Replace the payload after a source fetch, keeping identity and
    /// computed metadata.
    pub fn refreshed(&self, node: RawNode, time: Option<DateTimeUtc>) -> Self {
        Self {
            id: self.id,
            kind: self.kind,
            path: self.path.clone(),
            time: time.or(self.time),
            node,
            meta: self.meta.clone(),
        }
    }
}
