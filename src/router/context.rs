//! Routing contexts and their data queries.
//!
//! A [`RoutingContext`] is what a router hands back for a matched request
//! path: which kind of page this is, the matched parameters, the theme
//! templates to try, and the named data queries the controller must run.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};

use crate::config::Limit;
use crate::core::UrlPath;
use crate::resource::ResourceKind;

// ============================================================================
// Request
// ============================================================================

/// The matched request: normalized path plus captured parameters
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub path: UrlPath,
    #[serde(skip_serializing_if = "FxHashMap::is_empty")]
    pub params: FxHashMap<String, String>,
}

impl Request {
    pub fn new(path: UrlPath) -> Self {
        Self {
            path,
            params: FxHashMap::default(),
        }
    }

    pub fn with_params(path: UrlPath, params: FxHashMap<String, String>) -> Self {
        Self { path, params }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The `page` parameter of a paging match; 1 when absent.
    pub fn page(&self) -> u32 {
        self.param("page").and_then(|p| p.parse().ok()).unwrap_or(1)
    }
}

// ============================================================================
// Data queries
// ============================================================================

/// A data query attached to a routing context
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataQuery {
    /// Single entity via partial dynamic-variable match.
    Read {
        resource: ResourceKind,
        #[serde(skip_serializing_if = "FxHashMap::is_empty")]
        vars: FxHashMap<String, String>,
        /// Whether this query claims its slug for redirect precedence.
        redirect: bool,
    },
    /// Filtered, sorted, paginated list.
    Browse {
        resource: ResourceKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        filter: Option<String>,
        limit: Limit,
        #[serde(skip_serializing_if = "Option::is_none")]
        order: Option<String>,
        page: u32,
    },
}

impl DataQuery {
    /// A read query matching a single slug.
    pub fn read_slug(resource: ResourceKind, slug: impl Into<String>, redirect: bool) -> Self {
        let mut vars = FxHashMap::default();
        vars.insert("slug".to_string(), slug.into());
        Self::Read {
            resource,
            vars,
            redirect,
        }
    }
}

/// Named data queries in declaration order
#[derive(Debug, Clone, Default)]
pub struct DataMap(pub Vec<(String, DataQuery)>);

impl DataMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, query: DataQuery) {
        self.0.push((name.into(), query));
    }

    pub fn get(&self, name: &str) -> Option<&DataQuery> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, query)| query)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, DataQuery)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for DataMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(name, query)| (name, query)))
    }
}

// ============================================================================
// Routing context
// ============================================================================

/// What a matched request resolves to
///
/// `handle` collects these in router registration order; the controller
/// tries candidates until one yields data.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RoutingContext {
    /// A configured collection's paginated post listing.
    Collection {
        request: Request,
        templates: Vec<String>,
        data: DataMap,
    },
    /// A filtered listing bound to a named route or taxonomy term.
    Channel {
        request: Request,
        templates: Vec<String>,
        data: DataMap,
    },
    /// A single locator resource.
    Entry {
        resource: ResourceKind,
        request: Request,
        templates: Vec<String>,
        data: DataMap,
    },
    /// A named route without a controller.
    Custom {
        request: Request,
        templates: Vec<String>,
        data: DataMap,
    },
    /// A dominant router owns this slug; send the client there.
    Redirect {
        request: Request,
        destination: UrlPath,
        permanent: bool,
    },
    /// Engine-internal page (the admin surface).
    Internal { request: Request },
}

impl RoutingContext {
    pub const fn request(&self) -> &Request {
        match self {
            Self::Collection { request, .. }
            | Self::Channel { request, .. }
            | Self::Entry { request, .. }
            | Self::Custom { request, .. }
            | Self::Redirect { request, .. }
            | Self::Internal { request } => request,
        }
    }

    /// The context's data queries; empty for redirect/internal.
    pub fn data(&self) -> Option<&DataMap> {
        match self {
            Self::Collection { data, .. }
            | Self::Channel { data, .. }
            | Self::Entry { data, .. }
            | Self::Custom { data, .. } => Some(data),
            Self::Redirect { .. } | Self::Internal { .. } => None,
        }
    }

    pub fn templates(&self) -> &[String] {
        match self {
            Self::Collection { templates, .. }
            | Self::Channel { templates, .. }
            | Self::Entry { templates, .. }
            | Self::Custom { templates, .. } => templates,
            Self::Redirect { .. } | Self::Internal { .. } => &[],
        }
    }

    pub const fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    pub const fn kind_str(&self) -> &'static str {
        match self {
            Self::Collection { .. } => "collection",
            Self::Channel { .. } => "channel",
            Self::Entry { .. } => "entry",
            Self::Custom { .. } => "custom",
            Self::Redirect { .. } => "redirect",
            Self::Internal { .. } => "internal",
        }
    }
}

impl fmt::Display for RoutingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind_str(), self.request().path)
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Derived pagination facts for a browse result, never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub prev: Option<u32>,
    pub next: Option<u32>,
    pub pages: u32,
    pub total: usize,
    pub limit: Limit,
}

impl Pagination {
    /// Compute pagination for `total` filtered results.
    ///
    /// `pages` is integer floor division, which undercounts when `total` is
    /// not an exact multiple of `limit` (total=10, limit=3 gives pages=3,
    /// dropping the partial fourth page). Existing sites number their
    /// `/page/N` URLs off this value, so it stays until a deliberate
    /// product decision changes it.
    pub fn compute(page: u32, limit: Limit, total: usize) -> Self {
        let Limit::Count(count) = limit else {
            return Self {
                page: 1,
                prev: None,
                next: None,
                pages: 1,
                total,
                limit,
            };
        };

        let start = (page.saturating_sub(1) as usize) * count as usize;
        let end = start + count as usize;

        Self {
            page,
            prev: (start > 0).then(|| page - 1),
            next: (end < total).then(|| page + 1),
            pages: (total / count as usize) as u32,
            total,
            limit,
        }
    }

    /// The `[start, end)` slice bounds for this page; `None` means "all".
    pub fn slice_bounds(page: u32, limit: Limit) -> Option<(usize, usize)> {
        let count = limit.count()? as usize;
        let start = (page.saturating_sub(1) as usize) * count;
        Some((start, start + count))
    }
}
