//! Signpost - a content-routing and resolution engine for static and
//! dynamic sites.
//!
//! Given a declarative routing configuration and content pulled from a
//! headless store, the engine assigns every entity a canonical URL,
//! resolves request paths to routing contexts and data queries, enumerates
//! the full static path list for a build, and mediates content access
//! through a deduplicating, concurrency-bounded loader.

pub mod cli;
pub mod config;
pub mod controller;
pub mod core;
pub mod filter;
pub mod load;
pub mod logger;
pub mod query;
pub mod resource;
pub mod router;
pub mod source;
pub mod utils;

pub use crate::config::{RoutesConfig, Routing};
pub use crate::controller::{Controller, RenderContext};
pub use crate::core::{RouteError, RouteResult, UrlPath};
pub use crate::load::{DEFAULT_FETCH_CONCURRENCY, Loader};
pub use crate::query::{BrowseQuery, QueryProcessor};
pub use crate::resource::{Collector, NodeSet, RawNode, Repository, Resource, ResourceKind};
pub use crate::router::{DataQuery, Pagination, RouterChain, RoutingContext};
pub use crate::source::{ContentSource, FsSource};
