//! Resources: identification, collection, storage.

mod collect;
mod kind;
mod node;
mod repository;
#[allow(clippy::module_inception)]
mod resource;
mod vars;

pub use collect::{CONFIG_PATH, Collector, NodeSet, ROUTES_PATH};
pub use kind::ResourceKind;
pub use node::{JsonMap, NodeRef, RawNode};
pub use repository::Repository;
pub use resource::{LocatorMeta, Resource};
pub use vars::{DynamicVars, PRIMARY_FALLBACK, match_target};
