//! Query execution: reads, browses, entity projection.

mod entity;
mod order;
mod processor;

pub use entity::project;
pub use order::{OrderSpec, cmp_entities, parse_order};
pub use processor::{BrowseOutcome, BrowseQuery, QueryProcessor, ReadOutcome};
