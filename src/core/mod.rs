//! Core types - pure abstractions shared across the engine.

mod error;
mod url;

pub use error::{Cause, RouteError, RouteResult, ValidationError};
pub use url::UrlPath;
