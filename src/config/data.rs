//! Route data-query configuration.
//!
//! A route's `data` section names the queries run when the route matches.
//! Short form: `data = "page.team"` (read the page with slug `team`,
//! claiming the slug for redirects). Full form:
//!
//! ```toml
//! [routes."/about/team/".data.people]
//! type = "browse"
//! resource = "author"
//! limit = 5
//! ```

use serde::Deserialize;

use super::routes::{Entries, Limit};

/// Query kind: single entity or filtered list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    #[default]
    Read,
    Browse,
}

/// One configured data query
#[derive(Debug, Clone, Deserialize)]
pub struct DataQueryConfig {
    #[serde(rename = "type", default)]
    pub kind: QueryKind,
    /// Resource kind name (`post`, `page`, `author`, `tag`).
    pub resource: String,
    /// Slug filter for read queries.
    #[serde(default)]
    pub slug: Option<String>,
    /// Whether the query claims its slug for redirect precedence.
    /// Defaults to true for read queries.
    #[serde(default)]
    pub redirect: Option<bool>,
    /// Filter expression for browse queries.
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub limit: Option<Limit>,
    #[serde(default)]
    pub order: Option<String>,
}

/// The `data` section: short string or named query map
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RouteData {
    Short(String),
    Named(Entries<DataQueryConfig>),
}

impl RouteData {
    /// Expand into named query entries.
    ///
    /// The short form `"page.team"` becomes a read query named `page` for
    /// the page with slug `team`.
    pub fn entries(&self) -> Result<Vec<(String, DataQueryConfig)>, String> {
        match self {
            Self::Named(entries) => Ok(entries.0.clone()),
            Self::Short(short) => {
                let (resource, slug) = short.split_once('.').ok_or_else(|| {
                    format!("short-form data must look like `resource.slug`, got `{short}`")
                })?;
                if resource.is_empty() || slug.is_empty() {
                    return Err(format!(
                        "short-form data must look like `resource.slug`, got `{short}`"
                    ));
                }
                Ok(vec![(
                    resource.to_string(),
                    DataQueryConfig {
                        kind: QueryKind::Read,
                        resource: resource.to_string(),
                        slug: Some(slug.to_string()),
                        redirect: None,
                        filter: None,
                        limit: None,
                        order: None,
                    },
                )])
            }
        }
    }
}
