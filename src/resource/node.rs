//! Raw content-store nodes.

use serde::{Deserialize, Serialize};

use crate::core::{RouteError, RouteResult};

/// JSON object map with preserved key order
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Deserialize a reference list, treating `null` as empty vec
fn deserialize_refs<'de, D>(deserializer: D) -> Result<Vec<NodeRef>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<Vec<NodeRef>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// A tag or author reference embedded in a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRef {
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl NodeRef {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: None,
        }
    }
}

/// A raw content node as returned by the content source
///
/// # Standard Fields
///
/// | Field     | Type           | Description                         |
/// |-----------|----------------|-------------------------------------|
/// | `id`      | number/string  | Explicit ID (optional, must parse)  |
/// | `slug`    | `String`       | URL slug                            |
/// | `name`    | `String`       | Display name (slug fallback)        |
/// | `title`   | `String`       | Title                               |
/// | `date`    | `String`       | Publication date (ISO)              |
/// | `updated_at` | `String`    | Last-modified timestamp (ISO)       |
/// | `tags`    | `Vec<NodeRef>` | Tag references                      |
/// | `authors` | `Vec<NodeRef>` | Author references                   |
/// | `featured`| `bool`         | Featured flag                       |
///
/// Any additional fields are captured in `extra` as raw JSON and flow
/// through to the rendered entity untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNode {
    /// Content-store path; populated by the source, not the payload.
    #[serde(skip_deserializing)]
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub updated_at: Option<String>,
    #[serde(deserialize_with = "deserialize_refs")]
    pub tags: Vec<NodeRef>,
    #[serde(deserialize_with = "deserialize_refs")]
    pub authors: Vec<NodeRef>,
    pub featured: bool,
    /// Additional user-defined fields (raw JSON).
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl RawNode {
    /// Parse the explicit `id` field, if present.
    ///
    /// Accepts a non-negative integer or a decimal string; anything else is
    /// a [`RouteError::Parse`] for this node only.
    pub fn parsed_id(&self) -> RouteResult<Option<u64>> {
        let Some(raw) = &self.id else {
            return Ok(None);
        };

        let parsed = match raw {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.parse::<u64>().ok(),
            _ => None,
        };

        parsed.map(Some).ok_or_else(|| {
            RouteError::parse(format!("id `{raw}` on node `{}`", self.path))
        })
    }
}
