//! Dynamic variables computed per entity.
//!
//! These feed permalink compilation and `read` query matching: `slug`,
//! `year`/`month`/`day`, `primary_tag`, `primary_author`.

use serde::Serialize;
use serde_json::{Value, json};

use super::node::RawNode;
use crate::utils::{DateTimeUtc, slugify};

/// Fallback value for `primary_tag`/`primary_author` when a node carries
/// no tags or authors.
pub const PRIMARY_FALLBACK: &str = "all";

/// Computed dynamic variables for a locator resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicVars {
    pub slug: String,
    pub year: String,
    pub month: String,
    pub day: String,
    pub primary_tag: String,
    pub primary_author: String,
}

impl DynamicVars {
    /// Compute variables from a raw node.
    ///
    /// `collected_at` supplies the date when the node has none.
    pub fn compute(node: &RawNode, collected_at: DateTimeUtc) -> Self {
        let date = node
            .date
            .as_deref()
            .and_then(DateTimeUtc::parse)
            .unwrap_or(collected_at);

        // The date variables come from the day-month-year rendering of the
        // date. The split below assigns piece 0 to `day`, 1 to `month`,
        // 2 to `year`; permalinks depend on this exact assignment.
        let formatted = date.to_day_month_year();
        let mut pieces = formatted.split('/');
        let day = pieces.next().unwrap_or_default().to_string();
        let month = pieces.next().unwrap_or_default().to_string();
        let year = pieces.next().unwrap_or_default().to_string();

        Self {
            slug: derive_slug(node),
            year,
            month,
            day,
            primary_tag: node
                .tags
                .first()
                .map_or_else(|| PRIMARY_FALLBACK.to_string(), |t| t.slug.clone()),
            primary_author: node
                .authors
                .first()
                .map_or_else(|| PRIMARY_FALLBACK.to_string(), |a| a.slug.clone()),
        }
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "slug" => Some(&self.slug),
            "year" => Some(&self.year),
            "month" => Some(&self.month),
            "day" => Some(&self.day),
            "primary_tag" => Some(&self.primary_tag),
            "primary_author" => Some(&self.primary_author),
            _ => None,
        }
    }
}

/// Slug fallback chain: own slug, then name, then the path's filename.
fn derive_slug(node: &RawNode) -> String {
    if let Some(slug) = &node.slug
        && !slug.is_empty()
    {
        return slug.clone();
    }
    if let Some(name) = &node.name
        && !name.is_empty()
    {
        return slugify(name);
    }

    let filename = node
        .path
        .rsplit('/')
        .next()
        .unwrap_or("")
        .split('.')
        .next()
        .unwrap_or("");
    slugify(filename)
}

/// Build the JSON value filter expressions are evaluated against.
///
/// Contains the node's own fields plus the computed variables, with
/// `primary_tag`/`primary_author` in their object form so `.slug`
/// expansions resolve.
pub fn match_target(node: &RawNode, vars: &DynamicVars) -> Value {
    let mut value = json!({
        "slug": vars.slug,
        "year": vars.year,
        "month": vars.month,
        "day": vars.day,
        "featured": node.featured,
        "tags": node.tags,
        "authors": node.authors,
        "primary_tag": { "slug": vars.primary_tag },
        "primary_author": { "slug": vars.primary_author },
    });

    if let Value::Object(map) = &mut value {
        if let Some(title) = &node.title {
            map.insert("title".to_string(), json!(title));
        }
        if let Some(date) = &node.date {
            map.insert("date".to_string(), json!(date));
        }
        for (key, extra) in &node.extra {
            map.entry(key.clone()).or_insert_with(|| extra.clone());
        }
    }

    value
}
