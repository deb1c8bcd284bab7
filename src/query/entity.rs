//! Entity projection.
//!
//! The flat entity map handed to the renderer (and sorted over in browse
//! queries): the node's standard fields, the computed URL and date
//! variables, and every user-defined extra field passed through untouched.

use serde_json::{Value, json};

use crate::resource::{JsonMap, NodeRef, Resource};

/// Project a resource into its flat entity form.
pub fn project(resource: &Resource) -> JsonMap {
    let node = &resource.node;
    let mut entity = JsonMap::new();

    entity.insert("id".to_string(), json!(resource.id));

    if let Some(meta) = &resource.meta {
        entity.insert("slug".to_string(), json!(meta.vars.slug));
        entity.insert("url".to_string(), json!(meta.url));
        entity.insert("year".to_string(), json!(meta.vars.year));
        entity.insert("month".to_string(), json!(meta.vars.month));
        entity.insert("day".to_string(), json!(meta.vars.day));
        entity.insert(
            "primary_tag".to_string(),
            primary(&node.tags, &meta.vars.primary_tag),
        );
        entity.insert(
            "primary_author".to_string(),
            primary(&node.authors, &meta.vars.primary_author),
        );
    }

    if let Some(title) = &node.title {
        entity.insert("title".to_string(), json!(title));
    }
    if let Some(name) = &node.name {
        entity.insert("name".to_string(), json!(name));
    }
    if let Some(date) = &node.date {
        entity.insert("date".to_string(), json!(date));
    }
    if let Some(updated_at) = &node.updated_at {
        entity.insert("updated_at".to_string(), json!(updated_at));
    }
    entity.insert("featured".to_string(), json!(node.featured));
    entity.insert("tags".to_string(), json!(node.tags));
    entity.insert("authors".to_string(), json!(node.authors));

    // User-defined fields flow through without overriding standard ones
    for (key, value) in &node.extra {
        entity.entry(key.clone()).or_insert_with(|| value.clone());
    }

    entity
}

/// The first listed reference, or the fallback slug in reference form.
fn primary(refs: &[NodeRef], fallback_slug: &str) -> Value {
    match refs.first() {
        Some(node_ref) => json!(node_ref),
        None => json!({ "slug": fallback_slug }),
    }
}
