//! Static path enumeration across the router chain.

use rustc_hash::FxHashSet;

use crate::config::Limit;
use crate::core::UrlPath;
use crate::resource::{Resource, ResourceKind};

use super::Router;

/// Enumerate every static path the chain can produce.
///
/// Routers contribute in registration order; posts are tracked in a shared
/// claimed-ID set so each one is emitted exactly once across collections.
/// The output is deterministic and free of duplicates, first contribution
/// winning.
pub fn resolve_paths(routers: &[Router], resources: &[Resource]) -> Vec<UrlPath> {
    let mut paths = Vec::new();
    let mut claimed_posts = FxHashSet::default();

    for (index, router) in routers.iter().enumerate() {
        router.resolve_paths(&routers[..index], resources, &mut claimed_posts, &mut paths);
    }

    let mut seen = FxHashSet::default();
    paths.retain(|path| seen.insert(path.clone()));
    paths
}

/// Post resources matching a channel/collection filter, in store order.
///
/// No filter means every post; otherwise membership comes from the
/// precomputed filter set.
pub(super) fn matching_posts<'r>(
    resources: &'r [Resource],
    filter: Option<&'r str>,
) -> impl Iterator<Item = &'r Resource> {
    resources.iter().filter(move |resource| {
        resource.kind == ResourceKind::Post
            && match filter {
                None => true,
                Some(filter) => resource
                    .meta
                    .as_ref()
                    .is_some_and(|meta| meta.filters.contains(filter)),
            }
    })
}

pub(super) fn matching_post_count(resources: &[Resource], filter: Option<&str>) -> usize {
    matching_posts(resources, filter).count()
}

/// Push `/page/N` variants for `N` in `[1, ceil(matching / limit)]`.
///
/// Unbounded listings (`limit = "all"`) have no paging paths.
pub(super) fn push_paging_paths(
    base: &UrlPath,
    matching: usize,
    limit: Limit,
    out: &mut Vec<UrlPath>,
) {
    let Some(count) = limit.count() else {
        return;
    };
    if count == 0 {
        return;
    }

    for n in 1..=matching.div_ceil(count as usize) {
        out.push(base.join(&format!("page/{n}")));
    }
}
