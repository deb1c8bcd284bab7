//! Dominant-router slug ownership.
//!
//! A route's read-type data queries claim their slugs. When a lower-priority
//! router is about to return an entry for a claimed slug, the claim wins:
//! `redirect = true` claims turn the match into a redirect to the owning
//! route's base path, `redirect = false` claims reserve the slug without
//! redirecting other matches.

use crate::config::{QueryKind, ResolvedDataQuery};
use crate::core::UrlPath;
use crate::resource::ResourceKind;

use super::Router;

/// A slug claimed by a router
#[derive(Debug, Clone)]
pub struct SlugClaim {
    pub resource: ResourceKind,
    pub slug: String,
    /// Whether a lower-priority match on this slug redirects here.
    pub redirect: bool,
    /// The owning route's base path, used as the redirect destination.
    pub base: UrlPath,
}

/// Build the claims a route's data queries assert.
pub fn claims_from_queries(base: &UrlPath, queries: &[ResolvedDataQuery]) -> Vec<SlugClaim> {
    queries
        .iter()
        .filter(|query| query.kind == QueryKind::Read)
        .filter_map(|query| {
            query.slug.as_ref().map(|slug| SlugClaim {
                resource: query.resource,
                slug: slug.clone(),
                redirect: query.redirect,
                base: base.clone(),
            })
        })
        .collect()
}

/// Find the first higher-priority claim on `(resource, slug)`.
///
/// `higher` must contain only routers registered before the caller; the
/// first claim in registration order wins.
pub fn dominant_claim<'a>(
    higher: &'a [Router],
    resource: ResourceKind,
    slug: &str,
) -> Option<&'a SlugClaim> {
    higher
        .iter()
        .flat_map(Router::claims)
        .find(|claim| claim.resource == resource && claim.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryKind;

    fn read_query(resource: ResourceKind, slug: &str, redirect: bool) -> ResolvedDataQuery {
        ResolvedDataQuery {
            name: resource.as_str().to_string(),
            kind: QueryKind::Read,
            resource,
            slug: Some(slug.to_string()),
            redirect,
            filter: None,
            limit: None,
            order: None,
        }
    }

    #[test]
    fn test_claims_from_read_queries_only() {
        let base = UrlPath::from_page("/about/team/");
        let queries = vec![
            read_query(ResourceKind::Page, "team", true),
            ResolvedDataQuery {
                name: "people".to_string(),
                kind: QueryKind::Browse,
                resource: ResourceKind::Author,
                slug: None,
                redirect: false,
                filter: None,
                limit: None,
                order: None,
            },
        ];

        let claims = claims_from_queries(&base, &queries);
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].slug, "team");
        assert!(claims[0].redirect);
        assert_eq!(claims[0].base, "/about/team/");
    }

    #[test]
    fn test_non_redirect_claim_kept() {
        let base = UrlPath::from_page("/x/");
        let claims = claims_from_queries(&base, &[read_query(ResourceKind::Page, "x", false)]);
        assert_eq!(claims.len(), 1);
        assert!(!claims[0].redirect);
    }
}
