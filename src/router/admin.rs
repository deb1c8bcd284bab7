//! The admin router: a single fixed path.

use crate::core::{RouteResult, UrlPath};

use super::context::{Request, RoutingContext};
use super::pattern::PathPattern;

/// The admin surface's mount point.
pub const ADMIN_PATH: &str = "/admin/";

/// Matches the fixed admin path and nothing else
#[derive(Debug)]
pub struct AdminRouter {
    path: UrlPath,
    pattern: PathPattern,
}

impl AdminRouter {
    pub fn new() -> RouteResult<Self> {
        let path = UrlPath::from_page(ADMIN_PATH);
        let pattern = PathPattern::literal(&path)?;
        Ok(Self { path, pattern })
    }

    pub fn handle(&self, path: &UrlPath) -> Option<RoutingContext> {
        self.pattern.is_match(path).then(|| RoutingContext::Internal {
            request: Request::new(path.clone()),
        })
    }

    pub fn resolve_paths(&self, out: &mut Vec<UrlPath>) {
        out.push(self.path.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_admin_only() {
        let router = AdminRouter::new().unwrap();
        let context = router.handle(&UrlPath::from_page("/admin/")).unwrap();
        assert!(context.is_internal());

        assert!(router.handle(&UrlPath::from_page("/admin/extra/")).is_none());
        assert!(router.handle(&UrlPath::from_page("/")).is_none());
    }

    #[test]
    fn test_contributes_admin_path() {
        let router = AdminRouter::new().unwrap();
        let mut paths = Vec::new();
        router.resolve_paths(&mut paths);
        assert_eq!(paths, vec![UrlPath::from_page("/admin/")]);
    }
}
