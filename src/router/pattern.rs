//! Path pattern compilation.
//!
//! Permalink templates use `{param}` placeholders (`/blog/{year}/{slug}/`).
//! Internally they compile to `/:param`-style rules and from there to
//! anchored regexes that match normalized [`UrlPath`] values.

use regex::Regex;
use rustc_hash::FxHashMap;

use crate::core::{RouteError, RouteResult, UrlPath};

/// Dynamic variables allowed inside permalink templates.
pub const ALLOWED_PARAMS: [&str; 7] = [
    "slug",
    "id",
    "year",
    "month",
    "day",
    "primary_tag",
    "primary_author",
];

/// Extract `{param}` placeholder names from a template, in order.
pub fn template_params(template: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        params.push(rest[open + 1..open + close].to_string());
        rest = &rest[open + close + 1..];
    }
    params
}

/// Check whether a template uses the rejected `:param` notation.
pub fn has_colon_params(template: &str) -> bool {
    let bytes = template.as_bytes();
    template.match_indices(':').any(|(i, _)| {
        bytes
            .get(i + 1)
            .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_')
    })
}

/// Render a permalink template against a variable lookup.
///
/// Returns `None` when a referenced variable has no value.
pub fn render_template<F>(template: &str, lookup: F) -> Option<UrlPath>
where
    F: Fn(&str) -> Option<String>,
{
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let close = rest[open..].find('}')?;
        rendered.push_str(&rest[..open]);
        rendered.push_str(&lookup(&rest[open + 1..open + close])?);
        rest = &rest[open + close + 1..];
    }
    rendered.push_str(rest);
    Some(UrlPath::from_page(&rendered))
}

/// A compiled path pattern
///
/// Matches against the normalized string form of a [`UrlPath`] and captures
/// named parameters.
#[derive(Debug, Clone)]
pub struct PathPattern {
    regex: Regex,
    params: Vec<String>,
}

impl PathPattern {
    /// Compile a literal path (no parameters).
    pub fn literal(path: &UrlPath) -> RouteResult<Self> {
        Self::compile(path.as_str(), Vec::new())
    }

    /// Compile a literal path's paging variant: `<path>page/:page/`.
    pub fn paging(path: &UrlPath) -> RouteResult<Self> {
        let source = format!("{}page/([0-9]+)/", regex::escape(path.as_str()));
        Ok(Self {
            regex: anchored(&source)?,
            params: vec!["page".to_string()],
        })
    }

    /// Compile a `{param}` permalink template.
    ///
    /// Each placeholder matches one path segment.
    pub fn template(template: &str) -> RouteResult<Self> {
        let normalized = UrlPath::from_page(template);
        let mut source = String::new();
        let mut params = Vec::new();
        let mut rest = normalized.as_str();

        while let Some(open) = rest.find('{') {
            let close = rest[open..].find('}').ok_or_else(|| {
                RouteError::validation(format!("unbalanced `{{` in permalink `{template}`"))
            })?;
            source.push_str(&regex::escape(&rest[..open]));
            source.push_str("([^/]+)");
            params.push(rest[open + 1..open + close].to_string());
            rest = &rest[open + close + 1..];
        }
        source.push_str(&regex::escape(rest));

        Self::from_source(&source, params)
    }

    /// Compile a template's paging variant: `<template>page/:page/`.
    pub fn template_paging(template: &str) -> RouteResult<Self> {
        let normalized = UrlPath::from_page(template);
        let mut source = String::new();
        let mut params = Vec::new();
        let mut rest = normalized.as_str();

        while let Some(open) = rest.find('{') {
            let close = rest[open..].find('}').ok_or_else(|| {
                RouteError::validation(format!("unbalanced `{{` in permalink `{template}`"))
            })?;
            source.push_str(&regex::escape(&rest[..open]));
            source.push_str("([^/]+)");
            params.push(rest[open + 1..open + close].to_string());
            rest = &rest[open + close + 1..];
        }
        source.push_str(&regex::escape(rest));
        source.push_str("page/([0-9]+)/");
        params.push("page".to_string());

        Self::from_source(&source, params)
    }

    /// The catch-all pattern: matches any non-root path, capturing the
    /// joined segments as `slug`.
    pub fn catch_all() -> RouteResult<Self> {
        Ok(Self {
            regex: anchored("/(.+)/")?,
            params: vec!["slug".to_string()],
        })
    }

    fn compile(path: &str, params: Vec<String>) -> RouteResult<Self> {
        Self::from_source(&regex::escape(path), params)
    }

    fn from_source(source: &str, params: Vec<String>) -> RouteResult<Self> {
        Ok(Self {
            regex: anchored(source)?,
            params,
        })
    }

    /// Match a normalized path, returning captured parameters.
    pub fn matches(&self, path: &UrlPath) -> Option<FxHashMap<String, String>> {
        let captures = self.regex.captures(path.as_str())?;
        let mut params = FxHashMap::default();
        for (i, name) in self.params.iter().enumerate() {
            if let Some(capture) = captures.get(i + 1) {
                params.insert(name.clone(), capture.as_str().trim_matches('/').to_string());
            }
        }
        Some(params)
    }

    /// Check for a match without extracting parameters.
    pub fn is_match(&self, path: &UrlPath) -> bool {
        self.regex.is_match(path.as_str())
    }
}

fn anchored(source: &str) -> RouteResult<Regex> {
    Regex::new(&format!("^{source}$"))
        .map_err(|e| RouteError::other_with_cause("failed to compile path pattern", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_params() {
        assert_eq!(
            template_params("/blog/{year}/{slug}/"),
            vec!["year", "slug"]
        );
        assert!(template_params("/about/").is_empty());
    }

    #[test]
    fn test_has_colon_params() {
        assert!(has_colon_params("/blog/:slug/"));
        assert!(!has_colon_params("/blog/{slug}/"));
        assert!(!has_colon_params("/about/"));
    }

    #[test]
    fn test_render_template() {
        let rendered = render_template("/blog/{year}/{slug}/", |name| match name {
            "year" => Some("2024".to_string()),
            "slug" => Some("hello".to_string()),
            _ => None,
        });
        assert_eq!(rendered.unwrap(), "/blog/2024/hello/");
    }

    #[test]
    fn test_render_template_missing_var() {
        assert!(render_template("/{nope}/", |_| None).is_none());
    }

    #[test]
    fn test_literal_pattern() {
        let pattern = PathPattern::literal(&UrlPath::from_page("/features/")).unwrap();
        assert!(pattern.is_match(&UrlPath::from_page("/features/")));
        assert!(!pattern.is_match(&UrlPath::from_page("/features/page/2/")));
        assert!(!pattern.is_match(&UrlPath::from_page("/other/")));
    }

    #[test]
    fn test_paging_pattern() {
        let pattern = PathPattern::paging(&UrlPath::from_page("/features/")).unwrap();
        let params = pattern.matches(&UrlPath::from_page("/features/page/2/")).unwrap();
        assert_eq!(params.get("page").map(String::as_str), Some("2"));
        assert!(!pattern.is_match(&UrlPath::from_page("/features/")));
        assert!(!pattern.is_match(&UrlPath::from_page("/features/page/x/")));
    }

    #[test]
    fn test_root_paging_pattern() {
        let pattern = PathPattern::paging(&UrlPath::from_page("/")).unwrap();
        let params = pattern.matches(&UrlPath::from_page("/page/3/")).unwrap();
        assert_eq!(params.get("page").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_template_pattern_captures() {
        let pattern = PathPattern::template("/blog/{year}/{slug}/").unwrap();
        let params = pattern
            .matches(&UrlPath::from_page("/blog/2024/hello-world/"))
            .unwrap();
        assert_eq!(params.get("year").map(String::as_str), Some("2024"));
        assert_eq!(params.get("slug").map(String::as_str), Some("hello-world"));
        assert!(!pattern.is_match(&UrlPath::from_page("/blog/2024/")));
        assert!(!pattern.is_match(&UrlPath::from_page("/blog/2024/a/b/")));
    }

    #[test]
    fn test_template_paging_pattern() {
        let pattern = PathPattern::template_paging("/tag/{slug}/").unwrap();
        let params = pattern
            .matches(&UrlPath::from_page("/tag/photo/page/2/"))
            .unwrap();
        assert_eq!(params.get("slug").map(String::as_str), Some("photo"));
        assert_eq!(params.get("page").map(String::as_str), Some("2"));
        assert!(!pattern.is_match(&UrlPath::from_page("/tag/photo/")));
    }

    #[test]
    fn test_catch_all() {
        let pattern = PathPattern::catch_all().unwrap();
        let params = pattern.matches(&UrlPath::from_page("/about/")).unwrap();
        assert_eq!(params.get("slug").map(String::as_str), Some("about"));

        let params = pattern.matches(&UrlPath::from_page("/nested/page/")).unwrap();
        assert_eq!(params.get("slug").map(String::as_str), Some("nested/page"));

        assert!(!pattern.is_match(&UrlPath::from_page("/")));
    }
}
