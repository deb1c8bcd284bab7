//! Filesystem-backed content source.
//!
//! Nodes live as JSON files under `<root>/<kind-plural>/<name>.json`.
//! Last-modified timestamps come from file mtimes.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::core::{RouteError, RouteResult};
use crate::resource::{RawNode, ResourceKind};
use crate::utils::DateTimeUtc;

use super::ContentSource;

/// Content store rooted at a directory
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Normalize a store-relative path: ensure the kind directory prefix
    /// and the `.json` extension.
    fn normalize(kind: ResourceKind, relative_path: &str) -> String {
        let trimmed = relative_path.trim_matches('/');
        let mut relative = if trimmed.starts_with(kind.plural()) {
            trimmed.to_string()
        } else {
            format!("{}/{trimmed}", kind.plural())
        };
        if !relative.ends_with(".json") {
            relative.push_str(".json");
        }
        relative
    }

    fn read_node(&self, relative: &str) -> RouteResult<RawNode> {
        let path = self.root.join(relative);
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RouteError::not_found(format!("content node `{relative}`"))
            } else {
                RouteError::other_with_cause(format!("failed to read `{relative}`"), e)
            }
        })?;

        let mut node: RawNode = serde_json::from_str(&raw)
            .map_err(|e| RouteError::parse_with_cause(format!("content node `{relative}`"), e))?;
        node.path = relative.to_string();
        Ok(node)
    }
}

impl ContentSource for FsSource {
    async fn fetch_by_relative_path(
        &self,
        kind: ResourceKind,
        relative_path: &str,
    ) -> RouteResult<RawNode> {
        self.read_node(&Self::normalize(kind, relative_path))
    }

    async fn fetch_all(
        &self,
        kind: ResourceKind,
        _filter: Option<&str>,
    ) -> RouteResult<Vec<RawNode>> {
        let dir = self.root.join(kind.plural());
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(RouteError::other_with_cause(
                    format!("failed to list `{}`", dir.display()),
                    e,
                ));
            }
        };

        // Directory order is platform-dependent; sort for a stable store order
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".json"))
            .collect();
        names.sort_unstable();

        names
            .iter()
            .map(|name| self.read_node(&format!("{}/{name}", kind.plural())))
            .collect()
    }

    async fn last_modified(&self, relative_path: &str) -> RouteResult<Option<DateTimeUtc>> {
        let path = self.root.join(relative_path.trim_matches('/'));
        let Ok(metadata) = std::fs::metadata(&path) else {
            return Ok(None);
        };
        let mtime = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|elapsed| DateTimeUtc::from_unix_secs(elapsed.as_secs()));
        Ok(mtime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(files: &[(&str, &str)]) -> (tempfile::TempDir, FsSource) {
        let dir = tempfile::tempdir().unwrap();
        for (relative, body) in files {
            let path = dir.path().join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, body).unwrap();
        }
        let source = FsSource::new(dir.path());
        (dir, source)
    }

    #[tokio::test]
    async fn test_fetch_all_sorted_with_paths() {
        let (_dir, source) = site(&[
            ("posts/b.json", r#"{"slug": "b"}"#),
            ("posts/a.json", r#"{"slug": "a"}"#),
            ("posts/notes.txt", "ignored"),
        ]);

        let nodes = source.fetch_all(ResourceKind::Post, None).await.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].slug.as_deref(), Some("a"));
        assert_eq!(nodes[0].path, "posts/a.json");
        assert_eq!(nodes[1].path, "posts/b.json");
    }

    #[tokio::test]
    async fn test_fetch_all_missing_dir_is_empty() {
        let (_dir, source) = site(&[]);
        let nodes = source.fetch_all(ResourceKind::Tag, None).await.unwrap();
        assert!(nodes.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_by_relative_path_variants() {
        let (_dir, source) = site(&[("pages/about.json", r#"{"slug": "about"}"#)]);

        for relative in ["pages/about.json", "pages/about", "about"] {
            let node = source
                .fetch_by_relative_path(ResourceKind::Page, relative)
                .await
                .unwrap();
            assert_eq!(node.slug.as_deref(), Some("about"), "{relative}");
            assert_eq!(node.path, "pages/about.json");
        }
    }

    #[tokio::test]
    async fn test_missing_node_is_not_found() {
        let (_dir, source) = site(&[]);
        let err = source
            .fetch_by_relative_path(ResourceKind::Page, "missing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_malformed_node_is_parse_error() {
        let (_dir, source) = site(&[("posts/bad.json", "{ not json")]);
        let err = source
            .fetch_by_relative_path(ResourceKind::Post, "bad")
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_last_modified_present_for_existing_file() {
        let (_dir, source) = site(&[("posts/a.json", r#"{"slug": "a"}"#)]);
        let mtime = source.last_modified("posts/a.json").await.unwrap();
        assert!(mtime.is_some());
        assert!(mtime.unwrap().year >= 2024);

        let missing = source.last_modified("posts/zzz.json").await.unwrap();
        assert!(missing.is_none());
    }
}
