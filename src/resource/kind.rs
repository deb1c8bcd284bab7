//! Resource kind discriminant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The six resource kinds known to the engine
///
/// `Post`, `Page`, `Author`, and `Tag` are *locator* kinds: they carry
/// dynamic variables and a public URL. `Config` and `Routes` are singleton
/// bookkeeping resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Config,
    Post,
    Page,
    Author,
    Tag,
    Routes,
}

impl ResourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Post => "post",
            Self::Page => "page",
            Self::Author => "author",
            Self::Tag => "tag",
            Self::Routes => "routes",
        }
    }

    /// Plural form, used as the content-store directory name.
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Post => "posts",
            Self::Page => "pages",
            Self::Author => "authors",
            Self::Tag => "tags",
            Self::Routes => "routes",
        }
    }

    /// Check if resources of this kind carry dynamic variables and a URL.
    pub const fn is_locator(self) -> bool {
        matches!(self, Self::Post | Self::Page | Self::Author | Self::Tag)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "config" => Ok(Self::Config),
            "post" | "posts" => Ok(Self::Post),
            "page" | "pages" => Ok(Self::Page),
            "author" | "authors" => Ok(Self::Author),
            "tag" | "tags" => Ok(Self::Tag),
            "routes" => Ok(Self::Routes),
            other => Err(format!("unknown resource kind: {other}")),
        }
    }
}
