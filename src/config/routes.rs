//! Declarative routing configuration.
//!
//! The input shape is `{ routes?, collections?, taxonomies? }`, deserialized
//! from TOML (CLI) or any other serde source. Section order is preserved:
//! router registration order follows document order.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::data::RouteData;

/// Default page size for collections without an explicit `limit`.
pub const DEFAULT_COLLECTION_LIMIT: u32 = 10;

/// Page size applied when a taxonomy is given as a bare permalink string.
pub const DEFAULT_TAXONOMY_LIMIT: u32 = 5;

// ============================================================================
// Ordered map entries
// ============================================================================

/// Map entries in document order
///
/// `BTreeMap` would re-sort keys and change router registration order, so
/// config maps deserialize into a plain entry list instead.
#[derive(Debug, Clone)]
pub struct Entries<V>(pub Vec<(String, V)>);

impl<V> Default for Entries<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> Entries<V> {
    pub fn iter(&self) -> impl Iterator<Item = &(String, V)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, V> Deserialize<'de> for Entries<V>
where
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V> Visitor<'de> for EntriesVisitor<V>
        where
            V: Deserialize<'de>,
        {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of path keys")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

// ============================================================================
// Limit
// ============================================================================

/// Page-size limit: a positive count or the literal `"all"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    All,
    Count(u32),
}

impl Limit {
    pub const fn is_all(self) -> bool {
        matches!(self, Self::All)
    }

    pub const fn count(self) -> Option<u32> {
        match self {
            Self::All => None,
            Self::Count(n) => Some(n),
        }
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::Count(DEFAULT_COLLECTION_LIMIT)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u32),
            Word(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(Self::Count(n)),
            Raw::Word(w) if w == "all" => Ok(Self::All),
            Raw::Word(w) => Err(serde::de::Error::custom(format!(
                "limit must be a number or \"all\", got \"{w}\""
            ))),
        }
    }
}

impl serde::Serialize for Limit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::All => serializer.serialize_str("all"),
            Self::Count(n) => serializer.serialize_u32(*n),
        }
    }
}

// ============================================================================
// Config sections
// ============================================================================

/// One named custom route
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Theme template for this route.
    pub template: Option<String>,
    /// `controller = "channel"` turns the route into a filtered listing.
    pub controller: Option<Controller>,
    /// Channel filter expression.
    pub filter: Option<String>,
    /// Channel page size.
    pub limit: Option<Limit>,
    /// Channel sort order (`-field` for descending).
    pub order: Option<String>,
    /// Named data queries (short form `"page.team"` or full query maps).
    pub data: Option<RouteData>,
}

/// Route controller marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    Channel,
}

/// One configured collection of posts
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// Permalink template with `{param}` placeholders.
    pub permalink: String,
    /// Membership filter; a post belongs to at most one collection.
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub limit: Limit,
    #[serde(default)]
    pub order: Option<String>,
    /// Extra theme templates tried before the default.
    #[serde(default)]
    pub templates: Vec<String>,
}

/// Taxonomy section: either a bare permalink string or the full form
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TaxonomySpec {
    Permalink(String),
    Full(TaxonomyConfig),
}

/// Expanded taxonomy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TaxonomyConfig {
    /// Permalink template with a `{slug}` placeholder.
    pub permalink: String,
    /// Filter template with a `%s` slug placeholder.
    pub filter: String,
    #[serde(default = "default_taxonomy_limit")]
    pub limit: Limit,
}

fn default_taxonomy_limit() -> Limit {
    Limit::Count(DEFAULT_TAXONOMY_LIMIT)
}

/// Taxonomy kind: the two cross-cutting groupings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyKind {
    Tag,
    Author,
}

impl TaxonomyKind {
    /// The resource kind grouped by this taxonomy.
    pub const fn resource_kind(self) -> crate::resource::ResourceKind {
        match self {
            Self::Tag => crate::resource::ResourceKind::Tag,
            Self::Author => crate::resource::ResourceKind::Author,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Author => "author",
        }
    }

    /// Filter template applied when the taxonomy is given as a bare
    /// permalink string.
    pub const fn default_filter(self) -> &'static str {
        match self {
            Self::Tag => "tags:'%s'",
            Self::Author => "authors:'%s'",
        }
    }

    /// Default permalink template.
    pub const fn default_permalink(self) -> &'static str {
        match self {
            Self::Tag => "/tag/{slug}/",
            Self::Author => "/author/{slug}/",
        }
    }
}

/// The `taxonomies` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaxonomiesConfig {
    pub tag: Option<TaxonomySpec>,
    pub author: Option<TaxonomySpec>,
}

/// Declarative routing configuration: routes, collections, taxonomies
///
/// An empty config (`{}`) is valid and produces the default routing: one
/// collection at `/` and the `tag`/`author` taxonomies.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub routes: Entries<RouteConfig>,
    pub collections: Entries<CollectionConfig>,
    pub taxonomies: TaxonomiesConfig,
}

impl CollectionConfig {
    /// The default root collection used when none is configured.
    pub fn default_root() -> Self {
        Self {
            permalink: "/{slug}/".to_string(),
            filter: None,
            limit: Limit::default(),
            order: None,
            templates: Vec::new(),
        }
    }
}

impl TaxonomySpec {
    /// Expand the bare-permalink shorthand into the full form.
    pub fn expand(self, kind: TaxonomyKind) -> TaxonomyConfig {
        match self {
            Self::Full(config) => config,
            Self::Permalink(permalink) => TaxonomyConfig {
                permalink,
                filter: kind.default_filter().to_string(),
                limit: Limit::Count(DEFAULT_TAXONOMY_LIMIT),
            },
        }
    }
}

impl TaxonomyKind {
    /// Built-in default taxonomy config.
    pub fn default_config(self) -> TaxonomyConfig {
        TaxonomyConfig {
            permalink: self.default_permalink().to_string(),
            filter: self.default_filter().to_string(),
            limit: Limit::Count(DEFAULT_TAXONOMY_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_deserializes() {
        let config: RoutesConfig = toml::from_str("").unwrap();
        assert!(config.routes.is_empty());
        assert!(config.collections.is_empty());
        assert!(config.taxonomies.tag.is_none());
    }

    #[test]
    fn test_full_config_deserializes() {
        let toml = r#"
            [routes."/features/"]
            controller = "channel"
            filter = "tag:feature"

            [routes."/about/team/"]
            template = "team"
            data = "page.team"

            [collections."/blog/"]
            permalink = "/blog/{slug}/"
            filter = "tag:-news"
            limit = 10

            [taxonomies]
            tag = "/topic/{slug}/"
            author = { permalink = "/writer/{slug}/", filter = "authors:'%s'", limit = 3 }
        "#;
        let config: RoutesConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes.0[0].0, "/features/");
        assert_eq!(
            config.routes.0[0].1.controller,
            Some(Controller::Channel)
        );
        assert_eq!(config.collections.len(), 1);
        assert_eq!(config.collections.0[0].1.limit, Limit::Count(10));
        assert!(matches!(
            config.taxonomies.tag,
            Some(TaxonomySpec::Permalink(_))
        ));
        assert!(matches!(
            config.taxonomies.author,
            Some(TaxonomySpec::Full(_))
        ));
    }

    #[test]
    fn test_limit_all() {
        let toml = r#"
            [collections."/everything/"]
            permalink = "/{slug}/"
            limit = "all"
        "#;
        let config: RoutesConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.collections.0[0].1.limit, Limit::All);
    }

    #[test]
    fn test_limit_rejects_other_words() {
        let toml = r#"
            [collections."/x/"]
            permalink = "/{slug}/"
            limit = "lots"
        "#;
        assert!(toml::from_str::<RoutesConfig>(toml).is_err());
    }

    #[test]
    fn test_taxonomy_shorthand_expansion() {
        let spec = TaxonomySpec::Permalink("/topic/{slug}/".to_string());
        let expanded = spec.expand(TaxonomyKind::Tag);
        assert_eq!(expanded.permalink, "/topic/{slug}/");
        assert_eq!(expanded.filter, "tags:'%s'");
        assert_eq!(expanded.limit, Limit::Count(5));
    }

    #[test]
    fn test_entries_preserve_document_order() {
        let toml = r#"
            [collections."/z/"]
            permalink = "/z/{slug}/"
            [collections."/a/"]
            permalink = "/a/{slug}/"
        "#;
        let config: RoutesConfig = toml::from_str(toml).unwrap();
        let keys: Vec<_> = config.collections.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["/z/", "/a/"]);
    }
}
