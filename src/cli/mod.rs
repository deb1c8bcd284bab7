//! Command-line interface.

pub mod args;
pub mod paths;
pub mod query;
pub mod resolve;
pub mod validate;

pub use args::{Cli, Commands, QueryArgs};

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use crate::config::{self, Routing};
use crate::filter::FilterCache;
use crate::load::Loader;
use crate::log;
use crate::query::QueryProcessor;
use crate::resource::{Collector, NodeSet, Repository, ResourceKind};
use crate::router::RouterChain;
use crate::source::{ContentSource, FsSource};
use crate::utils::DateTimeUtc;

/// A fully collected site, shared by the path/resolve/query commands
pub struct Site {
    pub routing: Routing,
    pub chain: RouterChain,
    pub repository: Arc<Repository>,
    pub processor: QueryProcessor<FsSource>,
}

/// Load the routing config, validating it into the engine model.
pub fn load_routing(cli: &Cli) -> Result<Routing> {
    let raw = match config::load_routes_file(&cli.config) {
        Ok(raw) => raw,
        Err(diagnostics) => {
            eprintln!("{diagnostics}");
            std::process::exit(1);
        }
    };
    match raw.into_routing() {
        Ok(routing) => Ok(routing),
        Err(diagnostics) => {
            eprintln!("{diagnostics}");
            std::process::exit(1);
        }
    }
}

/// Collect all content into a repository and wire up the query pipeline.
pub async fn load_site(cli: &Cli) -> Result<Site> {
    let routing = load_routing(cli)?;
    let chain = RouterChain::from_routing(&routing)?;

    let source = Arc::new(FsSource::new(&cli.content));
    let nodes = NodeSet {
        posts: source.fetch_all(ResourceKind::Post, None).await?,
        pages: source.fetch_all(ResourceKind::Page, None).await?,
        authors: source.fetch_all(ResourceKind::Author, None).await?,
        tags: source.fetch_all(ResourceKind::Tag, None).await?,
    };

    let filters = FilterCache::new();
    let collector = Collector::new(&routing, &filters, collected_at());
    let resources = collector.collect(nodes)?;
    log!("collect"; "{} resource(s) from {}", resources.len(), cli.content.display());

    let repository = Arc::new(Repository::new());
    repository.set_many(resources);

    let loader = Loader::with_default_limiter(repository.clone(), source, true);
    let processor = QueryProcessor::new(repository.clone(), loader);

    Ok(Site {
        routing,
        chain,
        repository,
        processor,
    })
}

fn collected_at() -> DateTimeUtc {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    DateTimeUtc::from_unix_secs(secs)
}
