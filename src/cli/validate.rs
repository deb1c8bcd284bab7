//! `signpost validate` - check the routing configuration.

use anyhow::Result;

use crate::log;

use super::{Cli, load_routing};

pub fn run(cli: &Cli) -> Result<()> {
    let routing = load_routing(cli)?;

    log!(
        "validate";
        "{} valid: {} route(s), {} collection(s), {} taxonomies",
        cli.config.display(),
        routing.routes.len(),
        routing.collections.len(),
        routing.taxonomies.len()
    );
    Ok(())
}
