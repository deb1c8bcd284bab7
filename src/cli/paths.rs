//! `signpost paths` - enumerate the static path list.

use anyhow::Result;

use crate::log;

use super::{Cli, load_site};

pub async fn run(cli: &Cli, json: bool) -> Result<()> {
    let site = load_site(cli).await?;
    let resources = site.repository.find_all(None);
    let paths = site.chain.resolve_paths(&resources);

    if json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else {
        for path in &paths {
            println!("{path}");
        }
    }
    log!("paths"; "{} static path(s)", paths.len());
    Ok(())
}
