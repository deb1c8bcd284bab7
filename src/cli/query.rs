//! `signpost query` - run a browse query from the command line.

use anyhow::{Result, anyhow};
use serde_json::json;

use crate::config::Limit;
use crate::query::BrowseQuery;
use crate::resource::ResourceKind;

use super::{Cli, QueryArgs, load_site};

pub async fn run(cli: &Cli, args: &QueryArgs) -> Result<()> {
    let resource: ResourceKind = args.resource.parse().map_err(|e: String| anyhow!(e))?;
    let limit = parse_limit(&args.limit)?;

    let site = load_site(cli).await?;
    let outcome = site
        .processor
        .browse(&BrowseQuery {
            resource,
            filter: args.filter.clone(),
            limit,
            order: args.order.clone(),
            page: args.page,
        })
        .await?;

    let output = json!({
        "entities": outcome.entities,
        "pagination": outcome.pagination,
    });
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");
    Ok(())
}

fn parse_limit(raw: &str) -> Result<Limit> {
    if raw == "all" {
        return Ok(Limit::All);
    }
    match raw.parse::<u32>() {
        Ok(count) if count > 0 => Ok(Limit::Count(count)),
        _ => Err(anyhow!("limit must be a positive number or \"all\", got `{raw}`")),
    }
}
