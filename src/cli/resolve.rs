//! `signpost resolve` - resolve a request path.

use anyhow::Result;

use crate::controller::Controller;
use crate::core::UrlPath;
use crate::log;

use super::{Cli, load_site};

pub async fn run(cli: &Cli, path: &str, data: bool, pretty: bool) -> Result<()> {
    let site = load_site(cli).await?;
    let url = UrlPath::from_request(path);
    let contexts = site.chain.handle(&url);

    if contexts.is_empty() {
        log!("resolve"; "no routing context for {url}");
        std::process::exit(1);
    }

    if data {
        let controller = Controller::new(&site.processor);
        match controller.render(contexts).await {
            Ok(render) => print_json(&render, pretty)?,
            Err(e) if e.is_not_found() => {
                log!("resolve"; "{url} resolved but no candidate yielded data: {e}");
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        print_json(&contexts, pretty)?;
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
