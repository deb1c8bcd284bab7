//! Signpost - content routing and resolution engine.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use signpost::cli::{self, Cli, Commands};
use signpost::logger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Validate => cli::validate::run(&cli),
        Commands::Paths { json } => cli::paths::run(&cli, *json).await,
        Commands::Resolve { path, data, pretty } => {
            cli::resolve::run(&cli, path, *data, *pretty).await
        }
        Commands::Query { args } => cli::query::run(&cli, args).await,
    }
}
