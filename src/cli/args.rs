//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Signpost content-routing engine CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Routing config file path (default: routes.toml)
    #[arg(short = 'C', long, global = true, default_value = "routes.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Content directory path
    #[arg(short, long, global = true, default_value = "content", value_hint = clap::ValueHint::DirPath)]
    pub content: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate the routing configuration
    #[command(visible_alias = "v")]
    Validate,

    /// Enumerate every static path for a build
    #[command(visible_alias = "p")]
    Paths {
        /// Output as a JSON array instead of one path per line
        #[arg(short, long)]
        json: bool,
    },

    /// Resolve a request path to its routing contexts
    #[command(visible_alias = "r")]
    Resolve {
        /// Request path (e.g. /tag/photo/page/2/)
        path: String,

        /// Run the contexts' data queries and print the render context
        #[arg(short, long)]
        data: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Run a browse query against the content store
    #[command(visible_alias = "q")]
    Query {
        #[command(flatten)]
        args: QueryArgs,
    },
}

/// Query command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct QueryArgs {
    /// Resource kind (post, page, author, tag)
    #[arg(default_value = "post")]
    pub resource: String,

    /// Filter expression (e.g. "tag:photo")
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Sort order, `-` prefix for descending (e.g. "-date,title")
    #[arg(short, long)]
    pub order: Option<String>,

    /// Page size, a number or "all"
    #[arg(short, long, default_value = "15")]
    pub limit: String,

    /// Page number
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Pretty-print JSON output
    #[arg(short = 'P', long)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from(["signpost", "resolve", "/tag/photo/", "--data"]).unwrap();
        let Commands::Resolve { path, data, pretty } = &cli.command else {
            panic!("expected resolve command");
        };
        assert_eq!(path, "/tag/photo/");
        assert!(*data);
        assert!(!*pretty);
    }

    #[test]
    fn test_parse_query_alias_and_defaults() {
        let cli = Cli::try_parse_from(["signpost", "q", "tag", "--limit", "all"]).unwrap();
        let Commands::Query { args } = &cli.command else {
            panic!("expected query command");
        };
        assert_eq!(args.resource, "tag");
        assert_eq!(args.limit, "all");
        assert_eq!(args.page, 1);
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "signpost", "paths", "--json", "-C", "custom.toml", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert!(matches!(cli.command, Commands::Paths { json: true }));
    }
}
