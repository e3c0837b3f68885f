//! Market CLI - Run the marketplace resolution engine against a catalog.
//!
//! Commands:
//! - `market search` - Search with fallback across configured backends
//! - `market recommend` - Personalized recommendations for a shopper
//! - `market related` - Products related to a product
//! - `market popular` - Popular products
//! - `market on-sale` - Products on sale

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use market_sdk::prelude::{init_tracing, LogFormat};

use commands::{LimitArgs, RecommendArgs, RelatedArgs, SearchArgs};

/// Market CLI - Search and recommendations over a marketplace catalog
#[derive(Parser)]
#[command(name = "market")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Catalog fixture path (overrides the config file)
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Log format: human or json
    #[arg(long, global = true, default_value_t = LogFormat::Human)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search(SearchArgs),

    /// Recommend products for a shopper
    Recommend(RecommendArgs),

    /// List products related to a product
    Related(RelatedArgs),

    /// List popular products
    Popular(LimitArgs),

    /// List products on sale
    OnSale(LimitArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose { "debug" } else { "warn" };
    init_tracing(cli.log_format, directive);

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = match context::Context::load(cli.config.as_deref(), cli.catalog.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Search(args) => commands::search::run(args, &ctx).await,
        Commands::Recommend(args) => commands::recommend::run(args, &ctx).await,
        Commands::Related(args) => commands::recommend::related(args, &ctx).await,
        Commands::Popular(args) => commands::recommend::popular(args, &ctx).await,
        Commands::OnSale(args) => commands::recommend::on_sale(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
