//! CLI command implementations.

pub mod recommend;
pub mod search;

use clap::Args;

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search text (may be empty to browse).
    #[arg(default_value = "")]
    pub query: String,

    /// Filters as a query string, e.g. "category=electronics&minPrice=50&sort=price_asc".
    #[arg(short, long, default_value = "")]
    pub filters: String,

    /// Show which backends were attempted.
    #[arg(long)]
    pub report: bool,
}

/// Arguments for the recommend command.
#[derive(Args)]
pub struct RecommendArgs {
    /// Shopper id (omit for anonymous).
    #[arg(short, long)]
    pub user: Option<String>,

    /// Maximum number of products.
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Also print the shopper's preference profile.
    #[arg(long)]
    pub profile: bool,
}

/// Arguments for the related command.
#[derive(Args)]
pub struct RelatedArgs {
    /// Reference product id.
    pub product: String,

    /// Maximum number of products.
    #[arg(short, long, default_value_t = 8)]
    pub limit: usize,
}

/// Arguments for list commands.
#[derive(Args)]
pub struct LimitArgs {
    /// Maximum number of products.
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
}
