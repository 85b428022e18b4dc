use clap::{Parser, Subcommand};

use tradesight::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(name = "tradesight")]
#[command(about = "Market movers, index changes and symbol search over the NSE universe")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Override the configured listen address (e.g. 127.0.0.1:8080)
    #[arg(short, long)]
    pub listen: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API (default)
    Serve,

    /// Print the top gainers of the ranking universe
    Gainers,

    /// Print the top losers of the ranking universe
    Losers,

    /// Print the most traded symbols of the ranking universe
    Volume,

    /// Search symbols and names
    Search {
        /// Free-text query, matched case-insensitively
        query: String,
    },

    /// Print last-vs-previous trading-day change for the configured indices
    Indices,

    /// List one universe tier (nifty_all, nifty_50, nifty_100, nifty_200, nifty_500)
    Stocks {
        tier: String,
    },
}
