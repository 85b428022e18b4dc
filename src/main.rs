mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use cli::{Cli, Commands};
use tradesight::api;
use tradesight::config::{validator, Config};
use tradesight::response::Envelope;
use tradesight::service::{MarketService, Ranked};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config =
        Config::load_or_builtin(&cli.config).context("Failed to load configuration")?;
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
        validator::validate_config(&config)?;
    }

    let service = Arc::new(
        MarketService::from_config(&config).context("Failed to initialise market service")?,
    );

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => api::serve(&config, service).await?,
        Commands::Gainers => print_ranked(service.top_gainers().await)?,
        Commands::Losers => print_ranked(service.top_losers().await)?,
        Commands::Volume => print_ranked(service.top_volume().await)?,
        Commands::Search { query } => print_result(service.search(Some(query.as_str())).await)?,
        Commands::Indices => print_result(Ok(service.index_snapshot().await))?,
        Commands::Stocks { tier } => print_result(service.list_stocks(Some(tier.as_str())).await)?,
    }

    Ok(())
}

fn print_envelope<T: Serialize>(envelope: &Envelope<T>) -> Result<()> {
    let json = serde_json::to_string_pretty(envelope).context("Failed to serialise response")?;
    println!("{}", json);
    Ok(())
}

fn print_result<T: Serialize>(result: tradesight::Result<T>) -> Result<()> {
    match result {
        Ok(data) => print_envelope(&Envelope::success(data)),
        Err(err) => {
            print_envelope(&Envelope::<()>::failure(&err))?;
            Err(err.into())
        }
    }
}

fn print_ranked<T: Serialize>(result: tradesight::Result<Ranked<T>>) -> Result<()> {
    match result {
        Ok(ranked) => print_envelope(&Envelope::ranked(ranked.rows, ranked.failed_count)),
        Err(err) => {
            print_envelope(&Envelope::<()>::failure(&err))?;
            Err(err.into())
        }
    }
}
