use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::config::{Config, IndexConfig, RankingConfig};
use crate::error::{AppError, Result};
use crate::fetch::{
    Collected, MarketDataProvider, SnapshotCollector, SnapshotFetcher, YahooChartProvider,
};
use crate::market::{self, IndexChange, MoverRow, SearchHit, VolumeRow};
use crate::universe::{CsvUniverseStore, Symbol, SymbolUniverse, UniverseTier};

/// Ranked rows plus how many symbols of the ranking universe could not be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    pub rows: Vec<T>,
    pub failed_count: usize,
}

/// Operations exposed to the HTTP and CLI front ends. Collaborators are injected.
pub struct MarketService {
    universe: Arc<dyn SymbolUniverse>,
    provider: Arc<dyn MarketDataProvider>,
    collector: SnapshotCollector,
    ranking: RankingConfig,
    indices: Vec<IndexConfig>,
    history_window_days: i64,
}

impl MarketService {
    pub fn new(
        config: &Config,
        universe: Arc<dyn SymbolUniverse>,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Self {
        let fetcher = SnapshotFetcher::new(
            Arc::clone(&provider),
            config.provider.ticker_suffix.clone(),
        );
        let collector =
            SnapshotCollector::with_max_in_flight(fetcher, config.ranking.max_in_flight);

        Self {
            universe,
            provider,
            collector,
            ranking: config.ranking.clone(),
            indices: config.indices.clone(),
            history_window_days: config.history_window_days,
        }
    }

    /// Wire the CSV universe store and the Yahoo chart provider from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let universe = Arc::new(CsvUniverseStore::new(config.universe_dir.clone()));
        let provider = Arc::new(YahooChartProvider::new(&config.provider)?);
        Ok(Self::new(config, universe, provider))
    }

    async fn collect_ranking_universe(&self) -> Result<Collected> {
        let symbols: Vec<String> = self
            .universe
            .get_symbols(self.ranking.tier)
            .await?
            .into_iter()
            .map(|entry| entry.symbol)
            .collect();

        Ok(self
            .collector
            .collect(&symbols, self.ranking.worker_limit)
            .await)
    }

    pub async fn top_gainers(&self) -> Result<Ranked<MoverRow>> {
        let collected = self.collect_ranking_universe().await?;
        Ok(Ranked {
            rows: market::top_gainers(collected.successes, self.ranking.limit),
            failed_count: collected.failed_count,
        })
    }

    pub async fn top_losers(&self) -> Result<Ranked<MoverRow>> {
        let collected = self.collect_ranking_universe().await?;
        Ok(Ranked {
            rows: market::top_losers(collected.successes, self.ranking.limit),
            failed_count: collected.failed_count,
        })
    }

    pub async fn top_volume(&self) -> Result<Ranked<VolumeRow>> {
        let collected = self.collect_ranking_universe().await?;
        Ok(Ranked {
            rows: market::top_volume(collected.successes, self.ranking.limit),
            failed_count: collected.failed_count,
        })
    }

    /// Search the full universe. A missing query is rejected; an empty one matches everything.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<SearchHit>> {
        let query =
            query.ok_or_else(|| AppError::invalid_input("missing search query parameter `data`"))?;
        let universe = self.universe.get_symbols(UniverseTier::All).await?;
        Ok(market::search(&universe, query))
    }

    pub async fn index_snapshot(&self) -> Vec<IndexChange> {
        self.index_snapshot_at(Local::now().date_naive()).await
    }

    pub async fn index_snapshot_at(&self, today: NaiveDate) -> Vec<IndexChange> {
        market::aggregate(
            self.provider.as_ref(),
            &self.indices,
            today,
            self.history_window_days,
        )
        .await
    }

    /// List one universe tier by its wire name (`nifty_50`, `nifty_all`, ...).
    pub async fn list_stocks(&self, model: Option<&str>) -> Result<Vec<Symbol>> {
        let model = model.ok_or_else(|| AppError::invalid_input("missing parameter `model`"))?;
        let tier = model.parse::<UniverseTier>()?;
        self.universe.get_symbols(tier).await
    }
}
