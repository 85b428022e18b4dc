//! In-memory collaborators shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::fetch::{DailyBar, FetchResult, HistoryRow, MarketDataProvider};
use crate::universe::{Symbol, SymbolUniverse, UniverseTier};

#[derive(Clone)]
enum Reply<T> {
    Data(T),
    Empty,
    Failure,
    Panic,
}

#[derive(Default)]
pub struct FakeProvider {
    bars: HashMap<String, Reply<DailyBar>>,
    history: HashMap<String, Reply<Vec<HistoryRow>>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    history_calls: std::sync::Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bar(mut self, ticker: &str, bar: DailyBar) -> Self {
        self.bars.insert(ticker.to_string(), Reply::Data(bar));
        self
    }

    pub fn with_empty(mut self, ticker: &str) -> Self {
        self.bars.insert(ticker.to_string(), Reply::Empty);
        self
    }

    pub fn with_failure(mut self, ticker: &str) -> Self {
        self.bars.insert(ticker.to_string(), Reply::Failure);
        self
    }

    pub fn with_panic(mut self, ticker: &str) -> Self {
        self.bars.insert(ticker.to_string(), Reply::Panic);
        self
    }

    pub fn with_history(mut self, ticker: &str, rows: Vec<HistoryRow>) -> Self {
        self.history.insert(ticker.to_string(), Reply::Data(rows));
        self
    }

    pub fn with_history_failure(mut self, ticker: &str) -> Self {
        self.history.insert(ticker.to_string(), Reply::Failure);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Highest number of `get_daily_bar` calls observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> Vec<(String, NaiveDate, NaiveDate)> {
        self.history_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    async fn get_daily_bar(&self, ticker: &str) -> FetchResult<Option<DailyBar>> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.bars.get(ticker).cloned() {
            Some(Reply::Data(bar)) => Ok(Some(bar)),
            Some(Reply::Empty) | None => Ok(None),
            Some(Reply::Failure) => Err(AppError::message(format!("{ticker}: connection reset"))),
            Some(Reply::Panic) => panic!("provider blew up on {ticker}"),
        }
    }

    async fn get_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FetchResult<Vec<HistoryRow>> {
        self.history_calls
            .lock()
            .unwrap()
            .push((ticker.to_string(), start, end));

        match self.history.get(ticker).cloned() {
            Some(Reply::Data(rows)) => Ok(rows),
            Some(Reply::Empty) | None => Ok(Vec::new()),
            Some(Reply::Failure) => Err(AppError::message(format!("{ticker}: timed out"))),
            Some(Reply::Panic) => panic!("provider blew up on {ticker}"),
        }
    }
}

#[derive(Default)]
pub struct StaticUniverse {
    tiers: HashMap<UniverseTier, Vec<Symbol>>,
}

impl StaticUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tier(mut self, tier: UniverseTier, symbols: Vec<Symbol>) -> Self {
        self.tiers.insert(tier, symbols);
        self
    }
}

#[async_trait]
impl SymbolUniverse for StaticUniverse {
    async fn get_symbols(&self, tier: UniverseTier) -> Result<Vec<Symbol>> {
        self.tiers
            .get(&tier)
            .cloned()
            .ok_or_else(|| AppError::message(format!("universe tier {tier} unavailable")))
    }
}
