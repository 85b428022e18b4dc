use async_trait::async_trait;
use chrono::NaiveDate;

use super::FetchResult;

/// Most recent one-day price bar for a ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    pub open: f64,
    pub close: f64,
    pub volume: u64,
    pub date: NaiveDate,
}

/// One day of index history. `close` is `None` when the provider emitted a row
/// without a price (holidays, partial sessions).
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

impl HistoryRow {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close: Some(close),
        }
    }
}

/// External market-data source. Tickers are provider-specific identifiers.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// `Ok(None)` means the provider answered but had no bar for the window.
    async fn get_daily_bar(&self, ticker: &str) -> FetchResult<Option<DailyBar>>;

    /// Daily closes in `[start, end)`, ordered by date.
    async fn get_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FetchResult<Vec<HistoryRow>>;
}
