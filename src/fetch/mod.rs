use crate::error::Result;

pub mod provider;
pub mod snapshots;
pub mod yahoo;

pub use provider::{DailyBar, HistoryRow, MarketDataProvider};
pub use snapshots::{Collected, Snapshot, SnapshotCollector, SnapshotFetcher};
pub use yahoo::YahooChartProvider;

/// Default concurrency guard applied when issuing snapshot requests.
pub const SNAPSHOT_CONCURRENCY_LIMIT: usize = 10;

pub type FetchResult<T> = Result<T>;

#[inline]
pub fn ensure_concurrency_limit(limit: usize) -> usize {
    limit.max(1)
}
