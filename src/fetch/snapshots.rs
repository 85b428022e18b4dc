use std::sync::Arc;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use tokio::sync::Semaphore;

use crate::error::FetchError;
use crate::fetch::{ensure_concurrency_limit, MarketDataProvider, SNAPSHOT_CONCURRENCY_LIMIT};

/// Daily price/volume record for one symbol, built per request.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub symbol: String,
    pub last_price: f64,
    pub open_price: f64,
    pub volume: u64,
    pub as_of_date: NaiveDate,
}

impl Snapshot {
    /// Intraday move from open to last, in percent. `None` when the open is zero.
    pub fn change_percent(&self) -> Option<f64> {
        if self.open_price == 0.0 {
            None
        } else {
            Some((self.last_price - self.open_price) / self.open_price * 100.0)
        }
    }
}

/// Fetches one symbol's snapshot and folds every provider outcome into a typed result.
#[derive(Clone)]
pub struct SnapshotFetcher {
    provider: Arc<dyn MarketDataProvider>,
    ticker_suffix: String,
}

impl SnapshotFetcher {
    pub fn new(provider: Arc<dyn MarketDataProvider>, ticker_suffix: impl Into<String>) -> Self {
        Self {
            provider,
            ticker_suffix: ticker_suffix.into(),
        }
    }

    pub fn ticker_for(&self, symbol: &str) -> String {
        format!("{}{}", symbol, self.ticker_suffix)
    }

    pub async fn fetch(&self, symbol: &str) -> Result<Snapshot, FetchError> {
        let ticker = self.ticker_for(symbol);
        let bar = match self.provider.get_daily_bar(&ticker).await {
            Ok(Some(bar)) => bar,
            Ok(None) => return Err(FetchError::no_data(symbol)),
            Err(err) => return Err(FetchError::provider(symbol, err)),
        };

        // A zero open leaves the change percent undefined; such symbols never reach the ranker.
        if bar.open == 0.0 || !bar.open.is_finite() || !bar.close.is_finite() {
            return Err(FetchError::no_data(symbol));
        }

        Ok(Snapshot {
            symbol: symbol.to_string(),
            last_price: bar.close,
            open_price: bar.open,
            volume: bar.volume,
            as_of_date: bar.date,
        })
    }
}

/// Outcome of a collection pass: every successful snapshot plus the number of symbols dropped.
#[derive(Debug, Default)]
pub struct Collected {
    pub successes: Vec<Snapshot>,
    pub failed_count: usize,
}

impl Collected {
    pub fn requested(&self) -> usize {
        self.successes.len() + self.failed_count
    }
}

/// Fans snapshot fetches out across tokio tasks.
///
/// Two limits apply: `worker_limit` bounds the tasks a single call keeps in
/// flight, and the semaphore (shared by every clone of the collector) bounds the
/// fetches in flight across all concurrent calls, so parallel requests do not
/// multiply the load on the provider.
#[derive(Clone)]
pub struct SnapshotCollector {
    fetcher: SnapshotFetcher,
    permits: Arc<Semaphore>,
}

impl SnapshotCollector {
    pub fn new(fetcher: SnapshotFetcher) -> Self {
        Self::with_max_in_flight(fetcher, SNAPSHOT_CONCURRENCY_LIMIT)
    }

    pub fn with_max_in_flight(fetcher: SnapshotFetcher, max_in_flight: usize) -> Self {
        Self {
            fetcher,
            permits: Arc::new(Semaphore::new(ensure_concurrency_limit(max_in_flight))),
        }
    }

    /// Fetch every symbol and wait for all of them. Failures are counted, never returned.
    pub async fn collect(&self, symbols: &[String], worker_limit: usize) -> Collected {
        let worker_limit = ensure_concurrency_limit(worker_limit);

        let outcomes: Vec<Result<Snapshot, FetchError>> = stream::iter(symbols.iter().cloned())
            .map(|symbol| {
                let fetcher = self.fetcher.clone();
                let permits = Arc::clone(&self.permits);
                async move {
                    let task_symbol = symbol.clone();
                    let handle = tokio::spawn(async move {
                        let Ok(_permit) = permits.acquire_owned().await else {
                            return Err(FetchError::provider(&task_symbol, "fetch pool closed"));
                        };
                        fetcher.fetch(&task_symbol).await
                    });

                    match handle.await {
                        Ok(outcome) => outcome,
                        Err(err) => Err(FetchError::provider(&symbol, err)),
                    }
                }
            })
            .buffer_unordered(worker_limit)
            .collect()
            .await;

        let mut collected = Collected::default();
        for outcome in outcomes {
            match outcome {
                Ok(snapshot) => collected.successes.push(snapshot),
                Err(err) => {
                    debug!("Dropping {}: {}", err.symbol(), err);
                    collected.failed_count += 1;
                }
            }
        }

        if collected.failed_count > 0 && collected.successes.is_empty() {
            warn!(
                "Every snapshot fetch failed ({} symbols)",
                collected.failed_count
            );
        } else {
            info!(
                "Collected {} of {} snapshots ({} failed)",
                collected.successes.len(),
                collected.requested(),
                collected.failed_count
            );
        }

        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::DailyBar;
    use crate::testing::FakeProvider;
    use std::time::Duration;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    fn bar(open: f64, close: f64, volume: u64) -> DailyBar {
        DailyBar {
            open,
            close,
            volume,
            date: day(),
        }
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn fetch_appends_suffix_and_strips_it_from_snapshot() {
        let provider = FakeProvider::new().with_bar("RELIANCE.NS", bar(100.0, 110.0, 42));
        let fetcher = SnapshotFetcher::new(Arc::new(provider), ".NS");

        let snapshot = fetcher.fetch("RELIANCE").await.unwrap();

        assert_eq!(snapshot.symbol, "RELIANCE");
        assert_eq!(snapshot.volume, 42);
        assert!((snapshot.change_percent().unwrap() - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn fetch_classifies_failures() {
        let provider = FakeProvider::new()
            .with_empty("EMPTY.NS")
            .with_failure("DOWN.NS")
            .with_bar("ZERO.NS", bar(0.0, 5.0, 1));
        let fetcher = SnapshotFetcher::new(Arc::new(provider), ".NS");

        assert_eq!(
            fetcher.fetch("EMPTY").await.unwrap_err(),
            FetchError::no_data("EMPTY")
        );
        assert!(matches!(
            fetcher.fetch("DOWN").await.unwrap_err(),
            FetchError::ProviderFailure { .. }
        ));
        assert_eq!(
            fetcher.fetch("ZERO").await.unwrap_err(),
            FetchError::no_data("ZERO")
        );
        // Symbols the fake was never told about behave like an empty window.
        assert_eq!(
            fetcher.fetch("UNKNOWN").await.unwrap_err(),
            FetchError::no_data("UNKNOWN")
        );
    }

    #[test]
    fn change_percent_undefined_for_zero_open() {
        let snapshot = Snapshot {
            symbol: "X".to_string(),
            last_price: 10.0,
            open_price: 0.0,
            volume: 0,
            as_of_date: day(),
        };
        assert_eq!(snapshot.change_percent(), None);
    }

    #[tokio::test]
    async fn collect_drops_and_counts_failures() {
        let provider = FakeProvider::new()
            .with_bar("A.NS", bar(100.0, 110.0, 10))
            .with_bar("B.NS", bar(50.0, 48.0, 20))
            .with_failure("C.NS");
        let collector = SnapshotCollector::new(SnapshotFetcher::new(Arc::new(provider), ".NS"));

        let collected = collector.collect(&symbols(&["A", "B", "C"]), 10).await;

        let mut got: Vec<&str> = collected
            .successes
            .iter()
            .map(|s| s.symbol.as_str())
            .collect();
        got.sort();
        assert_eq!(got, vec!["A", "B"]);
        assert_eq!(collected.failed_count, 1);
        assert_eq!(collected.requested(), 3);
    }

    #[tokio::test]
    async fn collect_with_every_fetch_failing_is_empty() {
        let provider = FakeProvider::new().with_failure("A.NS").with_empty("B.NS");
        let collector = SnapshotCollector::new(SnapshotFetcher::new(Arc::new(provider), ".NS"));

        let collected = collector.collect(&symbols(&["A", "B"]), 4).await;

        assert!(collected.successes.is_empty());
        assert_eq!(collected.failed_count, 2);
    }

    #[tokio::test]
    async fn collect_survives_panicking_provider() {
        let provider = FakeProvider::new()
            .with_bar("A.NS", bar(1.0, 2.0, 1))
            .with_panic("BOOM.NS");
        let collector = SnapshotCollector::new(SnapshotFetcher::new(Arc::new(provider), ".NS"));

        let collected = collector.collect(&symbols(&["A", "BOOM"]), 2).await;

        assert_eq!(collected.successes.len(), 1);
        assert_eq!(collected.failed_count, 1);
    }

    #[tokio::test]
    async fn collect_respects_worker_limit() {
        let provider = Arc::new(FakeProvider::new().with_delay(Duration::from_millis(20)));
        let list: Vec<String> = (0..12).map(|i| format!("S{i}")).collect();
        let collector = SnapshotCollector::with_max_in_flight(
            SnapshotFetcher::new(provider.clone(), ""),
            100,
        );

        let collected = collector.collect(&list, 3).await;

        assert_eq!(collected.failed_count, 12);
        assert!(provider.max_in_flight() <= 3);
        assert!(provider.max_in_flight() >= 1);
    }

    #[tokio::test]
    async fn shared_cap_bounds_concurrent_collections() {
        let provider = Arc::new(FakeProvider::new().with_delay(Duration::from_millis(20)));
        let list: Vec<String> = (0..8).map(|i| format!("S{i}")).collect();
        let collector =
            SnapshotCollector::with_max_in_flight(SnapshotFetcher::new(provider.clone(), ""), 2);

        let first = collector.clone();
        let second = collector.clone();
        let (a, b) = tokio::join!(first.collect(&list, 8), second.collect(&list, 8));

        assert_eq!(a.requested() + b.requested(), 16);
        assert!(provider.max_in_flight() <= 2);
    }

    #[tokio::test]
    async fn collect_of_nothing_is_empty() {
        let collector =
            SnapshotCollector::new(SnapshotFetcher::new(Arc::new(FakeProvider::new()), ".NS"));

        let collected = collector.collect(&[], 0).await;

        assert!(collected.successes.is_empty());
        assert_eq!(collected.failed_count, 0);
    }
}
