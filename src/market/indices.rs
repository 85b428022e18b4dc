use chrono::{Duration, NaiveDate};
use log::warn;
use serde::Serialize;

use crate::config::IndexConfig;
use crate::fetch::MarketDataProvider;

use super::trading_day::resolve_last_trading_days;

/// Calendar days of history requested per index; wide enough to span a long weekend.
pub const DEFAULT_HISTORY_WINDOW_DAYS: i64 = 7;

/// Longest history window accepted from config.
pub const MAX_HISTORY_WINDOW_DAYS: i64 = 366;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexChange {
    pub name: String,
    pub change: f64,
}

/// Percent change from `prev` to `last`, rounded to two decimals. Zero when `prev` is zero.
pub fn percent_change(last: f64, prev: f64) -> f64 {
    if prev == 0.0 {
        return 0.0;
    }
    let change = (last - prev) / prev * 100.0;
    (change * 100.0).round() / 100.0
}

/// Last-vs-previous trading-day change for each index, in configured order.
///
/// Indices are fetched one after another. Any index whose history cannot be
/// fetched or holds fewer than two trading days is left out.
pub async fn aggregate(
    provider: &dyn MarketDataProvider,
    indices: &[IndexConfig],
    today: NaiveDate,
    window_days: i64,
) -> Vec<IndexChange> {
    let Some(start) =
        Duration::try_days(window_days).and_then(|window| today.checked_sub_signed(window))
    else {
        warn!(
            "Skipping {} indices: a {} day window before {} is out of range",
            indices.len(),
            window_days,
            today
        );
        return Vec::new();
    };

    let mut changes = Vec::with_capacity(indices.len());

    for index in indices {
        let rows = match provider.get_history(&index.symbol, start, today).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!("Skipping index {}: history request failed: {}", index.name, err);
                continue;
            }
        };

        let Some(closes) = resolve_last_trading_days(&rows) else {
            warn!(
                "Skipping index {}: fewer than two trading days between {} and {}",
                index.name, start, today
            );
            continue;
        };

        changes.push(IndexChange {
            name: index.name.clone(),
            change: percent_change(closes.last_close, closes.prev_close),
        });
    }

    changes
}
