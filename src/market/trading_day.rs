use chrono::NaiveDate;

use crate::fetch::HistoryRow;

/// Closes of the two most recent completed trading days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradingDayCloses {
    pub last_date: NaiveDate,
    pub last_close: f64,
    pub prev_date: NaiveDate,
    pub prev_close: f64,
}

/// Pick the latest trading day's close and the one before it.
///
/// Rows without a finite close are non-trading rows and skipped; duplicate
/// dates keep the later row. Returns `None` with fewer than two trading days.
pub fn resolve_last_trading_days(rows: &[HistoryRow]) -> Option<TradingDayCloses> {
    let mut trading: Vec<(NaiveDate, f64)> = rows
        .iter()
        .filter_map(|row| {
            let close = row.close.filter(|close| close.is_finite())?;
            Some((row.date, close))
        })
        .collect();

    trading.sort_by(|a, b| a.0.cmp(&b.0));
    trading.dedup_by(|later, earlier| {
        if later.0 == earlier.0 {
            *earlier = *later;
            true
        } else {
            false
        }
    });

    let (last_date, last_close) = *trading.last()?;
    let (prev_date, prev_close) = *trading.iter().rev().nth(1)?;

    Some(TradingDayCloses {
        last_date,
        last_close,
        prev_date,
        prev_close,
    })
}
