use std::cmp::Ordering;

use serde::Serialize;

use crate::fetch::Snapshot;

/// Number of rows a ranking returns unless configured otherwise.
pub const DEFAULT_RANK_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Stable sort by `key_fn` in `direction`, then keep the first `limit` items.
/// Incomparable keys (NaN) are treated as equal and keep their input order.
pub fn rank<T, K, F>(mut items: Vec<T>, key_fn: F, direction: Direction, limit: usize) -> Vec<T>
where
    F: Fn(&T) -> K,
    K: PartialOrd,
{
    items.sort_by(|a, b| {
        let ordering = key_fn(a)
            .partial_cmp(&key_fn(b))
            .unwrap_or(Ordering::Equal);
        match direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });
    items.truncate(limit);
    items
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoverRow {
    pub symbol: String,
    pub price: f64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeRow {
    pub symbol: String,
    pub volume: u64,
    pub price: f64,
}

fn mover_rows(snapshots: Vec<Snapshot>) -> Vec<MoverRow> {
    snapshots
        .into_iter()
        .filter_map(|snapshot| {
            let change_percent = snapshot.change_percent()?;
            Some(MoverRow {
                symbol: snapshot.symbol,
                price: snapshot.last_price,
                change_percent,
            })
        })
        .collect()
}

pub fn top_gainers(snapshots: Vec<Snapshot>, limit: usize) -> Vec<MoverRow> {
    rank(
        mover_rows(snapshots),
        |row| row.change_percent,
        Direction::Descending,
        limit,
    )
}

pub fn top_losers(snapshots: Vec<Snapshot>, limit: usize) -> Vec<MoverRow> {
    rank(
        mover_rows(snapshots),
        |row| row.change_percent,
        Direction::Ascending,
        limit,
    )
}

pub fn top_volume(snapshots: Vec<Snapshot>, limit: usize) -> Vec<VolumeRow> {
    let rows = snapshots
        .into_iter()
        .map(|snapshot| VolumeRow {
            symbol: snapshot.symbol,
            volume: snapshot.volume,
            price: snapshot.last_price,
        })
        .collect();
    rank(rows, |row| row.volume, Direction::Descending, limit)
}
