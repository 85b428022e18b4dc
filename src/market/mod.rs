pub mod indices;
pub mod ranker;
pub mod search;
pub mod trading_day;

pub use indices::{aggregate, percent_change, IndexChange, MAX_HISTORY_WINDOW_DAYS};
pub use ranker::{rank, top_gainers, top_losers, top_volume, Direction, MoverRow, VolumeRow};
pub use search::{search, MatchTier, SearchHit};
pub use trading_day::{resolve_last_trading_days, TradingDayCloses};
