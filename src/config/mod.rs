use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fetch::SNAPSHOT_CONCURRENCY_LIMIT;
use crate::market::indices::DEFAULT_HISTORY_WINDOW_DAYS;
use crate::market::ranker::DEFAULT_RANK_LIMIT;
use crate::universe::UniverseTier;

pub mod loader;
pub mod validator;

pub const DEFAULT_CONFIG_PATH: &str = "assets/config.json";

/// A named market index and the provider symbol its history is requested under.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    pub name: String,
    pub symbol: String,
}

impl IndexConfig {
    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankingConfig {
    pub tier: UniverseTier,
    pub limit: usize,
    pub worker_limit: usize,
    /// Cap on fetches in flight across every concurrent request.
    pub max_in_flight: usize,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub chart_endpoint: String,
    pub ticker_suffix: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub universe_dir: PathBuf,
    pub ranking: RankingConfig,
    pub provider: ProviderConfig,
    pub indices: Vec<IndexConfig>,
    pub history_window_days: i64,
}

impl Config {
    pub fn builtin() -> Self {
        Config {
            listen_addr: "0.0.0.0:8080".to_string(),
            universe_dir: PathBuf::from("assets/universe"),
            ranking: RankingConfig {
                tier: UniverseTier::Nifty100,
                limit: DEFAULT_RANK_LIMIT,
                worker_limit: SNAPSHOT_CONCURRENCY_LIMIT,
                max_in_flight: SNAPSHOT_CONCURRENCY_LIMIT,
            },
            provider: ProviderConfig {
                chart_endpoint: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
                ticker_suffix: ".NS".to_string(),
                timeout_secs: 10,
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
            },
            indices: vec![
                IndexConfig::new("NIFTY 50", "^NSEI"),
                IndexConfig::new("BANKNIFTY", "^NSEBANK"),
                IndexConfig::new("SENSEX", "^BSESN"),
            ],
            history_window_days: DEFAULT_HISTORY_WINDOW_DAYS,
        }
    }

    /// Load the JSON config at `path`, layering it over the builtin defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = loader::load_config(path.as_ref())?;
        validator::validate_config(&config)?;
        Ok(config)
    }

    /// Load `path` when it exists, otherwise fall back to [`Config::builtin`].
    pub fn load_or_builtin(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::info!(
                "No config found at {}, using builtin defaults",
                path.display()
            );
            Ok(Self::builtin())
        }
    }
}
