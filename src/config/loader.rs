use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Context, Result};
use crate::universe::UniverseTier;

use super::{Config, IndexConfig};

/// Read the JSON file at `path`. Missing keys keep their builtin value.
pub fn load_config(path: &Path) -> Result<Config> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config JSON at {}", path.display()))?;

    let raw: RawConfig = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse config JSON at {}", path.display()))?;

    let root = path.parent().unwrap_or_else(|| Path::new("."));
    raw.into_config(root)
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    listen_addr: Option<String>,
    universe_dir: Option<String>,
    #[serde(default)]
    ranking: RawRankingConfig,
    #[serde(default)]
    provider: RawProviderConfig,
    indices: Option<Vec<RawIndex>>,
    history_window_days: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawRankingConfig {
    tier: Option<String>,
    limit: Option<usize>,
    worker_limit: Option<usize>,
    max_in_flight: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawProviderConfig {
    chart_endpoint: Option<String>,
    ticker_suffix: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIndex {
    name: String,
    symbol: String,
}

impl RawConfig {
    fn into_config(self, root: &Path) -> Result<Config> {
        let mut config = Config::builtin();

        if let Some(addr) = self.listen_addr {
            config.listen_addr = addr;
        }
        if let Some(dir) = self.universe_dir {
            config.universe_dir = normalize_path(root, dir);
        }

        if let Some(tier) = self.ranking.tier {
            config.ranking.tier = tier.parse::<UniverseTier>()?;
        }
        if let Some(limit) = self.ranking.limit {
            config.ranking.limit = limit;
        }
        if let Some(worker_limit) = self.ranking.worker_limit {
            config.ranking.worker_limit = worker_limit;
        }
        if let Some(max_in_flight) = self.ranking.max_in_flight {
            config.ranking.max_in_flight = max_in_flight;
        }

        let provider = &mut config.provider;
        if let Some(endpoint) = self.provider.chart_endpoint {
            provider.chart_endpoint = endpoint;
        }
        if let Some(suffix) = self.provider.ticker_suffix {
            provider.ticker_suffix = suffix;
        }
        if let Some(timeout) = self.provider.timeout_secs {
            provider.timeout_secs = timeout;
        }
        if let Some(user_agent) = self.provider.user_agent {
            provider.user_agent = user_agent;
        }

        if let Some(indices) = self.indices {
            config.indices = indices
                .into_iter()
                .map(|index| IndexConfig {
                    name: index.name,
                    symbol: index.symbol,
                })
                .collect();
        }
        if let Some(days) = self.history_window_days {
            config.history_window_days = days;
        }

        Ok(config)
    }
}

fn normalize_path(root: &Path, value: String) -> PathBuf {
    let path = PathBuf::from(&value);
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}
