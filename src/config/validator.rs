use std::collections::HashSet;
use std::net::SocketAddr;

use crate::error::{AppError, Result};
use crate::market::indices::MAX_HISTORY_WINDOW_DAYS;

use super::Config;

/// Validate a loaded config and surface every issue in a single error.
pub fn validate_config(config: &Config) -> Result<()> {
    let mut issues = Vec::new();

    validate_listen_addr(config, &mut issues);
    validate_ranking(config, &mut issues);
    validate_provider(config, &mut issues);
    validate_indices(config, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "config invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_listen_addr(config: &Config, issues: &mut Vec<String>) {
    if config.listen_addr.parse::<SocketAddr>().is_err() {
        issues.push(format!(
            "listen_addr `{}` is not a valid socket address",
            config.listen_addr
        ));
    }
}

fn validate_ranking(config: &Config, issues: &mut Vec<String>) {
    if config.ranking.limit == 0 {
        issues.push("ranking.limit must be greater than zero".to_string());
    }
    if config.ranking.worker_limit == 0 {
        issues.push("ranking.worker_limit must be greater than zero".to_string());
    }
    if config.ranking.max_in_flight == 0 {
        issues.push("ranking.max_in_flight must be greater than zero".to_string());
    }
}

fn validate_provider(config: &Config, issues: &mut Vec<String>) {
    let endpoint = config.provider.chart_endpoint.trim();
    if endpoint.is_empty() {
        issues.push("provider.chart_endpoint must not be empty".to_string());
    } else if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        issues.push(format!(
            "provider.chart_endpoint `{endpoint}` must be an http(s) URL"
        ));
    }
    if config.provider.timeout_secs == 0 {
        issues.push("provider.timeout_secs must be greater than zero".to_string());
    }
}

fn validate_indices(config: &Config, issues: &mut Vec<String>) {
    if config.history_window_days < 2 {
        issues.push(format!(
            "history_window_days {} cannot cover two trading days",
            config.history_window_days
        ));
    } else if config.history_window_days > MAX_HISTORY_WINDOW_DAYS {
        issues.push(format!(
            "history_window_days {} exceeds the maximum of {}",
            config.history_window_days, MAX_HISTORY_WINDOW_DAYS
        ));
    }

    let mut seen = HashSet::new();
    for index in &config.indices {
        if index.name.trim().is_empty() {
            issues.push("index name must not be empty".to_string());
        }
        if index.symbol.trim().is_empty() {
            issues.push(format!("index `{}` has an empty symbol", index.name));
        }
        if !seen.insert(index.name.as_str()) {
            issues.push(format!("index `{}` is listed more than once", index.name));
        }
    }
}
