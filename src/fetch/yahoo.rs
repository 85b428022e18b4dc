use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::error::{AppError, Context};

use super::provider::{DailyBar, HistoryRow, MarketDataProvider};
use super::FetchResult;

/// Market-data provider backed by the Yahoo Finance v8 chart endpoint.
pub struct YahooChartProvider {
    client: Client,
    endpoint: Url,
}

impl YahooChartProvider {
    pub fn new(cfg: &ProviderConfig) -> FetchResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&cfg.user_agent)
            .with_context(|| format!("Invalid user agent header: {}", cfg.user_agent))?;
        headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()
            .context("Failed to construct chart HTTP client")?;

        let endpoint = Url::parse(cfg.chart_endpoint.trim_end_matches('/')).map_err(|err| {
            AppError::message(format!(
                "Invalid chart endpoint {}: {}",
                cfg.chart_endpoint, err
            ))
        })?;

        Ok(Self { client, endpoint })
    }

    fn chart_url(&self, ticker: &str) -> FetchResult<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::message("Chart endpoint cannot be a base URL"))?
            .push(ticker);
        Ok(url)
    }

    /// Issue a chart request. `Ok(None)` for tickers the provider does not know.
    async fn fetch_chart(
        &self,
        ticker: &str,
        query: &[(&str, String)],
    ) -> FetchResult<Option<ChartResult>> {
        let url = self.chart_url(ticker)?;
        let response = self.client.get(url).query(query).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::message(format!(
                "Chart request for {} failed with status {}",
                ticker,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read chart body for {}", ticker))?;

        parse_chart(&body, ticker)
    }
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    async fn get_daily_bar(&self, ticker: &str) -> FetchResult<Option<DailyBar>> {
        let query = [("range", "1d".to_string()), ("interval", "1d".to_string())];
        let chart = self.fetch_chart(ticker, &query).await?;
        Ok(chart.and_then(|chart| chart.daily_bar()))
    }

    async fn get_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FetchResult<Vec<HistoryRow>> {
        let query = [
            ("period1", day_start_timestamp(start).to_string()),
            ("period2", day_start_timestamp(end).to_string()),
            ("interval", "1d".to_string()),
        ];
        let Some(chart) = self.fetch_chart(ticker, &query).await? else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<HistoryRow> = chart
            .history_rows()
            .into_iter()
            .filter(|row| row.date >= start && row.date < end)
            .collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(rows)
    }
}

fn day_start_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize, Default)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize, Default)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize, Default)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

impl ChartResult {
    fn quote(&self) -> Option<&ChartQuote> {
        self.indicators.quote.first()
    }

    fn date_at(&self, idx: usize) -> Option<NaiveDate> {
        let ts = self.timestamp.get(idx)?;
        DateTime::from_timestamp(ts + self.meta.gmtoffset, 0).map(|dt| dt.date_naive())
    }

    /// Collapse the chart window into one bar: first open, last close, last volume.
    fn daily_bar(&self) -> Option<DailyBar> {
        let quote = self.quote()?;
        let rows = self.timestamp.len();

        let open = (0..rows).find_map(|idx| quote.open.get(idx).copied().flatten())?;
        let last = (0..rows)
            .rev()
            .find(|&idx| quote.close.get(idx).copied().flatten().is_some())?;
        let close = quote.close.get(last).copied().flatten()?;
        let volume = quote.volume.get(last).copied().flatten().unwrap_or(0);
        let date = self.date_at(last)?;

        Some(DailyBar {
            open,
            close,
            volume,
            date,
        })
    }

    fn history_rows(&self) -> Vec<HistoryRow> {
        let closes = self.quote().map(|quote| quote.close.as_slice()).unwrap_or(&[]);
        (0..self.timestamp.len())
            .filter_map(|idx| {
                let date = self.date_at(idx)?;
                Some(HistoryRow {
                    date,
                    close: closes.get(idx).copied().flatten(),
                })
            })
            .collect()
    }
}

fn parse_chart(body: &str, ticker: &str) -> FetchResult<Option<ChartResult>> {
    let response: ChartResponse = serde_json::from_str(body)
        .with_context(|| format!("Failed to parse chart JSON for {}", ticker))?;

    if let Some(error) = response.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Ok(None);
        }
        return Err(AppError::message(format!(
            "Chart API error for {}: {} {}",
            ticker, error.code, error.description
        )));
    }

    Ok(response
        .chart
        .result
        .and_then(|results| results.into_iter().next()))
}
