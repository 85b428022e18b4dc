use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Chrono(#[from] chrono::ParseError),
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }
}

/// Per-symbol failure produced by the snapshot fetcher. Never escapes the collector.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("no data returned for {symbol}")]
    NoData { symbol: String },
    #[error("provider failure for {symbol}: {message}")]
    ProviderFailure { symbol: String, message: String },
}

impl FetchError {
    pub fn no_data(symbol: &str) -> Self {
        FetchError::NoData {
            symbol: symbol.to_string(),
        }
    }

    pub fn provider<T: std::fmt::Display>(symbol: &str, err: T) -> Self {
        FetchError::ProviderFailure {
            symbol: symbol.to_string(),
            message: err.to_string(),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            FetchError::NoData { symbol } | FetchError::ProviderFailure { symbol, .. } => symbol,
        }
    }
}
