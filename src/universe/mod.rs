use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub mod csv_store;

pub use csv_store::CsvUniverseStore;

/// An exchange ticker and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub symbol: String,
    pub name: String,
}

impl Symbol {
    pub fn new(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }
}

/// Named subset of the exchange's listed symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniverseTier {
    All,
    Nifty50,
    Nifty100,
    Nifty200,
    Nifty500,
}

impl UniverseTier {
    pub const ALL: [UniverseTier; 5] = [
        UniverseTier::All,
        UniverseTier::Nifty50,
        UniverseTier::Nifty100,
        UniverseTier::Nifty200,
        UniverseTier::Nifty500,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UniverseTier::All => "nifty_all",
            UniverseTier::Nifty50 => "nifty_50",
            UniverseTier::Nifty100 => "nifty_100",
            UniverseTier::Nifty200 => "nifty_200",
            UniverseTier::Nifty500 => "nifty_500",
        }
    }
}

impl fmt::Display for UniverseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UniverseTier {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_lowercase();
        UniverseTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == normalized)
            .ok_or_else(|| AppError::invalid_input(format!("unknown universe tier `{value}`")))
    }
}

/// Read-only source of the symbol universe.
#[async_trait]
pub trait SymbolUniverse: Send + Sync {
    async fn get_symbols(&self, tier: UniverseTier) -> Result<Vec<Symbol>>;
}
