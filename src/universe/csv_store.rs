use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{AppError, Context, Result};

use super::{Symbol, SymbolUniverse, UniverseTier};

/// Symbol universe backed by one `symbol,name` CSV file per tier.
pub struct CsvUniverseStore {
    dir: PathBuf,
}

impl CsvUniverseStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn tier_path(&self, tier: UniverseTier) -> PathBuf {
        self.dir.join(format!("{}.csv", tier.as_str()))
    }
}

#[async_trait]
impl SymbolUniverse for CsvUniverseStore {
    async fn get_symbols(&self, tier: UniverseTier) -> Result<Vec<Symbol>> {
        let path = self.tier_path(tier);
        let contents = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read universe CSV at {}", path.display()))?;

        let symbols = parse_universe_csv(&contents)?;
        if symbols.is_empty() {
            return Err(AppError::message(format!(
                "universe tier {} yielded no symbols",
                tier
            )));
        }

        Ok(symbols)
    }
}

/// Parse a headed `symbol,name` CSV, skipping blank symbols and duplicates.
pub fn parse_universe_csv(contents: &str) -> Result<Vec<Symbol>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let mut seen = std::collections::HashSet::new();
    let mut symbols = Vec::new();

    for result in reader.records() {
        let record = result.context("Failed to read universe CSV record")?;

        let Some(symbol) = record.get(0).filter(|value| !value.is_empty()) else {
            continue;
        };
        if symbol.starts_with('#') {
            continue;
        }
        let name = record.get(1).unwrap_or(symbol);

        if seen.insert(symbol.to_string()) {
            symbols.push(Symbol::new(symbol, name));
        }
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    #[test]
    fn parses_rows_in_file_order() {
        let csv = "symbol,name\nRELIANCE,Reliance Industries\n\nTCS , Tata Consultancy Services\nRELIANCE,Duplicate\nINFY\n";

        let symbols = parse_universe_csv(csv).unwrap();

        assert_eq!(
            symbols,
            vec![
                Symbol::new("RELIANCE", "Reliance Industries"),
                Symbol::new("TCS", "Tata Consultancy Services"),
                Symbol::new("INFY", "INFY"),
            ]
        );
    }

    #[tokio::test]
    async fn reads_tier_file_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("nifty_50.csv"),
            "symbol,name\nHDFCBANK,HDFC Bank\nSBIN,State Bank of India\n",
        )
        .unwrap();

        let store = CsvUniverseStore::new(dir.path());
        let symbols = store.get_symbols(UniverseTier::Nifty50).await.unwrap();

        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[1].name, "State Bank of India");
    }

    #[tokio::test]
    async fn missing_tier_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvUniverseStore::new(dir.path());

        let err = store.get_symbols(UniverseTier::Nifty500).await.unwrap_err();
        assert!(err.to_string().contains("nifty_500.csv"));
    }

    #[tokio::test]
    async fn shipped_universe_covers_every_tier() {
        let store =
            CsvUniverseStore::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/universe"));

        let mut sizes = Vec::new();
        for tier in UniverseTier::ALL {
            let symbols = store
                .get_symbols(tier)
                .await
                .unwrap_or_else(|err| panic!("tier {tier} failed to load: {err}"));
            sizes.push((tier, symbols.len()));
        }

        let size = |tier: UniverseTier| sizes.iter().find(|(t, _)| *t == tier).unwrap().1;
        assert_eq!(size(UniverseTier::Nifty50), 50);
        assert_eq!(size(UniverseTier::Nifty100), 100);
        assert_eq!(size(UniverseTier::Nifty200), 200);
        assert_eq!(size(UniverseTier::Nifty500), 500);
        assert!(size(UniverseTier::All) > 500);
    }

    #[tokio::test]
    async fn shipped_tiers_nest_inside_each_other() {
        let store =
            CsvUniverseStore::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/universe"));
        let ordered = [
            UniverseTier::Nifty50,
            UniverseTier::Nifty100,
            UniverseTier::Nifty200,
            UniverseTier::Nifty500,
            UniverseTier::All,
        ];

        for pair in ordered.windows(2) {
            let inner = store.get_symbols(pair[0]).await.unwrap();
            let outer: std::collections::HashSet<String> = store
                .get_symbols(pair[1])
                .await
                .unwrap()
                .into_iter()
                .map(|entry| entry.symbol)
                .collect();
            for entry in inner {
                assert!(
                    outer.contains(&entry.symbol),
                    "{} in {} but not in {}",
                    entry.symbol,
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[tokio::test]
    async fn empty_tier_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("nifty_all.csv"), "symbol,name\n").unwrap();
        let store = CsvUniverseStore::new(dir.path());

        assert!(store.get_symbols(UniverseTier::All).await.is_err());
    }
}
