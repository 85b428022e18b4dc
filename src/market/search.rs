use serde::Serialize;

use crate::universe::Symbol;

/// Priority bucket of a search hit. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum MatchTier {
    Prefix = 0,
    Contains = 1,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub symbol: String,
    pub name: String,
    #[serde(skip)]
    pub tier: MatchTier,
}

/// Case-insensitive substring match over symbol and name, prefix matches first.
/// Hits within a tier keep universe order.
pub fn search(universe: &[Symbol], query: &str) -> Vec<SearchHit> {
    let needle = query.to_lowercase();

    let mut hits: Vec<SearchHit> = universe
        .iter()
        .filter_map(|entry| {
            let tier = match_tier(entry, &needle)?;
            Some(SearchHit {
                symbol: entry.symbol.clone(),
                name: entry.name.clone(),
                tier,
            })
        })
        .collect();

    hits.sort_by_key(|hit| hit.tier);
    hits
}

fn match_tier(entry: &Symbol, needle: &str) -> Option<MatchTier> {
    let symbol = entry.symbol.to_lowercase();
    let name = entry.name.to_lowercase();

    if symbol.starts_with(needle) || name.starts_with(needle) {
        Some(MatchTier::Prefix)
    } else if symbol.contains(needle) || name.contains(needle) {
        Some(MatchTier::Contains)
    } else {
        None
    }
}
