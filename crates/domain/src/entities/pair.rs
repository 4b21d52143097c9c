use serde::{Deserialize, Serialize};

pub type PairId = u64;

/// A quote/base denomination pair. Several pools may share one pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub id: PairId,
    pub quote_coin_denom: String,
    pub base_coin_denom: String,
}

impl Pair {
    pub fn new(id: PairId, quote: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            id,
            quote_coin_denom: quote.into(),
            base_coin_denom: base.into(),
        }
    }

    /// Whether `denom` is one of the pair's two legs.
    pub fn contains(&self, denom: &str) -> bool {
        self.quote_coin_denom == denom || self.base_coin_denom == denom
    }
}
