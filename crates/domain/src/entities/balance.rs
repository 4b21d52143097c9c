use crate::token::{Coin, TokenAmount};
use serde::{Deserialize, Serialize};

/// Spendable coins held by one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub address: String,
    #[serde(default)]
    pub coins: Vec<Coin>,
}

impl AccountBalance {
    pub fn new(address: impl Into<String>, coins: Vec<Coin>) -> Self {
        Self {
            address: address.into(),
            coins,
        }
    }

    /// Amount of `denom` held; zero when absent.
    pub fn amount_of(&self, denom: &str) -> TokenAmount {
        self.coins
            .iter()
            .filter(|coin| coin.denom == denom)
            .map(|coin| coin.amount)
            .sum()
    }
}
