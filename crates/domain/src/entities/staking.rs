use crate::token::TokenAmount;
use serde::{Deserialize, Serialize};

/// A farmer's stake of one denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    pub farmer: String,
    pub staking_coin_denom: String,
    pub amount: TokenAmount,
}

impl StakeRecord {
    pub fn new(
        farmer: impl Into<String>,
        staking_coin_denom: impl Into<String>,
        amount: impl Into<TokenAmount>,
    ) -> Self {
        Self {
            farmer: farmer.into(),
            staking_coin_denom: staking_coin_denom.into(),
            amount: amount.into(),
        }
    }
}
