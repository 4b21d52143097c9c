use crate::entities::pair::PairId;
use serde::{Deserialize, Serialize};

pub type PoolId = u64;

/// A liquidity pool as recorded in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub pair_id: PairId,
    /// Address custodying the pool's reserves.
    pub reserve_address: String,
    /// Denomination of the pool's share token, e.g. `pool4`.
    pub pool_coin_denom: String,
}

impl Pool {
    pub fn new(
        id: PoolId,
        pair_id: PairId,
        reserve_address: impl Into<String>,
        pool_coin_denom: impl Into<String>,
    ) -> Self {
        Self {
            id,
            pair_id,
            reserve_address: reserve_address.into(),
            pool_coin_denom: pool_coin_denom.into(),
        }
    }
}
