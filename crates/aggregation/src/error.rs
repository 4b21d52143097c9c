use genesis_exposure_domain::MathError;
use genesis_exposure_domain::entities::{PairId, PoolId};
use thiserror::Error;

/// Errors that abort an exposure run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Reserve math failed for a pool.
    #[error("pool {pool_id}: {source}")]
    PoolMath {
        pool_id: PoolId,
        #[source]
        source: MathError,
    },

    /// A pool references a pair missing from the snapshot.
    #[error("pool {pool_id} references unknown pair {pair_id}")]
    UnknownPair { pool_id: PoolId, pair_id: PairId },

    /// Two pools issue the same share denomination.
    #[error("pool coin denom {denom} used by pools {first} and {second}")]
    DuplicatePoolDenom {
        denom: String,
        first: PoolId,
        second: PoolId,
    },

    /// Two pools custody their reserves at the same address.
    #[error("reserve address {address} used by pools {first} and {second}")]
    DuplicateReserveAddress {
        address: String,
        first: PoolId,
        second: PoolId,
    },

    /// A configured pool share denomination has no pool.
    #[error("tracked pool coin denom {0} has no pool")]
    UnknownPoolDenom(String),

    /// Nothing to aggregate.
    #[error("no target denominations configured")]
    NoTargets,
}
