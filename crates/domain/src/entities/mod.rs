pub mod balance;
pub mod pair;
pub mod pool;
pub mod staking;

// Re-export for easier access
pub use balance::AccountBalance;
pub use pair::{Pair, PairId};
pub use pool::{Pool, PoolId};
pub use staking::StakeRecord;
