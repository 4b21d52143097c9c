//! Pool lookup tables.
//!
//! The index is built once per snapshot. Reserve composition is frozen at
//! that instant: every conversion in a run sees the same reserves.

use crate::error::EngineError;
use genesis_exposure_data::Snapshot;
use genesis_exposure_domain::entities::{AccountBalance, Pair, PairId, Pool};
use genesis_exposure_domain::math::ReservePool;
use genesis_exposure_domain::token::{Coin, TokenAmount};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// A pool with its pair and reserve model.
#[derive(Debug, Clone)]
pub struct PoolEntry {
    pub pool: Pool,
    pub pair: Pair,
    pub reserves: ReservePool,
}

impl PoolEntry {
    /// Converts `share_amount` pool shares into the underlying quote and base coins.
    ///
    /// # Errors
    /// Returns an error if the reserve math fails for this pool.
    pub fn redeem(
        &self,
        share_amount: TokenAmount,
        fee_rate: Decimal,
    ) -> Result<[Coin; 2], EngineError> {
        let (quote, base) = self
            .reserves
            .withdraw(share_amount, fee_rate)
            .map_err(|source| EngineError::PoolMath {
                pool_id: self.pool.id,
                source,
            })?;
        Ok([
            Coin::new(self.pair.quote_coin_denom.clone(), quote),
            Coin::new(self.pair.base_coin_denom.clone(), base),
        ])
    }
}

/// Read-only lookups from share denomination, pair id and reserve address.
#[derive(Debug, Clone, Default)]
pub struct PoolIndex {
    /// Entries sorted by pool id.
    entries: Vec<PoolEntry>,
    by_share_denom: HashMap<String, usize>,
    by_reserve_address: HashMap<String, usize>,
    pair_by_id: HashMap<PairId, Pair>,
}

impl PoolIndex {
    /// Builds the index from a snapshot.
    ///
    /// # Errors
    /// See [`PoolIndex::from_parts`].
    pub fn build(snapshot: &Snapshot) -> Result<Self, EngineError> {
        Self::from_parts(&snapshot.pools, &snapshot.pairs, &snapshot.balances, |denom| {
            snapshot.supply_of(denom)
        })
    }

    /// Builds the index from its raw inputs.
    ///
    /// Each pool's reserves are its reserve account's balance of the pair's
    /// quote and base denominations; its share supply comes from `supply_of`.
    /// A reserve account without a balance is an empty pool.
    ///
    /// # Errors
    /// Returns an error if a pool references an unknown pair, two pools share
    /// a share denomination or a reserve address, or a pool's state is
    /// inconsistent.
    pub fn from_parts<F>(
        pools: &[Pool],
        pairs: &[Pair],
        balances: &[AccountBalance],
        supply_of: F,
    ) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> TokenAmount,
    {
        let pair_by_id: HashMap<PairId, Pair> =
            pairs.iter().map(|pair| (pair.id, pair.clone())).collect();

        let reserve_addresses: HashSet<&str> = pools
            .iter()
            .map(|pool| pool.reserve_address.as_str())
            .collect();
        let reserve_balances: HashMap<&str, &AccountBalance> = balances
            .iter()
            .filter(|balance| reserve_addresses.contains(balance.address.as_str()))
            .map(|balance| (balance.address.as_str(), balance))
            .collect();

        let mut sorted: Vec<&Pool> = pools.iter().collect();
        sorted.sort_by_key(|pool| pool.id);

        let mut index = Self {
            pair_by_id,
            ..Self::default()
        };

        for pool in sorted {
            let pair = index
                .pair_by_id
                .get(&pool.pair_id)
                .cloned()
                .ok_or(EngineError::UnknownPair {
                    pool_id: pool.id,
                    pair_id: pool.pair_id,
                })?;

            let (quote_reserve, base_reserve) =
                match reserve_balances.get(pool.reserve_address.as_str()) {
                    Some(balance) => (
                        balance.amount_of(&pair.quote_coin_denom),
                        balance.amount_of(&pair.base_coin_denom),
                    ),
                    None => (TokenAmount::zero(), TokenAmount::zero()),
                };
            let share_supply = supply_of(&pool.pool_coin_denom);
            let reserves = ReservePool::new(quote_reserve, base_reserve, share_supply).map_err(
                |source| EngineError::PoolMath {
                    pool_id: pool.id,
                    source,
                },
            )?;

            let position = index.entries.len();
            if let Some(&existing) = index.by_share_denom.get(&pool.pool_coin_denom) {
                return Err(EngineError::DuplicatePoolDenom {
                    denom: pool.pool_coin_denom.clone(),
                    first: index.entries[existing].pool.id,
                    second: pool.id,
                });
            }
            if let Some(&existing) = index.by_reserve_address.get(&pool.reserve_address) {
                return Err(EngineError::DuplicateReserveAddress {
                    address: pool.reserve_address.clone(),
                    first: index.entries[existing].pool.id,
                    second: pool.id,
                });
            }
            index
                .by_share_denom
                .insert(pool.pool_coin_denom.clone(), position);
            index
                .by_reserve_address
                .insert(pool.reserve_address.clone(), position);

            debug!(
                pool_id = pool.id,
                pool_coin_denom = %pool.pool_coin_denom,
                quote = %Coin::new(pair.quote_coin_denom.clone(), quote_reserve),
                base = %Coin::new(pair.base_coin_denom.clone(), base_reserve),
                share_supply = %share_supply,
                "Indexed pool"
            );

            index.entries.push(PoolEntry {
                pool: pool.clone(),
                pair,
                reserves,
            });
        }

        info!(
            pools = index.entries.len(),
            pairs = index.pair_by_id.len(),
            "Built pool index"
        );
        Ok(index)
    }

    /// Pool issuing `denom`, if any.
    #[must_use]
    pub fn pool_by_share_denom(&self, denom: &str) -> Option<&Pool> {
        self.entry_by_share_denom(denom).map(|entry| &entry.pool)
    }

    /// Pool entry issuing `denom`, if any.
    #[must_use]
    pub fn entry_by_share_denom(&self, denom: &str) -> Option<&PoolEntry> {
        self.by_share_denom
            .get(denom)
            .map(|&position| &self.entries[position])
    }

    /// Pair with the given id.
    #[must_use]
    pub fn pair(&self, id: PairId) -> Option<&Pair> {
        self.pair_by_id.get(&id)
    }

    /// Reserve model of the pool custodied at `reserve_address`.
    #[must_use]
    pub fn model(&self, reserve_address: &str) -> Option<&ReservePool> {
        self.by_reserve_address
            .get(reserve_address)
            .map(|&position| &self.entries[position].reserves)
    }

    /// All pools, sorted by id.
    pub fn entries(&self) -> impl Iterator<Item = &PoolEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts pool shares of `share_denom` into underlying coins.
    ///
    /// Returns `None` when `share_denom` is not a pool share.
    ///
    /// # Errors
    /// Returns an error if the reserve math fails for the pool.
    pub fn convert(
        &self,
        share_denom: &str,
        share_amount: TokenAmount,
        fee_rate: Decimal,
    ) -> Result<Option<[Coin; 2]>, EngineError> {
        self.entry_by_share_denom(share_denom)
            .map(|entry| entry.redeem(share_amount, fee_rate))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genesis_exposure_domain::MathError;
    use rust_decimal_macros::dec;

    fn amount(v: u64) -> TokenAmount {
        TokenAmount::from(v)
    }

    fn pairs() -> Vec<Pair> {
        vec![Pair::new(1, "uusd", "uluna"), Pair::new(2, "uatom", "uusd")]
    }

    fn balances() -> Vec<AccountBalance> {
        vec![
            AccountBalance::new(
                "reserve1",
                vec![
                    Coin::new("uusd", 1_000_000u64),
                    Coin::new("uluna", 500_000u64),
                    Coin::new("ujunk", 7u64),
                ],
            ),
            AccountBalance::new("alice", vec![Coin::new("pool1", 100u64)]),
        ]
    }

    fn supply(denom: &str) -> TokenAmount {
        match denom {
            "pool1" => amount(1_000),
            "pool2" => amount(50),
            _ => TokenAmount::zero(),
        }
    }

    #[test]
    fn test_build_reads_reserves_and_supply() {
        let pools = vec![Pool::new(1, 1, "reserve1", "pool1")];
        let index = PoolIndex::from_parts(&pools, &pairs(), &balances(), supply).unwrap();

        let model = index.model("reserve1").unwrap();
        assert_eq!(model.quote_reserve(), amount(1_000_000));
        assert_eq!(model.base_reserve(), amount(500_000));
        assert_eq!(model.share_supply(), amount(1_000));
        assert_eq!(index.pool_by_share_denom("pool1").unwrap().id, 1);
        assert_eq!(index.pair(2).unwrap().quote_coin_denom, "uatom");
        assert!(index.pool_by_share_denom("uusd").is_none());
    }

    #[test]
    fn test_convert() {
        let pools = vec![Pool::new(1, 1, "reserve1", "pool1")];
        let index = PoolIndex::from_parts(&pools, &pairs(), &balances(), supply).unwrap();

        let [quote, base] = index
            .convert("pool1", amount(100), Decimal::ZERO)
            .unwrap()
            .unwrap();
        assert_eq!(quote, Coin::new("uusd", 100_000u64));
        assert_eq!(base, Coin::new("uluna", 50_000u64));

        let [quote, base] = index
            .convert("pool1", amount(100), dec!(0.003))
            .unwrap()
            .unwrap();
        assert_eq!(quote.amount, amount(99_700));
        assert_eq!(base.amount, amount(49_850));

        assert_eq!(index.convert("uusd", amount(1), Decimal::ZERO).unwrap(), None);
    }

    #[test]
    fn test_missing_reserve_account_is_empty_pool() {
        let pools = vec![Pool::new(2, 2, "reserve2", "pool2")];
        let index = PoolIndex::from_parts(&pools, &pairs(), &balances(), supply).unwrap();

        let [quote, base] = index
            .convert("pool2", amount(10), Decimal::ZERO)
            .unwrap()
            .unwrap();
        assert!(quote.amount.is_zero());
        assert!(base.amount.is_zero());
    }

    #[test]
    fn test_pairs_back_many_pools() {
        let pools = vec![
            Pool::new(3, 1, "reserve3", "pool3"),
            Pool::new(1, 1, "reserve1", "pool1"),
        ];
        let index =
            PoolIndex::from_parts(&pools, &pairs(), &balances(), |_| amount(10)).unwrap();

        let ids: Vec<u64> = index.entries().map(|entry| entry.pool.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(index.entries().all(|entry| entry.pair.id == 1));
    }

    #[test]
    fn test_unknown_pair() {
        let pools = vec![Pool::new(4, 9, "reserve4", "pool4")];
        let err = PoolIndex::from_parts(&pools, &pairs(), &balances(), supply).unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownPair {
                pool_id: 4,
                pair_id: 9
            }
        );
    }

    #[test]
    fn test_duplicate_share_denom() {
        let pools = vec![
            Pool::new(1, 1, "reserve1", "pool1"),
            Pool::new(2, 1, "reserve2", "pool1"),
        ];
        let err = PoolIndex::from_parts(&pools, &pairs(), &balances(), supply).unwrap_err();
        assert!(matches!(
            err,
            EngineError::DuplicatePoolDenom {
                first: 1,
                second: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_reserve_address() {
        let pools = vec![
            Pool::new(2, 1, "reserve1", "pool2"),
            Pool::new(1, 1, "reserve1", "pool1"),
        ];
        let err = PoolIndex::from_parts(&pools, &pairs(), &balances(), supply).unwrap_err();
        assert_eq!(
            err,
            EngineError::DuplicateReserveAddress {
                address: "reserve1".to_string(),
                first: 1,
                second: 2,
            }
        );
    }

    #[test]
    fn test_reserves_without_supply_rejected() {
        let pools = vec![Pool::new(1, 1, "reserve1", "pool1")];
        let err = PoolIndex::from_parts(&pools, &pairs(), &balances(), |_| TokenAmount::zero())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::PoolMath {
                pool_id: 1,
                source: MathError::InvalidPoolState { .. }
            }
        ));
    }

    #[test]
    fn test_withdraw_from_empty_supply_fails() {
        let pools = vec![Pool::new(2, 2, "reserve2", "pool2")];
        let index =
            PoolIndex::from_parts(&pools, &pairs(), &balances(), |_| TokenAmount::zero()).unwrap();
        assert_eq!(
            index.convert("pool2", amount(1), Decimal::ZERO),
            Err(EngineError::PoolMath {
                pool_id: 2,
                source: MathError::DivisionByZero
            })
        );
    }
}
