//! Genesis snapshot document.
//!
//! The snapshot is a JSON extraction of the bank, liquidity and farming
//! module states at a fixed height. Amounts are decimal strings.
//!
//! ```json
//! {
//!   "balances": [{ "address": "cre1...", "coins": [{ "denom": "pool1", "amount": "100" }] }],
//!   "supply": [{ "denom": "pool1", "amount": "1000" }],
//!   "pairs": [{ "id": 1, "quote_coin_denom": "uusd", "base_coin_denom": "uluna" }],
//!   "pools": [{ "id": 1, "pair_id": 1, "reserve_address": "cre1...", "pool_coin_denom": "pool1" }],
//!   "params": { "dust_collector_address": "cre1...", "withdraw_fee_rate": "0.003" },
//!   "staking_records": [{ "farmer": "cre1...", "staking_coin_denom": "pool1", "amount": "5" }],
//!   "queued_staking_records": [],
//!   "staking_reserve_addresses": { "pool1": "cre1..." }
//! }
//! ```

use crate::error::SnapshotError;
use genesis_exposure_domain::entities::{AccountBalance, Pair, Pool, StakeRecord};
use genesis_exposure_domain::token::{Coin, TokenAmount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Liquidity module parameters relevant to exposure analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityParams {
    /// Account collecting rounding dust from pool operations.
    pub dust_collector_address: String,
    /// Fee charged on pool share withdrawal, in `[0, 1]`.
    #[serde(default)]
    pub withdraw_fee_rate: Decimal,
}

/// Immutable module state captured at one height.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Spendable balances per address.
    #[serde(default)]
    pub balances: Vec<AccountBalance>,
    /// Chain-wide supply per denomination.
    #[serde(default)]
    pub supply: Vec<Coin>,
    #[serde(default)]
    pub pairs: Vec<Pair>,
    #[serde(default)]
    pub pools: Vec<Pool>,
    #[serde(default)]
    pub params: LiquidityParams,
    /// Active farming stakes.
    #[serde(default)]
    pub staking_records: Vec<StakeRecord>,
    /// Farming stakes waiting for the next epoch.
    #[serde(default)]
    pub queued_staking_records: Vec<StakeRecord>,
    /// Farming module account holding stakes of each staking denomination.
    #[serde(default)]
    pub staking_reserve_addresses: BTreeMap<String, String>,
}

impl Snapshot {
    /// Reads a snapshot from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading snapshot");
        let raw = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parses a snapshot from a JSON document.
    ///
    /// # Errors
    /// Returns an error if the document does not match the snapshot layout.
    pub fn from_json_str(raw: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(raw)?;
        info!(
            balances = snapshot.balances.len(),
            supply = snapshot.supply.len(),
            pairs = snapshot.pairs.len(),
            pools = snapshot.pools.len(),
            staking_records = snapshot.staking_records.len(),
            queued_staking_records = snapshot.queued_staking_records.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Chain-wide supply of `denom`; zero when absent.
    #[must_use]
    pub fn supply_of(&self, denom: &str) -> TokenAmount {
        self.supply
            .iter()
            .filter(|coin| coin.denom == denom)
            .map(|coin| coin.amount)
            .sum()
    }

    /// Spendable amount of `denom` held by `address`; zero when absent.
    #[must_use]
    pub fn balance_of(&self, address: &str, denom: &str) -> TokenAmount {
        self.balances
            .iter()
            .filter(|balance| balance.address == address)
            .map(|balance| balance.amount_of(denom))
            .sum()
    }

    /// Staking reserve account for `denom`, if the farming module has one.
    #[must_use]
    pub fn staking_reserve_of(&self, denom: &str) -> Option<&str> {
        self.staking_reserve_addresses.get(denom).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "balances": [
            { "address": "alice", "coins": [
                { "denom": "uusd", "amount": "500" },
                { "denom": "pool1", "amount": "100" }
            ] },
            { "address": "reserve1", "coins": [
                { "denom": "uusd", "amount": "1000000" },
                { "denom": "uluna", "amount": "500000" }
            ] }
        ],
        "supply": [
            { "denom": "uusd", "amount": "1000500" },
            { "denom": "pool1", "amount": "1000" }
        ],
        "pairs": [{ "id": 1, "quote_coin_denom": "uusd", "base_coin_denom": "uluna" }],
        "pools": [{ "id": 1, "pair_id": 1, "reserve_address": "reserve1", "pool_coin_denom": "pool1" }],
        "params": { "dust_collector_address": "dust", "withdraw_fee_rate": "0.003" },
        "staking_records": [{ "farmer": "bob", "staking_coin_denom": "pool1", "amount": "5" }],
        "staking_reserve_addresses": { "pool1": "farming-pool1" }
    }"#;

    #[test]
    fn test_parse_snapshot() {
        let snapshot = Snapshot::from_json_str(SAMPLE).unwrap();

        assert_eq!(snapshot.balances.len(), 2);
        assert_eq!(snapshot.pools[0].pool_coin_denom, "pool1");
        assert_eq!(snapshot.params.withdraw_fee_rate, dec!(0.003));
        assert_eq!(snapshot.params.dust_collector_address, "dust");
        assert_eq!(snapshot.staking_records[0].amount, TokenAmount::from(5u64));
        assert!(snapshot.queued_staking_records.is_empty());
    }

    #[test]
    fn test_lookups() {
        let snapshot = Snapshot::from_json_str(SAMPLE).unwrap();

        assert_eq!(snapshot.supply_of("pool1"), TokenAmount::from(1_000u64));
        assert_eq!(snapshot.supply_of("uatom"), TokenAmount::zero());
        assert_eq!(
            snapshot.balance_of("reserve1", "uluna"),
            TokenAmount::from(500_000u64)
        );
        assert_eq!(snapshot.balance_of("nobody", "uluna"), TokenAmount::zero());
        assert_eq!(snapshot.staking_reserve_of("pool1"), Some("farming-pool1"));
        assert_eq!(snapshot.staking_reserve_of("uusd"), None);
    }

    #[test]
    fn test_rejects_negative_amount() {
        let raw = r#"{ "supply": [{ "denom": "uusd", "amount": "-1" }] }"#;
        assert!(matches!(
            Snapshot::from_json_str(raw),
            Err(SnapshotError::Parse(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let snapshot = Snapshot::from_path(file.path()).unwrap();
        assert_eq!(snapshot.pairs.len(), 1);

        let missing = Snapshot::from_path(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(SnapshotError::Io { .. })));
    }
}
