//! Per-account exposure rows.

use genesis_exposure_domain::token::{Coin, TokenAmount};
use serde::Serialize;
use std::collections::BTreeMap;

/// Role an account plays in the exposure table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExposureRole {
    /// Holds a target directly.
    Holder,
    /// Holds pool shares of a tracked pool.
    LiquidityProvider,
    /// Stakes a target or tracked pool share, actively or queued.
    Farmer,
}

/// Exposure of one account to every target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountExposure {
    /// Running total per target denomination.
    totals: BTreeMap<String, TokenAmount>,
    pub holder: bool,
    pub liquidity_provider: bool,
    pub farmer: bool,
}

impl AccountExposure {
    /// A row with a zero total for every target and no role.
    #[must_use]
    pub fn new(targets: &[String]) -> Self {
        Self {
            totals: targets
                .iter()
                .map(|target| (target.clone(), TokenAmount::zero()))
                .collect(),
            ..Self::default()
        }
    }

    /// Adds `amount` to the running total of `denom`.
    pub fn credit(&mut self, denom: &str, amount: TokenAmount) {
        *self.totals.entry(denom.to_string()).or_default() += amount;
    }

    /// Sets a role flag. Flags are never cleared.
    pub fn mark(&mut self, role: ExposureRole) {
        match role {
            ExposureRole::Holder => self.holder = true,
            ExposureRole::LiquidityProvider => self.liquidity_provider = true,
            ExposureRole::Farmer => self.farmer = true,
        }
    }

    /// Whether the account has the given role.
    #[must_use]
    pub fn has_role(&self, role: ExposureRole) -> bool {
        match role {
            ExposureRole::Holder => self.holder,
            ExposureRole::LiquidityProvider => self.liquidity_provider,
            ExposureRole::Farmer => self.farmer,
        }
    }

    /// Running total of `denom`; zero when never credited.
    #[must_use]
    pub fn total_of(&self, denom: &str) -> TokenAmount {
        self.totals.get(denom).copied().unwrap_or_default()
    }

    /// Totals as coins, ordered by denomination.
    pub fn totals(&self) -> impl Iterator<Item = Coin> + '_ {
        self.totals
            .iter()
            .map(|(denom, amount)| Coin::new(denom.clone(), *amount))
    }

    /// Sums totals and ORs flags of another row for the same account.
    pub fn merge(&mut self, other: &AccountExposure) {
        for (denom, amount) in &other.totals {
            self.credit(denom, *amount);
        }
        self.holder |= other.holder;
        self.liquidity_provider |= other.liquidity_provider;
        self.farmer |= other.farmer;
    }
}

/// Number of accounts per role. An account with several roles counts once
/// per role and once in `accounts`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleCounts {
    pub accounts: usize,
    pub holders: usize,
    pub liquidity_providers: usize,
    pub farmers: usize,
}

/// Exposure rows keyed by address, ordered by address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExposureTable {
    targets: Vec<String>,
    rows: BTreeMap<String, AccountExposure>,
}

impl ExposureTable {
    #[must_use]
    pub fn new(targets: Vec<String>) -> Self {
        Self {
            targets,
            rows: BTreeMap::new(),
        }
    }

    /// Target denominations, in configuration order.
    #[must_use]
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Row for `address`, created with zero totals on first contact.
    pub fn entry(&mut self, address: &str) -> &mut AccountExposure {
        self.rows
            .entry(address.to_string())
            .or_insert_with(|| AccountExposure::new(&self.targets))
    }

    #[must_use]
    pub fn get(&self, address: &str) -> Option<&AccountExposure> {
        self.rows.get(address)
    }

    #[must_use]
    pub fn contains(&self, address: &str) -> bool {
        self.rows.contains_key(address)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AccountExposure)> {
        self.rows.iter().map(|(address, row)| (address.as_str(), row))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of every account's total of `denom`.
    #[must_use]
    pub fn total_of(&self, denom: &str) -> TokenAmount {
        self.rows.values().map(|row| row.total_of(denom)).sum()
    }

    /// Counts accounts per role.
    #[must_use]
    pub fn role_counts(&self) -> RoleCounts {
        self.rows.values().fold(
            RoleCounts {
                accounts: self.rows.len(),
                ..RoleCounts::default()
            },
            |mut counts, row| {
                counts.holders += usize::from(row.has_role(ExposureRole::Holder));
                counts.liquidity_providers +=
                    usize::from(row.has_role(ExposureRole::LiquidityProvider));
                counts.farmers += usize::from(row.has_role(ExposureRole::Farmer));
                counts
            },
        )
    }

    /// Folds a partial table into this one, summing totals and OR-ing flags.
    pub fn merge(&mut self, other: ExposureTable) {
        for target in other.targets {
            if !self.targets.contains(&target) {
                self.targets.push(target);
            }
        }
        for (address, row) in other.rows {
            self.entry(&address).merge(&row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> Vec<String> {
        vec!["uluna".to_string(), "uusd".to_string()]
    }

    #[test]
    fn test_entry_created_on_demand() {
        let mut table = ExposureTable::new(targets());
        assert!(table.get("alice").is_none());

        let row = table.entry("alice");
        assert_eq!(row.total_of("uusd"), TokenAmount::zero());
        assert_eq!(row.totals().count(), 2);
        assert!(!row.holder && !row.liquidity_provider && !row.farmer);

        table.entry("alice").credit("uusd", TokenAmount::from(5u64));
        table.entry("alice").credit("uusd", TokenAmount::from(7u64));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("alice").unwrap().total_of("uusd"), TokenAmount::from(12u64));
    }

    #[test]
    fn test_flags_accumulate() {
        let mut row = AccountExposure::new(&targets());
        row.mark(ExposureRole::Holder);
        row.mark(ExposureRole::Farmer);
        row.mark(ExposureRole::Holder);

        assert!(row.has_role(ExposureRole::Holder));
        assert!(row.has_role(ExposureRole::Farmer));
        assert!(!row.has_role(ExposureRole::LiquidityProvider));
    }

    #[test]
    fn test_totals_render_as_coins() {
        let mut row = AccountExposure::new(&targets());
        row.credit("uusd", TokenAmount::from(100_500u64));
        let coins: Vec<String> = row.totals().map(|coin| coin.to_string()).collect();
        assert_eq!(coins, vec!["0uluna", "100500uusd"]);
    }

    #[test]
    fn test_merge_tables() {
        let mut left = ExposureTable::new(targets());
        left.entry("alice").credit("uusd", TokenAmount::from(10u64));
        left.entry("alice").mark(ExposureRole::Holder);

        let mut right = ExposureTable::new(targets());
        right.entry("alice").credit("uusd", TokenAmount::from(5u64));
        right.entry("alice").mark(ExposureRole::Farmer);
        right.entry("bob").credit("uluna", TokenAmount::from(3u64));

        left.merge(right);

        let alice = left.get("alice").unwrap();
        assert_eq!(alice.total_of("uusd"), TokenAmount::from(15u64));
        assert!(alice.holder && alice.farmer);
        assert_eq!(left.total_of("uluna"), TokenAmount::from(3u64));
        assert_eq!(left.len(), 2);
    }

    #[test]
    fn test_role_counts() {
        let mut table = ExposureTable::new(targets());
        table.entry("alice").mark(ExposureRole::Holder);
        table.entry("alice").mark(ExposureRole::Farmer);
        table.entry("bob").mark(ExposureRole::LiquidityProvider);
        table.entry("carol");

        assert_eq!(
            table.role_counts(),
            RoleCounts {
                accounts: 3,
                holders: 1,
                liquidity_providers: 1,
                farmers: 1,
            }
        );
    }
}
