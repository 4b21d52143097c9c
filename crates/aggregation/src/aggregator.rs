//! Exposure aggregation passes.
//!
//! Balances, active stakes and queued stakes are folded, in that order, into
//! one [`ExposureTable`]. Every contribution is classified by denomination:
//! targets are credited as-is, tracked pool shares are converted into their
//! reserves first, and anything else is ignored.

use crate::config::ExposureConfig;
use crate::error::EngineError;
use crate::exposure::{ExposureRole, ExposureTable};
use crate::pool_index::PoolIndex;
use crate::reserve_accounts::ReserveAccountSet;
use genesis_exposure_data::Snapshot;
use genesis_exposure_domain::entities::{AccountBalance, StakeRecord};
use genesis_exposure_domain::enums::ContributionSource;
use genesis_exposure_domain::token::TokenAmount;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// Counters collected while aggregating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregationStats {
    /// Balance entries seen.
    pub balance_records: u64,
    /// Active stake records seen.
    pub stake_records: u64,
    /// Queued stake records seen.
    pub queued_stake_records: u64,
    /// Records owned by infrastructure accounts.
    pub skipped_reserve_records: u64,
    /// Coins in denominations that are neither targets nor tracked pool shares.
    pub ignored_coins: u64,
    /// Target coins credited as-is.
    pub direct_contributions: u64,
    /// Pool share amounts converted into reserves.
    pub conversions: u64,
    /// Farmer rows created by a stake record rather than a balance.
    pub rows_created_by_stakes: u64,
}

/// Outcome of a full aggregation run.
#[derive(Debug, Clone)]
pub struct AggregationOutcome {
    pub table: ExposureTable,
    pub stats: AggregationStats,
}

/// How a denomination contributes to exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DenomClass {
    Target,
    PoolShare,
    Irrelevant,
}

/// Folds contributions into an exposure table.
#[derive(Debug)]
pub struct ExposureAggregator<'a> {
    config: &'a ExposureConfig,
    index: &'a PoolIndex,
    reserve_accounts: &'a ReserveAccountSet,
    pool_denoms: HashSet<String>,
    fee_rate: Decimal,
    table: ExposureTable,
    stats: AggregationStats,
}

impl<'a> ExposureAggregator<'a> {
    /// Creates an aggregator.
    ///
    /// # Arguments
    ///
    /// * `config` - Targets and fee policy
    /// * `index` - Pool index of the snapshot
    /// * `reserve_accounts` - Accounts never given a row
    /// * `pool_denoms` - Pool share denominations to convert, as resolved by
    ///   [`ExposureConfig::resolve_pool_denoms`]
    /// * `withdraw_fee_rate` - The chain's withdrawal fee, used by [`FeePolicy::Withdrawal`]
    ///
    /// [`FeePolicy::Withdrawal`]: genesis_exposure_domain::enums::FeePolicy::Withdrawal
    #[must_use]
    pub fn new(
        config: &'a ExposureConfig,
        index: &'a PoolIndex,
        reserve_accounts: &'a ReserveAccountSet,
        pool_denoms: Vec<String>,
        withdraw_fee_rate: Decimal,
    ) -> Self {
        let fee_rate = config.fee_policy.fee_rate(withdraw_fee_rate);
        debug!(
            targets = ?config.target_denoms,
            pools = ?pool_denoms,
            %fee_rate,
            "Configured aggregator"
        );

        Self {
            config,
            index,
            reserve_accounts,
            pool_denoms: pool_denoms.into_iter().collect(),
            fee_rate,
            table: ExposureTable::new(config.target_denoms.clone()),
            stats: AggregationStats::default(),
        }
    }

    /// Applies every coin of one account balance.
    ///
    /// # Errors
    /// Returns an error if a pool share conversion fails.
    pub fn apply_balance(&mut self, balance: &AccountBalance) -> Result<(), EngineError> {
        self.stats.balance_records += 1;
        if self.reserve_accounts.contains(&balance.address) {
            self.stats.skipped_reserve_records += 1;
            return Ok(());
        }
        for coin in &balance.coins {
            self.contribute(
                &balance.address,
                &coin.denom,
                coin.amount,
                ContributionSource::Balance,
            )?;
        }
        Ok(())
    }

    /// Applies one active or queued stake record.
    ///
    /// A farmer without a row gets one; stake records never fail for a
    /// missing row.
    ///
    /// # Errors
    /// Returns an error if a pool share conversion fails.
    pub fn apply_stake(
        &mut self,
        record: &StakeRecord,
        source: ContributionSource,
    ) -> Result<(), EngineError> {
        match source {
            ContributionSource::QueuedStake => self.stats.queued_stake_records += 1,
            _ => self.stats.stake_records += 1,
        }
        if self.reserve_accounts.contains(&record.farmer) {
            self.stats.skipped_reserve_records += 1;
            return Ok(());
        }
        self.contribute(
            &record.farmer,
            &record.staking_coin_denom,
            record.amount,
            source,
        )
    }

    fn classify(&self, denom: &str) -> DenomClass {
        if self.config.is_target(denom) {
            DenomClass::Target
        } else if self.pool_denoms.contains(denom) {
            DenomClass::PoolShare
        } else {
            DenomClass::Irrelevant
        }
    }

    fn contribute(
        &mut self,
        address: &str,
        denom: &str,
        amount: TokenAmount,
        source: ContributionSource,
    ) -> Result<(), EngineError> {
        let class = self.classify(denom);
        if class == DenomClass::Irrelevant {
            self.stats.ignored_coins += 1;
            return Ok(());
        }

        // Queued stakes may reference farmers unseen by earlier passes.
        if source.is_farming() && !self.table.contains(address) {
            self.stats.rows_created_by_stakes += 1;
            debug!(farmer = %address, %denom, "Creating row for farmer without balance");
        }

        if class == DenomClass::Target {
            self.stats.direct_contributions += 1;
            let row = self.table.entry(address);
            row.credit(denom, amount);
            row.mark(ExposureRole::Holder);
            if source.is_farming() {
                row.mark(ExposureRole::Farmer);
            }
            return Ok(());
        }

        let legs = self
            .index
            .convert(denom, amount, self.fee_rate)?
            .ok_or_else(|| EngineError::UnknownPoolDenom(denom.to_string()))?;
        self.stats.conversions += 1;

        let row = self.table.entry(address);
        for leg in legs {
            if self.config.is_target(&leg.denom) {
                row.credit(&leg.denom, leg.amount);
            }
        }
        row.mark(if source.is_farming() {
            ExposureRole::Farmer
        } else {
            ExposureRole::LiquidityProvider
        });
        Ok(())
    }

    /// Finishes the run.
    #[must_use]
    pub fn finish(self) -> AggregationOutcome {
        AggregationOutcome {
            table: self.table,
            stats: self.stats,
        }
    }
}

/// Runs the three passes over a snapshot.
///
/// # Errors
/// Returns an error if the configuration is invalid or any conversion fails.
pub fn aggregate(
    snapshot: &Snapshot,
    index: &PoolIndex,
    config: &ExposureConfig,
) -> Result<AggregationOutcome, EngineError> {
    let pool_denoms = config.resolve_pool_denoms(index)?;
    let mut tracked = config.target_denoms.clone();
    tracked.extend(pool_denoms.iter().cloned());
    let reserve_accounts = ReserveAccountSet::from_snapshot(snapshot, &tracked);

    let mut aggregator = ExposureAggregator::new(
        config,
        index,
        &reserve_accounts,
        pool_denoms,
        snapshot.params.withdraw_fee_rate,
    );

    for balance in &snapshot.balances {
        aggregator.apply_balance(balance)?;
    }
    for record in &snapshot.staking_records {
        aggregator.apply_stake(record, ContributionSource::Stake)?;
    }
    for record in &snapshot.queued_staking_records {
        aggregator.apply_stake(record, ContributionSource::QueuedStake)?;
    }

    let outcome = aggregator.finish();
    let counts = outcome.table.role_counts();
    info!(
        accounts = counts.accounts,
        holders = counts.holders,
        liquidity_providers = counts.liquidity_providers,
        farmers = counts.farmers,
        conversions = outcome.stats.conversions,
        skipped_reserve_records = outcome.stats.skipped_reserve_records,
        reserve_accounts = reserve_accounts.len(),
        "Aggregation complete"
    );
    Ok(outcome)
}
