//! Engine configuration.
//!
//! One configuration describes one exposure question: which denominations
//! are targets, which pool shares are converted, and which fee applies.

use crate::error::EngineError;
use crate::pool_index::PoolIndex;
use genesis_exposure_domain::enums::FeePolicy;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What an exposure run measures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureConfig {
    /// Denominations whose per-account exposure is computed.
    pub target_denoms: Vec<String>,
    /// Pool share denominations converted into their reserves.
    /// Empty means every pool whose pair contains a target.
    #[serde(default)]
    pub pool_coin_denoms: Vec<String>,
    /// Fee applied when converting pool shares.
    #[serde(default)]
    pub fee_policy: FeePolicy,
}

impl ExposureConfig {
    /// Creates a configuration tracking `targets` at book value.
    #[must_use]
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_denoms: targets.into_iter().map(Into::into).collect(),
            pool_coin_denoms: Vec::new(),
            fee_policy: FeePolicy::BookValue,
        }
    }

    /// Restricts conversion to the given pool share denominations.
    #[must_use]
    pub fn with_pool_denoms<I, S>(mut self, denoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pool_coin_denoms = denoms.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the fee policy.
    #[must_use]
    pub fn with_fee_policy(mut self, fee_policy: FeePolicy) -> Self {
        self.fee_policy = fee_policy;
        self
    }

    /// Whether `denom` is a target.
    #[must_use]
    pub fn is_target(&self, denom: &str) -> bool {
        self.target_denoms.iter().any(|target| target == denom)
    }

    /// Resolves the pool share denominations to convert.
    ///
    /// # Errors
    /// Returns an error if no target is configured or a configured pool
    /// share denomination has no pool.
    pub fn resolve_pool_denoms(&self, index: &PoolIndex) -> Result<Vec<String>, EngineError> {
        if self.target_denoms.is_empty() {
            return Err(EngineError::NoTargets);
        }

        if self.pool_coin_denoms.is_empty() {
            let denoms: Vec<String> = index
                .entries()
                .filter(|entry| self.target_denoms.iter().any(|t| entry.pair.contains(t)))
                .map(|entry| entry.pool.pool_coin_denom.clone())
                .collect();
            debug!(pools = ?denoms, "Tracking every pool paired with a target");
            return Ok(denoms);
        }

        for denom in &self.pool_coin_denoms {
            if index.pool_by_share_denom(denom).is_none() {
                return Err(EngineError::UnknownPoolDenom(denom.clone()));
            }
        }
        Ok(self.pool_coin_denoms.clone())
    }
}
