//! Supply reconciliation.
//!
//! The sum of every account's exposure to a target should match the chain's
//! total supply of that target, short by at most one unit per pool share
//! conversion (each conversion floors once per reserve leg).

use crate::exposure::ExposureTable;
use genesis_exposure_domain::token::TokenAmount;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Supply versus accounted exposure for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Residual {
    pub denom: String,
    /// Chain-reported total supply.
    pub supply: TokenAmount,
    /// Sum of all account totals.
    pub accounted: TokenAmount,
    /// Largest shortfall explained by rounding: the number of conversions.
    pub rounding_bound: TokenAmount,
}

impl Residual {
    /// `supply - accounted` when the table accounts for less than the supply.
    #[must_use]
    pub fn shortfall(&self) -> Option<TokenAmount> {
        self.supply.checked_sub(self.accounted)
    }

    /// `accounted - supply` when the table accounts for more than the supply.
    #[must_use]
    pub fn excess(&self) -> Option<TokenAmount> {
        self.accounted
            .checked_sub(self.supply)
            .filter(|excess| !excess.is_zero())
    }

    /// Whether the residual is a shortfall no larger than the rounding bound.
    #[must_use]
    pub fn within_rounding_bound(&self) -> bool {
        self.shortfall()
            .is_some_and(|shortfall| shortfall <= self.rounding_bound)
    }
}

/// Signed `supply - accounted`.
impl fmt::Display for Residual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.excess() {
            Some(excess) => write!(f, "-{excess}"),
            None => write!(f, "{}", self.shortfall().unwrap_or_default()),
        }
    }
}

/// Compares the table's totals against chain supply, per target.
///
/// # Arguments
///
/// * `table` - Aggregated exposure
/// * `supply_of` - Chain-wide supply lookup
/// * `conversions` - Pool share conversions performed while aggregating
pub fn reconcile<F>(table: &ExposureTable, supply_of: F, conversions: u64) -> Vec<Residual>
where
    F: Fn(&str) -> TokenAmount,
{
    let rounding_bound = TokenAmount::from(conversions);

    table
        .targets()
        .iter()
        .map(|denom| {
            let residual = Residual {
                denom: denom.clone(),
                supply: supply_of(denom),
                accounted: table.total_of(denom),
                rounding_bound,
            };
            if residual.within_rounding_bound() {
                info!(
                    denom = %residual.denom,
                    supply = %residual.supply,
                    accounted = %residual.accounted,
                    residual = %residual,
                    "Reconciled target supply"
                );
            } else {
                warn!(
                    denom = %residual.denom,
                    supply = %residual.supply,
                    accounted = %residual.accounted,
                    residual = %residual,
                    rounding_bound = %residual.rounding_bound,
                    "Residual exceeds rounding bound"
                );
            }
            residual
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::ExposureRole;

    fn amount(v: u64) -> TokenAmount {
        TokenAmount::from(v)
    }

    fn table() -> ExposureTable {
        let mut table = ExposureTable::new(vec!["uluna".to_string(), "uusd".to_string()]);
        table.entry("alice").credit("uusd", amount(600));
        table.entry("alice").mark(ExposureRole::Holder);
        table.entry("bob").credit("uusd", amount(398));
        table.entry("bob").credit("uluna", amount(50));
        table
    }

    #[test]
    fn test_residual_within_bound() {
        let residuals = reconcile(
            &table(),
            |denom| match denom {
                "uusd" => amount(1_000),
                _ => amount(50),
            },
            2,
        );

        assert_eq!(residuals.len(), 2);
        let uluna = &residuals[0];
        assert_eq!(uluna.denom, "uluna");
        assert_eq!(uluna.shortfall(), Some(TokenAmount::zero()));
        assert!(uluna.within_rounding_bound());

        let uusd = &residuals[1];
        assert_eq!(uusd.accounted, amount(998));
        assert_eq!(uusd.shortfall(), Some(amount(2)));
        assert_eq!(uusd.to_string(), "2");
        assert!(uusd.within_rounding_bound());
    }

    #[test]
    fn test_residual_outside_bound() {
        let residuals = reconcile(&table(), |_| amount(10_000), 3);
        let uusd = residuals.iter().find(|r| r.denom == "uusd").unwrap();
        assert_eq!(uusd.shortfall(), Some(amount(9_002)));
        assert!(!uusd.within_rounding_bound());
    }

    #[test]
    fn test_excess_is_never_rounding() {
        let residuals = reconcile(&table(), |_| amount(40), 100);
        let uluna = &residuals[0];
        assert_eq!(uluna.excess(), Some(amount(10)));
        assert_eq!(uluna.shortfall(), None);
        assert_eq!(uluna.to_string(), "-10");
        assert!(!uluna.within_rounding_bound());
    }
}
