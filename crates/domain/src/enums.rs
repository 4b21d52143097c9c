use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fee applied when converting pool shares into reserves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeePolicy {
    /// No fee: the share's book value.
    #[default]
    BookValue,
    /// The chain's configured withdrawal fee, as an on-chain withdrawal would pay.
    Withdrawal,
}

impl FeePolicy {
    /// Fee rate to pass to the reserve math under this policy.
    pub fn fee_rate(&self, withdraw_fee_rate: Decimal) -> Decimal {
        match self {
            FeePolicy::BookValue => Decimal::ZERO,
            FeePolicy::Withdrawal => withdraw_fee_rate,
        }
    }
}

/// Where an exposure contribution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContributionSource {
    /// Spendable bank balance.
    Balance,
    /// Active farming stake.
    Stake,
    /// Queued farming stake.
    QueuedStake,
}

impl ContributionSource {
    /// Whether the contribution comes from the farming module.
    pub fn is_farming(&self) -> bool {
        matches!(self, ContributionSource::Stake | ContributionSource::QueuedStake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fee_policy_rate() {
        assert_eq!(FeePolicy::BookValue.fee_rate(dec!(0.003)), Decimal::ZERO);
        assert_eq!(FeePolicy::Withdrawal.fee_rate(dec!(0.003)), dec!(0.003));
    }

    #[test]
    fn test_contribution_source() {
        assert!(!ContributionSource::Balance.is_farming());
        assert!(ContributionSource::Stake.is_farming());
        assert!(ContributionSource::QueuedStake.is_farming());
    }
}
