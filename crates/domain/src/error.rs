//! Errors raised by the reserve math.

use crate::token::TokenAmount;
use rust_decimal::Decimal;
use thiserror::Error;

/// Failures of the constant-product reserve math.
///
/// Every variant is fatal for an exposure run: it means the snapshot is
/// corrupt or was misunderstood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// Zero share supply with non-zero reserves.
    #[error(
        "invalid pool state: share supply {share_supply} with reserves ({quote_reserve}, {base_reserve})"
    )]
    InvalidPoolState {
        quote_reserve: TokenAmount,
        base_reserve: TokenAmount,
        share_supply: TokenAmount,
    },

    /// Withdrawal against a pool whose share supply is zero.
    #[error("division by zero: pool has no share supply")]
    DivisionByZero,

    /// Fee rate outside `[0, 1]`.
    #[error("invalid fee rate {0}: must lie in [0, 1]")]
    InvalidFeeRate(Decimal),

    /// Intermediate product exceeded the working width.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
}
