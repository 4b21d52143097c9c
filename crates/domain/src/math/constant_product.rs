use crate::error::MathError;
use crate::token::TokenAmount;
use primitive_types::{U256, U512};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::Serialize;

/// Reserves and share supply of a constant-product pool (x * y = k),
/// captured at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReservePool {
    quote_reserve: TokenAmount,
    base_reserve: TokenAmount,
    share_supply: TokenAmount,
}

impl ReservePool {
    /// Builds a pool model.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::InvalidPoolState`] when the share supply is zero
    /// but a reserve is not; no share ratio can be derived from that state.
    pub fn new(
        quote_reserve: TokenAmount,
        base_reserve: TokenAmount,
        share_supply: TokenAmount,
    ) -> Result<Self, MathError> {
        if share_supply.is_zero() && !(quote_reserve.is_zero() && base_reserve.is_zero()) {
            return Err(MathError::InvalidPoolState {
                quote_reserve,
                base_reserve,
                share_supply,
            });
        }
        Ok(Self {
            quote_reserve,
            base_reserve,
            share_supply,
        })
    }

    /// An empty pool: no reserves, no shares.
    pub fn empty() -> Self {
        Self {
            quote_reserve: TokenAmount::zero(),
            base_reserve: TokenAmount::zero(),
            share_supply: TokenAmount::zero(),
        }
    }

    pub fn quote_reserve(&self) -> TokenAmount {
        self.quote_reserve
    }

    pub fn base_reserve(&self) -> TokenAmount {
        self.base_reserve
    }

    pub fn share_supply(&self) -> TokenAmount {
        self.share_supply
    }

    /// Returns the reserve amounts redeemable for `share_amount` pool shares.
    ///
    /// formula: x = floor(Rq * pc * (1 - fee) / Ps), y = floor(Rb * pc * (1 - fee) / Ps)
    ///
    /// The fee multiplier is expanded into its decimal mantissa and scale so the
    /// whole numerator is formed exactly before a single truncating division.
    /// `share_amount` above the supply is not rejected; the result then exceeds
    /// the reserves proportionally.
    ///
    /// # Arguments
    ///
    /// * `share_amount` - Pool shares being redeemed
    /// * `fee_rate` - Withdrawal fee in `[0, 1]`; zero gives book value
    ///
    /// # Returns
    ///
    /// * `(quote_amount, base_amount)`
    pub fn withdraw(
        &self,
        share_amount: TokenAmount,
        fee_rate: Decimal,
    ) -> Result<(TokenAmount, TokenAmount), MathError> {
        if self.share_supply.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        let (keep_numerator, keep_denominator) = fee_multiplier(fee_rate)?;

        let denominator = U512::from(self.share_supply.0)
            .checked_mul(keep_denominator)
            .ok_or(MathError::Overflow("withdraw denominator"))?;

        let redeem = |reserve: TokenAmount| -> Result<TokenAmount, MathError> {
            let numerator = reserve
                .0
                .full_mul(share_amount.0)
                .checked_mul(keep_numerator)
                .ok_or(MathError::Overflow("withdraw numerator"))?;
            let amount = U256::try_from(numerator / denominator)
                .map_err(|_| MathError::Overflow("withdraw result"))?;
            Ok(TokenAmount(amount))
        };

        Ok((redeem(self.quote_reserve)?, redeem(self.base_reserve)?))
    }

    /// Spot price of the base asset in quote units (Rq / Rb).
    pub fn price(&self) -> Option<Decimal> {
        let quote = Decimal::from_str(&self.quote_reserve.to_string()).ok()?;
        let base = Decimal::from_str(&self.base_reserve.to_string()).ok()?;
        if base.is_zero() {
            return None;
        }
        quote.checked_div(base)
    }
}

/// Splits `1 - fee_rate` into an exact integer ratio.
fn fee_multiplier(fee_rate: Decimal) -> Result<(U512, U512), MathError> {
    if fee_rate < Decimal::ZERO || fee_rate > Decimal::ONE {
        return Err(MathError::InvalidFeeRate(fee_rate));
    }
    let keep = Decimal::ONE - fee_rate;
    let mantissa =
        u128::try_from(keep.mantissa()).map_err(|_| MathError::InvalidFeeRate(fee_rate))?;
    // scale is at most 28, so 10^scale fits in a u128
    let scale = 10u128.pow(keep.scale());
    Ok((U512::from(mantissa), U512::from(scale)))
}
