//! Decimal type utilities for precise currency calculations

use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;

/// Monetary amount in either currency track (Bs or USD)
pub type Money = Decimal;

/// Units of Bs per 1 USD
pub type ExchangeRate = Decimal;

/// Precision helpers for common operations
pub mod precision {
    use std::str::FromStr;

    use rust_decimal::RoundingStrategy;

    use super::*;
    use crate::error::{Error, Result};

    /// Currency precision (2 decimal places, cents)
    pub const MONEY_SCALE: u32 = 2;

    /// Round a monetary amount to cents.
    ///
    /// Midpoints round away from zero, and the result always carries exactly
    /// two decimal places so that `1000` and `1000.00` serialize identically.
    pub fn round_money(amount: Money) -> Money {
        let mut rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(MONEY_SCALE);
        if rounded.is_zero() {
            // no "-0.00"
            rounded.set_sign_positive(true);
        }
        rounded
    }

    /// Convert a float coming from an outer layer into money.
    ///
    /// The value goes through its shortest decimal representation, so `0.1`
    /// becomes exactly `0.10` rather than the nearest binary fraction.
    pub fn money_from_f64(value: f64) -> Result<Money> {
        if !value.is_finite() {
            return Err(Error::InvalidAmount(format!("Non-finite amount: {}", value)));
        }

        let amount = Decimal::from_str(&value.to_string())
            .map_err(|e| Error::InvalidAmount(format!("Amount {} out of range: {}", value, e)))?;

        Ok(round_money(amount))
    }

    /// Add two amounts and round the sum to cents
    pub fn add_money(lhs: Money, rhs: Money) -> Result<Money> {
        lhs.checked_add(rhs)
            .map(round_money)
            .ok_or_else(|| Error::DecimalError(format!("Overflow adding {} to {}", rhs, lhs)))
    }

    /// Subtract `rhs` from `lhs` and round the difference to cents
    pub fn sub_money(lhs: Money, rhs: Money) -> Result<Money> {
        lhs.checked_sub(rhs)
            .map(round_money)
            .ok_or_else(|| Error::DecimalError(format!("Overflow subtracting {} from {}", rhs, lhs)))
    }

    /// Multiply two values and round the product to cents
    pub fn mul_money(amount: Money, factor: Decimal) -> Result<Money> {
        amount
            .checked_mul(factor)
            .map(round_money)
            .ok_or_else(|| Error::DecimalError(format!("Overflow multiplying {} by {}", amount, factor)))
    }
}
