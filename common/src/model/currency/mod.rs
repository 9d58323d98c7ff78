//! Currency tracks and per-currency amounts

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decimal::precision::{add_money, round_money, sub_money};
use crate::decimal::Money;
use crate::error::Result;

/// The two independent currency tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Local currency (bolívar)
    Bs,
    /// Secondary currency
    Usd,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Bs => write!(f, "Bs"),
            Currency::Usd => write!(f, "USD"),
        }
    }
}

/// An amount held in both currency tracks.
///
/// Both fields are always present; missing data is zero so arithmetic over
/// pairs is total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyPair {
    /// Local currency amount
    pub bs: Money,
    /// USD amount
    pub usd: Money,
}

impl CurrencyPair {
    /// Create a pair from both amounts
    pub fn new(bs: Money, usd: Money) -> Self {
        Self { bs, usd }
    }

    /// Pair with both tracks at zero
    pub fn zero() -> Self {
        Self::default()
    }

    /// Pair with only a Bs amount
    pub fn bs(amount: Money) -> Self {
        Self { bs: amount, usd: Money::ZERO }
    }

    /// Pair with only a USD amount
    pub fn usd(amount: Money) -> Self {
        Self { bs: Money::ZERO, usd: amount }
    }

    /// Amount in the given currency
    pub fn get(&self, currency: Currency) -> Money {
        match currency {
            Currency::Bs => self.bs,
            Currency::Usd => self.usd,
        }
    }

    /// Add an amount to one track, rounding to cents
    pub fn credit(&mut self, currency: Currency, amount: Money) -> Result<()> {
        match currency {
            Currency::Bs => self.bs = add_money(self.bs, amount)?,
            Currency::Usd => self.usd = add_money(self.usd, amount)?,
        }
        Ok(())
    }

    /// Per-track sum, or `DecimalError` if either track overflows
    pub fn checked_add(&self, rhs: &CurrencyPair) -> Result<CurrencyPair> {
        Ok(CurrencyPair {
            bs: add_money(self.bs, rhs.bs)?,
            usd: add_money(self.usd, rhs.usd)?,
        })
    }

    /// Per-track difference, or `DecimalError` if either track overflows
    pub fn checked_sub(&self, rhs: &CurrencyPair) -> Result<CurrencyPair> {
        Ok(CurrencyPair {
            bs: sub_money(self.bs, rhs.bs)?,
            usd: sub_money(self.usd, rhs.usd)?,
        })
    }

    /// Both tracks rounded to cents
    pub fn rounded(&self) -> Self {
        Self {
            bs: round_money(self.bs),
            usd: round_money(self.usd),
        }
    }
}
