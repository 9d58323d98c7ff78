//! Daily/weekly cuadre calculation
//!
//! Reconciles the position the ledger says the agency should hold against the
//! cash actually counted at close. The calculation runs in five stages, each
//! rounded to cents, over a single pre-aggregated snapshot.

use common::decimal::precision::{add_money, mul_money, round_money, sub_money};
use common::decimal::{dec, Money};
use common::error::{Error, Result};
use common::model::currency::CurrencyPair;
use common::model::reconciliation::{ReconciliationInput, ReconciliationResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default balance tolerance in Bs
pub const DEFAULT_TOLERANCE: Money = dec!(100);

/// Calculator policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Largest absolute final discrepancy (Bs) still considered balanced
    pub tolerance: Money,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl CalculatorConfig {
    /// Create a configuration with a custom tolerance
    pub fn new(tolerance: Money) -> Result<Self> {
        if tolerance < Decimal::ZERO {
            return Err(Error::ConfigurationError(format!(
                "Tolerance must not be negative, got {}", tolerance
            )));
        }

        Ok(Self {
            tolerance: round_money(tolerance),
        })
    }
}

/// Stateless reconciliation engine
#[derive(Debug, Clone, Default)]
pub struct CuadreCalculator {
    config: CalculatorConfig,
}

impl CuadreCalculator {
    /// Create a calculator with the default 100 Bs tolerance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calculator with a specific configuration
    pub fn with_config(config: CalculatorConfig) -> Self {
        Self { config }
    }

    /// Tolerance in use
    pub fn tolerance(&self) -> Money {
        self.config.tolerance
    }

    /// Reconcile one snapshot.
    ///
    /// Fails only on a non-positive exchange rate, or with `DecimalError` when
    /// a stage overflows the decimal range.
    pub fn compute(&self, input: &ReconciliationInput) -> Result<ReconciliationResult> {
        if input.exchange_rate <= Decimal::ZERO {
            warn!("Rejecting cuadre with exchange rate {}", input.exchange_rate);
            return Err(Error::InvalidExchangeRate(format!(
                "Exchange rate must be greater than zero, got {}", input.exchange_rate
            )));
        }

        let input = input.normalized();

        // Stage 1: what the ledger says should be on hand
        let net_sales_prizes: CurrencyPair = input.total_sales.checked_sub(&input.total_prizes)?;

        // Stage 2: net non-cash inflows
        let bank_total = sub_money(
            add_money(input.mobile_payments_received, input.total_point_of_sale)?,
            input.mobile_payments_paid,
        )?;
        debug!(
            net_bs = %net_sales_prizes.bs,
            net_usd = %net_sales_prizes.usd,
            bank_total = %bank_total,
            "Computed expected position"
        );

        // Stage 3: USD side. Only a surplus crosses over to Bs, and only when enabled.
        let usd_counted_total = add_money(
            add_money(input.cash_available.usd, input.total_debts.usd)?,
            input.total_expenses.usd,
        )?;
        let usd_discrepancy = sub_money(
            sub_money(
                sub_money(usd_counted_total, net_sales_prizes.usd)?,
                input.additional_amount.usd,
            )?,
            input.pending_prizes.usd,
        )?;
        let usd_surplus = round_money(usd_discrepancy.max(Money::ZERO));
        let usd_surplus_in_bs = if input.apply_excess_usd {
            mul_money(usd_surplus, input.exchange_rate)?
        } else {
            round_money(Money::ZERO)
        };
        debug!(
            usd_counted_total = %usd_counted_total,
            usd_discrepancy = %usd_discrepancy,
            usd_surplus_in_bs = %usd_surplus_in_bs,
            "Computed USD side"
        );

        // Stage 4: Bs side
        let bs_counted_total = [
            bank_total,
            input.total_debts.bs,
            input.total_expenses.bs,
            usd_surplus_in_bs,
        ]
        .into_iter()
        .try_fold(input.cash_available.bs, add_money)?;
        let bs_counted_total = sub_money(bs_counted_total, input.additional_amount.bs)?;
        let pre_adjustment_discrepancy = sub_money(bs_counted_total, net_sales_prizes.bs)?;

        // Stage 5: pending prizes
        let final_discrepancy = sub_money(pre_adjustment_discrepancy, input.pending_prizes.bs)?;
        let is_balanced = final_discrepancy.abs() <= self.config.tolerance;
        debug!(
            bs_counted_total = %bs_counted_total,
            final_discrepancy = %final_discrepancy,
            is_balanced,
            "Computed Bs side"
        );

        Ok(ReconciliationResult {
            net_sales_prizes,
            bank_total,
            usd_counted_total,
            usd_discrepancy,
            usd_surplus,
            usd_surplus_in_bs,
            bs_counted_total,
            pre_adjustment_discrepancy,
            final_discrepancy,
            is_balanced,
            tolerance: self.config.tolerance,
        })
    }
}
