//! Reconciliation snapshot and result models

use serde::{Deserialize, Serialize};

use crate::decimal::precision::round_money;
use crate::decimal::{ExchangeRate, Money};
use crate::model::currency::CurrencyPair;

/// Aggregated figures for one agency and one period, ready to reconcile.
///
/// Every sub-total is a pre-aggregated, non-negative sum in its currency.
/// Absent data is zero, never missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReconciliationInput {
    /// Sales recorded for the period
    pub total_sales: CurrencyPair,
    /// Prizes paid out
    pub total_prizes: CurrencyPair,
    /// Operating expenses
    pub total_expenses: CurrencyPair,
    /// Debt transactions
    pub total_debts: CurrencyPair,
    /// Inbound mobile transfers (Bs)
    pub mobile_payments_received: Money,
    /// Outbound mobile transfers (Bs, positive magnitude)
    pub mobile_payments_paid: Money,
    /// Card terminal total (Bs)
    pub total_point_of_sale: Money,
    /// Physically counted cash at close
    pub cash_available: CurrencyPair,
    /// Prizes owed but not yet disbursed
    pub pending_prizes: CurrencyPair,
    /// Cash injected into the till from outside the period's operations
    pub additional_amount: CurrencyPair,
    /// Bs per 1 USD for the period
    pub exchange_rate: ExchangeRate,
    /// Credit a USD surplus toward the Bs side
    pub apply_excess_usd: bool,
}

impl ReconciliationInput {
    /// Create an all-zero snapshot at the given exchange rate
    pub fn new(exchange_rate: ExchangeRate) -> Self {
        Self {
            exchange_rate,
            ..Default::default()
        }
    }

    /// Copy with every money field rounded to cents. The exchange rate is kept as is.
    pub fn normalized(&self) -> Self {
        Self {
            total_sales: self.total_sales.rounded(),
            total_prizes: self.total_prizes.rounded(),
            total_expenses: self.total_expenses.rounded(),
            total_debts: self.total_debts.rounded(),
            mobile_payments_received: round_money(self.mobile_payments_received),
            mobile_payments_paid: round_money(self.mobile_payments_paid),
            total_point_of_sale: round_money(self.total_point_of_sale),
            cash_available: self.cash_available.rounded(),
            pending_prizes: self.pending_prizes.rounded(),
            additional_amount: self.additional_amount.rounded(),
            exchange_rate: self.exchange_rate,
            apply_excess_usd: self.apply_excess_usd,
        }
    }
}

/// Sign of the final discrepancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscrepancyStatus {
    /// Counted position matches the ledger to the cent
    Exact,
    /// More money on hand than expected
    Surplus,
    /// Less money on hand than expected
    Deficit,
}

/// Outcome of reconciling one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    /// Sales minus prizes, per currency
    pub net_sales_prizes: CurrencyPair,
    /// Mobile received plus point of sale minus mobile paid (Bs)
    pub bank_total: Money,
    /// USD cash plus USD debts and expenses
    pub usd_counted_total: Money,
    /// Counted USD minus expected USD position
    pub usd_discrepancy: Money,
    /// Non-negative part of the USD discrepancy
    pub usd_surplus: Money,
    /// USD surplus converted to Bs, zero unless the surplus is applied
    pub usd_surplus_in_bs: Money,
    /// Full Bs-side counted position
    pub bs_counted_total: Money,
    /// Bs discrepancy before pending prizes
    pub pre_adjustment_discrepancy: Money,
    /// Bs discrepancy after pending prizes
    pub final_discrepancy: Money,
    /// Whether the final discrepancy is within tolerance
    pub is_balanced: bool,
    /// Tolerance the verdict was judged against (Bs)
    pub tolerance: Money,
}

impl ReconciliationResult {
    /// Classify the final discrepancy by sign
    pub fn status(&self) -> DiscrepancyStatus {
        if self.final_discrepancy.is_zero() {
            DiscrepancyStatus::Exact
        } else if self.final_discrepancy.is_sign_positive() {
            DiscrepancyStatus::Surplus
        } else {
            DiscrepancyStatus::Deficit
        }
    }
}
