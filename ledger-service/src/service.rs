//! Ledger service implementation

use std::sync::Arc;

use chrono::NaiveDate;
use common::decimal::precision::round_money;
use common::decimal::{ExchangeRate, Money};
use common::error::{Error, ErrorExt, Result};
use common::model::currency::{Currency, CurrencyPair};
use common::model::ledger::{EntryKind, LedgerEntry};
use common::model::period::Period;
use common::model::reconciliation::{ReconciliationInput, ReconciliationResult};
use cuadre_engine::CuadreCalculator;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::CuadreConfig;
use crate::repository::{InMemoryLedgerRepository, LedgerRepository};

/// A reconciled period with the snapshot it was computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Agency and date range
    pub period: Period,
    /// Aggregated snapshot
    pub input: ReconciliationInput,
    /// Calculator output
    pub result: ReconciliationResult,
}

/// Ledger service for recording movements and reconciling periods
pub struct LedgerService {
    /// Repository for entries
    repo: Arc<dyn LedgerRepository>,
    /// Service configuration
    config: CuadreConfig,
    /// Calculator built from the configuration
    calculator: CuadreCalculator,
}

impl LedgerService {
    /// Create a new ledger service backed by memory with default configuration
    pub fn new() -> Self {
        Self {
            repo: Arc::new(InMemoryLedgerRepository::new()),
            config: CuadreConfig::default(),
            calculator: CuadreCalculator::new(),
        }
    }

    /// Create a ledger service with a specific repository and configuration
    pub fn with_repository(repo: Arc<dyn LedgerRepository>, config: CuadreConfig) -> Result<Self> {
        let calculator = CuadreCalculator::with_config(config.calculator_config()?);
        Ok(Self { repo, config, calculator })
    }

    /// Create an in-memory ledger service with a configuration
    pub fn with_config(config: CuadreConfig) -> Result<Self> {
        Self::with_repository(Arc::new(InMemoryLedgerRepository::new()), config)
    }

    /// Configuration in use
    pub fn config(&self) -> &CuadreConfig {
        &self.config
    }

    /// Record a movement
    pub async fn record(
        &self,
        agency_id: Uuid,
        date: NaiveDate,
        kind: EntryKind,
        currency: Currency,
        amount: Money,
        note: Option<String>,
    ) -> Result<LedgerEntry> {
        if amount <= Decimal::ZERO {
            return Err(Error::ValidationError(format!(
                "Amount for {:?} must be positive, got {}", kind, amount
            )));
        }

        if !kind.allows(currency) {
            return Err(Error::ValidationError(format!(
                "{:?} cannot be recorded in {}", kind, currency
            )));
        }

        let amount = round_money(amount);
        if amount.is_zero() {
            return Err(Error::ValidationError(format!(
                "Amount for {:?} rounds to zero", kind
            )));
        }

        info!("Recording {:?} of {} {} for agency {} on {}", kind, amount, currency, agency_id, date);
        let entry = LedgerEntry::new(agency_id, date, kind, currency, amount, note);

        self.repo.record_entry(entry).await
            .with_context(|| format!("Failed to record {:?} for agency {}", kind, agency_id))
    }

    /// Get an entry by ID
    pub async fn get_entry(&self, id: Uuid) -> Result<Option<LedgerEntry>> {
        self.repo.get_entry(id).await
    }

    /// Remove a recorded entry
    pub async fn remove(&self, id: Uuid) -> Result<LedgerEntry> {
        let entry = self.repo.remove_entry(id).await?
            .ok_or_else(|| Error::EntryNotFound(format!("Entry not found: {}", id)))?;

        info!("Removed {:?} entry {} for agency {}", entry.kind, id, entry.agency_id);
        Ok(entry)
    }

    /// Entries of a period ordered by date then recording time
    pub async fn entries(&self, period: &Period) -> Result<Vec<LedgerEntry>> {
        self.repo.entries_for_period(period).await
    }

    /// Sum the period's entries into a reconciliation snapshot.
    ///
    /// `exchange_rate` falls back to the configured default, and
    /// `apply_excess_usd` to the configured toggle.
    pub async fn aggregate(
        &self,
        period: &Period,
        exchange_rate: Option<ExchangeRate>,
        apply_excess_usd: Option<bool>,
    ) -> Result<ReconciliationInput> {
        let exchange_rate = exchange_rate
            .or(self.config.default_exchange_rate)
            .ok_or_else(|| Error::InvalidExchangeRate(format!(
                "No exchange rate for agency {} between {} and {}",
                period.agency_id, period.start, period.end
            )))?;

        let entries = self.repo.entries_for_period(period).await
            .with_context(|| format!("Failed to read entries for agency {}", period.agency_id))?;

        let mut input = ReconciliationInput::new(exchange_rate);
        input.apply_excess_usd = apply_excess_usd.unwrap_or(self.config.apply_excess_usd);

        let mut mobile_received = CurrencyPair::zero();
        let mut mobile_paid = CurrencyPair::zero();
        let mut point_of_sale = CurrencyPair::zero();

        for entry in &entries {
            let bucket = match entry.kind {
                EntryKind::Sale => &mut input.total_sales,
                EntryKind::Prize => &mut input.total_prizes,
                EntryKind::Expense => &mut input.total_expenses,
                EntryKind::Debt => &mut input.total_debts,
                EntryKind::MobilePaymentReceived => &mut mobile_received,
                EntryKind::MobilePaymentPaid => &mut mobile_paid,
                EntryKind::PointOfSale => &mut point_of_sale,
                EntryKind::PendingPrize => &mut input.pending_prizes,
                EntryKind::CashCount => &mut input.cash_available,
                EntryKind::AdditionalAmount => &mut input.additional_amount,
            };
            bucket.credit(entry.currency, entry.amount)
                .with_context(|| format!("Summing {:?} entry {}", entry.kind, entry.id))?;
        }

        input.mobile_payments_received = mobile_received.bs;
        input.mobile_payments_paid = mobile_paid.bs;
        input.total_point_of_sale = point_of_sale.bs;

        debug!(
            "Aggregated {} entries for agency {} ({:?} {} - {})",
            entries.len(), period.agency_id, period.kind, period.start, period.end
        );

        Ok(input)
    }

    /// Aggregate and reconcile a period
    pub async fn reconcile(
        &self,
        period: &Period,
        exchange_rate: Option<ExchangeRate>,
        apply_excess_usd: Option<bool>,
    ) -> Result<ReconciliationReport> {
        let input = self.aggregate(period, exchange_rate, apply_excess_usd).await?;

        let result = self.calculator.compute(&input)
            .with_context(|| format!("Cuadre for agency {} from {} to {}", period.agency_id, period.start, period.end))?;

        if result.is_balanced {
            info!(
                agency_id = %period.agency_id,
                final_discrepancy = %result.final_discrepancy,
                "Cuadre balanced for {} - {}", period.start, period.end
            );
        } else {
            warn!(
                agency_id = %period.agency_id,
                final_discrepancy = %result.final_discrepancy,
                tolerance = %result.tolerance,
                "Cuadre not balanced for {} - {}", period.start, period.end
            );
        }

        Ok(ReconciliationReport {
            period: *period,
            input,
            result,
        })
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
