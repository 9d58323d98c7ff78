//! Ledger entries recorded by an agency during a period

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::model::currency::Currency;

/// What a ledger entry represents in the cuadre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Ticket sales
    Sale,
    /// Prizes paid out
    Prize,
    /// Operating expense paid from the till
    Expense,
    /// Debt transaction paid from the till
    Debt,
    /// Inbound mobile transfer
    MobilePaymentReceived,
    /// Outbound mobile transfer
    MobilePaymentPaid,
    /// Card terminal transaction
    PointOfSale,
    /// Prize owed but not yet disbursed
    PendingPrize,
    /// Physically counted cash at close
    CashCount,
    /// Manual cash injection from outside normal operations
    AdditionalAmount,
}

impl EntryKind {
    /// Whether the kind can be recorded in `currency`.
    ///
    /// Mobile transfers and card terminals only settle in Bs.
    pub fn allows(&self, currency: Currency) -> bool {
        match self {
            EntryKind::MobilePaymentReceived | EntryKind::MobilePaymentPaid | EntryKind::PointOfSale => {
                currency == Currency::Bs
            }
            _ => true,
        }
    }
}

/// One recorded movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique entry ID
    pub id: Uuid,
    /// Agency the entry belongs to
    pub agency_id: Uuid,
    /// Business date
    pub date: NaiveDate,
    /// Category
    pub kind: EntryKind,
    /// Currency track
    pub currency: Currency,
    /// Positive magnitude
    pub amount: Money,
    /// Free-form description
    pub note: Option<String>,
    /// Recording timestamp
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Create a new entry stamped now
    pub fn new(
        agency_id: Uuid,
        date: NaiveDate,
        kind: EntryKind,
        currency: Currency,
        amount: Money,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            agency_id,
            date,
            kind,
            currency,
            amount,
            note,
            created_at: Utc::now(),
        }
    }
}
