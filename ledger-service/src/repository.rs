//! Repository for ledger entries

use async_trait::async_trait;
use common::error::Result;
use common::model::ledger::LedgerEntry;
use common::model::period::Period;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

/// Ledger repository trait defining the interface for entry storage
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Store an entry
    async fn record_entry(&self, entry: LedgerEntry) -> Result<LedgerEntry>;

    /// Get an entry by ID
    async fn get_entry(&self, id: Uuid) -> Result<Option<LedgerEntry>>;

    /// Remove an entry, returning it if it existed
    async fn remove_entry(&self, id: Uuid) -> Result<Option<LedgerEntry>>;

    /// All entries of the period's agency dated inside the period
    async fn entries_for_period(&self, period: &Period) -> Result<Vec<LedgerEntry>>;
}

/// In-memory repository for ledger entries
pub struct InMemoryLedgerRepository {
    /// Entries by ID
    pub entries: DashMap<Uuid, LedgerEntry>,
}

impl InMemoryLedgerRepository {
    /// Create a new in-memory ledger repository
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl Default for InMemoryLedgerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn record_entry(&self, entry: LedgerEntry) -> Result<LedgerEntry> {
        self.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn get_entry(&self, id: Uuid) -> Result<Option<LedgerEntry>> {
        Ok(self.entries.get(&id).map(|e| e.clone()))
    }

    async fn remove_entry(&self, id: Uuid) -> Result<Option<LedgerEntry>> {
        Ok(self.entries.remove(&id).map(|(_, entry)| entry))
    }

    async fn entries_for_period(&self, period: &Period) -> Result<Vec<LedgerEntry>> {
        let mut entries: Vec<LedgerEntry> = self.entries
            .iter()
            .filter_map(|entry| {
                let e = entry.value();
                if e.agency_id == period.agency_id && period.contains(e.date) {
                    Some(e.clone())
                } else {
                    None
                }
            })
            .collect();

        entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        debug!(
            "Found {} entries for agency {} between {} and {}",
            entries.len(), period.agency_id, period.start, period.end
        );

        Ok(entries)
    }
}
