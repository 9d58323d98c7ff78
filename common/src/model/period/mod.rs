//! Accounting periods a cuadre is computed over

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Period granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    /// A single day
    Daily,
    /// Monday to Sunday
    Weekly,
    /// Any other inclusive date range
    Custom,
}

/// One agency over an inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Agency the figures belong to
    pub agency_id: Uuid,
    /// Granularity
    pub kind: PeriodKind,
    /// First day (inclusive)
    pub start: NaiveDate,
    /// Last day (inclusive)
    pub end: NaiveDate,
}

impl Period {
    /// A single day
    pub fn daily(agency_id: Uuid, date: NaiveDate) -> Self {
        Self {
            agency_id,
            kind: PeriodKind::Daily,
            start: date,
            end: date,
        }
    }

    /// The Monday-to-Sunday week containing `date`
    pub fn weekly(agency_id: Uuid, date: NaiveDate) -> Self {
        let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        Self {
            agency_id,
            kind: PeriodKind::Weekly,
            start,
            end: start + Duration::days(6),
        }
    }

    /// An arbitrary inclusive range; classified as daily or weekly when it lines up
    pub fn custom(agency_id: Uuid, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::ValidationError(format!(
                "Period end {} is before start {}", end, start
            )));
        }

        let days = (end - start).num_days() + 1;
        let kind = if days == 1 {
            PeriodKind::Daily
        } else if days == 7 && start.weekday() == Weekday::Mon {
            PeriodKind::Weekly
        } else {
            PeriodKind::Custom
        };

        Ok(Self { agency_id, kind, start, end })
    }

    /// Whether `date` falls inside the period
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
