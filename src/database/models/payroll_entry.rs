use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use crate::payroll::PayrollCalculation;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum EntryStatus {
        Computed => "computed",
        Paid => "paid",
    }
}

/// A stored payroll result. The calculation part is immutable once the
/// entry is paid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollEntry {
    pub id: Uuid,
    pub status: EntryStatus,
    #[serde(flatten)]
    pub calculation: PayrollCalculation,
    pub computed_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl PayrollEntry {
    pub fn is_paid(&self) -> bool {
        self.status == EntryStatus::Paid
    }
}

/// Result of persisting a run's computed entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSummary {
    pub saved: Vec<Uuid>,
    /// Employees whose entry for the period is already paid and was left untouched.
    pub skipped_paid: Vec<Uuid>,
}
