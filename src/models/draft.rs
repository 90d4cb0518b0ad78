//! Draft assignment records.
//!
//! A draft is an unpersisted-or-pending driver override for one
//! appointment. It is authoritative client-side until a successful batch
//! submit reloads server truth.
//!
//! # Null vs absent
//! `driver_id: None` inside a record means *explicit unassignment* — the
//! operator cleared the driver. A missing record means "no draft, defer to
//! the confirmed assignment". The two must never be conflated.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One draft override: who the appointment is (un)assigned to, and by whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    /// Overriding driver. `None` = explicit unassignment.
    pub driver_id: Option<String>,
    /// Display name of the last editor.
    pub edited_by: String,
    /// When the last edit was made (local wall time).
    pub edited_at: NaiveDateTime,
}

/// A draft row as delivered by the data gateway, keyed by appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRow {
    /// Appointment this draft overrides.
    pub appointment_id: String,
    /// Overriding driver. `None` = explicit unassignment.
    pub driver_id: Option<String>,
    /// Display name of the last editor.
    pub edited_by: String,
    /// When the last edit was made (local wall time).
    pub edited_at: NaiveDateTime,
}

impl DraftRecord {
    /// Creates a new draft record.
    pub fn new(
        driver_id: Option<String>,
        edited_by: impl Into<String>,
        edited_at: NaiveDateTime,
    ) -> Self {
        Self {
            driver_id,
            edited_by: edited_by.into(),
            edited_at,
        }
    }
}

impl From<DraftRow> for DraftRecord {
    fn from(row: DraftRow) -> Self {
        Self {
            driver_id: row.driver_id,
            edited_by: row.edited_by,
            edited_at: row.edited_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_row_to_record() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 11)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let row = DraftRow {
            appointment_id: "A1".into(),
            driver_id: Some("D1".into()),
            edited_by: "ops".into(),
            edited_at: at,
        };
        let record = DraftRecord::from(row);
        assert_eq!(record.driver_id.as_deref(), Some("D1"));
        assert_eq!(record.edited_by, "ops");
        assert_eq!(record.edited_at, at);
    }
}
