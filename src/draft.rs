//! In-memory draft assignment store.
//!
//! Holds the speculative appointment → driver overrides made on the board
//! before a batch submit. The store is the client-side source of truth:
//! display, conflict detection, and counters all read the *effective*
//! assignment (draft if present, confirmed otherwise).
//!
//! Exclusively owned by the current session. There is no cross-session
//! locking; concurrent editors overwrite each other last-write-wins.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::models::{Appointment, DraftRecord, DraftRow};

/// Speculative appointment → driver override map.
///
/// A missing entry means "no draft, defer to the confirmed driver"; an
/// entry holding `None` means the operator explicitly unassigned the
/// appointment. [`DraftStore::get`] preserves that distinction.
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    drafts: HashMap<String, DraftRecord>,
}

/// Assigned/pending tallies over a visible set of appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignmentCounts {
    /// Appointments whose effective driver is set.
    pub assigned: usize,
    /// Appointments whose effective driver is absent.
    pub pending: usize,
}

impl DraftStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store from loaded draft rows (server-held drafts from a
    /// previous session of the same editor).
    pub fn from_rows(rows: Vec<DraftRow>) -> Self {
        let mut store = Self::new();
        for row in rows {
            store
                .drafts
                .insert(row.appointment_id.clone(), DraftRecord::from(row));
        }
        store
    }

    /// Returns the draft for an appointment.
    ///
    /// Outer `None` = no draft exists. `Some(None)` = explicit
    /// unassignment. `Some(Some(id))` = draft driver.
    pub fn get(&self, appointment_id: &str) -> Option<Option<&str>> {
        self.drafts
            .get(appointment_id)
            .map(|r| r.driver_id.as_deref())
    }

    /// Returns the full draft record for an appointment, if any.
    pub fn record(&self, appointment_id: &str) -> Option<&DraftRecord> {
        self.drafts.get(appointment_id)
    }

    /// Creates or replaces the draft for an appointment.
    ///
    /// `driver_id: None` records an explicit unassignment.
    pub fn set(
        &mut self,
        appointment_id: impl Into<String>,
        driver_id: Option<String>,
        edited_by: impl Into<String>,
        edited_at: NaiveDateTime,
    ) {
        self.drafts.insert(
            appointment_id.into(),
            DraftRecord::new(driver_id, edited_by, edited_at),
        );
    }

    /// Overwrites the last-editor fields from a server acknowledgment.
    ///
    /// No-op if the draft has since been cleared.
    pub fn apply_receipt(
        &mut self,
        appointment_id: &str,
        edited_by: impl Into<String>,
        edited_at: NaiveDateTime,
    ) {
        if let Some(record) = self.drafts.get_mut(appointment_id) {
            record.edited_by = edited_by.into();
            record.edited_at = edited_at;
        }
    }

    /// The driver the board should treat as assigned: draft value when a
    /// draft exists, otherwise the server-confirmed driver.
    pub fn effective_driver<'a>(&'a self, appointment: &'a Appointment) -> Option<&'a str> {
        match self.drafts.get(&appointment.id) {
            Some(record) => record.driver_id.as_deref(),
            None => appointment.confirmed_driver_id.as_deref(),
        }
    }

    /// Drops every draft. Called after a successful submit, before the
    /// reloaded server truth is applied.
    pub fn clear_all(&mut self) {
        self.drafts.clear();
    }

    /// Number of drafts held.
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    /// Whether the store holds no drafts.
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Iterates over (appointment id, record) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DraftRecord)> {
        self.drafts.iter().map(|(id, r)| (id.as_str(), r))
    }

    /// Tallies assigned/pending appointments under effective assignment.
    pub fn counts(&self, appointments: &[Appointment]) -> AssignmentCounts {
        let mut counts = AssignmentCounts::default();
        for appointment in appointments {
            if self.effective_driver(appointment).is_some() {
                counts.assigned += 1;
            } else {
                counts.pending += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 11)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn appt(id: &str, confirmed: Option<&str>) -> Appointment {
        let mut a = Appointment::new(id, "C1", at(10, 0));
        a.confirmed_driver_id = confirmed.map(String::from);
        a
    }

    #[test]
    fn test_get_distinguishes_absent_from_null() {
        let mut store = DraftStore::new();
        assert_eq!(store.get("A1"), None); // no draft

        store.set("A1", None, "ops", at(8, 0));
        assert_eq!(store.get("A1"), Some(None)); // explicit unassignment

        store.set("A1", Some("D1".into()), "ops", at(8, 5));
        assert_eq!(store.get("A1"), Some(Some("D1")));
    }

    #[test]
    fn test_iter_yields_all_records() {
        let mut store = DraftStore::new();
        store.set("A1", Some("D1".into()), "ops", at(8, 0));
        store.set("A2", None, "ops", at(8, 5));

        let mut ids: Vec<&str> = store.iter().map(|(id, _)| id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["A1", "A2"]);
        assert!(store.iter().all(|(_, record)| record.edited_by == "ops"));
    }

    #[test]
    fn test_effective_driver_overlay() {
        let mut store = DraftStore::new();
        let confirmed = appt("A1", Some("D1"));
        let unconfirmed = appt("A2", None);

        // No draft: falls through to confirmed.
        assert_eq!(store.effective_driver(&confirmed), Some("D1"));
        assert_eq!(store.effective_driver(&unconfirmed), None);

        // Draft overrides confirmed.
        store.set("A1", Some("D2".into()), "ops", at(8, 0));
        assert_eq!(store.effective_driver(&confirmed), Some("D2"));

        // Explicit null masks a non-null confirmed driver.
        store.set("A1", None, "ops", at(8, 1));
        assert_eq!(store.effective_driver(&confirmed), None);
    }

    #[test]
    fn test_reselection_mutates_single_entry() {
        let mut store = DraftStore::new();
        store.set("A1", Some("D1".into()), "ops", at(8, 0));
        store.set("A1", Some("D2".into()), "ops", at(8, 1));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("A1"), Some(Some("D2")));
    }

    #[test]
    fn test_clear_all() {
        let mut store = DraftStore::new();
        store.set("A1", Some("D1".into()), "ops", at(8, 0));
        store.set("A2", None, "ops", at(8, 1));
        store.clear_all();
        assert!(store.is_empty());
        assert_eq!(store.get("A1"), None);
    }

    #[test]
    fn test_counts_under_effective_assignment() {
        let mut store = DraftStore::new();
        let appointments = vec![appt("A1", Some("D1")), appt("A2", None), appt("A3", None)];

        let counts = store.counts(&appointments);
        assert_eq!(counts.assigned, 1);
        assert_eq!(counts.pending, 2);

        // Drafting A2 moves it to assigned; nulling A1 moves it to pending.
        store.set("A2", Some("D2".into()), "ops", at(8, 0));
        store.set("A1", None, "ops", at(8, 1));
        let counts = store.counts(&appointments);
        assert_eq!(counts.assigned, 1);
        assert_eq!(counts.pending, 2);
    }

    #[test]
    fn test_apply_receipt_updates_editor_fields() {
        let mut store = DraftStore::new();
        store.set("A1", Some("D1".into()), "me (pending)", at(8, 0));
        store.apply_receipt("A1", "Server Name", at(8, 2));

        let record = store.record("A1").unwrap();
        assert_eq!(record.edited_by, "Server Name");
        assert_eq!(record.edited_at, at(8, 2));
        assert_eq!(record.driver_id.as_deref(), Some("D1"));

        // Receipt for a cleared draft is ignored.
        store.clear_all();
        store.apply_receipt("A1", "Server Name", at(8, 3));
        assert!(store.record("A1").is_none());
    }

    #[test]
    fn test_from_rows() {
        let rows = vec![
            DraftRow {
                appointment_id: "A1".into(),
                driver_id: Some("D1".into()),
                edited_by: "ops".into(),
                edited_at: at(7, 0),
            },
            DraftRow {
                appointment_id: "A2".into(),
                driver_id: None,
                edited_by: "ops".into(),
                edited_at: at(7, 1),
            },
        ];
        let store = DraftStore::from_rows(rows);
        assert_eq!(store.get("A1"), Some(Some("D1")));
        assert_eq!(store.get("A2"), Some(None));
    }
}
