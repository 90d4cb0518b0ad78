//! External collaborator interfaces.
//!
//! The board owns no wire format; JSON shapes are dictated by the
//! external gateway. These traits are the seams the embedding app
//! implements: data loading, draft/submit persistence, and toast
//! notifications. All failures are local and non-propagating — the rest
//! of the calendar stays interactive when any of them errors.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Appointment, Clinic, ClinicAffinity, DraftRow, Driver};

/// Errors surfaced at the board's external boundaries.
#[derive(Debug, Clone, Error)]
pub enum BoardError {
    /// Week-range data load failed; view stays in loading state.
    #[error("data load failed: {0}")]
    Load(String),
    /// A debounced draft flush was rejected; local draft is retained.
    #[error("draft save failed: {0}")]
    Save(String),
    /// The batch schedule commit was rejected; drafts are retained.
    #[error("schedule submit failed: {0}")]
    Submit(String),
}

/// Everything the board needs for one visible week range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationsData {
    /// Appointments starting within the range.
    pub appointments: Vec<Appointment>,
    /// All active drivers.
    pub drivers: Vec<Driver>,
    /// All clinics (for filters and block labels).
    pub clinics: Vec<Clinic>,
    /// Driver-clinic affinity rows, folded into drivers on apply.
    pub driver_clinic_assignments: Vec<ClinicAffinity>,
    /// Server-held drafts for this range.
    pub draft_assignments: Vec<DraftRow>,
    /// When any draft in this range was last touched, if ever.
    pub last_draft_update: Option<NaiveDateTime>,
}

/// Acknowledgment of a single draft write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAck {
    /// Whether the server accepted the write.
    pub success: bool,
    /// Actor recorded by the server, when accepted.
    pub edited_by: Option<String>,
    /// Timestamp recorded by the server, when accepted.
    pub edited_at: Option<NaiveDateTime>,
}

/// Acknowledgment of a batch schedule commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAck {
    /// Whether the batch was committed.
    pub success: bool,
    /// Number of draft assignments the server processed.
    pub processed_count: usize,
}

/// Loads operations data for a week range.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Loads everything the board renders for the week starting at
    /// `week_start`.
    async fn load_operations_data(&self, week_start: NaiveDate)
        -> Result<OperationsData, BoardError>;
}

/// Persists draft edits and batch commits.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Writes one draft (appointment, driver-or-null) for the range.
    async fn save_draft(
        &self,
        appointment_id: &str,
        driver_id: Option<&str>,
        week_start: NaiveDate,
    ) -> Result<SaveAck, BoardError>;

    /// Commits every draft in the range as confirmed assignments.
    async fn submit_schedule(&self, week_start: NaiveDate) -> Result<SubmitAck, BoardError>;
}

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational, auto-dismissing.
    Info,
    /// Non-blocking warning (e.g. a failed draft flush).
    Warning,
    /// Blocking error requiring operator attention.
    Error,
}

/// Fire-and-forget toast sink.
pub trait NotificationSink: Send + Sync {
    /// Shows a toast. Must not block.
    fn toast(&self, message: &str, severity: Severity);
}

/// A sink that drops every toast. Useful for headless tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl NotificationSink for NullNotifier {
    fn toast(&self, _message: &str, _severity: Severity) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let e = BoardError::Save("backend said no".into());
        assert_eq!(e.to_string(), "draft save failed: backend said no");
    }

    #[test]
    fn test_save_ack_deserializes_partial() {
        // Failure acks legitimately omit actor/timestamp.
        let ack: SaveAck =
            serde_json::from_str(r#"{"success": false, "edited_by": null, "edited_at": null}"#)
                .unwrap();
        assert!(!ack.success);
        assert!(ack.edited_by.is_none());
        assert!(ack.edited_at.is_none());
    }
}
