//! Batch schedule submission.
//!
//! Drives the submit flow: re-validate conflicts over effective
//! assignments, gate on operator confirmation when conflicts exist, then
//! send one batch commit for the visible range. Cancelling the gate
//! performs no network call. Success hands control back to the board to
//! clear drafts and reload server truth; failure leaves every draft
//! intact for correction and retry.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::backend::{BoardError, PersistenceClient};
use crate::conflict::{detect_conflicts, DriverConflict};
use crate::draft::DraftStore;
use crate::models::Appointment;

/// Where the submit flow currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    /// No submission in progress.
    #[default]
    Idle,
    /// Validation found conflicts; waiting on the operator's decision.
    AwaitingConfirmation(Vec<DriverConflict>),
    /// Validated (or confirmed despite conflicts); commit may proceed.
    ReadyToSubmit,
    /// Batch request in flight.
    Submitting,
}

/// Result of the validation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// No conflicts; the commit may proceed immediately.
    Ready,
    /// Conflicts exist; the operator must confirm or cancel.
    NeedsConfirmation(Vec<DriverConflict>),
}

/// Validates and batch-commits the visible range's draft assignments.
#[derive(Debug, Default)]
pub struct ScheduleSubmitter {
    phase: SubmitPhase,
}

impl ScheduleSubmitter {
    /// Creates an idle submitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    /// Starts a submission: recomputes conflicts over effective
    /// assignments and either clears the runway or raises the
    /// confirmation gate.
    pub fn begin(
        &mut self,
        appointments: &[Appointment],
        drafts: &DraftStore,
    ) -> ValidationOutcome {
        let conflicts = detect_conflicts(appointments, drafts);
        if conflicts.is_empty() {
            self.phase = SubmitPhase::ReadyToSubmit;
            ValidationOutcome::Ready
        } else {
            warn!(count = conflicts.len(), "submitting with driver conflicts requires confirmation");
            self.phase = SubmitPhase::AwaitingConfirmation(conflicts.clone());
            ValidationOutcome::NeedsConfirmation(conflicts)
        }
    }

    /// Operator accepted the conflicts; the commit may proceed.
    ///
    /// No-op unless the gate is up.
    pub fn confirm(&mut self) {
        if matches!(self.phase, SubmitPhase::AwaitingConfirmation(_)) {
            self.phase = SubmitPhase::ReadyToSubmit;
        }
    }

    /// Operator backed out. Purely local; no network call is made.
    pub fn cancel(&mut self) {
        self.phase = SubmitPhase::Idle;
    }

    /// Sends the batch commit for the visible range.
    ///
    /// Only valid after [`begin`](Self::begin) returned `Ready` or the
    /// gate was confirmed. Returns the server's processed count on
    /// success. Either way the submitter returns to idle; on failure the
    /// caller keeps its drafts for retry.
    pub async fn submit(
        &mut self,
        client: &dyn PersistenceClient,
        week_start: NaiveDate,
    ) -> Result<usize, BoardError> {
        if self.phase != SubmitPhase::ReadyToSubmit {
            return Err(BoardError::Submit(
                "submission not validated or already in flight".into(),
            ));
        }
        self.phase = SubmitPhase::Submitting;

        let result = client.submit_schedule(week_start).await;
        self.phase = SubmitPhase::Idle;

        match result {
            Ok(ack) if ack.success => {
                info!(processed = ack.processed_count, "schedule committed");
                Ok(ack.processed_count)
            }
            Ok(_) => Err(BoardError::Submit("server rejected the batch".into())),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{SaveAck, SubmitAck};
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 11)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn week() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
    }

    fn conflicted_pair() -> Vec<Appointment> {
        let mut a = Appointment::new("A", "C1", at(9, 0))
            .with_length(90)
            .with_transit(0);
        a.confirmed_driver_id = Some("D1".into());
        let mut b = Appointment::new("B", "C1", at(10, 0))
            .with_length(60)
            .with_transit(0);
        b.confirmed_driver_id = Some("D1".into());
        vec![a, b]
    }

    struct StubClient {
        submits: AtomicUsize,
        succeed: bool,
    }

    impl StubClient {
        fn new(succeed: bool) -> Self {
            Self {
                submits: AtomicUsize::new(0),
                succeed,
            }
        }
    }

    #[async_trait]
    impl PersistenceClient for StubClient {
        async fn save_draft(
            &self,
            _appointment_id: &str,
            _driver_id: Option<&str>,
            _week_start: NaiveDate,
        ) -> Result<SaveAck, BoardError> {
            unreachable!("submitter never saves drafts")
        }

        async fn submit_schedule(&self, _week_start: NaiveDate) -> Result<SubmitAck, BoardError> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(SubmitAck {
                    success: true,
                    processed_count: 2,
                })
            } else {
                Err(BoardError::Submit("backend unavailable".into()))
            }
        }
    }

    #[test]
    fn test_clean_validation_is_ready() {
        let mut submitter = ScheduleSubmitter::new();
        let outcome = submitter.begin(&[], &DraftStore::new());
        assert_eq!(outcome, ValidationOutcome::Ready);
        assert_eq!(*submitter.phase(), SubmitPhase::ReadyToSubmit);
    }

    #[test]
    fn test_conflicts_raise_the_gate() {
        let mut submitter = ScheduleSubmitter::new();
        let outcome = submitter.begin(&conflicted_pair(), &DraftStore::new());

        match outcome {
            ValidationOutcome::NeedsConfirmation(conflicts) => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].driver_id, "D1");
            }
            ValidationOutcome::Ready => panic!("expected confirmation gate"),
        }
        assert!(matches!(
            submitter.phase(),
            SubmitPhase::AwaitingConfirmation(_)
        ));
    }

    #[test]
    fn test_cancel_returns_to_idle_without_network() {
        let mut submitter = ScheduleSubmitter::new();
        submitter.begin(&conflicted_pair(), &DraftStore::new());
        submitter.cancel();
        assert_eq!(*submitter.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn test_confirm_then_submit() {
        let mut submitter = ScheduleSubmitter::new();
        submitter.begin(&conflicted_pair(), &DraftStore::new());
        submitter.confirm();

        let client = StubClient::new(true);
        let processed = submitter.submit(&client, week()).await.unwrap();
        assert_eq!(processed, 2);
        assert_eq!(client.submits.load(Ordering::SeqCst), 1);
        assert_eq!(*submitter.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn test_failure_returns_to_idle_with_error() {
        let mut submitter = ScheduleSubmitter::new();
        submitter.begin(&[], &DraftStore::new());

        let client = StubClient::new(false);
        let err = submitter.submit(&client, week()).await.unwrap_err();
        assert!(matches!(err, BoardError::Submit(_)));
        assert_eq!(*submitter.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn test_submit_without_validation_is_rejected() {
        let mut submitter = ScheduleSubmitter::new();
        let client = StubClient::new(true);
        let err = submitter.submit(&client, week()).await.unwrap_err();
        assert!(matches!(err, BoardError::Submit(_)));
        // No network call was made.
        assert_eq!(client.submits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_confirm_outside_gate_is_noop() {
        let mut submitter = ScheduleSubmitter::new();
        submitter.confirm();
        assert_eq!(*submitter.phase(), SubmitPhase::Idle);
    }
}
