//! Debounced draft persistence.
//!
//! Draft edits are written through a single shared debounce timer: every
//! [`DraftGateway::schedule`] call resets the timer and *replaces* the
//! pending payload, so one flush fires per quiet window carrying the most
//! recent edit. A burst of edits across different appointments coalesces
//! into periodic flushes of the latest-edited appointment — earlier edits
//! stay correct in the draft store and are flushed by a later edit to the
//! same appointment or superseded by the next full reload. This is the
//! intended write-rate bound, not a per-appointment debounce.
//!
//! Flushes are optimistic: a rejected write is logged and toasted but the
//! local draft is never rolled back. A successful write publishes a
//! last-edited receipt (server actor/timestamp) for display.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::backend::{NotificationSink, PersistenceClient, Severity};

/// Quiet period the debounce timer waits for before flushing.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Server-acknowledged "last edited by/at" for one flushed draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditReceipt {
    /// Appointment whose draft was flushed.
    pub appointment_id: String,
    /// Actor the server recorded.
    pub edited_by: String,
    /// Timestamp the server recorded.
    pub edited_at: NaiveDateTime,
}

#[derive(Debug)]
enum Msg {
    Edit(PendingFlush),
    Discard,
}

#[derive(Debug)]
struct PendingFlush {
    appointment_id: String,
    driver_id: Option<String>,
    week_start: NaiveDate,
}

/// Debounced, at-most-one-in-flight-per-flush write path for draft edits.
///
/// Owns a background task; dropping the gateway aborts it, discarding any
/// unfired timer (the accepted edit-just-before-navigation loss).
pub struct DraftGateway {
    tx: mpsc::UnboundedSender<Msg>,
    receipts: watch::Receiver<Option<EditReceipt>>,
    worker: JoinHandle<()>,
}

impl DraftGateway {
    /// Spawns a gateway with the default 500 ms quiet period.
    pub fn new(
        client: Arc<dyn PersistenceClient>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self::with_quiet_period(client, notifier, DEFAULT_QUIET_PERIOD)
    }

    /// Spawns a gateway with a custom quiet period.
    pub fn with_quiet_period(
        client: Arc<dyn PersistenceClient>,
        notifier: Arc<dyn NotificationSink>,
        quiet_period: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (receipt_tx, receipts) = watch::channel(None);
        let worker = tokio::spawn(run(rx, client, notifier, quiet_period, receipt_tx));
        Self {
            tx,
            receipts,
            worker,
        }
    }

    /// Schedules a draft write, resetting the shared debounce timer.
    ///
    /// The payload replaces whatever was pending; only the most recent
    /// call's arguments are flushed when the quiet window elapses.
    pub fn schedule(
        &self,
        appointment_id: impl Into<String>,
        driver_id: Option<String>,
        week_start: NaiveDate,
    ) {
        let flush = PendingFlush {
            appointment_id: appointment_id.into(),
            driver_id,
            week_start,
        };
        if self.tx.send(Msg::Edit(flush)).is_err() {
            warn!("draft gateway worker gone; edit not scheduled");
        }
    }

    /// Drops any pending (not-yet-fired) flush. Called on week navigation.
    pub fn discard_pending(&self) {
        let _ = self.tx.send(Msg::Discard);
    }

    /// Watches server receipts for flushed drafts.
    pub fn subscribe_receipts(&self) -> watch::Receiver<Option<EditReceipt>> {
        self.receipts.clone()
    }

    /// The most recent server receipt, if any flush has succeeded.
    pub fn latest_receipt(&self) -> Option<EditReceipt> {
        self.receipts.borrow().clone()
    }
}

impl Drop for DraftGateway {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<Msg>,
    client: Arc<dyn PersistenceClient>,
    notifier: Arc<dyn NotificationSink>,
    quiet_period: Duration,
    receipt_tx: watch::Sender<Option<EditReceipt>>,
) {
    let mut pending: Option<PendingFlush> = None;
    let mut deadline = Instant::now();

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(Msg::Edit(flush)) => {
                    debug!(appointment_id = %flush.appointment_id, "draft edit scheduled");
                    pending = Some(flush);
                    deadline = Instant::now() + quiet_period;
                }
                Some(Msg::Discard) => {
                    pending = None;
                }
                None => break,
            },
            _ = sleep_until(deadline), if pending.is_some() => {
                if let Some(flush) = pending.take() {
                    fire_flush(flush, client.as_ref(), notifier.as_ref(), &receipt_tx).await;
                }
            }
        }
    }
}

/// Issues exactly one write for the flushed appointment+driver pair.
async fn fire_flush(
    flush: PendingFlush,
    client: &dyn PersistenceClient,
    notifier: &dyn NotificationSink,
    receipt_tx: &watch::Sender<Option<EditReceipt>>,
) {
    let result = client
        .save_draft(
            &flush.appointment_id,
            flush.driver_id.as_deref(),
            flush.week_start,
        )
        .await;

    match result {
        Ok(ack) if ack.success => {
            debug!(appointment_id = %flush.appointment_id, "draft flush acknowledged");
            if let (Some(edited_by), Some(edited_at)) = (ack.edited_by, ack.edited_at) {
                let _ = receipt_tx.send(Some(EditReceipt {
                    appointment_id: flush.appointment_id,
                    edited_by,
                    edited_at,
                }));
            }
        }
        Ok(_) => {
            warn!(appointment_id = %flush.appointment_id, "draft flush rejected by server");
            notifier.toast("Draft could not be saved; it is kept locally", Severity::Warning);
        }
        Err(e) => {
            warn!(appointment_id = %flush.appointment_id, error = %e, "draft flush failed");
            notifier.toast("Draft could not be saved; it is kept locally", Severity::Warning);
        }
    }
}
