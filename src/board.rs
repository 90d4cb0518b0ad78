//! Operations board controller.
//!
//! Owns the page-level state the calendar view renders from: the active
//! week, filters, loaded data, the draft store, and every derived result
//! (overlaps, conflicts, counters, block geometry). State that used to
//! live in ambient UI globals is explicit here; the detection and layout
//! functions underneath stay pure.
//!
//! All derived state is recomputed synchronously and in full on every
//! trigger — draft edit, filter change, data reload. Volumes are tens of
//! appointments per range, so there is no incremental caching.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::backend::{
    BoardError, DataSource, NotificationSink, PersistenceClient, Severity,
};
use crate::conflict::{detect_conflicts, DriverConflict};
use crate::draft::{AssignmentCounts, DraftStore};
use crate::gateway::{DraftGateway, EditReceipt};
use crate::layout::{layout_blocks, BlockGeometry, GridConfig};
use crate::models::{Appointment, Clinic, Driver};
use crate::overlap::{detect_overlaps_by_day, OverlapInfo};
use crate::submit::{ScheduleSubmitter, ValidationOutcome};
use crate::validation::validate_operations_data;

/// View filters applied to the rendered set.
///
/// Filters narrow what is rendered and counted; conflict detection always
/// runs over the whole loaded range so a filter can never hide a
/// double-booking from the submit gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilters {
    /// Only show appointments at this clinic.
    pub clinic_id: Option<String>,
    /// Only show appointments whose effective driver matches.
    pub driver_id: Option<String>,
}

/// Render-ready view model for one appointment block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockView {
    /// Appointment this block renders.
    pub appointment_id: String,
    /// Clinic the appointment takes place at.
    pub clinic_id: String,
    /// Grid geometry.
    pub geometry: BlockGeometry,
    /// Effective (draft-aware) driver.
    pub effective_driver_id: Option<String>,
    /// Display name of the effective driver, when known.
    pub driver_name: Option<String>,
    /// Whether this appointment appears in any conflict record.
    pub conflicted: bool,
    /// Whether an unsubmitted draft exists for this appointment.
    pub has_draft: bool,
    /// Last editor shown on the block, when a draft exists.
    pub last_edited_by: Option<String>,
    /// Last edit time shown on the block, when a draft exists.
    pub last_edited_at: Option<NaiveDateTime>,
}

/// Page controller for the operations calendar.
pub struct DispatchBoard {
    week_start: NaiveDate,
    actor: String,
    filters: BoardFilters,
    grid: GridConfig,

    source: Arc<dyn DataSource>,
    client: Arc<dyn PersistenceClient>,
    notifier: Arc<dyn NotificationSink>,
    gateway: DraftGateway,
    submitter: ScheduleSubmitter,

    loaded: bool,
    appointments: Vec<Appointment>,
    drivers: Vec<Driver>,
    clinics: Vec<Clinic>,
    drafts: DraftStore,
    last_draft_update: Option<NaiveDateTime>,
    last_receipt: Option<EditReceipt>,

    overlaps: HashMap<String, OverlapInfo>,
    conflicts: Vec<DriverConflict>,
    counts: AssignmentCounts,
    blocks: Vec<BlockView>,
}

impl DispatchBoard {
    /// Creates a board for one operator session.
    ///
    /// Spawns the debounced persistence gateway, so this must run inside
    /// a tokio runtime.
    pub fn new(
        week_start: NaiveDate,
        actor: impl Into<String>,
        source: Arc<dyn DataSource>,
        client: Arc<dyn PersistenceClient>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let gateway = DraftGateway::new(client.clone(), notifier.clone());
        Self {
            week_start,
            actor: actor.into(),
            filters: BoardFilters::default(),
            grid: GridConfig::default(),
            source,
            client,
            notifier,
            gateway,
            submitter: ScheduleSubmitter::new(),
            loaded: false,
            appointments: Vec::new(),
            drivers: Vec::new(),
            clinics: Vec::new(),
            drafts: DraftStore::new(),
            last_draft_update: None,
            last_receipt: None,
            overlaps: HashMap::new(),
            conflicts: Vec::new(),
            counts: AssignmentCounts::default(),
            blocks: Vec::new(),
        }
    }

    /// Sets the grid configuration.
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Loads (or reloads) the active week from the data source.
    ///
    /// On failure the view stays in its loading state; retry is manual.
    pub async fn load(&mut self) -> Result<(), BoardError> {
        let data = match self.source.load_operations_data(self.week_start).await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "operations data load failed");
                self.notifier
                    .toast("Could not load the schedule; retry when ready", Severity::Error);
                self.loaded = false;
                return Err(e);
            }
        };

        // Structural issues are logged and surfaced but do not block the
        // load; the rest of the calendar stays interactive.
        if let Err(errors) = validate_operations_data(&data) {
            for error in &errors {
                warn!(kind = ?error.kind, "{}", error.message);
            }
            self.notifier.toast(
                "Loaded schedule has data inconsistencies",
                Severity::Warning,
            );
        }

        self.appointments = data.appointments;
        self.clinics = data.clinics;
        self.drivers = data.drivers;
        for affinity in data.driver_clinic_assignments {
            if let Some(driver) = self.drivers.iter_mut().find(|d| d.id == affinity.driver_id) {
                driver.clinic_ids.insert(affinity.clinic_id);
            }
        }
        self.drafts = DraftStore::from_rows(data.draft_assignments);
        self.last_draft_update = data.last_draft_update;
        self.loaded = true;
        self.recompute();
        Ok(())
    }

    /// Moves the board to a different week.
    ///
    /// Discards any pending (not-yet-fired) draft flush; an edit made
    /// just before navigating can be lost without being flushed. The
    /// caller follows up with [`load`](Self::load).
    pub fn navigate_to_week(&mut self, week_start: NaiveDate) {
        self.gateway.discard_pending();
        self.week_start = week_start;
        self.loaded = false;
    }

    /// Records a draft edit: updates the store, recomputes every derived
    /// result, and schedules a debounced persistence flush.
    pub fn set_draft(&mut self, appointment_id: &str, driver_id: Option<String>) {
        self.set_draft_at(appointment_id, driver_id, Local::now().naive_local());
    }

    /// [`set_draft`](Self::set_draft) with an explicit edit timestamp.
    pub fn set_draft_at(
        &mut self,
        appointment_id: &str,
        driver_id: Option<String>,
        edited_at: NaiveDateTime,
    ) {
        if !self.appointments.iter().any(|a| a.id == appointment_id) {
            warn!(appointment_id, "draft edit for unknown appointment ignored");
            return;
        }

        // Optimistic editor attribution until the server ack arrives.
        let actor = self.actor.clone();
        self.drafts
            .set(appointment_id, driver_id.clone(), actor, edited_at);
        self.recompute();
        self.gateway
            .schedule(appointment_id, driver_id, self.week_start);
    }

    /// Folds the latest server receipt (if new) into the draft store so
    /// "last edited by/at" reflects server truth. Call from the render
    /// loop or after awaiting the gateway.
    pub fn absorb_receipts(&mut self) {
        let receipt = self.gateway.latest_receipt();
        if receipt == self.last_receipt {
            return;
        }
        if let Some(receipt) = &receipt {
            self.drafts.apply_receipt(
                &receipt.appointment_id,
                receipt.edited_by.as_str(),
                receipt.edited_at,
            );
            self.recompute();
        }
        self.last_receipt = receipt;
    }

    /// Sets the view filters and recomputes.
    pub fn set_filters(&mut self, filters: BoardFilters) {
        self.filters = filters;
        self.recompute();
    }

    /// Starts the submit flow: re-validates conflicts over effective
    /// assignments. `Ready` means [`complete_submit`](Self::complete_submit)
    /// may be called; `NeedsConfirmation` raises the operator gate.
    pub fn begin_submit(&mut self) -> ValidationOutcome {
        self.submitter.begin(&self.appointments, &self.drafts)
    }

    /// Operator accepted the conflict gate.
    pub fn confirm_submit(&mut self) {
        self.submitter.confirm();
    }

    /// Operator backed out of the conflict gate. No network call.
    pub fn cancel_submit(&mut self) {
        self.submitter.cancel();
    }

    /// Sends the batch commit and reconciles against server truth.
    ///
    /// On success every draft is cleared, any pending flush is discarded,
    /// and the week is reloaded so confirmed assignments reflect the
    /// server. On failure drafts stay intact for retry.
    pub async fn complete_submit(&mut self) -> Result<usize, BoardError> {
        let processed = match self.submitter.submit(self.client.as_ref(), self.week_start).await {
            Ok(processed) => processed,
            Err(e) => {
                self.notifier
                    .toast("Schedule could not be submitted; drafts kept", Severity::Error);
                return Err(e);
            }
        };

        self.drafts.clear_all();
        self.gateway.discard_pending();
        self.load().await?;
        Ok(processed)
    }

    // ---- Read side ----

    /// Whether a week range is currently loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The active week.
    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    /// Appointments passing the current filters, in load order.
    pub fn visible_appointments(&self) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| self.passes_filters(a))
            .collect()
    }

    /// Conflict records over the whole loaded range (never filtered).
    pub fn conflicts(&self) -> &[DriverConflict] {
        &self.conflicts
    }

    /// Assigned/pending tallies over the visible set.
    pub fn counts(&self) -> AssignmentCounts {
        self.counts
    }

    /// Render-ready blocks for the visible set.
    pub fn blocks(&self) -> &[BlockView] {
        &self.blocks
    }

    /// Overlap placement for a visible appointment.
    pub fn overlap_info(&self, appointment_id: &str) -> Option<OverlapInfo> {
        self.overlaps.get(appointment_id).copied()
    }

    /// Drivers eligible for an appointment's clinic, for the picker.
    pub fn eligible_drivers(&self, appointment_id: &str) -> Vec<&Driver> {
        let Some(appointment) = self.appointments.iter().find(|a| a.id == appointment_id) else {
            return Vec::new();
        };
        self.drivers
            .iter()
            .filter(|d| d.serves_clinic(&appointment.clinic_id))
            .collect()
    }

    /// The draft store (read access for embedding views).
    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    /// All loaded clinics, for filter pickers.
    pub fn clinics(&self) -> &[Clinic] {
        &self.clinics
    }

    /// All loaded drivers.
    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    /// When any draft in the range was last touched server-side.
    pub fn last_draft_update(&self) -> Option<NaiveDateTime> {
        self.last_draft_update
    }

    // ---- Derived-state pipeline ----

    fn passes_filters(&self, appointment: &Appointment) -> bool {
        if let Some(clinic_id) = &self.filters.clinic_id {
            if &appointment.clinic_id != clinic_id {
                return false;
            }
        }
        if let Some(driver_id) = &self.filters.driver_id {
            if self.drafts.effective_driver(appointment) != Some(driver_id.as_str()) {
                return false;
            }
        }
        true
    }

    /// Recomputes every derived result from current inputs.
    fn recompute(&mut self) {
        let visible: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|a| self.passes_filters(a))
            .cloned()
            .collect();

        self.conflicts = detect_conflicts(&self.appointments, &self.drafts);
        self.overlaps = detect_overlaps_by_day(&visible);
        self.counts = self.drafts.counts(&visible);

        let geometries = layout_blocks(&visible, &self.overlaps, &self.grid);
        self.blocks = visible
            .iter()
            .zip(geometries)
            .map(|(appointment, geometry)| {
                let effective = self
                    .drafts
                    .effective_driver(appointment)
                    .map(String::from);
                let driver_name = effective.as_deref().and_then(|id| {
                    self.drivers
                        .iter()
                        .find(|d| d.id == id)
                        .map(|d| d.name.clone())
                });
                let record = self.drafts.record(&appointment.id);
                BlockView {
                    appointment_id: appointment.id.clone(),
                    clinic_id: appointment.clinic_id.clone(),
                    geometry,
                    conflicted: self.conflicts.iter().any(|c| c.involves(&appointment.id)),
                    has_draft: record.is_some(),
                    last_edited_by: record.map(|r| r.edited_by.clone()),
                    last_edited_at: record.map(|r| r.edited_at),
                    effective_driver_id: effective,
                    driver_name,
                }
            })
            .collect();
    }
}
