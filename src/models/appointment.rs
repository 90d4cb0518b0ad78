//! Appointment model.
//!
//! An appointment is a client visit at a clinic that a driver transports
//! the client to and from. Scheduling works on the *effective* window —
//! transit out, time at the clinic, transit back — not just the booked slot.
//!
//! # Defaults
//! Length and transit are optional in the wire data. Missing or
//! out-of-range values (non-positive length, negative transit) fall back to
//! [`DEFAULT_LENGTH_MINUTES`] and [`DEFAULT_TRANSIT_MINUTES`] before any
//! window computation.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Appointment length used when the record carries none (minutes).
pub const DEFAULT_LENGTH_MINUTES: i64 = 120;
/// One-way transit buffer used when the record carries none (minutes).
pub const DEFAULT_TRANSIT_MINUTES: i64 = 30;

/// A scheduled client appointment.
///
/// Read-only within a loaded week range; driver assignment changes flow
/// through the draft store, not through this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique appointment identifier.
    pub id: String,
    /// Appointment start in local wall time.
    pub start: NaiveDateTime,
    /// Booked length at the clinic (minutes). `None` = use default.
    pub length_minutes: Option<i64>,
    /// One-way transit buffer (minutes). `None` = use default.
    pub transit_minutes: Option<i64>,
    /// Clinic this appointment takes place at.
    pub clinic_id: String,
    /// Workflow status.
    pub status: AppointmentStatus,
    /// Driver committed on the server. `None` = unassigned.
    pub confirmed_driver_id: Option<String>,
}

/// Appointment workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked, awaiting driver assignment or confirmation.
    Scheduled,
    /// Driver assignment committed.
    Confirmed,
    /// Visit completed.
    Completed,
    /// Cancelled; kept in the loaded range for display.
    Cancelled,
}

impl Appointment {
    /// Creates a new scheduled appointment.
    pub fn new(id: impl Into<String>, clinic_id: impl Into<String>, start: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            start,
            length_minutes: None,
            transit_minutes: None,
            clinic_id: clinic_id.into(),
            status: AppointmentStatus::Scheduled,
            confirmed_driver_id: None,
        }
    }

    /// Sets the booked length (minutes).
    pub fn with_length(mut self, minutes: i64) -> Self {
        self.length_minutes = Some(minutes);
        self
    }

    /// Sets the one-way transit buffer (minutes).
    pub fn with_transit(mut self, minutes: i64) -> Self {
        self.transit_minutes = Some(minutes);
        self
    }

    /// Sets the workflow status.
    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the server-committed driver.
    pub fn with_confirmed_driver(mut self, driver_id: impl Into<String>) -> Self {
        self.confirmed_driver_id = Some(driver_id.into());
        self
    }

    /// Length after default substitution. Always > 0.
    #[inline]
    pub fn effective_length_minutes(&self) -> i64 {
        self.length_minutes
            .filter(|&m| m > 0)
            .unwrap_or(DEFAULT_LENGTH_MINUTES)
    }

    /// Transit after default substitution. Always >= 0.
    #[inline]
    pub fn effective_transit_minutes(&self) -> i64 {
        self.transit_minutes
            .filter(|&m| m >= 0)
            .unwrap_or(DEFAULT_TRANSIT_MINUTES)
    }

    /// Calendar day this appointment is booked on.
    #[inline]
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }
}
