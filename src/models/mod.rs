//! Dispatch calendar domain models.
//!
//! Core data types for the operations calendar: appointments, drivers,
//! clinics, draft assignment records, and the derived effective time
//! window. Appointments and drivers are read-only per loaded week range;
//! all assignment edits flow through draft records.

mod appointment;
mod draft;
mod driver;
mod window;

pub use appointment::{
    Appointment, AppointmentStatus, DEFAULT_LENGTH_MINUTES, DEFAULT_TRANSIT_MINUTES,
};
pub use draft::{DraftRecord, DraftRow};
pub use driver::{Clinic, ClinicAffinity, Driver};
pub use window::{effective_window, TimeWindow};
