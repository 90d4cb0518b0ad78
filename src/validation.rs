//! Structural integrity checks on loaded operations data.
//!
//! Run before a load is applied to the board. Detects:
//! - Duplicate appointment, driver, or clinic IDs
//! - Drafts referencing unknown appointments
//! - Confirmed or draft assignments referencing unknown drivers
//! - Affinity rows referencing unknown drivers or clinics
//!
//! All issues are collected and returned together, not just the first.

use std::collections::HashSet;

use crate::backend::OperationsData;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A draft references an appointment that doesn't exist.
    UnknownAppointment,
    /// An assignment or affinity references a driver that doesn't exist.
    UnknownDriver,
    /// An affinity references a clinic that doesn't exist.
    UnknownClinic,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a loaded week range before it enters the board.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_operations_data(data: &OperationsData) -> ValidationResult {
    let mut errors = Vec::new();

    let mut appointment_ids = HashSet::new();
    for a in &data.appointments {
        if !appointment_ids.insert(a.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate appointment ID: {}", a.id),
            ));
        }
    }

    let mut driver_ids = HashSet::new();
    for d in &data.drivers {
        if !driver_ids.insert(d.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate driver ID: {}", d.id),
            ));
        }
    }

    let mut clinic_ids = HashSet::new();
    for c in &data.clinics {
        if !clinic_ids.insert(c.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate clinic ID: {}", c.id),
            ));
        }
    }

    // Confirmed assignments must point at known drivers.
    for a in &data.appointments {
        if let Some(driver_id) = &a.confirmed_driver_id {
            if !driver_ids.contains(driver_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownDriver,
                    format!(
                        "Appointment '{}' is confirmed to unknown driver '{driver_id}'",
                        a.id
                    ),
                ));
            }
        }
    }

    // Drafts must point at known appointments and drivers.
    for row in &data.draft_assignments {
        if !appointment_ids.contains(row.appointment_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownAppointment,
                format!(
                    "Draft references unknown appointment '{}'",
                    row.appointment_id
                ),
            ));
        }
        if let Some(driver_id) = &row.driver_id {
            if !driver_ids.contains(driver_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownDriver,
                    format!(
                        "Draft for '{}' references unknown driver '{driver_id}'",
                        row.appointment_id
                    ),
                ));
            }
        }
    }

    // Affinity rows must point at known drivers and clinics.
    for affinity in &data.driver_clinic_assignments {
        if !driver_ids.contains(affinity.driver_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownDriver,
                format!(
                    "Affinity references unknown driver '{}'",
                    affinity.driver_id
                ),
            ));
        }
        if !clinic_ids.contains(affinity.clinic_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownClinic,
                format!(
                    "Affinity references unknown clinic '{}'",
                    affinity.clinic_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
