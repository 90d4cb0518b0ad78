//! Driver and clinic models.
//!
//! Drivers are the contended resource: a driver double-booked across two
//! overlapping effective windows is a scheduling conflict. Clinic
//! affinities narrow the assignment picker, they do not gate conflicts.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A driver available for appointment assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    /// Unique driver identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Clinics this driver is affiliated with.
    pub clinic_ids: HashSet<String>,
}

/// A clinic appointments take place at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clinic {
    /// Unique clinic identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// A driver-clinic affinity row as delivered by the data gateway.
///
/// Folded into [`Driver::clinic_ids`] when a load is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicAffinity {
    /// Affiliated driver.
    pub driver_id: String,
    /// Affiliated clinic.
    pub clinic_id: String,
}

impl Driver {
    /// Creates a new driver.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            clinic_ids: HashSet::new(),
        }
    }

    /// Adds a clinic affinity.
    pub fn with_clinic(mut self, clinic_id: impl Into<String>) -> Self {
        self.clinic_ids.insert(clinic_id.into());
        self
    }

    /// Whether this driver is affiliated with a clinic.
    pub fn serves_clinic(&self, clinic_id: &str) -> bool {
        self.clinic_ids.contains(clinic_id)
    }
}

impl Clinic {
    /// Creates a new clinic.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
