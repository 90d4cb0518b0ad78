//! Driver double-booking detection.
//!
//! Groups appointments by their *effective* (draft-aware) driver and
//! tests every unordered pair within a group for window intersection.
//! Each intersecting pair is one conflict record — three mutually
//! overlapping appointments on one driver yield three records, never a
//! merged multi-way conflict. Consumers key warnings off the pairs.
//!
//! # Complexity
//! O(n²) per driver; expected volumes are tens of appointments per
//! loaded range. A sweep-line could replace the scan as long as the
//! pairwise-record contract is preserved.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::draft::DraftStore;
use crate::models::{effective_window, Appointment};

/// One double-booking: two appointments on the same driver with
/// intersecting effective windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConflict {
    /// Driver booked on both appointments.
    pub driver_id: String,
    /// The conflicting pair, in input order.
    pub appointment_ids: [String; 2],
}

impl DriverConflict {
    /// Whether this conflict involves a given appointment.
    pub fn involves(&self, appointment_id: &str) -> bool {
        self.appointment_ids.iter().any(|id| id == appointment_id)
    }
}

/// Detects double-bookings under effective (draft-aware) assignment.
///
/// Appointments whose effective driver is absent never conflict.
/// Records are ordered by driver grouping then by input order of the
/// pair's first appointment.
pub fn detect_conflicts(
    appointments: &[Appointment],
    drafts: &DraftStore,
) -> Vec<DriverConflict> {
    // Group appointment indices by effective non-null driver, preserving
    // input order within each group.
    let mut by_driver: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut driver_order: Vec<&str> = Vec::new();
    for (i, appointment) in appointments.iter().enumerate() {
        if let Some(driver_id) = drafts.effective_driver(appointment) {
            let group = by_driver.entry(driver_id).or_default();
            if group.is_empty() {
                driver_order.push(driver_id);
            }
            group.push(i);
        }
    }

    let mut conflicts = Vec::new();
    for driver_id in driver_order {
        let group = &by_driver[driver_id];
        for (gi, &a) in group.iter().enumerate() {
            for &b in &group[gi + 1..] {
                let wa = effective_window(&appointments[a]);
                let wb = effective_window(&appointments[b]);
                if wa.overlaps(&wb) {
                    conflicts.push(DriverConflict {
                        driver_id: driver_id.to_string(),
                        appointment_ids: [
                            appointments[a].id.clone(),
                            appointments[b].id.clone(),
                        ],
                    });
                }
            }
        }
    }

    conflicts
}
