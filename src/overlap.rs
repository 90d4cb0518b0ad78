//! Visual overlap detection for side-by-side day layout.
//!
//! For each appointment, finds the set of same-day appointments whose
//! effective windows intersect its own, so overlapping blocks can share
//! the day column side by side.
//!
//! # Per-appointment, not partitioned
//! The intersecting set is computed independently for each appointment.
//! Overlap is not transitive: A∩B and B∩C do not imply A and C land in
//! one group. This matches per-block stacking — each block only needs to
//! know how crowded *its own* window is.
//!
//! # Complexity
//! O(n²) over one day's appointments; day volumes are tens at most.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{effective_window, Appointment};

/// Overlap placement for one appointment within its intersecting set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapInfo {
    /// 1-based position among the intersecting set, ordered by window
    /// start (ties keep original input order).
    pub index_in_group: usize,
    /// True size of the intersecting set, including the appointment
    /// itself. Uncapped; rendering may visually cap at 3.
    pub group_size: usize,
}

impl OverlapInfo {
    /// Placement of an appointment that overlaps nothing.
    pub fn alone() -> Self {
        Self {
            index_in_group: 1,
            group_size: 1,
        }
    }
}

/// Computes overlap placement for appointments on a single calendar day.
///
/// Returns a map from appointment id to [`OverlapInfo`]. Input order is
/// the tie-breaker for equal window starts.
pub fn detect_overlaps(day_appointments: &[Appointment]) -> HashMap<String, OverlapInfo> {
    let windows: Vec<_> = day_appointments.iter().map(effective_window).collect();
    let mut result = HashMap::with_capacity(day_appointments.len());

    for (i, appointment) in day_appointments.iter().enumerate() {
        // Indices of every appointment (including i) intersecting window i.
        let mut group: Vec<usize> = (0..day_appointments.len())
            .filter(|&j| windows[i].overlaps(&windows[j]))
            .collect();

        // Order by window start; equal starts keep input order because
        // the sort is stable over ascending indices.
        group.sort_by_key(|&j| windows[j].start);

        let index_in_group = group.iter().position(|&j| j == i).map_or(1, |p| p + 1);
        result.insert(
            appointment.id.clone(),
            OverlapInfo {
                index_in_group,
                group_size: group.len(),
            },
        );
    }

    result
}

/// Buckets a loaded range by calendar day and computes overlaps per day.
///
/// Appointments on different days never overlap visually regardless of
/// their windows; the day an appointment *starts* on owns its block.
pub fn detect_overlaps_by_day(appointments: &[Appointment]) -> HashMap<String, OverlapInfo> {
    let mut days: HashMap<NaiveDate, Vec<Appointment>> = HashMap::new();
    for appointment in appointments {
        days.entry(appointment.day())
            .or_default()
            .push(appointment.clone());
    }

    let mut result = HashMap::with_capacity(appointments.len());
    for day_appointments in days.values() {
        result.extend(detect_overlaps(day_appointments));
    }
    result
}
