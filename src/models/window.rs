//! Effective time windows.
//!
//! The effective window of an appointment is the pickup-to-return interval:
//! transit out, time at the clinic, transit back. All overlap, conflict,
//! and layout computation runs on this window, never on the bare booked
//! slot — [`effective_window`] is the single source of truth.
//!
//! # Interval Convention
//! Windows are half-open [start, end): two windows that merely touch
//! (one ends exactly where the other starts) do not overlap.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::Appointment;

/// A time interval [start, end) in local wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Duration of this window in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether a timestamp falls within this window.
    #[inline]
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        t >= self.start && t < self.end
    }

    /// Whether two windows overlap.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Computes the effective (transit-inclusive) window of an appointment.
///
/// start = appointment start − transit;
/// end = appointment start + length + transit.
/// Defaults are substituted for missing or out-of-range length/transit
/// before computing, so `end > start` holds for every appointment.
pub fn effective_window(appointment: &Appointment) -> TimeWindow {
    let transit = Duration::minutes(appointment.effective_transit_minutes());
    let length = Duration::minutes(appointment.effective_length_minutes());
    TimeWindow::new(
        appointment.start - transit,
        appointment.start + length + transit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DEFAULT_LENGTH_MINUTES, DEFAULT_TRANSIT_MINUTES};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 11)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_window_contains() {
        let w = TimeWindow::new(at(9, 0), at(10, 0));
        assert!(w.contains(at(9, 0)));
        assert!(w.contains(at(9, 59)));
        assert!(!w.contains(at(10, 0))); // exclusive end
        assert!(!w.contains(at(8, 59)));
    }

    #[test]
    fn test_window_overlap_half_open() {
        let a = TimeWindow::new(at(9, 0), at(10, 0));
        let b = TimeWindow::new(at(9, 30), at(10, 30));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        // Touching windows do not overlap.
        let c = TimeWindow::new(at(10, 0), at(11, 0));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_effective_window_arithmetic() {
        // 10:00 start, 120 min length, 30 min transit => [09:30, 12:30).
        let a = Appointment::new("A", "C1", at(10, 0))
            .with_length(120)
            .with_transit(30);
        let w = effective_window(&a);
        assert_eq!(w.start, at(9, 30));
        assert_eq!(w.end, at(12, 30));
        assert_eq!(w.duration_minutes(), 180);
    }

    #[test]
    fn test_effective_window_uses_defaults() {
        let a = Appointment::new("A", "C1", at(10, 0));
        let w = effective_window(&a);
        assert_eq!(
            w.duration_minutes(),
            DEFAULT_LENGTH_MINUTES + 2 * DEFAULT_TRANSIT_MINUTES
        );
        assert!(w.end > w.start);
    }

    #[test]
    fn test_effective_window_end_after_start_with_bad_inputs() {
        let a = Appointment::new("A", "C1", at(10, 0))
            .with_length(-60)
            .with_transit(-10);
        let w = effective_window(&a);
        assert!(w.end > w.start);
        // Both fields fell back to defaults.
        assert_eq!(w.start, at(9, 30));
        assert_eq!(w.end, at(12, 30));
    }

    #[test]
    fn test_adjacent_appointments_overlap_through_transit() {
        // A: 10:00 +120/30 => [09:30, 12:30). B: 12:30 +60/15 => [12:15, 13:45).
        let a = Appointment::new("A", "C1", at(10, 0))
            .with_length(120)
            .with_transit(30);
        let b = Appointment::new("B", "C1", at(12, 30))
            .with_length(60)
            .with_transit(15);

        let wa = effective_window(&a);
        let wb = effective_window(&b);
        assert_eq!(wb.start, at(12, 15));
        assert_eq!(wb.end, at(13, 45));
        assert!(wa.overlaps(&wb));
    }
}
