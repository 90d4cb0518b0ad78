//! Calendar grid geometry.
//!
//! Converts appointments plus overlap placement into pixel geometry for a
//! fixed-hour day column: vertical position from the effective window's
//! start hour, height from its transit-inclusive duration, and horizontal
//! slotting from the overlap group.
//!
//! # Slot cap
//! Horizontal space subdivides into at most three slots. Groups larger
//! than three wrap later members back into the three slots — blocks stack
//! visually rather than shrinking without bound. Degradation, not error.

use std::collections::HashMap;

use chrono::Timelike;

use crate::models::{effective_window, Appointment};
use crate::overlap::OverlapInfo;

/// Maximum side-by-side slots in one day column.
pub const MAX_LAYOUT_SLOTS: usize = 3;

/// Fixed hour range and vertical scale of the day grid.
#[derive(Debug, Clone, Copy)]
pub struct GridConfig {
    /// First rendered hour (inclusive), e.g. 6 for 06:00.
    pub start_hour: u32,
    /// Last rendered hour (exclusive), e.g. 20 for 20:00.
    pub end_hour: u32,
    /// Pixels per hour.
    pub hour_height: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start_hour: 6,
            end_hour: 20,
            hour_height: 60.0,
        }
    }
}

impl GridConfig {
    /// Total pixel height of the rendered grid.
    pub fn grid_height(&self) -> f32 {
        (self.end_hour.saturating_sub(self.start_hour)) as f32 * self.hour_height
    }
}

/// Pixel geometry for one appointment block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockGeometry {
    /// Appointment this block renders.
    pub appointment_id: String,
    /// Offset from the top of the grid (px). Clamped at 0 when the
    /// window starts before the grid's first hour.
    pub top: f32,
    /// Block height (px): full transit-inclusive duration.
    pub height: f32,
    /// 0-based horizontal slot within the day column.
    pub slot_index: usize,
    /// Number of slots the column is divided into (1..=3).
    pub slot_count: usize,
}

impl BlockGeometry {
    /// Fraction of the column width this block occupies.
    pub fn width_fraction(&self) -> f32 {
        1.0 / self.slot_count as f32
    }

    /// Left edge as a fraction of the column width.
    pub fn left_fraction(&self) -> f32 {
        self.slot_index as f32 / self.slot_count as f32
    }
}

/// Computes block geometry for one appointment.
///
/// `overlap` is the appointment's placement from the overlap detector;
/// pass [`OverlapInfo::alone`] when it overlaps nothing.
pub fn layout_block(
    appointment: &Appointment,
    overlap: OverlapInfo,
    config: &GridConfig,
) -> BlockGeometry {
    let window = effective_window(appointment);

    // Fractional hours since midnight of the window start. Day-local: a
    // transit buffer pushing the start past the previous midnight reads
    // as a late-evening hour rather than clamping to 0.
    let start_hour = window.start.time().num_seconds_from_midnight() as f32 / 3600.0;
    let top = ((start_hour - config.start_hour as f32) * config.hour_height).max(0.0);
    let height = window.duration_minutes() as f32 / 60.0 * config.hour_height;

    let slot_count = overlap.group_size.clamp(1, MAX_LAYOUT_SLOTS);
    // 1-based index beyond the cap wraps into the available slots.
    let slot_index = (overlap.index_in_group - 1) % slot_count;

    BlockGeometry {
        appointment_id: appointment.id.clone(),
        top,
        height,
        slot_index,
        slot_count,
    }
}

/// Lays out a set of appointments against their overlap map.
///
/// Appointments missing from `overlaps` are treated as alone.
pub fn layout_blocks(
    appointments: &[Appointment],
    overlaps: &HashMap<String, OverlapInfo>,
    config: &GridConfig,
) -> Vec<BlockGeometry> {
    appointments
        .iter()
        .map(|a| {
            let overlap = overlaps.get(&a.id).copied().unwrap_or_else(OverlapInfo::alone);
            layout_block(a, overlap, config)
        })
        .collect()
}
