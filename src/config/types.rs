//! Configuration data structures.
//!
//! This module defines the RosterSettings struct holding the engine
//! tunables: the per-shift staffing band, the boundary-check window sizes
//! and the Award off-day minimums.

use serde::{Deserialize, Serialize};

/// Engine tunables for a generation pass.
///
/// `Default` carries the Award values, so a missing settings file is never
/// fatal to callers that are happy with the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterSettings {
    /// Minimum staff required on each day and night shift.
    pub min_per_shift: u32,
    /// Maximum staff before a shift counts as overstaffed.
    pub max_per_shift: u32,
    /// Departure days inspected at a period boundary.
    pub boundary_lookback_days: usize,
    /// Arrival days inspected at a period boundary.
    pub boundary_lookahead_days: usize,
    /// Minimum days off required in any 7-day window.
    pub min_days_off_per_week: u32,
    /// Minimum days off required in any 14-day window.
    pub min_days_off_per_fortnight: u32,
}

impl Default for RosterSettings {
    fn default() -> Self {
        RosterSettings {
            min_per_shift: 2,
            max_per_shift: 4,
            boundary_lookback_days: 4,
            boundary_lookahead_days: 4,
            min_days_off_per_week: 2,
            min_days_off_per_fortnight: 4,
        }
    }
}
