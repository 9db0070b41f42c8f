//! Roster boundary validation.
//!
//! A staff member changing lines between roster periods can stack the
//! departing line's working days against the arriving line's. The
//! validator splices the last days of the old line onto the first days of
//! the new one and checks the Award off-day minimums across the seam.

use chrono::{Duration, NaiveDate};

use crate::config::RosterSettings;
use crate::generation::lines::{ComplianceViolation, LineManager, RosterLine, WindowKind};
use crate::models::ShiftType;

/// The outcome of checking one line transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionCheck {
    /// True when no window around the boundary dips below minimum.
    pub valid: bool,
    /// The first violation found, when invalid.
    pub violation: Option<ComplianceViolation>,
}

/// Validates line transitions at roster period boundaries.
#[derive(Debug, Clone)]
pub struct BoundaryValidator {
    /// Departure days inspected before the boundary.
    pub lookback_days: usize,
    /// Arrival days inspected after the boundary.
    pub lookahead_days: usize,
    /// Minimum days off in any 7-day window.
    pub min_days_off_per_week: u32,
    /// Minimum days off in any 14-day window.
    pub min_days_off_per_fortnight: u32,
}

impl Default for BoundaryValidator {
    fn default() -> Self {
        BoundaryValidator {
            lookback_days: 4,
            lookahead_days: 4,
            min_days_off_per_week: 2,
            min_days_off_per_fortnight: 4,
        }
    }
}

impl BoundaryValidator {
    /// Builds a validator from engine settings.
    pub fn from_settings(settings: &RosterSettings) -> Self {
        BoundaryValidator {
            lookback_days: settings.boundary_lookback_days,
            lookahead_days: settings.boundary_lookahead_days,
            min_days_off_per_week: settings.min_days_off_per_week,
            min_days_off_per_fortnight: settings.min_days_off_per_fortnight,
        }
    }

    /// Checks whether moving from one line to another at the boundary
    /// complies with the Award.
    ///
    /// The last `lookback_days` of the departing line are joined to the
    /// first `lookahead_days` of the arriving line. Every 7-day window in
    /// the joined sequence is scanned first, then the leading 14-day
    /// window when the sequence is long enough. The first violation found
    /// is the one reported.
    pub fn validate_transition(
        &self,
        from: &RosterLine,
        to: &RosterLine,
        transition_date: NaiveDate,
    ) -> TransitionCheck {
        let departure_start = transition_date - Duration::days(self.lookback_days as i64);
        let mut boundary = from.schedule(departure_start, self.lookback_days);
        boundary.extend(to.schedule(transition_date, self.lookahead_days));

        if boundary.len() >= 7 {
            for window in boundary.windows(7) {
                let days_off = count_off(window);
                if days_off < self.min_days_off_per_week {
                    return TransitionCheck {
                        valid: false,
                        violation: Some(ComplianceViolation {
                            window: WindowKind::Week,
                            start_date: window[0].0,
                            end_date: window[6].0,
                            days_off,
                            required: self.min_days_off_per_week,
                        }),
                    };
                }
            }
        }

        if boundary.len() >= 14 {
            let window = &boundary[..14];
            let days_off = count_off(window);
            if days_off < self.min_days_off_per_fortnight {
                return TransitionCheck {
                    valid: false,
                    violation: Some(ComplianceViolation {
                        window: WindowKind::Fortnight,
                        start_date: window[0].0,
                        end_date: window[13].0,
                        days_off,
                        required: self.min_days_off_per_fortnight,
                    }),
                };
            }
        }

        TransitionCheck {
            valid: true,
            violation: None,
        }
    }

    /// Checks the transition from one line to every line, in line order.
    pub fn all_valid_transitions(
        &self,
        from: &RosterLine,
        manager: &LineManager,
        transition_date: NaiveDate,
    ) -> Vec<(u8, TransitionCheck)> {
        manager
            .lines()
            .iter()
            .map(|to| (to.line_number, self.validate_transition(from, to, transition_date)))
            .collect()
    }
}

fn count_off(window: &[(NaiveDate, ShiftType)]) -> u32 {
    window
        .iter()
        .filter(|(_, shift)| *shift == ShiftType::Off)
        .count() as u32
}

/// Longest run of consecutive working days in a shift sequence.
pub fn longest_working_run(shifts: &[ShiftType]) -> u32 {
    let mut longest = 0u32;
    let mut current = 0u32;
    for shift in shifts {
        if shift.is_working() {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
