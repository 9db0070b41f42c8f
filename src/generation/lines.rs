//! Roster line model for the 9-day rotation.
//!
//! All nine lines cycle through the same pattern (two day shifts, two
//! night shifts, five days off); line k runs the pattern shifted forward
//! by 2(k-1) days, which is what pairs consecutive lines into day/night
//! handover partners. Shift lookup is a pure function of the line number
//! and the reference start date.

use chrono::{Duration, NaiveDate};

use crate::error::{RosterError, RosterResult};
use crate::generation::boundary::longest_working_run;
use crate::models::ShiftType;

/// The 9-day shift pattern every line cycles through.
pub const SHIFT_PATTERN: [ShiftType; 9] = [
    ShiftType::Day,
    ShiftType::Day,
    ShiftType::Night,
    ShiftType::Night,
    ShiftType::Off,
    ShiftType::Off,
    ShiftType::Off,
    ShiftType::Off,
    ShiftType::Off,
];

/// Length of the rotation cycle in days.
pub const CYCLE_LENGTH: i64 = 9;

/// The sliding window a compliance violation was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// A 7-day window.
    Week,
    /// A 14-day window.
    Fortnight,
}

/// A sliding window with fewer days off than the Award requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceViolation {
    /// Which window size was violated.
    pub window: WindowKind,
    /// First day of the violating window.
    pub start_date: NaiveDate,
    /// Last day of the violating window.
    pub end_date: NaiveDate,
    /// Days off actually present in the window.
    pub days_off: u32,
    /// Days off the Award requires in the window.
    pub required: u32,
}

/// A single roster line in the 9-day rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterLine {
    /// Line number, 1-9.
    pub line_number: u8,
    /// Reference start date shared by all nine lines.
    pub start_date: NaiveDate,
    offset: i64,
}

impl RosterLine {
    /// Creates a roster line.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::InvalidLineNumber` for numbers outside 1-9.
    pub fn new(line_number: u8, start_date: NaiveDate) -> RosterResult<Self> {
        if !(1..=9).contains(&line_number) {
            return Err(RosterError::InvalidLineNumber { line: line_number });
        }
        Ok(RosterLine {
            line_number,
            start_date,
            offset: i64::from(line_number - 1) * 2 % CYCLE_LENGTH,
        })
    }

    /// Returns the shift this line works on `date`.
    ///
    /// Dates before the reference start date wrap backwards through the
    /// cycle, so the lookup is total.
    pub fn shift_on_date(&self, date: NaiveDate) -> ShiftType {
        let days_since_start = (date - self.start_date).num_days();
        let index = (days_since_start + self.offset).rem_euclid(CYCLE_LENGTH);
        SHIFT_PATTERN[index as usize]
    }

    /// Returns the schedule for this line over a date range.
    pub fn schedule(&self, start_date: NaiveDate, num_days: usize) -> Vec<(NaiveDate, ShiftType)> {
        (0..num_days)
            .map(|i| {
                let date = start_date + Duration::days(i as i64);
                (date, self.shift_on_date(date))
            })
            .collect()
    }

    /// Returns true when every requested date falls on an off day.
    pub fn has_all_off(&self, requested_dates: &[NaiveDate]) -> bool {
        requested_dates
            .iter()
            .all(|&date| self.shift_on_date(date) == ShiftType::Off)
    }

    /// Counts how many of the requested dates are working days.
    pub fn count_working_among(&self, requested_dates: &[NaiveDate]) -> usize {
        requested_dates
            .iter()
            .filter(|&&date| self.shift_on_date(date).is_working())
            .count()
    }

    /// Longest run of consecutive working days in a date range.
    pub fn longest_working_run(&self, start_date: NaiveDate, num_days: usize) -> u32 {
        let shifts: Vec<ShiftType> = self
            .schedule(start_date, num_days)
            .into_iter()
            .map(|(_, shift)| shift)
            .collect();
        longest_working_run(&shifts)
    }

    /// Scans every 7-day and 14-day sliding window in the range and
    /// reports each one with fewer days off than required.
    pub fn compliance_violations(
        &self,
        start_date: NaiveDate,
        num_days: usize,
        min_days_off_per_week: u32,
        min_days_off_per_fortnight: u32,
    ) -> Vec<ComplianceViolation> {
        let schedule = self.schedule(start_date, num_days);
        let mut violations = Vec::new();

        for (window_len, window_kind, required) in [
            (7usize, WindowKind::Week, min_days_off_per_week),
            (14, WindowKind::Fortnight, min_days_off_per_fortnight),
        ] {
            if schedule.len() < window_len {
                continue;
            }
            for window in schedule.windows(window_len) {
                let days_off = window
                    .iter()
                    .filter(|(_, shift)| *shift == ShiftType::Off)
                    .count() as u32;
                if days_off < required {
                    violations.push(ComplianceViolation {
                        window: window_kind,
                        start_date: window[0].0,
                        end_date: window[window_len - 1].0,
                        days_off,
                        required,
                    });
                }
            }
        }

        violations
    }
}

/// Owns all nine roster lines for a reference start date.
#[derive(Debug, Clone)]
pub struct LineManager {
    /// Reference start date the lines are anchored to.
    pub start_date: NaiveDate,
    lines: Vec<RosterLine>,
}

impl LineManager {
    /// Builds all nine lines anchored to `start_date`.
    pub fn new(start_date: NaiveDate) -> Self {
        let lines = (1..=9u8)
            .map(|line_number| RosterLine {
                line_number,
                start_date,
                offset: i64::from(line_number - 1) * 2 % CYCLE_LENGTH,
            })
            .collect();
        LineManager { start_date, lines }
    }

    /// Returns all nine lines in order.
    pub fn lines(&self) -> &[RosterLine] {
        &self.lines
    }

    /// Returns the line with the given number.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::InvalidLineNumber` for numbers outside 1-9.
    pub fn line(&self, line_number: u8) -> RosterResult<&RosterLine> {
        if !(1..=9).contains(&line_number) {
            return Err(RosterError::InvalidLineNumber { line: line_number });
        }
        Ok(&self.lines[usize::from(line_number - 1)])
    }

    /// Returns every line on which all requested dates are off days.
    pub fn lines_with_all_off(&self, requested_dates: &[NaiveDate]) -> Vec<&RosterLine> {
        self.lines
            .iter()
            .filter(|line| line.has_all_off(requested_dates))
            .collect()
    }

    /// Ranks all lines by how well they fit the requested dates off.
    ///
    /// Fewer conflicting working days ranks higher; ties keep line-number
    /// order.
    pub fn rank_by_fit(&self, requested_dates: &[NaiveDate]) -> Vec<(&RosterLine, usize)> {
        let mut ranked: Vec<(&RosterLine, usize)> = self
            .lines
            .iter()
            .map(|line| (line, line.count_working_among(requested_dates)))
            .collect();
        ranked.sort_by_key(|&(_, working)| working);
        ranked
    }
}
