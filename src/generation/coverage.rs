//! Shift coverage simulation.
//!
//! The analyzer evaluates hypothetical assignment maps without mutating
//! any state: it counts per-day day/night headcounts, measures how far
//! they fall below the configured minimum, and scores what a single move
//! would do to those numbers. Leave always removes a body from coverage;
//! fixed-roster staff contribute their own schedules.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::config::RosterSettings;
use crate::generation::lines::LineManager;
use crate::models::{RosterPeriod, ShiftType, StaffMember};

/// Day and night headcounts for one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyCoverage {
    /// Staff working the day shift.
    pub day: u32,
    /// Staff working the night shift.
    pub night: u32,
}

impl DailyCoverage {
    /// Returns the headcount for a working shift type; days off hold no
    /// headcount.
    pub fn count(&self, shift: ShiftType) -> u32 {
        match shift {
            ShiftType::Day => self.day,
            ShiftType::Night => self.night,
            ShiftType::Off => 0,
        }
    }

    fn count_mut(&mut self, shift: ShiftType) -> Option<&mut u32> {
        match shift {
            ShiftType::Day => Some(&mut self.day),
            ShiftType::Night => Some(&mut self.night),
            ShiftType::Off => None,
        }
    }
}

/// Per-date coverage for a roster period.
pub type CoverageMap = BTreeMap<NaiveDate, DailyCoverage>;

/// The effect one hypothetical move would have on coverage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEvaluation {
    /// The staff member being moved.
    pub staff_name: String,
    /// The line they would leave.
    pub from_line: u8,
    /// The line they would join.
    pub to_line: u8,
    /// Total shortfalls before the move.
    pub before: u32,
    /// Total shortfalls after the move.
    pub after: u32,
    /// `after - before`; negative is an improvement.
    pub delta: i64,
    /// Shift-cells that were covered before and fall short after.
    pub new_gaps: Vec<(NaiveDate, ShiftType)>,
}

/// Pure coverage evaluator for one roster period.
pub struct CoverageAnalyzer<'a> {
    staff: &'a [StaffMember],
    line_manager: LineManager,
    dates: Vec<NaiveDate>,
    min_per_shift: u32,
    max_per_shift: u32,
}

impl<'a> CoverageAnalyzer<'a> {
    /// Creates an analyzer over the staff list for a period, with lines
    /// anchored to the period's start date.
    pub fn new(staff: &'a [StaffMember], period: &RosterPeriod, settings: &RosterSettings) -> Self {
        CoverageAnalyzer {
            staff,
            line_manager: LineManager::new(period.start_date),
            dates: period.dates().collect(),
            min_per_shift: settings.min_per_shift,
            max_per_shift: settings.max_per_shift,
        }
    }

    /// Builds the day-by-day coverage a set of assignments would produce.
    ///
    /// Fixed-roster staff contribute their fixed schedules; everyone else
    /// contributes their assigned line's pattern. Staff on leave drop out
    /// of coverage for those dates, and assignments outside 1-9 are
    /// treated as unassigned.
    pub fn build_coverage_map(&self, assignments: &BTreeMap<String, u8>) -> CoverageMap {
        let mut coverage: CoverageMap = self
            .dates
            .iter()
            .map(|&date| (date, DailyCoverage::default()))
            .collect();

        for staff in self.staff {
            if staff.is_fixed_roster {
                for &date in &self.dates {
                    if staff.is_on_leave(date) {
                        continue;
                    }
                    if let Some(shift) = staff.fixed_shift(date)
                        && let Some(entry) = coverage.get_mut(&date)
                        && let Some(count) = entry.count_mut(shift)
                    {
                        *count += 1;
                    }
                }
            } else {
                let line_number = assignments.get(&staff.name).copied().unwrap_or(0);
                if !(1..=9).contains(&line_number) {
                    continue;
                }
                let line = &self.line_manager.lines()[usize::from(line_number - 1)];
                for &date in &self.dates {
                    if staff.is_on_leave(date) {
                        continue;
                    }
                    if let Some(entry) = coverage.get_mut(&date)
                        && let Some(count) = entry.count_mut(line.shift_on_date(date))
                    {
                        *count += 1;
                    }
                }
            }
        }

        coverage
    }

    /// Total headcount missing below the minimum, summed over every
    /// shift-cell in the period.
    pub fn count_shortfalls(&self, coverage: &CoverageMap) -> u32 {
        self.fold_cells(coverage, |count, min, _| min.saturating_sub(count))
    }

    /// Total headcount above the maximum, summed over every shift-cell.
    /// Reported for visibility; overstaffing never blocks an assignment.
    pub fn count_overages(&self, coverage: &CoverageMap) -> u32 {
        self.fold_cells(coverage, |count, _, max| count.saturating_sub(max))
    }

    fn fold_cells(&self, coverage: &CoverageMap, cell: impl Fn(u32, u32, u32) -> u32) -> u32 {
        self.dates
            .iter()
            .filter_map(|date| coverage.get(date))
            .map(|entry| {
                cell(entry.day, self.min_per_shift, self.max_per_shift)
                    + cell(entry.night, self.min_per_shift, self.max_per_shift)
            })
            .sum()
    }

    /// Compares shortfalls before and after moving one person.
    pub fn evaluate_move(
        &self,
        assignments: &BTreeMap<String, u8>,
        staff_name: &str,
        from_line: u8,
        to_line: u8,
    ) -> MoveEvaluation {
        let before_map = self.build_coverage_map(assignments);
        let before = self.count_shortfalls(&before_map);

        let mut trial = assignments.clone();
        trial.insert(staff_name.to_string(), to_line);
        let after_map = self.build_coverage_map(&trial);
        let after = self.count_shortfalls(&after_map);

        let mut new_gaps = Vec::new();
        for &date in &self.dates {
            for shift in [ShiftType::Day, ShiftType::Night] {
                let was_covered = before_map
                    .get(&date)
                    .is_some_and(|c| c.count(shift) >= self.min_per_shift);
                let now_short = after_map
                    .get(&date)
                    .is_some_and(|c| c.count(shift) < self.min_per_shift);
                if was_covered && now_short {
                    new_gaps.push((date, shift));
                }
            }
        }

        MoveEvaluation {
            staff_name: staff_name.to_string(),
            from_line,
            to_line,
            before,
            after,
            delta: i64::from(after) - i64::from(before),
            new_gaps,
        }
    }

    /// True when the move does not increase total shortfalls.
    pub fn is_move_safe(
        &self,
        assignments: &BTreeMap<String, u8>,
        staff_name: &str,
        from_line: u8,
        to_line: u8,
    ) -> bool {
        self.evaluate_move(assignments, staff_name, from_line, to_line)
            .delta
            <= 0
    }

    /// Ranks lines 1-9 by how much adding one more person would reduce
    /// shortfalls, most needed first. Ties keep line order.
    pub fn rank_lines_by_coverage_need(
        &self,
        assignments: &BTreeMap<String, u8>,
    ) -> Vec<(u8, i64)> {
        let base_map = self.build_coverage_map(assignments);
        let base_shortfalls = self.count_shortfalls(&base_map);

        let mut benefits: Vec<(u8, i64)> = (1..=9u8)
            .map(|line_number| {
                let line = &self.line_manager.lines()[usize::from(line_number - 1)];
                // add a phantom body working the full line, no leave
                let mut trial = base_map.clone();
                for &date in &self.dates {
                    if let Some(entry) = trial.get_mut(&date)
                        && let Some(count) = entry.count_mut(line.shift_on_date(date))
                    {
                        *count += 1;
                    }
                }
                let benefit =
                    i64::from(base_shortfalls) - i64::from(self.count_shortfalls(&trial));
                (line_number, benefit)
            })
            .collect();

        benefits.sort_by_key(|&(_, benefit)| std::cmp::Reverse(benefit));
        benefits
    }
}
