//! Intern rotation placement.
//!
//! Interns are placed after everyone else, one per line, scored toward
//! mentors they have not worked with in recent periods. Overlap is
//! measured shift by shift against the working assignment map, so a
//! cross-line mentor sharing two shifts counts for exactly those two
//! shifts. Running out of free lines leaves an intern unplaced, which is
//! an ordinary outcome, not an error.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::generation::lines::LineManager;
use crate::models::{RequestHistory, Role, RosterPeriod, ShiftType, StaffMember};

/// How many recent distinct periods count as "recent" for mentor rotation.
const MENTOR_RECENCY_PERIODS: usize = 2;

/// A leave block this long or longer makes a mentor a poor pairing.
const LONG_LEAVE_DAYS: i64 = 14;

/// The outcome of placing one intern.
#[derive(Debug, Clone, PartialEq)]
pub struct InternPlacement {
    /// The intern's name.
    pub intern_name: String,
    /// The line assigned, or None when every line was claimed.
    pub line_number: Option<u8>,
    /// The winning line's score.
    pub score: Decimal,
    /// Why the line scored the way it did.
    pub reasons: Vec<String>,
}

/// Places interns onto lines with mentor-rotation scoring.
pub struct InternAssigner<'a> {
    staff: &'a [StaffMember],
    line_manager: LineManager,
    dates: Vec<NaiveDate>,
}

impl<'a> InternAssigner<'a> {
    /// Creates an assigner for a roster period, with lines anchored to
    /// the period's start date.
    pub fn new(staff: &'a [StaffMember], period: &RosterPeriod) -> Self {
        InternAssigner {
            staff,
            line_manager: LineManager::new(period.start_date),
            dates: period.dates().collect(),
        }
    }

    /// Places every intern, highest intern-priority first.
    ///
    /// `assignments` is the working map holding everyone already placed;
    /// mentor overlap is computed against it. `coverage_needs` marks
    /// lines still short of staff (positive values attract a bonus).
    /// Histories are seeded for interns seen for the first time.
    pub fn assign(
        &self,
        assignments: &BTreeMap<String, u8>,
        coverage_needs: &BTreeMap<u8, i64>,
        histories: &mut BTreeMap<String, RequestHistory>,
        as_of: NaiveDate,
    ) -> Vec<InternPlacement> {
        // clone each intern's history so scoring can read while the map
        // stays untouched
        let mut queue: Vec<(&StaffMember, Decimal, RequestHistory)> = self
            .interns()
            .map(|intern| {
                let history = histories
                    .entry(intern.name.clone())
                    .or_insert_with(|| RequestHistory::new(&intern.name));
                let priority = history.priority_score(as_of, true, Role::Intern);
                (intern, priority, history.clone())
            })
            .collect();
        queue.sort_by(|(intern_a, score_a, _), (intern_b, score_b, _)| {
            score_b
                .cmp(score_a)
                .then_with(|| intern_a.name.cmp(&intern_b.name))
        });

        let mut used_lines: BTreeSet<u8> = BTreeSet::new();
        let mut placements = Vec::new();

        for (intern, priority, history) in queue {
            let best = (1..=9u8)
                .filter(|line| !used_lines.contains(line))
                .map(|line| {
                    let (score, reasons) = self.score_line(intern, &history, line, assignments, coverage_needs);
                    (line, score, reasons)
                })
                .min_by(|(line_a, score_a, _), (line_b, score_b, _)| {
                    score_b.cmp(score_a).then_with(|| line_a.cmp(line_b))
                });

            match best {
                Some((line, score, reasons)) => {
                    debug!(intern = %intern.name, line, %score, %priority, "placed intern");
                    used_lines.insert(line);
                    placements.push(InternPlacement {
                        intern_name: intern.name.clone(),
                        line_number: Some(line),
                        score,
                        reasons,
                    });
                }
                None => {
                    debug!(intern = %intern.name, "no free line for intern");
                    placements.push(InternPlacement {
                        intern_name: intern.name.clone(),
                        line_number: None,
                        score: Decimal::ZERO,
                        reasons: vec!["All lines already claimed".to_string()],
                    });
                }
            }
        }

        placements
    }

    fn score_line(
        &self,
        intern: &StaffMember,
        history: &RequestHistory,
        line_number: u8,
        assignments: &BTreeMap<String, u8>,
        coverage_needs: &BTreeMap<u8, i64>,
    ) -> (Decimal, Vec<String>) {
        let mut score = Decimal::ZERO;
        let mut reasons = Vec::new();
        let line = &self.line_manager.lines()[usize::from(line_number - 1)];

        if !intern.requested_dates_off.is_empty() {
            if line.has_all_off(&intern.requested_dates_off) {
                score += Decimal::from(50);
                reasons.push("Matches date requests".to_string());
            } else {
                let conflicts = line.count_working_among(&intern.requested_dates_off);
                score -= Decimal::from(10 * conflicts as i64);
                reasons.push(format!("{} date conflict(s)", conflicts));
            }
        }

        let intern_schedule = self.schedule_with_leave(intern, line_number);
        let mut mentors_found = 0u32;

        for mentor in self.paramedics() {
            let mentor_line = assignments.get(&mentor.name).copied().unwrap_or(0);
            if !(1..=9).contains(&mentor_line) {
                continue;
            }
            let mentor_schedule = self.schedule_with_leave(mentor, mentor_line);
            let shared = count_shared_shifts(&intern_schedule, &mentor_schedule);
            if shared == 0 {
                continue;
            }
            mentors_found += 1;

            if history.has_worked_with_mentor(&mentor.name, MENTOR_RECENCY_PERIODS) {
                score -= Decimal::from(2 * i64::from(shared));
                reasons.push(format!("Repeat mentor: {} ({} shifts)", mentor.name, shared));
            } else {
                score += Decimal::from(3 * i64::from(shared));
                reasons.push(format!("New mentor: {} ({} shifts)", mentor.name, shared));
            }

            if has_long_leave(mentor) {
                score -= Decimal::from(15);
                reasons.push(format!("{} has long leave", mentor.name));
            }
        }

        match mentors_found {
            0 => {
                score -= Decimal::from(20);
                reasons.push("No paramedic mentors found".to_string());
            }
            1 => {
                score += Decimal::from(10);
                reasons.push("Single mentor".to_string());
            }
            n => {
                score += Decimal::from(20);
                reasons.push(format!("Multiple mentors ({} paramedics)", n));
            }
        }

        if coverage_needs.get(&line_number).copied().unwrap_or(0) > 0 {
            score += Decimal::from(25);
            reasons.push(format!(
                "Coverage need ({} shortfall shifts)",
                coverage_needs[&line_number]
            ));
        }

        (score, reasons)
    }

    /// Records mentor and peer pairings for a period into the histories.
    ///
    /// Same-line mentors are recorded exclusively when any exist;
    /// otherwise cross-line paramedics sharing shifts are recorded.
    /// Previous entries for the period are cleared first, so recording
    /// the same period twice leaves a single copy.
    pub fn record_pairings(
        &self,
        assignments: &BTreeMap<String, u8>,
        period_label: &str,
        histories: &mut BTreeMap<String, RequestHistory>,
    ) {
        let intern_names: Vec<String> = self.interns().map(|i| i.name.clone()).collect();

        for intern in self.interns() {
            let intern_line = assignments.get(&intern.name).copied().unwrap_or(0);
            if !(1..=9).contains(&intern_line) {
                continue;
            }
            let intern_schedule = self.schedule_with_leave(intern, intern_line);

            let history = histories
                .entry(intern.name.clone())
                .or_insert_with(|| RequestHistory::new(&intern.name));
            history.clear_pairings_for_period(period_label);

            let mut same_line: Vec<(String, u32)> = Vec::new();
            let mut cross_line: Vec<(String, u32)> = Vec::new();
            for mentor in self.paramedics() {
                let mentor_line = assignments.get(&mentor.name).copied().unwrap_or(0);
                if !(1..=9).contains(&mentor_line) {
                    continue;
                }
                let shared = count_shared_shifts(
                    &intern_schedule,
                    &self.schedule_with_leave(mentor, mentor_line),
                );
                if shared == 0 {
                    continue;
                }
                if mentor_line == intern_line {
                    same_line.push((mentor.name.clone(), shared));
                } else {
                    cross_line.push((mentor.name.clone(), shared));
                }
            }

            let recorded = if same_line.is_empty() { cross_line } else { same_line };
            for (mentor_name, shared) in recorded {
                history.add_mentor_pairing(mentor_name, period_label, shared);
            }

            for peer in &intern_names {
                if peer != &intern.name {
                    history.add_intern_pairing(peer, period_label);
                }
            }
        }
    }

    fn interns(&self) -> impl Iterator<Item = &'a StaffMember> {
        self.staff
            .iter()
            .filter(|s| s.is_intern() && !s.is_fixed_roster)
    }

    fn paramedics(&self) -> impl Iterator<Item = &'a StaffMember> {
        self.staff
            .iter()
            .filter(|s| s.role == Role::Paramedic && !s.is_fixed_roster)
    }

    /// The staff member's per-date shifts on a line, with leave days
    /// mapped to off.
    fn schedule_with_leave(&self, staff: &StaffMember, line_number: u8) -> Vec<ShiftType> {
        let line = &self.line_manager.lines()[usize::from(line_number - 1)];
        self.dates
            .iter()
            .map(|&date| {
                if staff.is_on_leave(date) {
                    ShiftType::Off
                } else {
                    line.shift_on_date(date)
                }
            })
            .collect()
    }
}

fn count_shared_shifts(schedule_a: &[ShiftType], schedule_b: &[ShiftType]) -> u32 {
    schedule_a
        .iter()
        .zip(schedule_b)
        .filter(|(a, b)| a.is_working() && a == b)
        .count() as u32
}

fn has_long_leave(staff: &StaffMember) -> bool {
    staff
        .leave_periods
        .iter()
        .any(|leave| leave.length_days() >= LONG_LEAVE_DAYS)
}
