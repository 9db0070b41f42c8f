//! Conflict detection and resolution for line requests.
//!
//! Staff who request a line vote to move there; staff with no request
//! implicitly vote to stay where they are. A line is in conflict when at
//! least one person actively wants to move onto it and at least two
//! people are associated with it. The winner is decided by priority
//! score, ties broken alphabetically by name so the outcome never depends
//! on iteration order.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::generation::lines::LineManager;
use crate::models::{RequestHistory, StaffMember};

/// A contested line: who wants to move onto it and who already holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct LineConflict {
    /// The contested line number.
    pub line_number: u8,
    /// Staff requesting to move onto the line, with priority scores.
    pub movers: Vec<(String, Decimal)>,
    /// The current occupant of the line, if any, with their score.
    pub incumbent: Option<(String, Decimal)>,
}

impl LineConflict {
    /// Returns the name and score of the candidate who wins the line.
    ///
    /// Highest score wins; equal scores fall back to alphabetical order
    /// by name.
    pub fn winner(&self) -> Option<(&str, Decimal)> {
        self.candidates()
            .into_iter()
            .min_by(|(name_a, score_a), (name_b, score_b)| {
                score_b.cmp(score_a).then_with(|| name_a.cmp(name_b))
            })
    }

    /// Returns every candidate who did not win, in candidate order.
    pub fn losers(&self) -> Vec<&str> {
        match self.winner() {
            Some((winner_name, _)) => self
                .candidates()
                .into_iter()
                .map(|(name, _)| name)
                .filter(|name| *name != winner_name)
                .collect(),
            None => Vec::new(),
        }
    }

    fn candidates(&self) -> Vec<(&str, Decimal)> {
        let mut candidates: Vec<(&str, Decimal)> = self
            .movers
            .iter()
            .map(|(name, score)| (name.as_str(), *score))
            .collect();
        if let Some((name, score)) = &self.incumbent {
            candidates.push((name.as_str(), *score));
        }
        candidates
    }
}

/// Two or more interns proposed for the same line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternPairingViolation {
    /// The line holding multiple interns.
    pub line_number: u8,
    /// The interns proposed for it, in assignment order.
    pub interns: Vec<String>,
}

/// Detects conflicts among line requests.
pub struct ConflictDetector<'a> {
    staff: &'a [StaffMember],
    current_roster: &'a BTreeMap<String, u8>,
    line_manager: LineManager,
}

impl<'a> ConflictDetector<'a> {
    /// Creates a detector over the staff list and the roster currently in
    /// force, anchored to the new period's start date.
    pub fn new(
        staff: &'a [StaffMember],
        current_roster: &'a BTreeMap<String, u8>,
        roster_start: NaiveDate,
    ) -> Self {
        ConflictDetector {
            staff,
            current_roster,
            line_manager: LineManager::new(roster_start),
        }
    }

    /// Groups line votes and returns every contested line, in line order.
    ///
    /// Fixed-roster staff and interns take no part: the former never hold
    /// lines, the latter are placed by the rotation assignor. Staff seen
    /// for the first time get a history seeded from the current roster
    /// before scoring.
    pub fn detect_line_conflicts(
        &self,
        histories: &mut BTreeMap<String, RequestHistory>,
        as_of: NaiveDate,
    ) -> Vec<LineConflict> {
        // line -> (staff, wants_change) votes
        let mut votes: BTreeMap<u8, Vec<(&StaffMember, bool)>> = BTreeMap::new();

        for staff in self.staff {
            if staff.is_fixed_roster || staff.is_intern() {
                continue;
            }
            let current_line = self.current_line_of(&staff.name);

            if let Some(requested) = staff.requested_line {
                let wants_change = requested != current_line;
                votes.entry(requested).or_default().push((staff, wants_change));
            } else if current_line > 0 {
                votes.entry(current_line).or_default().push((staff, false));
            }
        }

        let mut conflicts = Vec::new();
        for (line_number, entries) in votes {
            if entries.len() < 2 {
                continue;
            }

            let mut movers = Vec::new();
            let mut incumbent = None;

            for (staff, wants_change) in entries {
                let current_line = self.current_line_of(&staff.name);
                let history = histories
                    .entry(staff.name.clone())
                    .or_insert_with(|| RequestHistory::new(&staff.name));
                if history.current_line.is_none() && current_line > 0 {
                    history.current_line = Some(current_line);
                    history.rosters_on_current_line = 1;
                }

                let priority = history.priority_score(as_of, wants_change, staff.role);
                if current_line == line_number {
                    incumbent = Some((staff.name.clone(), priority));
                } else {
                    movers.push((staff.name.clone(), priority));
                }
            }

            // multiple stayers with no active mover is not a conflict
            if !movers.is_empty() {
                conflicts.push(LineConflict {
                    line_number,
                    movers,
                    incumbent,
                });
            }
        }

        conflicts
    }

    /// Suggests up to three alternative lines for a staff member.
    ///
    /// With date preferences the lines are ranked by fit and annotated
    /// with their conflict count; without preferences the first open
    /// lines are offered as-is.
    pub fn suggest_alternatives(
        &self,
        staff: &StaffMember,
        excluded_lines: &[u8],
    ) -> Vec<(u8, String)> {
        let mut suggestions = Vec::new();

        if !staff.requested_dates_off.is_empty() {
            for (line, conflicts) in self.line_manager.rank_by_fit(&staff.requested_dates_off) {
                if excluded_lines.contains(&line.line_number) {
                    continue;
                }
                let reason = if conflicts == 0 {
                    "Perfect fit for your dates".to_string()
                } else {
                    format!("{} date conflict(s)", conflicts)
                };
                suggestions.push((line.line_number, reason));
                if suggestions.len() >= 3 {
                    break;
                }
            }
        } else {
            for line_number in 1..=9u8 {
                if excluded_lines.contains(&line_number) {
                    continue;
                }
                suggestions.push((line_number, "Available".to_string()));
                if suggestions.len() >= 3 {
                    break;
                }
            }
        }

        suggestions
    }

    /// Flags every line in a proposed assignment holding two or more
    /// interns.
    pub fn intern_pairing_violations(
        &self,
        proposed: &BTreeMap<String, u8>,
    ) -> Vec<InternPairingViolation> {
        let mut by_line: BTreeMap<u8, Vec<String>> = BTreeMap::new();

        for staff in self.staff {
            if staff.is_fixed_roster || !staff.is_intern() {
                continue;
            }
            if let Some(&line) = proposed.get(&staff.name)
                && line > 0
            {
                by_line.entry(line).or_default().push(staff.name.clone());
            }
        }

        by_line
            .into_iter()
            .filter(|(_, interns)| interns.len() > 1)
            .map(|(line_number, interns)| InternPairingViolation {
                line_number,
                interns,
            })
            .collect()
    }

    fn current_line_of(&self, name: &str) -> u8 {
        self.current_roster.get(name).copied().unwrap_or(0)
    }
}
