//! The generation orchestrator.
//!
//! Runs a full generation pass over one roster period: conflict
//! resolution, request placement, intern rotation, coverage repair and
//! history recording. The pass works on a single working assignment map
//! from start to finish; every component reads the map as it stands when
//! that step runs.
//!
//! All recency arithmetic uses the injected `as_of` date, so two passes
//! over the same inputs produce the same assignments.

use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::RosterSettings;
use crate::error::{RosterError, RosterResult};
use crate::generation::conflicts::ConflictDetector;
use crate::generation::coverage::CoverageAnalyzer;
use crate::generation::interns::InternAssigner;
use crate::generation::lines::LineManager;
use crate::models::{
    AssignmentReason, GenerationLogEntry, GenerationResult, LineChangeReason, RequestHistory,
    RequestType, RosterPeriod, StaffMember,
};

/// Runs generation passes for a roster period.
pub struct RosterGenerator<'a> {
    staff: &'a [StaffMember],
    period: &'a RosterPeriod,
    settings: &'a RosterSettings,
}

impl<'a> RosterGenerator<'a> {
    /// Creates a generator over the staff list for one period.
    pub fn new(
        staff: &'a [StaffMember],
        period: &'a RosterPeriod,
        settings: &'a RosterSettings,
    ) -> Self {
        RosterGenerator {
            staff,
            period,
            settings,
        }
    }

    /// Runs a full generation pass.
    ///
    /// `current_roster` is the roster in force before this period;
    /// `histories` is updated in place with seeded entries, request
    /// outcomes, line assignments and intern pairings. `as_of` anchors
    /// every recency computation.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::InvalidStaff` when a staff record carries an
    /// out-of-range line request or an inverted leave period. Coverage
    /// problems and unplaced interns are reported in the result, never as
    /// errors.
    pub fn generate(
        &self,
        current_roster: &BTreeMap<String, u8>,
        histories: &mut BTreeMap<String, RequestHistory>,
        as_of: NaiveDate,
    ) -> RosterResult<GenerationResult> {
        self.validate_staff()?;

        let analyzer = CoverageAnalyzer::new(self.staff, self.period, self.settings);
        let detector = ConflictDetector::new(self.staff, current_roster, self.period.start_date);
        let line_manager = LineManager::new(self.period.start_date);

        let mut assignments: BTreeMap<String, u8> = BTreeMap::new();
        let mut log: Vec<GenerationLogEntry> = Vec::new();
        let mut handled: BTreeSet<String> = BTreeSet::new();
        let mut flexible: BTreeSet<String> = BTreeSet::new();
        let mut forced: BTreeSet<String> = BTreeSet::new();
        let mut denial_reasons: BTreeMap<String, String> = BTreeMap::new();
        let mut coverage_denials = 0u32;

        // step 1: resolve contested lines
        let conflicts = detector.detect_line_conflicts(histories, as_of);
        info!(period = %self.period.label, conflicts = conflicts.len(), "starting generation pass");

        for conflict in &conflicts {
            let Some((winner, winner_score)) = conflict.winner() else {
                continue;
            };
            let winner = winner.to_string();
            info!(line = conflict.line_number, winner = %winner, score = %winner_score, "conflict resolved");
            assignments.insert(winner.clone(), conflict.line_number);
            handled.insert(winner.clone());
            log.push(entry(
                Some(conflict.line_number),
                &winner,
                AssignmentReason::ConflictWinner,
                format!(
                    "won line {} on priority {}",
                    conflict.line_number, winner_score
                ),
            ));

            for loser in conflict.losers() {
                let loser = loser.to_string();
                handled.insert(loser.clone());
                let Some(staff) = self.staff.iter().find(|s| s.name == loser) else {
                    continue;
                };
                self.place_conflict_loser(
                    staff,
                    conflict.line_number,
                    current_roster,
                    &detector,
                    &analyzer,
                    &mut assignments,
                    &mut forced,
                    &mut log,
                );
            }
        }

        // step 2: everyone else with a request, then the defaults
        for staff in self.staff {
            if staff.is_fixed_roster || staff.is_intern() || handled.contains(&staff.name) {
                continue;
            }
            let current_line = current_roster.get(&staff.name).copied().unwrap_or(0);
            let base = self.with_current(&assignments, &staff.name, current_line);

            if let Some(requested) = staff.requested_line {
                if analyzer.is_move_safe(&base, &staff.name, current_line, requested) {
                    assignments.insert(staff.name.clone(), requested);
                    log.push(entry(
                        Some(requested),
                        &staff.name,
                        AssignmentReason::DirectRequest,
                        format!("assigned requested line {}", requested),
                    ));
                    continue;
                }

                coverage_denials += 1;
                let reason = format!(
                    "line {} request denied: move would worsen coverage",
                    requested
                );
                warn!(staff = %staff.name, requested, "coverage denial");
                denial_reasons.insert(staff.name.clone(), reason.clone());
                log.push(entry(
                    Some(requested),
                    &staff.name,
                    AssignmentReason::DirectRequestDenied,
                    reason,
                ));
                // fall through to the default chain below
            }

            if !staff.requested_dates_off.is_empty() {
                self.place_by_dates(
                    staff,
                    current_line,
                    &line_manager,
                    &analyzer,
                    &mut assignments,
                    &mut log,
                );
            } else if current_line > 0 {
                assignments.insert(staff.name.clone(), current_line);
                if staff.requested_line.is_none() {
                    flexible.insert(staff.name.clone());
                }
                log.push(entry(
                    Some(current_line),
                    &staff.name,
                    AssignmentReason::KeptCurrentLine,
                    format!("kept on line {}", current_line),
                ));
            } else {
                let line = self.most_deficient_line(&analyzer, &assignments);
                assignments.insert(staff.name.clone(), line);
                if staff.requested_line.is_none() {
                    flexible.insert(staff.name.clone());
                }
                log.push(entry(
                    Some(line),
                    &staff.name,
                    AssignmentReason::AutoAssigned,
                    format!("no prior line, placed on most deficient line {}", line),
                ));
            }
        }

        // step 3: interns, with coverage hints from the map as it stands
        let coverage_needs: BTreeMap<u8, i64> = analyzer
            .rank_lines_by_coverage_need(&assignments)
            .into_iter()
            .collect();
        let assigner = InternAssigner::new(self.staff, self.period);
        let placements = assigner.assign(&assignments, &coverage_needs, histories, as_of);
        for placement in &placements {
            match placement.line_number {
                Some(line) => {
                    assignments.insert(placement.intern_name.clone(), line);
                    log.push(entry(
                        Some(line),
                        &placement.intern_name,
                        AssignmentReason::InternRotation,
                        format!(
                            "intern rotation (score {}): {}",
                            placement.score,
                            placement.reasons.join("; ")
                        ),
                    ));
                }
                None => {
                    warn!(intern = %placement.intern_name, "intern left unplaced");
                    log.push(entry(
                        None,
                        &placement.intern_name,
                        AssignmentReason::InternUnplaced,
                        "no free line available for intern".to_string(),
                    ));
                }
            }
        }
        assigner.record_pairings(&assignments, &self.period.label, histories);

        // step 4: repair coverage with the flexible staff
        loop {
            let coverage = analyzer.build_coverage_map(&assignments);
            if analyzer.count_shortfalls(&coverage) == 0 {
                break;
            }

            let mut best: Option<(String, u8, u8, i64)> = None;
            for name in &flexible {
                let Some(&from_line) = assignments.get(name) else {
                    continue;
                };
                for to_line in 1..=9u8 {
                    if to_line == from_line {
                        continue;
                    }
                    let evaluation = analyzer.evaluate_move(&assignments, name, from_line, to_line);
                    if evaluation.delta < 0
                        && best
                            .as_ref()
                            .is_none_or(|(_, _, _, delta)| evaluation.delta < *delta)
                    {
                        best = Some((name.clone(), from_line, to_line, evaluation.delta));
                    }
                }
            }

            let Some((name, from_line, to_line, delta)) = best else {
                break;
            };
            info!(staff = %name, from_line, to_line, delta, "coverage repair move");
            assignments.insert(name.clone(), to_line);
            flexible.remove(&name);
            forced.insert(name.clone());
            log.push(entry(
                Some(to_line),
                &name,
                AssignmentReason::CoverageRepair,
                format!(
                    "moved from line {} to line {} to repair coverage ({})",
                    from_line, to_line, delta
                ),
            ));
        }

        // step 5: write outcomes back into the histories
        for staff in self.staff {
            if staff.is_fixed_roster {
                continue;
            }
            let history = histories
                .entry(staff.name.clone())
                .or_insert_with(|| RequestHistory::new(&staff.name));
            let Some(&assigned) = assignments.get(&staff.name) else {
                continue;
            };

            if let Some(index) = history.latest_pending_request() {
                let request = &history.request_log[index];
                let previous_line = current_roster.get(&staff.name).copied().unwrap_or(0);
                let granted = match request.request_type {
                    RequestType::LineChange => request.details.requested_line == Some(assigned),
                    RequestType::StayOnLine => previous_line == assigned,
                    RequestType::DatesOff => true,
                    RequestType::LineSwap => false,
                };

                if granted {
                    history.approve_request(index, assigned, as_of);
                } else {
                    let reason = denial_reasons.get(&staff.name).cloned().unwrap_or_else(|| {
                        format!("assigned to line {} instead", assigned)
                    });
                    history.deny_request(index, reason, as_of);
                }
            }

            let change_reason = if forced.contains(&staff.name) {
                LineChangeReason::ForcedMove
            } else if history.line_history.is_empty() {
                LineChangeReason::Initial
            } else {
                LineChangeReason::RequestApproved
            };
            history.update_line_assignment(assigned, &self.period.label, change_reason, as_of);
        }

        // final accounting
        let coverage = analyzer.build_coverage_map(&assignments);
        let residual_shortfalls = analyzer.count_shortfalls(&coverage);
        let overages = analyzer.count_overages(&coverage);
        if residual_shortfalls > 0 {
            warn!(residual_shortfalls, "coverage still short after repair");
            log.push(entry(
                None,
                "",
                AssignmentReason::CoverageSummary,
                format!("{} shift(s) below minimum after repair", residual_shortfalls),
            ));
        }
        if overages > 0 {
            log.push(entry(
                None,
                "",
                AssignmentReason::CoverageSummary,
                format!("{} shift(s) above maximum staffing", overages),
            ));
        }

        info!(
            assigned = assignments.len(),
            coverage_denials, residual_shortfalls, "generation pass complete"
        );

        Ok(GenerationResult {
            generation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            period_label: self.period.label.clone(),
            assignments,
            log,
            coverage_denials,
            residual_shortfalls,
        })
    }

    fn validate_staff(&self) -> RosterResult<()> {
        for staff in self.staff {
            if let Some(line) = staff.requested_line
                && !(1..=9).contains(&line)
            {
                return Err(RosterError::InvalidStaff {
                    name: staff.name.clone(),
                    message: format!("requested line {} is out of range", line),
                });
            }
            for leave in &staff.leave_periods {
                if leave.end_date < leave.start_date {
                    return Err(RosterError::InvalidStaff {
                        name: staff.name.clone(),
                        message: format!(
                            "leave period {} to {} ends before it starts",
                            leave.start_date, leave.end_date
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn place_conflict_loser(
        &self,
        staff: &StaffMember,
        contested_line: u8,
        current_roster: &BTreeMap<String, u8>,
        detector: &ConflictDetector<'_>,
        analyzer: &CoverageAnalyzer<'_>,
        assignments: &mut BTreeMap<String, u8>,
        forced: &mut BTreeSet<String>,
        log: &mut Vec<GenerationLogEntry>,
    ) {
        let current_line = current_roster.get(&staff.name).copied().unwrap_or(0);
        let mut unavailable: Vec<u8> = assignments.values().copied().collect();
        unavailable.push(contested_line);

        let alternatives = detector.suggest_alternatives(staff, &unavailable);
        let base = self.with_current(assignments, &staff.name, current_line);

        // first coverage-safe suggestion
        for (line, why) in &alternatives {
            if analyzer.is_move_safe(&base, &staff.name, current_line, *line) {
                assignments.insert(staff.name.clone(), *line);
                forced.insert(staff.name.clone());
                log.push(entry(
                    Some(*line),
                    &staff.name,
                    AssignmentReason::ConflictAlternative,
                    format!("moved off contested line {} ({})", contested_line, why),
                ));
                return;
            }
        }

        // staying put is always coverage-neutral when the line survives
        if current_line > 0 && current_line != contested_line {
            assignments.insert(staff.name.clone(), current_line);
            log.push(entry(
                Some(current_line),
                &staff.name,
                AssignmentReason::ConflictKeptCurrent,
                format!(
                    "lost line {}, kept on current line {}",
                    contested_line, current_line
                ),
            ));
            return;
        }

        // least-harm alternative
        let least_harm = alternatives
            .iter()
            .map(|(line, _)| {
                let evaluation = analyzer.evaluate_move(&base, &staff.name, current_line, *line);
                (*line, evaluation.delta)
            })
            .min_by_key(|&(_, delta)| delta);
        if let Some((line, delta)) = least_harm {
            assignments.insert(staff.name.clone(), line);
            forced.insert(staff.name.clone());
            log.push(entry(
                Some(line),
                &staff.name,
                AssignmentReason::ConflictAlternative,
                format!(
                    "moved off contested line {} to line {} (least coverage impact, {})",
                    contested_line, line, delta
                ),
            ));
            return;
        }

        // nothing suggested at all: take the most deficient line
        let line = self.most_deficient_line(analyzer, assignments);
        assignments.insert(staff.name.clone(), line);
        forced.insert(staff.name.clone());
        log.push(entry(
            Some(line),
            &staff.name,
            AssignmentReason::ConflictFallback,
            format!(
                "lost line {}, force-placed on most deficient line {}",
                contested_line, line
            ),
        ));
    }

    fn place_by_dates(
        &self,
        staff: &StaffMember,
        current_line: u8,
        line_manager: &LineManager,
        analyzer: &CoverageAnalyzer<'_>,
        assignments: &mut BTreeMap<String, u8>,
        log: &mut Vec<GenerationLogEntry>,
    ) {
        // the line they already hold wins outright when it fits
        if current_line > 0
            && let Ok(line) = line_manager.line(current_line)
            && line.has_all_off(&staff.requested_dates_off)
        {
            assignments.insert(staff.name.clone(), current_line);
            log.push(entry(
                Some(current_line),
                &staff.name,
                AssignmentReason::CurrentLineFitsDates,
                format!("current line {} already fits requested dates", current_line),
            ));
            return;
        }

        let base = self.with_current(assignments, &staff.name, current_line);
        for (line, conflicts) in line_manager.rank_by_fit(&staff.requested_dates_off) {
            if analyzer.is_move_safe(&base, &staff.name, current_line, line.line_number) {
                assignments.insert(staff.name.clone(), line.line_number);
                log.push(entry(
                    Some(line.line_number),
                    &staff.name,
                    AssignmentReason::BestDateFit,
                    format!(
                        "best date fit on line {} ({} conflict(s))",
                        line.line_number, conflicts
                    ),
                ));
                return;
            }
        }

        if current_line > 0 {
            assignments.insert(staff.name.clone(), current_line);
            log.push(entry(
                Some(current_line),
                &staff.name,
                AssignmentReason::KeptCurrentLine,
                "no coverage-safe date fit, kept on current line".to_string(),
            ));
        } else {
            let line = self.most_deficient_line(analyzer, assignments);
            assignments.insert(staff.name.clone(), line);
            log.push(entry(
                Some(line),
                &staff.name,
                AssignmentReason::AutoAssigned,
                format!("no coverage-safe date fit, placed on line {}", line),
            ));
        }
    }

    /// The most coverage-deficient line, preferring lines nobody holds.
    fn most_deficient_line(
        &self,
        analyzer: &CoverageAnalyzer<'_>,
        assignments: &BTreeMap<String, u8>,
    ) -> u8 {
        let taken: BTreeSet<u8> = assignments.values().copied().collect();
        let ranked = analyzer.rank_lines_by_coverage_need(assignments);
        ranked
            .iter()
            .find(|(line, _)| !taken.contains(line))
            .or_else(|| ranked.first())
            .map(|&(line, _)| line)
            .unwrap_or(1)
    }

    /// A copy of the working map with the staff member seeded onto their
    /// current line, so move evaluations compare stay against move.
    fn with_current(
        &self,
        assignments: &BTreeMap<String, u8>,
        name: &str,
        current_line: u8,
    ) -> BTreeMap<String, u8> {
        let mut base = assignments.clone();
        if (1..=9).contains(&current_line) {
            base.insert(name.to_string(), current_line);
        }
        base
    }
}

fn entry(
    line: Option<u8>,
    staff_name: &str,
    reason: AssignmentReason,
    message: String,
) -> GenerationLogEntry {
    GenerationLogEntry {
        line,
        staff_name: staff_name.to_string(),
        reason,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        LeavePeriod, RequestDetails, RequestRecord, RequestStatus, Role, ShiftType,
    };

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn as_of() -> NaiveDate {
        make_date("2026-01-10")
    }

    fn nine_day_period() -> RosterPeriod {
        RosterPeriod::new(
            "2026-R01",
            make_date("2026-01-24"),
            make_date("2026-02-01"),
        )
        .unwrap()
    }

    fn full_crew() -> (Vec<StaffMember>, BTreeMap<String, u8>) {
        let mut staff = Vec::new();
        let mut roster = BTreeMap::new();
        for line in 1..=9u8 {
            let name = format!("Paramedic {}", line);
            staff.push(StaffMember::new(&name, Role::Paramedic));
            roster.insert(name, line);
        }
        (staff, roster)
    }

    /// GO-001: out-of-range line requests fail fast
    #[test]
    fn test_invalid_requested_line_rejected() {
        let mut staff = StaffMember::new("Jane Smith", Role::Paramedic);
        staff.requested_line = Some(14);
        let staff = vec![staff];
        let period = nine_day_period();
        let settings = RosterSettings::default();
        let generator = RosterGenerator::new(&staff, &period, &settings);

        let result = generator.generate(&BTreeMap::new(), &mut BTreeMap::new(), as_of());
        assert!(matches!(result, Err(RosterError::InvalidStaff { .. })));
    }

    /// GO-002: inverted leave periods fail fast
    #[test]
    fn test_inverted_leave_rejected() {
        let mut staff = StaffMember::new("Jane Smith", Role::Paramedic);
        staff.leave_periods = vec![LeavePeriod {
            start_date: make_date("2026-02-10"),
            end_date: make_date("2026-02-01"),
            label: String::new(),
        }];
        let staff = vec![staff];
        let period = nine_day_period();
        let settings = RosterSettings::default();
        let generator = RosterGenerator::new(&staff, &period, &settings);

        let result = generator.generate(&BTreeMap::new(), &mut BTreeMap::new(), as_of());
        assert!(matches!(result, Err(RosterError::InvalidStaff { .. })));
    }

    /// GO-003: a settled crew stays put with clean coverage
    #[test]
    fn test_settled_crew_keeps_lines() {
        let (staff, roster) = full_crew();
        let period = nine_day_period();
        let settings = RosterSettings::default();
        let generator = RosterGenerator::new(&staff, &period, &settings);

        let mut histories = BTreeMap::new();
        let result = generator.generate(&roster, &mut histories, as_of()).unwrap();

        assert_eq!(result.assignments, roster);
        assert_eq!(result.coverage_denials, 0);
        assert_eq!(result.residual_shortfalls, 0);
        assert!(result
            .log
            .iter()
            .all(|e| e.reason == AssignmentReason::KeptCurrentLine));

        // every staff member's history was updated
        for line in 1..=9u8 {
            let history = &histories[&format!("Paramedic {}", line)];
            assert_eq!(history.current_line, Some(line));
            assert_eq!(history.line_history.len(), 1);
            assert_eq!(
                history.line_history[0].change_reason,
                LineChangeReason::Initial
            );
        }
    }

    /// GO-004: conflict winner takes the line, loser lands safely and the
    /// request outcomes are recorded
    #[test]
    fn test_conflict_resolution_end_to_end() {
        let mut jane = StaffMember::new("Jane Smith", Role::Paramedic);
        jane.requested_line = Some(3);
        let bob = StaffMember::new("Bob Jones", Role::Paramedic);
        let staff = vec![jane, bob];

        let mut roster = BTreeMap::new();
        roster.insert("Jane Smith".to_string(), 5u8);
        roster.insert("Bob Jones".to_string(), 3u8);

        let mut histories = BTreeMap::new();
        let mut jane_history = RequestHistory::new("Jane Smith");
        jane_history.add_request(RequestRecord::new(
            "2026-R01",
            make_date("2026-01-02"),
            RequestType::LineChange,
            RequestDetails {
                requested_line: Some(3),
                ..Default::default()
            },
        ));
        histories.insert("Jane Smith".to_string(), jane_history);

        let mut bob_history = RequestHistory::new("Bob Jones");
        bob_history.current_line = Some(3);
        bob_history.rosters_on_current_line = 1;
        let mut approved = RequestRecord::new(
            "2025-R06",
            make_date("2025-11-01"),
            RequestType::LineChange,
            RequestDetails::default(),
        );
        approved.status = RequestStatus::Approved;
        approved.approved_date = Some(make_date("2025-11-10"));
        bob_history.request_log.push(approved);
        histories.insert("Bob Jones".to_string(), bob_history);

        let period = nine_day_period();
        let settings = RosterSettings::default();
        let generator = RosterGenerator::new(&staff, &period, &settings);
        let result = generator.generate(&roster, &mut histories, as_of()).unwrap();

        // Jane (160) displaces Bob (150)
        assert_eq!(result.assignments["Jane Smith"], 3);
        let bob_line = result.assignments["Bob Jones"];
        assert_ne!(bob_line, 3);

        // Jane's pending request was approved
        let jane_history = &histories["Jane Smith"];
        assert_eq!(jane_history.total_requests_approved, 1);
        assert_eq!(jane_history.request_log[0].actual_assignment, Some(3));
        assert_eq!(jane_history.current_line, Some(3));

        // Bob was force-moved and his tenure reset
        let bob_history = &histories["Bob Jones"];
        assert_eq!(bob_history.current_line, Some(bob_line));
        assert_eq!(bob_history.rosters_on_current_line, 1);
        assert_eq!(
            bob_history.line_history.last().unwrap().change_reason,
            LineChangeReason::ForcedMove
        );
    }

    /// GO-005: a coverage-hostile request is denied and counted
    #[test]
    fn test_unsafe_direct_request_denied() {
        let (mut staff, mut roster) = full_crew();
        // line 2's occupant is replaced by a casual working line 2's
        // shifts, so the line is empty of rotating staff but fully covered
        staff.remove(1);
        roster.remove("Paramedic 2");
        let mut fixed = StaffMember::new("Fiona Fixed", Role::Casual);
        fixed.is_fixed_roster = true;
        for (date, shift) in [
            ("2026-01-24", ShiftType::Night),
            ("2026-01-25", ShiftType::Night),
            ("2026-01-31", ShiftType::Day),
            ("2026-02-01", ShiftType::Day),
        ] {
            fixed.fixed_schedule.insert(make_date(date), shift);
        }
        staff.push(fixed);
        // Paramedic 9 asks for the covered line, which would empty line 9
        staff
            .iter_mut()
            .find(|s| s.name == "Paramedic 9")
            .unwrap()
            .requested_line = Some(2);

        let period = nine_day_period();
        let settings = RosterSettings::default();
        let generator = RosterGenerator::new(&staff, &period, &settings);

        let mut histories = BTreeMap::new();
        let result = generator.generate(&roster, &mut histories, as_of()).unwrap();

        assert_eq!(result.coverage_denials, 1);
        assert_eq!(result.assignments["Paramedic 9"], 9);
        assert!(result
            .log
            .iter()
            .any(|e| e.reason == AssignmentReason::DirectRequestDenied));
        assert_eq!(result.residual_shortfalls, 0);
    }

    /// GO-006: the repair loop moves a flexible doubled-up body onto the
    /// empty line
    #[test]
    fn test_repair_moves_flexible_staff() {
        let (mut staff, mut roster) = full_crew();
        // line 4's occupant is instead doubled up on line 1
        roster.insert("Paramedic 4".to_string(), 1u8);
        staff.push(StaffMember::new("Aaron Extra", Role::Paramedic));
        roster.insert("Aaron Extra".to_string(), 1u8);

        let period = nine_day_period();
        let settings = RosterSettings::default();
        let generator = RosterGenerator::new(&staff, &period, &settings);

        let mut histories = BTreeMap::new();
        let result = generator.generate(&roster, &mut histories, as_of()).unwrap();

        // one of the three line-1 bodies was repaired onto line 4
        assert_eq!(result.residual_shortfalls, 0);
        let on_line_4: Vec<&String> = result
            .assignments
            .iter()
            .filter(|&(_, &line)| line == 4)
            .map(|(name, _)| name)
            .collect();
        assert_eq!(on_line_4.len(), 1);
        assert!(result
            .log
            .iter()
            .any(|e| e.reason == AssignmentReason::CoverageRepair));
    }

    /// GO-007: interns ride along and pairings are recorded
    #[test]
    fn test_intern_assignment_and_pairings() {
        let (mut staff, roster) = full_crew();
        staff.push(StaffMember::new("Ivy Intern", Role::Intern));

        let period = nine_day_period();
        let settings = RosterSettings::default();
        let generator = RosterGenerator::new(&staff, &period, &settings);

        let mut histories = BTreeMap::new();
        let result = generator.generate(&roster, &mut histories, as_of()).unwrap();

        let intern_line = result.assignments["Ivy Intern"];
        assert!((1..=9).contains(&intern_line));
        assert!(result
            .log
            .iter()
            .any(|e| e.reason == AssignmentReason::InternRotation));

        // the same-line paramedic was recorded as the mentor
        let ivy = &histories["Ivy Intern"];
        assert_eq!(ivy.mentors_worked_with.len(), 1);
        assert_eq!(
            ivy.mentors_worked_with[0].mentor_name,
            format!("Paramedic {}", intern_line)
        );
        assert_eq!(ivy.mentors_worked_with[0].roster_period, "2026-R01");
    }

    /// GO-008: a staff member with date requests moves to a fitting line
    /// when it is coverage-safe
    #[test]
    fn test_date_request_placement() {
        let mut staff_member = StaffMember::new("Sam Dates", Role::Paramedic);
        staff_member.requested_dates_off = vec![make_date("2026-01-24")];
        let staff = vec![staff_member];

        let period = nine_day_period();
        let settings = RosterSettings::default();
        let generator = RosterGenerator::new(&staff, &period, &settings);

        let mut histories = BTreeMap::new();
        let result = generator
            .generate(&BTreeMap::new(), &mut histories, as_of())
            .unwrap();

        // line 1 works the period start date; a later line has it off
        let line = result.assignments["Sam Dates"];
        let manager = LineManager::new(make_date("2026-01-24"));
        assert!(manager
            .line(line)
            .unwrap()
            .has_all_off(&[make_date("2026-01-24")]));
        assert!(result
            .log
            .iter()
            .any(|e| e.reason == AssignmentReason::BestDateFit));
    }
}
