//! Integration tests for the Roster Generation Engine.
//!
//! This suite runs full generation passes and covers:
//! - Steady-state generation over a complete roster period
//! - Tenure accumulation across consecutive periods
//! - Conflict resolution driven by request-history priority
//! - Direct requests and coverage denials
//! - Dates-off placement and the coverage repair that follows
//! - Intern mentor rotation across periods
//! - Residual shortfall accounting for understaffed crews
//! - Boundary validation between periods
//! - Error cases

use chrono::NaiveDate;
use std::collections::BTreeMap;

use roster_engine::config::RosterSettings;
use roster_engine::error::RosterError;
use roster_engine::generation::{
    BoundaryValidator, LineManager, RosterGenerator, WindowKind,
};
use roster_engine::models::{
    AssignmentReason, GenerationResult, LineChangeReason, RequestDetails, RequestHistory,
    RequestRecord, RequestStatus, RequestType, Role, RosterPeriod, StaffMember,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn make_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

fn as_of() -> NaiveDate {
    make_date("2026-01-10")
}

/// A 63-day roster period starting Saturday 2026-01-24 (seven full cycles).
fn full_period() -> RosterPeriod {
    RosterPeriod::new("2026-R01", make_date("2026-01-24"), make_date("2026-03-27")).unwrap()
}

/// One 9-day cycle, for scenarios where a single cycle is enough.
fn short_period() -> RosterPeriod {
    RosterPeriod::new("2026-R01", make_date("2026-01-24"), make_date("2026-02-01")).unwrap()
}

/// Nine paramedics, one per line.
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

fn generate(
    staff: &[StaffMember],
    period: &RosterPeriod,
    roster: &BTreeMap<String, u8>,
    histories: &mut BTreeMap<String, RequestHistory>,
    as_of: NaiveDate,
) -> GenerationResult {
    let settings = RosterSettings::default();
    RosterGenerator::new(staff, period, &settings)
        .generate(roster, histories, as_of)
        .unwrap()
}

// =============================================================================
// SECTION 1: Steady-State Generation
// =============================================================================

#[test]
fn test_full_crew_full_period_is_stable() {
    // A settled crew over seven full cycles: nobody moves, every shift
    // cell holds exactly two staff, nothing to repair or deny.
    let (staff, roster) = full_crew();
    let mut histories = BTreeMap::new();

    let result = generate(&staff, &full_period(), &roster, &mut histories, as_of());

    assert_eq!(result.assignments, roster);
    assert_eq!(result.coverage_denials, 0);
    assert_eq!(result.residual_shortfalls, 0);
    assert_eq!(result.period_label, "2026-R01");
    assert!(result
        .log
        .iter()
        .all(|e| e.reason == AssignmentReason::KeptCurrentLine));

    for line in 1..=9u8 {
        let history = &histories[&format!("Paramedic {}", line)];
        assert_eq!(history.current_line, Some(line));
        assert_eq!(history.rosters_on_current_line, 1);
        assert_eq!(history.line_history.len(), 1);
    }
}

#[test]
fn test_tenure_accumulates_across_periods() {
    let (staff, roster) = full_crew();
    let mut histories = BTreeMap::new();

    let first = generate(&staff, &full_period(), &roster, &mut histories, as_of());

    let second_period =
        RosterPeriod::new("2026-R02", make_date("2026-03-28"), make_date("2026-05-29")).unwrap();
    let second_as_of = make_date("2026-03-14");
    let second = generate(
        &staff,
        &second_period,
        &first.assignments,
        &mut histories,
        second_as_of,
    );

    assert_eq!(second.assignments, roster);
    for line in 1..=9u8 {
        let history = &histories[&format!("Paramedic {}", line)];
        // same line both periods: tenure climbs, first entry is closed
        assert_eq!(history.rosters_on_current_line, 2);
        assert_eq!(history.line_history.len(), 2);
        assert_eq!(history.line_history[0].end_date, Some(second_as_of));
        assert_eq!(history.line_history[1].end_date, None);
        assert_eq!(
            history.line_history[1].change_reason,
            LineChangeReason::RequestApproved
        );
    }
}

#[test]
fn test_fixed_roster_staff_receive_no_line() {
    let (mut staff, roster) = full_crew();
    let mut fixed = StaffMember::new("Pat Casual", Role::Casual);
    fixed.is_fixed_roster = true;
    fixed
        .fixed_schedule
        .insert(make_date("2026-01-24"), roster_engine::models::ShiftType::Day);
    staff.push(fixed);

    let mut histories = BTreeMap::new();
    let result = generate(&staff, &short_period(), &roster, &mut histories, as_of());

    assert!(!result.assignments.contains_key("Pat Casual"));
    assert!(!histories.contains_key("Pat Casual"));
}

// =============================================================================
// SECTION 2: Conflict Resolution
// =============================================================================

#[test]
fn test_newcomer_displaces_recently_approved_incumbent() {
    // Jane is new with no approval history: 100 + 12*5 = 160.
    // Paramedic 3 holds line 3 with a two-month-old approval:
    // 100 + 2*5 - 1*10 + 50 = 150. Jane wins the line.
    let (mut staff, roster) = full_crew();
    let mut jane = StaffMember::new("Jane Smith", Role::Paramedic);
    jane.requested_line = Some(3);
    staff.push(jane);

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

    let mut incumbent = RequestHistory::new("Paramedic 3");
    incumbent.current_line = Some(3);
    incumbent.rosters_on_current_line = 1;
    let mut approved = RequestRecord::new(
        "2025-R06",
        make_date("2025-11-01"),
        RequestType::LineChange,
        RequestDetails::default(),
    );
    approved.status = RequestStatus::Approved;
    approved.approved_date = Some(make_date("2025-11-10"));
    incumbent.request_log.push(approved);
    histories.insert("Paramedic 3".to_string(), incumbent);

    let result = generate(&staff, &short_period(), &roster, &mut histories, as_of());

    assert_eq!(result.assignments["Jane Smith"], 3);
    let displaced_line = result.assignments["Paramedic 3"];
    assert_ne!(displaced_line, 3);
    assert_eq!(result.coverage_denials, 0);
    assert_eq!(result.residual_shortfalls, 0);
    assert!(result
        .log
        .iter()
        .any(|e| e.reason == AssignmentReason::ConflictWinner && e.staff_name == "Jane Smith"));
    assert!(result
        .log
        .iter()
        .any(|e| e.reason == AssignmentReason::ConflictAlternative
            && e.staff_name == "Paramedic 3"));

    // Jane's pending request was approved with the actual line
    let jane_history = &histories["Jane Smith"];
    assert_eq!(jane_history.total_requests_approved, 1);
    assert_eq!(jane_history.request_log[0].actual_assignment, Some(3));
    assert_eq!(jane_history.current_line, Some(3));

    // the incumbent was force-moved and tenure reset
    let incumbent = &histories["Paramedic 3"];
    assert_eq!(incumbent.current_line, Some(displaced_line));
    assert_eq!(incumbent.rosters_on_current_line, 1);
    assert_eq!(
        incumbent.line_history.last().unwrap().change_reason,
        LineChangeReason::ForcedMove
    );
}

#[test]
fn test_equal_priority_conflict_breaks_alphabetically() {
    // Two newcomers request the same empty line with identical scores;
    // the alphabetically-first name wins.
    let mut staff = Vec::new();
    let mut roster = BTreeMap::new();
    for line in [1u8, 2, 3, 4, 6, 7, 8, 9] {
        let name = format!("Paramedic {}", line);
        staff.push(StaffMember::new(&name, Role::Paramedic));
        roster.insert(name, line);
    }
    let mut zoe = StaffMember::new("Zoe Park", Role::Paramedic);
    zoe.requested_line = Some(5);
    let mut adam = StaffMember::new("Adam Hill", Role::Paramedic);
    adam.requested_line = Some(5);
    staff.push(zoe);
    staff.push(adam);

    let mut histories = BTreeMap::new();
    let result = generate(&staff, &short_period(), &roster, &mut histories, as_of());

    assert_eq!(result.assignments["Adam Hill"], 5);
    assert_ne!(result.assignments["Zoe Park"], 5);
    assert_eq!(result.residual_shortfalls, 0);
}

// =============================================================================
// SECTION 3: Direct Requests and Coverage
// =============================================================================

#[test]
fn test_request_for_open_line_granted_and_recorded() {
    // Paramedic 1 asks for the vacant line 2. The move costs nothing on
    // one side and gains nothing on the other, so it is safe and granted.
    // Line 1 is left empty, which shows up as residual shortfalls.
    let (mut staff, mut roster) = full_crew();
    staff.remove(1);
    roster.remove("Paramedic 2");
    staff[0].requested_line = Some(2);

    let mut histories = BTreeMap::new();
    let mut history = RequestHistory::new("Paramedic 1");
    history.add_request(RequestRecord::new(
        "2026-R01",
        make_date("2026-01-03"),
        RequestType::LineChange,
        RequestDetails {
            requested_line: Some(2),
            ..Default::default()
        },
    ));
    histories.insert("Paramedic 1".to_string(), history);

    let result = generate(&staff, &short_period(), &roster, &mut histories, as_of());

    assert_eq!(result.assignments["Paramedic 1"], 2);
    assert_eq!(result.coverage_denials, 0);
    assert!(result
        .log
        .iter()
        .any(|e| e.reason == AssignmentReason::DirectRequest));

    let history = &histories["Paramedic 1"];
    assert_eq!(history.total_requests_approved, 1);
    assert_eq!(history.request_log[0].actual_assignment, Some(2));

    // line 1 empty: its 4 working shifts each lose one of two bodies
    assert_eq!(result.residual_shortfalls, 4);
    assert!(result
        .log
        .iter()
        .any(|e| e.reason == AssignmentReason::CoverageSummary && e.message.contains('4')));
}

#[test]
fn test_dates_off_placement_triggers_repair() {
    // Paramedic 1 wants 2026-01-24 off, which line 1 works. The date-fit
    // ranking lands them on line 3, doubling it up and emptying line 1;
    // the repair loop then moves Paramedic 3 across to close the gap.
    let (mut staff, roster) = full_crew();
    staff[0].requested_dates_off = vec![make_date("2026-01-24")];

    let mut histories = BTreeMap::new();
    let result = generate(&staff, &short_period(), &roster, &mut histories, as_of());

    assert_eq!(result.assignments["Paramedic 1"], 3);
    assert_eq!(result.assignments["Paramedic 3"], 1);
    assert_eq!(result.residual_shortfalls, 0);
    assert!(result
        .log
        .iter()
        .any(|e| e.reason == AssignmentReason::BestDateFit && e.staff_name == "Paramedic 1"));
    assert!(result
        .log
        .iter()
        .any(|e| e.reason == AssignmentReason::CoverageRepair && e.staff_name == "Paramedic 3"));

    // the requested date really is off on the assigned line
    let manager = LineManager::new(make_date("2026-01-24"));
    assert!(manager
        .line(3)
        .unwrap()
        .has_all_off(&[make_date("2026-01-24")]));

    // the repair move is recorded as forced
    assert_eq!(
        histories["Paramedic 3"].line_history.last().unwrap().change_reason,
        LineChangeReason::ForcedMove
    );
}

// =============================================================================
// SECTION 4: Intern Rotation
// =============================================================================

#[test]
fn test_intern_rotates_to_a_new_mentor_next_period() {
    let (mut staff, roster) = full_crew();
    staff.push(StaffMember::new("Ivy Intern", Role::Intern));

    let mut histories = BTreeMap::new();
    let first = generate(&staff, &short_period(), &roster, &mut histories, as_of());

    // every line scores the same for a fresh intern, so the tie lands on
    // line 1 alongside Paramedic 1
    assert_eq!(first.assignments["Ivy Intern"], 1);
    let ivy = &histories["Ivy Intern"];
    assert_eq!(ivy.mentors_worked_with.len(), 1);
    assert_eq!(ivy.mentors_worked_with[0].mentor_name, "Paramedic 1");
    assert_eq!(ivy.mentors_worked_with[0].shifts_together, 4);

    // next period the repeat-mentor penalty pushes Ivy off line 1 (and
    // off the lines that overlap Paramedic 1) onto line 2
    let second_period =
        RosterPeriod::new("2026-R02", make_date("2026-02-02"), make_date("2026-02-10")).unwrap();
    let second = generate(
        &staff,
        &second_period,
        &first.assignments,
        &mut histories,
        make_date("2026-01-28"),
    );

    assert_eq!(second.assignments["Ivy Intern"], 2);
    let ivy = &histories["Ivy Intern"];
    assert_eq!(ivy.mentors_worked_with.len(), 2);
    assert!(ivy
        .mentors_worked_with
        .iter()
        .any(|p| p.mentor_name == "Paramedic 2" && p.roster_period == "2026-R02"));
}

#[test]
fn test_two_interns_take_distinct_lines_and_record_peers() {
    let (mut staff, roster) = full_crew();
    staff.push(StaffMember::new("Amy Intern", Role::Intern));
    staff.push(StaffMember::new("Ben Intern", Role::Intern));

    let mut histories = BTreeMap::new();
    let result = generate(&staff, &short_period(), &roster, &mut histories, as_of());

    let amy_line = result.assignments["Amy Intern"];
    let ben_line = result.assignments["Ben Intern"];
    assert_ne!(amy_line, ben_line);

    let amy = &histories["Amy Intern"];
    assert_eq!(amy.interns_worked_with.len(), 1);
    assert_eq!(amy.interns_worked_with[0].intern_name, "Ben Intern");
    let ben = &histories["Ben Intern"];
    assert_eq!(ben.interns_worked_with[0].intern_name, "Amy Intern");
}

// =============================================================================
// SECTION 5: Coverage Repair and Shortfall Accounting
// =============================================================================

#[test]
fn test_repair_fills_two_empty_lines() {
    // Seven paramedics hold lines 1-5, 7 and 9; two request-less extras
    // double up on lines 7 and 9. Lines 6 and 8 are empty (8 shortfall
    // cells) and share no partner line, so relocating one extra to each
    // closes every gap.
    let mut staff = Vec::new();
    let mut roster = BTreeMap::new();
    for line in [1u8, 2, 3, 4, 5, 7, 9] {
        let name = format!("Paramedic {}", line);
        staff.push(StaffMember::new(&name, Role::Paramedic));
        roster.insert(name, line);
    }
    staff.push(StaffMember::new("Extra A", Role::Paramedic));
    roster.insert("Extra A".to_string(), 7u8);
    staff.push(StaffMember::new("Extra B", Role::Paramedic));
    roster.insert("Extra B".to_string(), 9u8);

    let mut histories = BTreeMap::new();
    let result = generate(&staff, &short_period(), &roster, &mut histories, as_of());

    assert_eq!(result.residual_shortfalls, 0);
    let repairs: Vec<_> = result
        .log
        .iter()
        .filter(|e| e.reason == AssignmentReason::CoverageRepair)
        .collect();
    assert_eq!(repairs.len(), 2);
    let mut repaired_lines = vec![
        result.assignments["Extra A"],
        result.assignments["Extra B"],
    ];
    repaired_lines.sort_unstable();
    assert_eq!(repaired_lines, vec![6, 8]);
}

#[test]
fn test_repair_stops_when_no_single_move_improves() {
    // Extras double up on lines 2 and 3 with lines 8 and 9 empty. Line 4
    // is a partner of both empty lines, so the first repair move parks
    // Extra A there (closing 4 of the 6 gaps); after that every remaining
    // move opens as many gaps as it closes, and the loop stops with the
    // residual reported rather than shuffling staff for no gain.
    let mut staff = Vec::new();
    let mut roster = BTreeMap::new();
    for line in 1..=7u8 {
        let name = format!("Paramedic {}", line);
        staff.push(StaffMember::new(&name, Role::Paramedic));
        roster.insert(name, line);
    }
    staff.push(StaffMember::new("Extra A", Role::Paramedic));
    roster.insert("Extra A".to_string(), 2u8);
    staff.push(StaffMember::new("Extra B", Role::Paramedic));
    roster.insert("Extra B".to_string(), 3u8);

    let mut histories = BTreeMap::new();
    let result = generate(&staff, &short_period(), &roster, &mut histories, as_of());

    let repairs: Vec<_> = result
        .log
        .iter()
        .filter(|e| e.reason == AssignmentReason::CoverageRepair)
        .collect();
    assert_eq!(repairs.len(), 1);
    assert_eq!(result.assignments["Extra A"], 4);
    assert_eq!(result.assignments["Extra B"], 3);
    assert_eq!(result.residual_shortfalls, 2);
    assert!(result
        .log
        .iter()
        .any(|e| e.reason == AssignmentReason::CoverageSummary));
}

#[test]
fn test_understaffed_crew_reports_residual_shortfalls() {
    // Five paramedics cover 20 of the 36 required shift-slots in a cycle;
    // no single move improves anything, so 16 shortfalls remain.
    let mut staff = Vec::new();
    let mut roster = BTreeMap::new();
    for line in 1..=5u8 {
        let name = format!("Paramedic {}", line);
        staff.push(StaffMember::new(&name, Role::Paramedic));
        roster.insert(name, line);
    }

    let mut histories = BTreeMap::new();
    let result = generate(&staff, &short_period(), &roster, &mut histories, as_of());

    assert_eq!(result.residual_shortfalls, 16);
    assert!(result
        .log
        .iter()
        .any(|e| e.reason == AssignmentReason::CoverageSummary && e.message.contains("16")));
}

// =============================================================================
// SECTION 6: Boundary Validation Between Periods
// =============================================================================

#[test]
fn test_boundary_validation_at_period_transition() {
    let second_start = make_date("2026-02-02");
    let manager = LineManager::new(second_start);
    let validator = BoundaryValidator::from_settings(&RosterSettings::default());

    // line 3 ends on DDNN; line 4 starts inside its off block
    let safe = validator.validate_transition(
        manager.line(3).unwrap(),
        manager.line(4).unwrap(),
        second_start,
    );
    assert!(safe.valid);

    // line 5 starts ODDN, leaving one day off in seven
    let unsafe_move = validator.validate_transition(
        manager.line(3).unwrap(),
        manager.line(5).unwrap(),
        second_start,
    );
    assert!(!unsafe_move.valid);
    let violation = unsafe_move.violation.unwrap();
    assert_eq!(violation.window, WindowKind::Week);
    assert_eq!(violation.days_off, 1);
    assert_eq!(violation.required, 2);
}

// =============================================================================
// SECTION 7: Result Serialization
// =============================================================================

#[test]
fn test_generation_result_round_trips_through_json() {
    let (staff, roster) = full_crew();
    let mut histories = BTreeMap::new();
    let result = generate(&staff, &short_period(), &roster, &mut histories, as_of());

    let json = serde_json::to_string(&result).unwrap();
    let parsed: GenerationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result, parsed);

    // log entries render with the line prefix
    let rendered = result.log[0].to_string();
    assert!(rendered.starts_with("[line "));
}

// =============================================================================
// SECTION 8: Error Cases
// =============================================================================

#[test]
fn test_out_of_range_request_is_rejected() {
    let (mut staff, roster) = full_crew();
    staff[0].requested_line = Some(12);

    let period = short_period();
    let settings = RosterSettings::default();
    let result = RosterGenerator::new(&staff, &period, &settings).generate(
        &roster,
        &mut BTreeMap::new(),
        as_of(),
    );

    match result {
        Err(RosterError::InvalidStaff { name, message }) => {
            assert_eq!(name, "Paramedic 1");
            assert!(message.contains("12"));
        }
        other => panic!("expected InvalidStaff, got {:?}", other),
    }
}

#[test]
fn test_inverted_period_is_rejected() {
    let result = RosterPeriod::new("bad", make_date("2026-02-01"), make_date("2026-01-24"));
    assert!(matches!(result, Err(RosterError::InvalidPeriod { .. })));
}
