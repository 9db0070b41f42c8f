//! Request history and priority model.
//!
//! Every staff member carries a RequestHistory: their request log, line
//! tenure, and (for interns) mentor/peer pairing records. The priority
//! score computed here is what the conflict detector uses to decide who
//! wins a contested line.
//!
//! All recency arithmetic takes an explicit `as_of` date rather than
//! reading the wall clock, so a generation pass is a pure function of its
//! inputs.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Role;

/// The kind of roster change a staff member has requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// A request to move to a different line.
    LineChange,
    /// A request for specific dates off.
    DatesOff,
    /// A request to stay on the current line.
    StayOnLine,
    /// A request to swap lines with another staff member.
    LineSwap,
}

/// The outcome status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted, not yet resolved.
    Pending,
    /// Granted as requested.
    Approved,
    /// Refused.
    Denied,
    /// Granted in modified form.
    Modified,
    /// The staff member was moved without a matching request.
    ForcedMove,
}

/// Why a line assignment changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineChangeReason {
    /// First recorded assignment.
    Initial,
    /// A line-change request was approved.
    RequestApproved,
    /// Two staff members swapped lines.
    LineSwap,
    /// The engine moved the staff member to resolve a conflict or repair
    /// coverage.
    ForcedMove,
}

/// One entry in a staff member's line-assignment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAssignment {
    /// Label of the roster period the assignment started in.
    pub roster_period: String,
    /// The assigned line, 1-9.
    pub line_number: u8,
    /// The date the assignment took effect.
    pub start_date: NaiveDate,
    /// The date the assignment ended; None while current.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Why the assignment changed.
    pub change_reason: LineChangeReason,
}

/// The payload of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestDetails {
    /// The line requested, for line-change requests.
    #[serde(default)]
    pub requested_line: Option<u8>,
    /// True for stay-on-line requests.
    #[serde(default)]
    pub stay_on_line: bool,
    /// Requested dates off, for dates-off requests.
    #[serde(default)]
    pub dates_off: Vec<NaiveDate>,
}

/// Record of a single roster change request and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Label of the roster period the request targets.
    pub roster_period: String,
    /// The date the request was submitted.
    pub request_date: NaiveDate,
    /// The kind of request.
    pub request_type: RequestType,
    /// The request payload.
    pub details: RequestDetails,
    /// Outcome status.
    pub status: RequestStatus,
    /// The date the request was resolved, if it has been.
    #[serde(default)]
    pub approved_date: Option<NaiveDate>,
    /// The line actually assigned when the request was resolved.
    #[serde(default)]
    pub actual_assignment: Option<u8>,
    /// Why the request was denied, if it was.
    #[serde(default)]
    pub denial_reason: Option<String>,
    /// Swap partner name, for line-swap requests.
    #[serde(default)]
    pub swap_partner: Option<String>,
    /// Whether the swap partner also agreed.
    #[serde(default)]
    pub swap_partner_approved: bool,
    /// Free-form manager notes.
    #[serde(default)]
    pub manager_notes: Option<String>,
    /// True when the resolution was a forced move.
    #[serde(default)]
    pub was_forced_move: bool,
    /// Who or what forced the move.
    #[serde(default)]
    pub forced_by: Option<String>,
}

impl RequestRecord {
    /// Creates a pending request.
    pub fn new(
        roster_period: impl Into<String>,
        request_date: NaiveDate,
        request_type: RequestType,
        details: RequestDetails,
    ) -> Self {
        RequestRecord {
            roster_period: roster_period.into(),
            request_date,
            request_type,
            details,
            status: RequestStatus::Pending,
            approved_date: None,
            actual_assignment: None,
            denial_reason: None,
            swap_partner: None,
            swap_partner_approved: false,
            manager_notes: None,
            was_forced_move: false,
            forced_by: None,
        }
    }
}

/// Record of an intern having worked alongside a mentor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorPairing {
    /// The mentor's name.
    pub mentor_name: String,
    /// Label of the roster period the pairing occurred in.
    pub roster_period: String,
    /// Number of shifts the pair shared in that period.
    pub shifts_together: u32,
}

/// Record of an intern having worked the same period as another intern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternPairing {
    /// The other intern's name.
    pub intern_name: String,
    /// Label of the roster period.
    pub roster_period: String,
}

/// Complete request history for one staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestHistory {
    /// The staff member's name.
    pub staff_name: String,
    /// Running count of submitted requests.
    #[serde(default)]
    pub total_requests_submitted: u32,
    /// Running count of approved requests.
    #[serde(default)]
    pub total_requests_approved: u32,
    /// Running count of denied requests.
    #[serde(default)]
    pub total_requests_denied: u32,
    /// The line currently held, if any.
    #[serde(default)]
    pub current_line: Option<u8>,
    /// Consecutive rosters spent on the current line.
    #[serde(default)]
    pub rosters_on_current_line: u32,
    /// Append-only line-assignment history.
    #[serde(default)]
    pub line_history: Vec<LineAssignment>,
    /// Mentors this intern has worked with, in recording order.
    #[serde(default)]
    pub mentors_worked_with: Vec<MentorPairing>,
    /// Other interns this intern has shared a period with.
    #[serde(default)]
    pub interns_worked_with: Vec<InternPairing>,
    /// Append-only request log.
    #[serde(default)]
    pub request_log: Vec<RequestRecord>,
}

impl RequestHistory {
    /// Creates an empty history for a staff member.
    pub fn new(staff_name: impl Into<String>) -> Self {
        RequestHistory {
            staff_name: staff_name.into(),
            total_requests_submitted: 0,
            total_requests_approved: 0,
            total_requests_denied: 0,
            current_line: None,
            rosters_on_current_line: 0,
            line_history: Vec::new(),
            mentors_worked_with: Vec::new(),
            interns_worked_with: Vec::new(),
            request_log: Vec::new(),
        }
    }

    /// Calculates the priority score as of a given date.
    ///
    /// Interns score on a deliberately low scale so they only ever compete
    /// with each other:
    ///
    /// > `10 + months_since_last_approval × 0.5 − approvals_last_12_months`
    ///
    /// Everyone else scores on the full scale:
    ///
    /// > `100 + months_since_last_approval × 5 − approvals_last_12_months × 10
    /// > + tenure bonus`
    ///
    /// where the tenure bonus applies only when `wants_change` is false:
    /// +50 after at most one roster on the current line, +25 after exactly
    /// two, nothing from three on. Scores never go below zero.
    pub fn priority_score(&self, as_of: NaiveDate, wants_change: bool, role: Role) -> Decimal {
        let months = Decimal::from(self.months_since_last_approval(as_of));
        let approvals = Decimal::from(self.approvals_in_last_12_months(as_of));

        let score = if role == Role::Intern {
            Decimal::from(10) + months * Decimal::new(5, 1) - approvals
        } else {
            let tenure_bonus = if wants_change {
                Decimal::ZERO
            } else if self.rosters_on_current_line <= 1 {
                Decimal::from(50)
            } else if self.rosters_on_current_line == 2 {
                Decimal::from(25)
            } else {
                Decimal::ZERO
            };
            Decimal::from(100) + months * Decimal::from(5) - approvals * Decimal::from(10)
                + tenure_bonus
        };

        score.max(Decimal::ZERO)
    }

    /// Whole months since the most recent approved request, capped at 12.
    /// Returns 12 when no request has ever been approved.
    pub fn months_since_last_approval(&self, as_of: NaiveDate) -> u32 {
        let latest = self
            .request_log
            .iter()
            .filter(|r| r.status == RequestStatus::Approved)
            .map(|r| r.approved_date.unwrap_or(r.request_date))
            .max();

        match latest {
            Some(approval_date) => {
                let months = (as_of - approval_date).num_days() / 30;
                months.clamp(0, 12) as u32
            }
            None => 12,
        }
    }

    /// Counts approved requests resolved within the trailing 12 months.
    pub fn approvals_in_last_12_months(&self, as_of: NaiveDate) -> u32 {
        let cutoff = as_of
            .checked_sub_months(Months::new(12))
            .unwrap_or(NaiveDate::MIN);

        self.request_log
            .iter()
            .filter(|r| r.status == RequestStatus::Approved)
            .filter(|r| r.approved_date.unwrap_or(r.request_date) > cutoff)
            .count() as u32
    }

    /// Appends a request to the log.
    pub fn add_request(&mut self, request: RequestRecord) {
        self.request_log.push(request);
        self.total_requests_submitted += 1;
    }

    /// Marks the request at `index` as approved with the line actually
    /// assigned. Out-of-range indexes are ignored.
    pub fn approve_request(&mut self, index: usize, assigned_line: u8, as_of: NaiveDate) {
        if let Some(request) = self.request_log.get_mut(index) {
            request.status = RequestStatus::Approved;
            request.approved_date = Some(as_of);
            request.actual_assignment = Some(assigned_line);
            self.total_requests_approved += 1;
        }
    }

    /// Marks the request at `index` as denied with a reason. Out-of-range
    /// indexes are ignored.
    pub fn deny_request(&mut self, index: usize, reason: impl Into<String>, as_of: NaiveDate) {
        if let Some(request) = self.request_log.get_mut(index) {
            request.status = RequestStatus::Denied;
            request.approved_date = Some(as_of);
            request.denial_reason = Some(reason.into());
            self.total_requests_denied += 1;
        }
    }

    /// Returns the index of the most recent pending request, if any.
    pub fn latest_pending_request(&self) -> Option<usize> {
        self.request_log
            .iter()
            .rposition(|r| r.status == RequestStatus::Pending)
    }

    /// Records a new line assignment, closing the open line-history entry.
    ///
    /// Staying on the same line increments the tenure counter; moving to a
    /// different line resets it to 1.
    pub fn update_line_assignment(
        &mut self,
        new_line: u8,
        roster_period: impl Into<String>,
        reason: LineChangeReason,
        as_of: NaiveDate,
    ) {
        if let Some(last) = self.line_history.last_mut()
            && last.end_date.is_none()
        {
            last.end_date = Some(as_of);
        }

        if self.current_line == Some(new_line) {
            self.rosters_on_current_line += 1;
        } else {
            self.rosters_on_current_line = 1;
            self.current_line = Some(new_line);
        }

        self.line_history.push(LineAssignment {
            roster_period: roster_period.into(),
            line_number: new_line,
            start_date: as_of,
            end_date: None,
            change_reason: reason,
        });
    }

    /// Records that this intern worked with a mentor.
    pub fn add_mentor_pairing(
        &mut self,
        mentor_name: impl Into<String>,
        roster_period: impl Into<String>,
        shifts_together: u32,
    ) {
        self.mentors_worked_with.push(MentorPairing {
            mentor_name: mentor_name.into(),
            roster_period: roster_period.into(),
            shifts_together,
        });
    }

    /// Records that this intern shared a period with another intern.
    pub fn add_intern_pairing(
        &mut self,
        intern_name: impl Into<String>,
        roster_period: impl Into<String>,
    ) {
        self.interns_worked_with.push(InternPairing {
            intern_name: intern_name.into(),
            roster_period: roster_period.into(),
        });
    }

    /// Removes every mentor and intern pairing recorded for a period.
    /// Recording a period's pairings twice therefore leaves one copy.
    pub fn clear_pairings_for_period(&mut self, roster_period: &str) {
        self.mentors_worked_with
            .retain(|p| p.roster_period != roster_period);
        self.interns_worked_with
            .retain(|p| p.roster_period != roster_period);
    }

    /// Returns true when this intern worked with the mentor within the
    /// last `within` distinct roster periods on record.
    pub fn has_worked_with_mentor(&self, mentor_name: &str, within: usize) -> bool {
        let recent = recent_periods(
            self.mentors_worked_with.iter().map(|p| p.roster_period.as_str()),
            within,
        );
        self.mentors_worked_with
            .iter()
            .any(|p| p.mentor_name == mentor_name && recent.contains(&p.roster_period.as_str()))
    }

    /// Returns true when this intern shared one of the last `within`
    /// distinct roster periods with the named intern.
    pub fn has_worked_with_intern(&self, intern_name: &str, within: usize) -> bool {
        let recent = recent_periods(
            self.interns_worked_with.iter().map(|p| p.roster_period.as_str()),
            within,
        );
        self.interns_worked_with
            .iter()
            .any(|p| p.intern_name == intern_name && recent.contains(&p.roster_period.as_str()))
    }

    /// Total shifts shared with a mentor across all recorded periods.
    pub fn total_shifts_with_mentor(&self, mentor_name: &str) -> u32 {
        self.mentors_worked_with
            .iter()
            .filter(|p| p.mentor_name == mentor_name)
            .map(|p| p.shifts_together)
            .sum()
    }
}

/// The last `within` distinct period labels, most recent first.
fn recent_periods<'a>(labels: impl Iterator<Item = &'a str>, within: usize) -> Vec<&'a str> {
    let mut recent: Vec<&str> = Vec::new();
    let ordered: Vec<&str> = labels.collect();
    for label in ordered.into_iter().rev() {
        if !recent.contains(&label) {
            recent.push(label);
            if recent.len() == within {
                break;
            }
        }
    }
    recent
}
