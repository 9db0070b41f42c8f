//! Staff member model and related types.
//!
//! This module defines the StaffMember and LeavePeriod structs describing
//! the people the engine assigns to roster lines, together with the closed
//! Role enum that drives role-based branching in the generation pass.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::ShiftType;

/// The role of a staff member.
///
/// Roles are a closed set; the engine branches on them directly (interns
/// go through the rotation assignor, everyone else through the request
/// pipeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A qualified paramedic, the default workforce role.
    Paramedic,
    /// An intern rotating across mentors; placed by the rotation assignor.
    Intern,
    /// A part-time paramedic, typically on a fixed roster.
    PartTime,
    /// A casual paramedic, typically on a fixed roster.
    Casual,
}

/// A contiguous block of approved leave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeavePeriod {
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// A short label, e.g. "annual leave".
    #[serde(default)]
    pub label: String,
}

impl LeavePeriod {
    /// Returns true when `date` falls within this leave block.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns the inclusive length of the block in days.
    pub fn length_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// A staff member eligible for roster assignment.
///
/// Fixed-roster staff carry their own `fixed_schedule` and are never
/// candidates for line assignment; they still count toward coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    /// The staff member's name, unique within a generation pass.
    pub name: String,
    /// The staff member's role.
    pub role: Role,
    /// Year of training or service, informational only.
    #[serde(default)]
    pub year: u8,
    /// The roster line this person has requested, if any.
    #[serde(default)]
    pub requested_line: Option<u8>,
    /// Specific dates this person has asked to have off.
    #[serde(default)]
    pub requested_dates_off: Vec<NaiveDate>,
    /// True when this person works a fixed schedule rather than a line.
    #[serde(default)]
    pub is_fixed_roster: bool,
    /// Per-date shifts for fixed-roster staff.
    #[serde(default)]
    pub fixed_schedule: BTreeMap<NaiveDate, ShiftType>,
    /// Approved leave blocks.
    #[serde(default)]
    pub leave_periods: Vec<LeavePeriod>,
}

impl StaffMember {
    /// Creates a staff member with the given name and role and no
    /// requests, leave or fixed schedule.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        StaffMember {
            name: name.into(),
            role,
            year: 0,
            requested_line: None,
            requested_dates_off: Vec::new(),
            is_fixed_roster: false,
            fixed_schedule: BTreeMap::new(),
            leave_periods: Vec::new(),
        }
    }

    /// Returns true when the staff member is on leave on `date`.
    pub fn is_on_leave(&self, date: NaiveDate) -> bool {
        self.leave_periods.iter().any(|leave| leave.contains(date))
    }

    /// Returns the fixed-roster shift for `date`, if one is recorded.
    pub fn fixed_shift(&self, date: NaiveDate) -> Option<ShiftType> {
        self.fixed_schedule.get(&date).copied()
    }

    /// Returns true for interns.
    pub fn is_intern(&self) -> bool {
        self.role == Role::Intern
    }
}
