//! Roster period model.
//!
//! A roster period is the labelled, inclusive date range a generation pass
//! covers. ApprovedRoster is the shape a finalized roster takes when it is
//! stored in the approved-roster history.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{RosterError, RosterResult};

/// A labelled roster period with an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPeriod {
    /// Human-readable period label, e.g. "2026-R03".
    pub label: String,
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl RosterPeriod {
    /// Creates a period, validating that the end date does not precede the
    /// start date.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::InvalidPeriod` when `end_date < start_date`.
    pub fn new(
        label: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RosterResult<Self> {
        if end_date < start_date {
            return Err(RosterError::InvalidPeriod {
                start_date,
                end_date,
            });
        }
        Ok(RosterPeriod {
            label: label.into(),
            start_date,
            end_date,
        })
    }

    /// Returns the inclusive number of days in the period.
    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Iterates every date in the period in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.num_days()).map(move |offset| self.start_date + Duration::days(offset))
    }

    /// Returns true when `date` falls within the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// A finalized roster as stored in the approved-roster history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovedRoster {
    /// Label of the period this roster covers.
    pub period_label: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
    /// Final staff-name to line-number assignments.
    pub assignments: BTreeMap<String, u8>,
    /// The date the roster was approved.
    pub approval_date: NaiveDate,
    /// Workflow status, e.g. "approved".
    pub status: String,
}
