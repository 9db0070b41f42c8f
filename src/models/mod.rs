//! Data models for the Roster Generation Engine.
//!
//! This module contains the core data structures used throughout the
//! engine: shift types, staff members, roster periods, request histories
//! and generation results.

pub mod generation_result;
pub mod history;
pub mod period;
pub mod shift;
pub mod staff;

pub use generation_result::{AssignmentReason, GenerationLogEntry, GenerationResult};
pub use history::{
    InternPairing, LineAssignment, LineChangeReason, MentorPairing, RequestDetails,
    RequestHistory, RequestRecord, RequestStatus, RequestType,
};
pub use period::{ApprovedRoster, RosterPeriod};
pub use shift::ShiftType;
pub use staff::{LeavePeriod, Role, StaffMember};
