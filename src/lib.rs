//! Roster Generation Engine for nine-line rotating shift rosters
//!
//! This crate generates line assignments for a 9-day rotating roster
//! (`DDNNOOOOO`: two day shifts, two night shifts, five days off) under the
//! Operational Ambulance Managers Award. It resolves contention between
//! staff requesting the same line using a request-history priority model,
//! rotates interns across different mentors, keeps per-shift staffing within
//! a configured band, and emits an auditable log of every assignment
//! decision.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod generation;
pub mod models;
