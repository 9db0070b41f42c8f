//! Error types for the Roster Generation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during roster generation.
//!
//! Only malformed input is an error. Heuristic outcomes such as "no feasible
//! line for this intern" or "shortfalls remain after repair" are reported as
//! normal results, never through this type.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Roster Generation Engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use roster_engine::error::RosterError;
///
/// let error = RosterError::InvalidLineNumber { line: 12 };
/// assert_eq!(error.to_string(), "Invalid line number 12 (lines are numbered 1-9)");
/// ```
#[derive(Debug, Error)]
pub enum RosterError {
    /// A line number outside the valid 1-9 range was supplied.
    #[error("Invalid line number {line} (lines are numbered 1-9)")]
    InvalidLineNumber {
        /// The out-of-range line number.
        line: u8,
    },

    /// A roster period's end date precedes its start date.
    #[error("Invalid roster period: {start_date} to {end_date}")]
    InvalidPeriod {
        /// The period start date.
        start_date: NaiveDate,
        /// The period end date.
        end_date: NaiveDate,
    },

    /// A staff record was invalid or contained inconsistent data.
    #[error("Invalid staff record '{name}': {message}")]
    InvalidStaff {
        /// The name of the staff member with the invalid record.
        name: String,
        /// A description of what made the record invalid.
        message: String,
    },

    /// Settings file was not found at the specified path.
    #[error("Settings file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Settings file could not be parsed.
    #[error("Failed to parse settings file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return RosterError.
pub type RosterResult<T> = Result<T, RosterError>;
