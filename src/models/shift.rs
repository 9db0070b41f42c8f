//! Shift type model.
//!
//! The roster is built from three shift types: day shifts, night shifts
//! and days off. Shift timing is fixed by the roster design and exposed
//! as constants for collaborators that need clock times.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Day shift start time (24-hour clock).
pub const DAY_SHIFT_START: &str = "06:45";
/// Day shift end time (24-hour clock).
pub const DAY_SHIFT_END: &str = "19:00";
/// Night shift start time (24-hour clock).
pub const NIGHT_SHIFT_START: &str = "18:45";
/// Night shift end time (24-hour clock, next day).
pub const NIGHT_SHIFT_END: &str = "07:00";

/// The type of shift rostered on a given day.
///
/// # Examples
///
/// ```
/// use roster_engine::models::ShiftType;
///
/// assert_eq!(ShiftType::Day.code(), 'D');
/// assert!(ShiftType::Night.is_working());
/// assert!(!ShiftType::Off.is_working());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    /// A day shift (06:45 to 19:00).
    Day,
    /// A night shift (18:45 to 07:00 the following day).
    Night,
    /// A rostered day off.
    Off,
}

impl ShiftType {
    /// Returns the single-character code used in compact schedule strings.
    pub fn code(&self) -> char {
        match self {
            ShiftType::Day => 'D',
            ShiftType::Night => 'N',
            ShiftType::Off => 'O',
        }
    }

    /// Returns true for day and night shifts, false for days off.
    pub fn is_working(&self) -> bool {
        !matches!(self, ShiftType::Off)
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShiftType::Day => "Day",
            ShiftType::Night => "Night",
            ShiftType::Off => "Off",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_codes() {
        assert_eq!(ShiftType::Day.code(), 'D');
        assert_eq!(ShiftType::Night.code(), 'N');
        assert_eq!(ShiftType::Off.code(), 'O');
    }

    #[test]
    fn test_working_flags() {
        assert!(ShiftType::Day.is_working());
        assert!(ShiftType::Night.is_working());
        assert!(!ShiftType::Off.is_working());
    }

    #[test]
    fn test_display_full_words() {
        assert_eq!(ShiftType::Day.to_string(), "Day");
        assert_eq!(ShiftType::Night.to_string(), "Night");
        assert_eq!(ShiftType::Off.to_string(), "Off");
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(serde_json::to_string(&ShiftType::Day).unwrap(), "\"day\"");
        assert_eq!(
            serde_json::to_string(&ShiftType::Night).unwrap(),
            "\"night\""
        );
        assert_eq!(serde_json::to_string(&ShiftType::Off).unwrap(), "\"off\"");

        let parsed: ShiftType = serde_json::from_str("\"night\"").unwrap();
        assert_eq!(parsed, ShiftType::Night);
    }
}
