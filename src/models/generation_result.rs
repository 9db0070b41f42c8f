//! Generation result model.
//!
//! A generation pass returns a GenerationResult: the final assignments plus
//! an ordered log of every decision taken, so a manager can audit why each
//! staff member landed where they did.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Why an assignment decision was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentReason {
    /// Won a contested line on priority score.
    ConflictWinner,
    /// Conflict loser placed on a suggested alternative line.
    ConflictAlternative,
    /// Conflict loser kept on their previous line.
    ConflictKeptCurrent,
    /// Conflict loser force-placed on the least-covered open line.
    ConflictFallback,
    /// Uncontested line request granted.
    DirectRequest,
    /// Line request refused because the move would worsen coverage.
    DirectRequestDenied,
    /// Current line already fits the requested dates off.
    CurrentLineFitsDates,
    /// Placed on the line that best fits the requested dates off.
    BestDateFit,
    /// No request; kept on the current line.
    KeptCurrentLine,
    /// No current line; placed on the most coverage-deficient line.
    AutoAssigned,
    /// Intern placed by the rotation assignor.
    InternRotation,
    /// Intern left unplaced; every line was claimed.
    InternUnplaced,
    /// Moved by the coverage repair loop.
    CoverageRepair,
    /// Summary entry for residual coverage problems.
    CoverageSummary,
}

/// One entry in the generation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationLogEntry {
    /// The line involved, when the entry concerns one.
    pub line: Option<u8>,
    /// The staff member involved, empty for summary entries.
    pub staff_name: String,
    /// The decision category.
    pub reason: AssignmentReason,
    /// Human-readable detail.
    pub message: String,
}

impl fmt::Display for GenerationLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "[line {}] {}: {}", line, self.staff_name, self.message),
            None if self.staff_name.is_empty() => write!(f, "{}", self.message),
            None => write!(f, "{}: {}", self.staff_name, self.message),
        }
    }
}

/// The complete result of a generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Unique identifier for this pass.
    pub generation_id: Uuid,
    /// When the pass ran.
    pub timestamp: DateTime<Utc>,
    /// Label of the roster period generated.
    pub period_label: String,
    /// Final staff-name to line-number assignments.
    pub assignments: BTreeMap<String, u8>,
    /// Ordered decision log.
    pub log: Vec<GenerationLogEntry>,
    /// Requests refused on coverage grounds.
    pub coverage_denials: u32,
    /// Shift-cells still below minimum after repair.
    pub residual_shortfalls: u32,
}
