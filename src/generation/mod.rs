//! Roster generation.
//!
//! The generation pipeline: cyclic shift lines, boundary validation,
//! conflict detection, coverage simulation, intern rotation and the
//! orchestrator that runs a full pass over one roster period.

pub mod boundary;
pub mod conflicts;
pub mod coverage;
pub mod interns;
pub mod lines;
pub mod orchestrator;

pub use boundary::{BoundaryValidator, TransitionCheck};
pub use conflicts::{ConflictDetector, InternPairingViolation, LineConflict};
pub use coverage::{CoverageAnalyzer, CoverageMap, DailyCoverage, MoveEvaluation};
pub use interns::{InternAssigner, InternPlacement};
pub use lines::{ComplianceViolation, LineManager, RosterLine, WindowKind};
pub use orchestrator::RosterGenerator;
