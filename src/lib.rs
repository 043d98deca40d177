//! Shadow Match - student-host matching engine for the internship shadowing program
//!
//! This library implements the two-round, capacity-constrained matching process:
//! a compatibility filter for hard constraints, a weighted scoring function, a
//! deterministic greedy allocation solver, the round orchestrator that sequences
//! the priority and general rounds, and an append-only result ledger.

pub mod config;
pub mod core;
pub mod error;
pub mod ledger;
pub mod models;

// Re-export commonly used types
pub use crate::config::{MatchConfig, ScoringWeights, Settings};
pub use crate::core::{is_legal, match_score, Orchestrator, RoundState, Solver};
pub use error::{ErrorKind, MatchError};
pub use ledger::{InMemoryLedger, LedgerEntry, ResultLedger, UnmatchedView};
pub use models::{
    Assignment, AssignmentOrigin, Host, HostCapacity, MatchRound, PinnedAssignment, RunResult,
    Student, TermSnapshot,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let solver = Solver::with_default_config();
        assert!((solver.config().weights.sum() - 1.0).abs() < 1e-9);
    }
}
