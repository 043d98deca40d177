// Model exports
pub mod domain;

pub use domain::{
    Assignment, AssignmentOrigin, Day, Host, HostCapacity, MatchRound, OpportunityType,
    PinnedAssignment, RunResult, Student, TermSnapshot,
};
