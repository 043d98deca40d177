// Core algorithm exports
pub mod filters;
pub mod orchestrator;
pub mod popularity;
pub mod scoring;
pub mod solver;

pub use filters::{availability_compatible, is_legal};
pub use orchestrator::{Orchestrator, RoundState};
pub use popularity::{application_count, is_popular};
pub use scoring::{match_score, match_score_with_weights};
pub use solver::{snapshot_hash, Solver};
