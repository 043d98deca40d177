use thiserror::Error;

/// Broad error class callers branch on: retry on conflicts, fix input on validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or inconsistent input; the operation never started
    Validation,
    /// A ledger write lost a concurrency race; retry against fresh state
    Conflict,
}

/// Errors raised by the matching engine and result ledger
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("pinned assignment references unknown student '{0}'")]
    UnknownStudent(String),

    #[error("pinned assignment references unknown host '{0}'")]
    UnknownHost(String),

    #[error("student '{0}' appears in more than one pinned assignment")]
    DuplicatePin(String),

    #[error("host '{host_id}' has negative capacity {capacity}")]
    NegativeCapacity { host_id: String, capacity: i32 },

    #[error("unknown assignment id '{0}'")]
    UnknownAssignment(uuid::Uuid),

    #[error("invalid round transition: {0}")]
    InvalidTransition(String),

    #[error("student '{0}' already has an active assignment this term")]
    StudentAlreadyAssigned(String),

    #[error("host '{0}' is at capacity")]
    HostAtCapacity(String),
}

impl MatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::UnknownStudent(_)
            | MatchError::UnknownHost(_)
            | MatchError::DuplicatePin(_)
            | MatchError::NegativeCapacity { .. }
            | MatchError::UnknownAssignment(_)
            | MatchError::InvalidTransition(_) => ErrorKind::Validation,
            MatchError::StudentAlreadyAssigned(_) | MatchError::HostAtCapacity(_) => {
                ErrorKind::Conflict
            }
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}
