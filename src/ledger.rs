use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::MatchError;
use crate::models::{Assignment, Host, HostCapacity};

/// One recorded assignment with its audit trail
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub assignment: Assignment,
    pub recorded_at: DateTime<Utc>,
    pub retracted_at: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    pub fn is_active(&self) -> bool {
        self.retracted_at.is_none()
    }
}

/// Unmatched entities derived from the ledger's current active assignments
#[derive(Debug, Clone)]
pub struct UnmatchedView {
    pub student_ids: Vec<String>,
    pub host_capacity: Vec<HostCapacity>,
}

/// Append-only log of promoted assignments for a term
///
/// The persistence collaborator implements this against its own store; the engine
/// never retries a lost race itself. `record` recomputes host capacity from the
/// current non-retracted assignments on every call, so two concurrent writers
/// cannot both over-fill a host as long as the implementation serializes writes
/// (the in-memory version relies on `&mut self`; a database-backed one would use
/// optimistic concurrency on the version field).
pub trait ResultLedger {
    /// Append one assignment
    ///
    /// Idempotent per assignment id: re-recording an id already present is a no-op.
    /// Fails with a conflict when the student already holds an active assignment
    /// this term or the host is at capacity.
    fn record(&mut self, assignment: &Assignment) -> Result<(), MatchError>;

    /// Soft-delete an assignment; takes effect for subsequent operations only
    fn retract(&mut self, assignment_id: Uuid) -> Result<(), MatchError>;

    /// Active (non-retracted) assignments for a term
    fn list_by_term(&self, term: &str) -> Vec<Assignment>;

    /// Students with no active assignment and hosts with open capacity
    fn list_unmatched(&self, term: &str, all_student_ids: &[String]) -> UnmatchedView;

    /// Monotonic sequence bumped on every successful write
    fn version(&self) -> u64;
}

/// Reference ledger backed by a Vec, used by tests and the CLI binary
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: Vec<LedgerEntry>,
    /// (term, host_id) -> declared capacity
    capacities: HashMap<(String, String), i32>,
    version: u64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register host capacities for a term so `record` can enforce them
    pub fn register_hosts(&mut self, hosts: &[Host]) {
        for host in hosts {
            self.capacities
                .insert((host.term.clone(), host.host_id.clone()), host.capacity);
        }
    }

    /// Full history for a term, retracted entries included
    pub fn history(&self, term: &str) -> Vec<&LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.assignment.term == term)
            .collect()
    }

    fn active_count_for_host(&self, term: &str, host_id: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                e.is_active() && e.assignment.term == term && e.assignment.host_id == host_id
            })
            .count()
    }

    fn student_has_active(&self, term: &str, student_id: &str) -> bool {
        self.entries.iter().any(|e| {
            e.is_active() && e.assignment.term == term && e.assignment.student_id == student_id
        })
    }
}

impl ResultLedger for InMemoryLedger {
    fn record(&mut self, assignment: &Assignment) -> Result<(), MatchError> {
        // Idempotency: promoting the same RunResult twice replays the same ids
        if self.entries.iter().any(|e| e.assignment.id == assignment.id) {
            debug!(id = %assignment.id, "assignment already recorded, skipping");
            return Ok(());
        }

        let capacity = self
            .capacities
            .get(&(assignment.term.clone(), assignment.host_id.clone()))
            .copied()
            .ok_or_else(|| MatchError::UnknownHost(assignment.host_id.clone()))?;

        if self.student_has_active(&assignment.term, &assignment.student_id) {
            return Err(MatchError::StudentAlreadyAssigned(
                assignment.student_id.clone(),
            ));
        }

        // Capacity recomputed from live entries, never cached
        if self.active_count_for_host(&assignment.term, &assignment.host_id) >= capacity as usize {
            return Err(MatchError::HostAtCapacity(assignment.host_id.clone()));
        }

        self.entries.push(LedgerEntry {
            assignment: assignment.clone(),
            recorded_at: Utc::now(),
            retracted_at: None,
        });
        self.version += 1;
        Ok(())
    }

    fn retract(&mut self, assignment_id: Uuid) -> Result<(), MatchError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.assignment.id == assignment_id)
            .ok_or(MatchError::UnknownAssignment(assignment_id))?;

        if entry.retracted_at.is_none() {
            entry.retracted_at = Some(Utc::now());
            self.version += 1;
        }
        Ok(())
    }

    fn list_by_term(&self, term: &str) -> Vec<Assignment> {
        self.entries
            .iter()
            .filter(|e| e.is_active() && e.assignment.term == term)
            .map(|e| e.assignment.clone())
            .collect()
    }

    fn list_unmatched(&self, term: &str, all_student_ids: &[String]) -> UnmatchedView {
        let active = self.list_by_term(term);

        let mut student_ids: Vec<String> = all_student_ids
            .iter()
            .filter(|id| !active.iter().any(|a| &a.student_id == *id))
            .cloned()
            .collect();
        student_ids.sort();

        let mut host_capacity: Vec<HostCapacity> = self
            .capacities
            .iter()
            .filter(|((entry_term, _), _)| entry_term == term)
            .filter_map(|((_, host_id), capacity)| {
                let used = active.iter().filter(|a| &a.host_id == host_id).count() as i32;
                let remaining = capacity - used;
                (remaining > 0).then(|| HostCapacity {
                    host_id: host_id.clone(),
                    remaining,
                })
            })
            .collect();
        host_capacity.sort_by(|a, b| a.host_id.cmp(&b.host_id));

        UnmatchedView {
            student_ids,
            host_capacity,
        }
    }

    fn version(&self) -> u64 {
        self.version
    }
}
