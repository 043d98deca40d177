use std::collections::HashSet;

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::MatchConfig;
use crate::core::{popularity::is_popular, solver::Solver};
use crate::error::MatchError;
use crate::ledger::ResultLedger;
use crate::models::{Host, MatchRound, PinnedAssignment, RunResult, Student};

/// Where a term's matching process currently stands
///
/// Transitions are one-directional. A completed round may be re-run to produce a
/// fresh RunResult, but only promotion makes any result authoritative, so history
/// is never overwritten in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    NotStarted,
    Round1Complete,
    Round2Complete,
    Closed,
}

/// Sequences the priority round and the general round over one term snapshot
///
/// Round 1 restricts candidates to popular hosts and carries the manual pins;
/// round 2 reruns the solver for everyone still unmatched against all hosts with
/// open capacity. Results only reach the ledger through an explicit `promote`.
pub struct Orchestrator {
    term: String,
    students: Vec<Student>,
    hosts: Vec<Host>,
    solver: Solver,
    state: RoundState,
    round1: Option<RunResult>,
    round2: Option<RunResult>,
    promoted: HashSet<Uuid>,
}

impl Orchestrator {
    pub fn new(
        term: impl Into<String>,
        students: Vec<Student>,
        hosts: Vec<Host>,
        config: MatchConfig,
    ) -> Self {
        Self {
            term: term.into(),
            students,
            hosts,
            solver: Solver::new(config),
            state: RoundState::NotStarted,
            round1: None,
            round2: None,
            promoted: HashSet::new(),
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn round1_result(&self) -> Option<&RunResult> {
        self.round1.as_ref()
    }

    pub fn round2_result(&self) -> Option<&RunResult> {
        self.round2.as_ref()
    }

    pub fn is_promoted(&self, run_id: Uuid) -> bool {
        self.promoted.contains(&run_id)
    }

    /// Run the priority round: popular hosts only, manual pins honored first
    ///
    /// Hosts referenced by a pin join the candidate set even when not popular, so a
    /// manual placement is never rejected for targeting a quiet host.
    pub fn run_round1(&mut self, pins: &[PinnedAssignment]) -> Result<RunResult, MatchError> {
        match self.state {
            RoundState::NotStarted | RoundState::Round1Complete => {}
            other => {
                return Err(MatchError::InvalidTransition(format!(
                    "round 1 cannot run from state {:?}",
                    other
                )))
            }
        }

        let pinned_hosts: HashSet<&str> = pins.iter().map(|p| p.host_id.as_str()).collect();
        let round1_hosts: Vec<Host> = self
            .hosts
            .iter()
            .filter_map(|h| {
                if is_popular(h, &self.students, self.solver.config()) {
                    return Some(h.clone());
                }
                if !pinned_hosts.contains(h.host_id.as_str()) {
                    return None;
                }
                // A pinned host that is not popular joins only for its pins: capacity
                // capped at the pin count keeps it out of the greedy phase
                let pin_count = pins.iter().filter(|p| p.host_id == h.host_id).count() as i32;
                let mut host = h.clone();
                host.capacity = h.capacity.min(pin_count);
                Some(host)
            })
            .collect();

        info!(
            term = %self.term,
            popular_hosts = round1_hosts.len(),
            pins = pins.len(),
            "running round 1"
        );

        let result = self.solver.solve(
            &self.term,
            MatchRound::Round1,
            &self.students,
            &round1_hosts,
            pins,
        )?;

        self.round1 = Some(result.clone());
        self.state = RoundState::Round1Complete;
        Ok(result)
    }

    /// Run the general round over everyone round 1 left unmatched
    pub fn run_round2(&mut self) -> Result<RunResult, MatchError> {
        let unmatched = match &self.round1 {
            Some(round1) => round1.unmatched_student_ids.clone(),
            None => {
                return Err(MatchError::InvalidTransition(
                    "round 2 requires a completed round 1".to_string(),
                ))
            }
        };
        self.run_round2_for(&unmatched)
    }

    /// Run the general round for an explicit re-opt-in list instead of the
    /// unmatched set carried over from round 1
    pub fn run_round2_with(&mut self, student_ids: &[String]) -> Result<RunResult, MatchError> {
        for id in student_ids {
            if !self.students.iter().any(|s| &s.student_id == id) {
                return Err(MatchError::UnknownStudent(id.clone()));
            }
        }
        self.run_round2_for(student_ids)
    }

    fn run_round2_for(&mut self, student_ids: &[String]) -> Result<RunResult, MatchError> {
        match self.state {
            RoundState::Round1Complete | RoundState::Round2Complete => {}
            other => {
                return Err(MatchError::InvalidTransition(format!(
                    "round 2 cannot run from state {:?}",
                    other
                )))
            }
        }

        let round1 = self
            .round1
            .as_ref()
            .ok_or_else(|| {
                MatchError::InvalidTransition("round 2 requires a completed round 1".to_string())
            })?
            .clone();

        let students: Vec<Student> = self
            .students
            .iter()
            .filter(|s| {
                if !student_ids.contains(&s.student_id) {
                    return false;
                }
                let already = round1
                    .assignments
                    .iter()
                    .any(|a| a.student_id == s.student_id);
                if already {
                    warn!(
                        student_id = %s.student_id,
                        "student already assigned in round 1, dropping from round 2 pool"
                    );
                }
                !already
            })
            .cloned()
            .collect();

        // Full host pool with round 1 usage subtracted; hosts round 1 never touched
        // come through at full capacity
        let hosts: Vec<Host> = self
            .hosts
            .iter()
            .filter_map(|h| {
                let used = round1.assigned_to(&h.host_id) as i32;
                let remaining = h.capacity - used;
                (remaining > 0).then(|| {
                    let mut host = h.clone();
                    host.capacity = remaining;
                    host
                })
            })
            .collect();

        info!(
            term = %self.term,
            students = students.len(),
            hosts = hosts.len(),
            "running round 2"
        );

        let result = self
            .solver
            .solve(&self.term, MatchRound::Round2, &students, &hosts, &[])?;

        self.round2 = Some(result.clone());
        self.state = RoundState::Round2Complete;
        Ok(result)
    }

    /// Write a run's assignments through the ledger
    ///
    /// Idempotent: the ledger skips assignment ids it has already recorded, so
    /// promoting the same RunResult twice leaves the ledger unchanged. Conflicts
    /// (a pinned student already placed, a host filled by an earlier promotion)
    /// surface to the caller rather than being dropped.
    pub fn promote(
        &mut self,
        run: &RunResult,
        ledger: &mut dyn ResultLedger,
    ) -> Result<(), MatchError> {
        for assignment in &run.assignments {
            ledger.record(assignment)?;
        }
        self.promoted.insert(run.id);

        info!(
            term = %self.term,
            run_id = %run.id,
            assignments = run.assignments.len(),
            "run promoted"
        );
        Ok(())
    }

    /// Discard an unpromoted round result; no persisted side effect
    pub fn abandon(&mut self, round: MatchRound) -> Result<(), MatchError> {
        let slot = match round {
            MatchRound::Round1 => &mut self.round1,
            MatchRound::Round2 => &mut self.round2,
        };

        let result = slot.as_ref().ok_or_else(|| {
            MatchError::InvalidTransition(format!("no {:?} result to abandon", round))
        })?;
        if self.promoted.contains(&result.id) {
            return Err(MatchError::InvalidTransition(format!(
                "{:?} result was already promoted",
                round
            )));
        }

        *slot = None;
        self.state = match round {
            MatchRound::Round1 => RoundState::NotStarted,
            MatchRound::Round2 => RoundState::Round1Complete,
        };
        Ok(())
    }

    /// Terminal transition once both rounds are settled
    pub fn close(&mut self) -> Result<(), MatchError> {
        if self.state != RoundState::Round2Complete {
            return Err(MatchError::InvalidTransition(format!(
                "cannot close from state {:?}",
                self.state
            )));
        }
        self.state = RoundState::Closed;
        Ok(())
    }
}
