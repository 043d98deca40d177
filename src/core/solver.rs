use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::MatchConfig;
use crate::core::{filters::is_legal, scoring::match_score};
use crate::error::MatchError;
use crate::models::{
    Assignment, AssignmentOrigin, Host, HostCapacity, MatchRound, PinnedAssignment, RunResult,
    Student,
};

/// A scored legal pairing considered during the greedy pass
#[derive(Debug)]
struct CandidatePair<'a> {
    student: &'a Student,
    host: &'a Host,
    score: f64,
    /// Student's preference rank for this host; unranked hosts sort last
    pref_rank: usize,
}

/// Single-round allocation solver
///
/// Greedy maximum-weight matching under host capacities: pinned assignments are
/// honored first, then legal candidate pairs are committed in strict descending
/// score order with deterministic tie-breaks. Not globally optimal in the general
/// case, but deterministic and auditable, which is the binding constraint here.
#[derive(Debug, Clone)]
pub struct Solver {
    config: MatchConfig,
}

impl Solver {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self {
            config: MatchConfig::default(),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Solve one round over the supplied snapshots
    ///
    /// # Arguments
    /// * `term` - Program term the snapshots belong to
    /// * `round` - Which round's origin to stamp on produced assignments
    /// * `students` - Read-only student snapshots still in play this round
    /// * `hosts` - Read-only host snapshots still in play this round
    /// * `pins` - Admin-directed assignments committed before the greedy pass
    ///
    /// # Errors
    /// `ValidationError`-kind errors when a pin references an unknown id, a student
    /// is pinned twice, or a host carries negative capacity. Unmatched students and
    /// leftover capacity are normal output, never errors.
    pub fn solve(
        &self,
        term: &str,
        round: MatchRound,
        students: &[Student],
        hosts: &[Host],
        pins: &[PinnedAssignment],
    ) -> Result<RunResult, MatchError> {
        for host in hosts {
            if host.capacity < 0 {
                return Err(MatchError::NegativeCapacity {
                    host_id: host.host_id.clone(),
                    capacity: host.capacity,
                });
            }
        }

        let student_by_id: HashMap<&str, &Student> =
            students.iter().map(|s| (s.student_id.as_str(), s)).collect();
        let host_by_id: HashMap<&str, &Host> =
            hosts.iter().map(|h| (h.host_id.as_str(), h)).collect();

        let mut remaining: HashMap<&str, i32> =
            hosts.iter().map(|h| (h.host_id.as_str(), h.capacity)).collect();
        let mut matched: HashSet<&str> = HashSet::new();
        let mut assignments = Vec::new();

        // Manual pins win unconditionally: never re-validated against the filter,
        // only flagged for audit when they would have failed it
        for pin in pins {
            let student = student_by_id
                .get(pin.student_id.as_str())
                .copied()
                .ok_or_else(|| MatchError::UnknownStudent(pin.student_id.clone()))?;
            let host = host_by_id
                .get(pin.host_id.as_str())
                .copied()
                .ok_or_else(|| MatchError::UnknownHost(pin.host_id.clone()))?;

            if !matched.insert(student.student_id.as_str()) {
                return Err(MatchError::DuplicatePin(pin.student_id.clone()));
            }

            let legal = is_legal(student, host);
            if !legal {
                debug!(
                    student_id = %student.student_id,
                    host_id = %host.host_id,
                    "pinned assignment violates a hard constraint, keeping it flagged"
                );
            }

            *remaining.entry(host.host_id.as_str()).or_insert(0) -= 1;

            assignments.push(Assignment {
                id: Uuid::new_v4(),
                student_id: student.student_id.clone(),
                host_id: host.host_id.clone(),
                term: term.to_string(),
                origin: AssignmentOrigin::Manual,
                score: match_score(student, host, &self.config),
                constraint_violation: !legal,
                created_at: Utc::now(),
            });
        }

        // Enumerate legal candidate pairs for everyone still unmatched; hosts whose
        // capacity was consumed by pins drop out here
        let mut candidates: Vec<CandidatePair> = Vec::new();
        for student in students {
            if matched.contains(student.student_id.as_str()) {
                continue;
            }
            for host in hosts {
                if remaining.get(host.host_id.as_str()).copied().unwrap_or(0) <= 0 {
                    continue;
                }
                if !is_legal(student, host) {
                    continue;
                }
                candidates.push(CandidatePair {
                    student,
                    host,
                    score: match_score(student, host, &self.config),
                    pref_rank: student
                        .preference_rank(&host.host_id)
                        .unwrap_or(usize::MAX),
                });
            }
        }

        // Score descending, then the student's own preference rank ascending (students
        // competing for a host they most want win ties), then ids for full determinism
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.pref_rank.cmp(&b.pref_rank))
                .then_with(|| a.student.student_id.cmp(&b.student.student_id))
                .then_with(|| a.host.host_id.cmp(&b.host.host_id))
        });

        // Single greedy pass
        for pair in &candidates {
            let student_id = pair.student.student_id.as_str();
            let host_id = pair.host.host_id.as_str();

            if matched.contains(student_id) {
                continue;
            }
            let capacity = match remaining.get_mut(host_id) {
                Some(c) if *c > 0 => c,
                _ => continue,
            };

            *capacity -= 1;
            matched.insert(student_id);

            assignments.push(Assignment {
                id: Uuid::new_v4(),
                student_id: student_id.to_string(),
                host_id: host_id.to_string(),
                term: term.to_string(),
                origin: round.origin(),
                score: pair.score,
                constraint_violation: false,
                created_at: Utc::now(),
            });
        }

        let mut unmatched_student_ids: Vec<String> = students
            .iter()
            .filter(|s| !matched.contains(s.student_id.as_str()))
            .map(|s| s.student_id.clone())
            .collect();
        unmatched_student_ids.sort();

        let mut unmatched_host_capacity: Vec<HostCapacity> = hosts
            .iter()
            .filter_map(|h| {
                let left = remaining.get(h.host_id.as_str()).copied().unwrap_or(0);
                (left > 0).then(|| HostCapacity {
                    host_id: h.host_id.clone(),
                    remaining: left,
                })
            })
            .collect();
        unmatched_host_capacity.sort_by(|a, b| a.host_id.cmp(&b.host_id));

        info!(
            term,
            round = ?round,
            assignments = assignments.len(),
            unmatched_students = unmatched_student_ids.len(),
            "solver pass complete"
        );

        Ok(RunResult {
            id: Uuid::new_v4(),
            term: term.to_string(),
            round,
            input_snapshot_hash: snapshot_hash(students, hosts, pins),
            assignments,
            unmatched_student_ids,
            unmatched_host_capacity,
            created_at: Utc::now(),
        })
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::with_default_config()
    }
}

/// FNV-1a 64 over the canonical JSON of the round's inputs
///
/// Stable across processes and Rust versions, unlike the std hasher; used to tie a
/// RunResult back to the exact snapshot it was computed from.
pub fn snapshot_hash(students: &[Student], hosts: &[Host], pins: &[PinnedAssignment]) -> String {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let bytes = serde_json::to_vec(&(students, hosts, pins)).unwrap_or_default();
    let mut hash = FNV_OFFSET;
    for byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    format!("{:016x}", hash)
}
