use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Day of the week used for availability overlap checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// How a host offers the shadowing opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityType {
    InPerson,
    Virtual,
    Hybrid,
}

impl Default for OpportunityType {
    fn default() -> Self {
        OpportunityType::InPerson
    }
}

/// Student snapshot for one program term
///
/// Created at application-submission time and supplied to the engine read-only;
/// the engine never mutates a student record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "studentId")]
    pub student_id: String,
    #[serde(default)]
    pub name: String,
    /// Host ids in preference order, most-preferred first; may be empty
    #[serde(rename = "rankedHosts", default)]
    pub ranked_hosts: Vec<String>,
    #[serde(rename = "isCitizen", default)]
    pub is_citizen: bool,
    #[serde(rename = "acceptsBackgroundCheck", default)]
    pub accepts_background_check: bool,
    #[serde(rename = "needsTransportation", default)]
    pub needs_transportation: bool,
    #[serde(rename = "availableDays", default)]
    pub available_days: Vec<Day>,
    /// Student marked availability as flexible/unsure; skips the day-overlap check
    #[serde(rename = "availabilityFlexible", default)]
    pub availability_flexible: bool,
    #[serde(default)]
    pub gpa: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "careerGoals", default)]
    pub career_goals: Vec<String>,
    #[serde(rename = "experienceTags", default)]
    pub experience_tags: Vec<String>,
    pub term: String,
}

impl Student {
    /// Zero-based position of `host_id` in the student's ranked list, if ranked
    pub fn preference_rank(&self, host_id: &str) -> Option<usize> {
        self.ranked_hosts.iter().position(|h| h == host_id)
    }
}

/// Host snapshot for one program term
///
/// `capacity` is the only attribute the engine ever draws down, and only inside a
/// run's own bookkeeping; the snapshot itself stays untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    #[serde(rename = "hostId")]
    pub host_id: String,
    #[serde(default)]
    pub name: String,
    /// Max students this term; validated non-negative before a run starts
    pub capacity: i32,
    #[serde(rename = "requiresCitizenship", default)]
    pub requires_citizenship: bool,
    #[serde(rename = "requiresBackgroundCheck", default)]
    pub requires_background_check: bool,
    #[serde(rename = "availableDays", default)]
    pub available_days: Vec<Day>,
    #[serde(rename = "availabilityFlexible", default)]
    pub availability_flexible: bool,
    #[serde(rename = "metroAccessible", default)]
    pub metro_accessible: bool,
    #[serde(rename = "opportunityType", default)]
    pub opportunity_type: OpportunityType,
    #[serde(rename = "fieldTags", default)]
    pub field_tags: Vec<String>,
    /// Explicit priority flag; popularity can also be derived from application counts
    #[serde(default)]
    pub popular: bool,
    pub term: String,
}

/// Admin-directed assignment honored before any automated matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedAssignment {
    #[serde(rename = "studentId")]
    pub student_id: String,
    #[serde(rename = "hostId")]
    pub host_id: String,
}

/// Where an assignment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentOrigin {
    Manual,
    Round1,
    Round2,
}

/// Matching round identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRound {
    Round1,
    Round2,
}

impl MatchRound {
    pub fn origin(self) -> AssignmentOrigin {
        match self {
            MatchRound::Round1 => AssignmentOrigin::Round1,
            MatchRound::Round2 => AssignmentOrigin::Round2,
        }
    }
}

/// One student placed with one host for a term
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    #[serde(rename = "studentId")]
    pub student_id: String,
    #[serde(rename = "hostId")]
    pub host_id: String,
    pub term: String,
    pub origin: AssignmentOrigin,
    pub score: f64,
    /// Set when a manual pin fails the static compatibility filter; the pin still
    /// stands (manual override wins) but reviewers can see it
    #[serde(rename = "constraintViolation", default)]
    pub constraint_violation: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Remaining capacity at a host after a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCapacity {
    #[serde(rename = "hostId")]
    pub host_id: String,
    pub remaining: i32,
}

/// Immutable output of one solver round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub id: Uuid,
    pub term: String,
    pub round: MatchRound,
    #[serde(rename = "inputSnapshotHash")]
    pub input_snapshot_hash: String,
    pub assignments: Vec<Assignment>,
    #[serde(rename = "unmatchedStudentIds")]
    pub unmatched_student_ids: Vec<String>,
    #[serde(rename = "unmatchedHostCapacity")]
    pub unmatched_host_capacity: Vec<HostCapacity>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl RunResult {
    /// Content equality: same (student, host, origin) set, ignoring ids and timestamps
    pub fn same_assignments(&self, other: &RunResult) -> bool {
        let key = |a: &Assignment| (a.student_id.clone(), a.host_id.clone(), a.origin);
        let mut mine: Vec<_> = self.assignments.iter().map(key).collect();
        let mut theirs: Vec<_> = other.assignments.iter().map(key).collect();
        mine.sort();
        theirs.sort();
        mine == theirs
    }

    /// Number of assignments to `host_id` in this result
    pub fn assigned_to(&self, host_id: &str) -> usize {
        self.assignments.iter().filter(|a| a.host_id == host_id).count()
    }

    /// Sum of remaining capacity across all hosts in this result
    pub fn total_open_capacity(&self) -> i32 {
        self.unmatched_host_capacity.iter().map(|c| c.remaining).sum()
    }
}

/// Everything the engine needs for one term, as loaded from the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermSnapshot {
    pub students: Vec<Student>,
    pub hosts: Vec<Host>,
    #[serde(default)]
    pub pins: Vec<PinnedAssignment>,
}
