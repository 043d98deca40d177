use crate::config::{MatchConfig, ScoringWeights};
use crate::models::{Host, Student};

/// Calculate a compatibility score in [0, 1] for a pair already filtered legal
///
/// Scoring formula:
/// score = (
///     host_preference * w1 +   # rank position in the student's list
///     skills * w2 +            # Jaccard overlap of skills vs. field tags
///     career_goals * w3 +      # any career-goal tag matches a field tag
///     gpa * w4 +               # GPA against a configurable ceiling
///     experience * w5          # prior experience in the host's field
/// ) / (w1 + w2 + w3 + w4 + w5)
///
/// Deterministic: identical inputs always produce the identical score.
pub fn match_score(student: &Student, host: &Host, config: &MatchConfig) -> f64 {
    let weights = &config.weights;
    let weight_sum = weights.sum();
    if weight_sum <= 0.0 {
        return 0.0;
    }

    let preference = host_preference_score(student, &host.host_id);
    let skills = jaccard(&student.skills, &host.field_tags);
    let goals = tag_overlap_score(&student.career_goals, &host.field_tags);
    let gpa = gpa_score(student.gpa, config.gpa_ceiling);
    let experience = tag_overlap_score(&student.experience_tags, &host.field_tags);

    let total = preference * weights.host_preference
        + skills * weights.skills
        + goals * weights.career_goals
        + gpa * weights.gpa
        + experience * weights.experience;

    total / weight_sum
}

/// Rank-position score (0-1)
///
/// Most-preferred host scores 1.0, decreasing linearly down the ranked list;
/// an unranked host scores 0.
#[inline]
pub fn host_preference_score(student: &Student, host_id: &str) -> f64 {
    match student.preference_rank(host_id) {
        Some(rank) => 1.0 - rank as f64 / student.ranked_hosts.len() as f64,
        None => 0.0,
    }
}

/// Jaccard similarity between two tag sets (0-1)
#[inline]
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }

    let shared = a.iter().filter(|tag| b.contains(tag)).count();
    let union = a.len() + b.len() - shared;
    if union == 0 {
        return 0.0;
    }

    shared as f64 / union as f64
}

/// 1.0 when any tag overlaps, else 0.0
#[inline]
fn tag_overlap_score(tags: &[String], field_tags: &[String]) -> f64 {
    if tags.iter().any(|tag| field_tags.contains(tag)) {
        1.0
    } else {
        0.0
    }
}

/// GPA normalized against the configured ceiling, clamped to 0-1
#[inline]
fn gpa_score(gpa: f64, ceiling: f64) -> f64 {
    if ceiling <= 0.0 {
        return 0.0;
    }
    (gpa / ceiling).clamp(0.0, 1.0)
}

/// Convenience for callers holding only weights; uses default normalization settings
pub fn match_score_with_weights(student: &Student, host: &Host, weights: ScoringWeights) -> f64 {
    let config = MatchConfig {
        weights,
        ..MatchConfig::default()
    };
    match_score(student, host, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, OpportunityType};

    fn create_student() -> Student {
        Student {
            student_id: "s1".to_string(),
            name: "Student One".to_string(),
            ranked_hosts: vec!["h1".to_string(), "h2".to_string()],
            is_citizen: true,
            accepts_background_check: true,
            needs_transportation: false,
            available_days: vec![Day::Monday],
            availability_flexible: false,
            gpa: 3.2,
            skills: vec!["python".to_string(), "statistics".to_string()],
            career_goals: vec!["data-science".to_string()],
            experience_tags: vec![],
            term: "2026-spring".to_string(),
        }
    }

    fn create_host(id: &str) -> Host {
        Host {
            host_id: id.to_string(),
            name: format!("Host {}", id),
            capacity: 1,
            requires_citizenship: false,
            requires_background_check: false,
            available_days: vec![Day::Monday],
            availability_flexible: false,
            metro_accessible: true,
            opportunity_type: OpportunityType::InPerson,
            field_tags: vec!["data-science".to_string(), "python".to_string()],
            popular: false,
            term: "2026-spring".to_string(),
        }
    }

    #[test]
    fn test_score_in_unit_range() {
        let score = match_score(&create_student(), &create_host("h1"), &MatchConfig::default());
        assert!(score >= 0.0 && score <= 1.0);
    }

    #[test]
    fn test_preference_rank_scaling() {
        let student = create_student();

        // h1 is rank 0 of 2, h2 is rank 1 of 2
        assert_eq!(host_preference_score(&student, "h1"), 1.0);
        assert_eq!(host_preference_score(&student, "h2"), 0.5);
        assert_eq!(host_preference_score(&student, "h9"), 0.0);
    }

    #[test]
    fn test_ranked_host_beats_unranked() {
        let student = create_student();
        let config = MatchConfig::default();

        let ranked = match_score(&student, &create_host("h1"), &config);
        let unranked = match_score(&student, &create_host("h9"), &config);

        assert!(ranked > unranked);
    }

    #[test]
    fn test_jaccard() {
        let a = vec!["python".to_string(), "statistics".to_string()];
        let b = vec!["python".to_string(), "biology".to_string()];

        // 1 shared of 3 distinct
        assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard(&a, &[]), 0.0);
        assert_eq!(jaccard(&[], &[]), 0.0);
    }

    #[test]
    fn test_gpa_clamped_to_ceiling() {
        assert_eq!(gpa_score(4.0, 4.0), 1.0);
        assert_eq!(gpa_score(5.0, 4.0), 1.0);
        assert_eq!(gpa_score(2.0, 4.0), 0.5);
        assert_eq!(gpa_score(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_zero_weight_sum_scores_zero() {
        let weights = ScoringWeights {
            host_preference: 0.0,
            skills: 0.0,
            career_goals: 0.0,
            gpa: 0.0,
            experience: 0.0,
        };

        let score = match_score_with_weights(&create_student(), &create_host("h1"), weights);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_deterministic() {
        let student = create_student();
        let host = create_host("h1");
        let config = MatchConfig::default();

        let first = match_score(&student, &host, &config);
        let second = match_score(&student, &host, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_weights_normalized_by_sum() {
        let student = create_student();
        let host = create_host("h1");

        // Doubling every weight must not change the normalized score
        let base = ScoringWeights::default();
        let doubled = ScoringWeights {
            host_preference: base.host_preference * 2.0,
            skills: base.skills * 2.0,
            career_goals: base.career_goals * 2.0,
            gpa: base.gpa * 2.0,
            experience: base.experience * 2.0,
        };

        let a = match_score_with_weights(&student, &host, base);
        let b = match_score_with_weights(&student, &host, doubled);
        assert!((a - b).abs() < 1e-9);
    }
}
