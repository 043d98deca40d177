use crate::config::MatchConfig;
use crate::models::{Host, Student};

/// Count students who rank `host_id` within their top `rank_window` preferences
///
/// This is the derived popularity score for hosts without an explicit flag.
#[inline]
pub fn application_count(host_id: &str, students: &[Student], rank_window: usize) -> usize {
    students
        .iter()
        .filter(|student| {
            student
                .ranked_hosts
                .iter()
                .take(rank_window)
                .any(|h| h == host_id)
        })
        .count()
}

/// Whether a host participates in the priority round
///
/// An explicit `popular` flag always wins; otherwise the host qualifies when enough
/// students rank it near the top of their lists.
pub fn is_popular(host: &Host, students: &[Student], config: &MatchConfig) -> bool {
    if host.popular {
        return true;
    }

    application_count(&host.host_id, students, config.popularity_rank_window)
        >= config.popular_min_applications
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OpportunityType;

    fn create_student(id: &str, ranked: Vec<&str>) -> Student {
        Student {
            student_id: id.to_string(),
            name: String::new(),
            ranked_hosts: ranked.into_iter().map(String::from).collect(),
            is_citizen: true,
            accepts_background_check: true,
            needs_transportation: false,
            available_days: vec![],
            availability_flexible: true,
            gpa: 3.0,
            skills: vec![],
            career_goals: vec![],
            experience_tags: vec![],
            term: "2026-spring".to_string(),
        }
    }

    fn create_host(id: &str, popular: bool) -> Host {
        Host {
            host_id: id.to_string(),
            name: String::new(),
            capacity: 1,
            requires_citizenship: false,
            requires_background_check: false,
            available_days: vec![],
            availability_flexible: true,
            metro_accessible: true,
            opportunity_type: OpportunityType::InPerson,
            field_tags: vec![],
            popular,
            term: "2026-spring".to_string(),
        }
    }

    #[test]
    fn test_application_count_respects_window() {
        let students = vec![
            create_student("s1", vec!["h1", "h2"]),
            create_student("s2", vec!["h2", "h3", "h1"]),
            create_student("s3", vec!["h3", "h4", "h5", "h1"]),
        ];

        // s3 ranks h1 fourth, outside a window of 3
        assert_eq!(application_count("h1", &students, 3), 2);
        assert_eq!(application_count("h1", &students, 4), 3);
        assert_eq!(application_count("h9", &students, 3), 0);
    }

    #[test]
    fn test_explicit_flag_wins() {
        let host = create_host("h1", true);
        let config = MatchConfig::default();

        assert!(is_popular(&host, &[], &config));
    }

    #[test]
    fn test_derived_popularity_threshold() {
        let host = create_host("h1", false);
        let mut config = MatchConfig::default();
        config.popular_min_applications = 2;

        let one_applicant = vec![create_student("s1", vec!["h1"])];
        assert!(!is_popular(&host, &one_applicant, &config));

        let two_applicants = vec![
            create_student("s1", vec!["h1"]),
            create_student("s2", vec!["h1"]),
        ];
        assert!(is_popular(&host, &two_applicants, &config));
    }
}
