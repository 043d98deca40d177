// Criterion benchmarks for shadow-match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shadow_match::core::{match_score, Solver};
use shadow_match::models::{Day, Host, MatchRound, OpportunityType, Student};
use shadow_match::MatchConfig;

fn create_student(id: usize) -> Student {
    Student {
        student_id: format!("s{:04}", id),
        name: format!("Student {}", id),
        ranked_hosts: vec![
            format!("h{:03}", id % 20),
            format!("h{:03}", (id + 7) % 20),
            format!("h{:03}", (id + 13) % 20),
        ],
        is_citizen: id % 6 != 0,
        accepts_background_check: true,
        needs_transportation: id % 4 == 0,
        available_days: vec![Day::Monday, Day::Wednesday, Day::Friday],
        availability_flexible: id % 10 == 0,
        gpa: 2.0 + (id % 9) as f64 * 0.25,
        skills: vec!["python".to_string(), "writing".to_string()],
        career_goals: vec!["public-health".to_string()],
        experience_tags: vec![],
        term: "2026-spring".to_string(),
    }
}

fn create_host(id: usize) -> Host {
    Host {
        host_id: format!("h{:03}", id),
        name: format!("Host {}", id),
        capacity: 2 + (id % 4) as i32,
        requires_citizenship: id % 5 == 0,
        requires_background_check: id % 3 == 0,
        available_days: vec![Day::Monday, Day::Friday],
        availability_flexible: false,
        metro_accessible: id % 2 == 0,
        opportunity_type: if id % 7 == 0 {
            OpportunityType::Virtual
        } else {
            OpportunityType::InPerson
        },
        field_tags: vec!["public-health".to_string(), "python".to_string()],
        popular: id < 5,
        term: "2026-spring".to_string(),
    }
}

fn bench_match_score(c: &mut Criterion) {
    let student = create_student(1);
    let host = create_host(1);
    let config = MatchConfig::default();

    c.bench_function("match_score", |b| {
        b.iter(|| match_score(black_box(&student), black_box(&host), black_box(&config)));
    });
}

fn bench_solve(c: &mut Criterion) {
    let solver = Solver::with_default_config();
    let mut group = c.benchmark_group("solve");

    for size in [50usize, 200, 400] {
        let students: Vec<Student> = (0..size).map(create_student).collect();
        let hosts: Vec<Host> = (0..20).map(create_host).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &(students, hosts),
            |b, (students, hosts)| {
                b.iter(|| {
                    solver
                        .solve(
                            black_box("2026-spring"),
                            MatchRound::Round1,
                            black_box(students),
                            black_box(hosts),
                            &[],
                        )
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_match_score, bench_solve);
criterion_main!(benches);
