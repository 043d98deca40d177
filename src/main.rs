use std::process::ExitCode;

use serde_json::json;
use tracing::{error, info};

use shadow_match::{InMemoryLedger, Orchestrator, ResultLedger, Settings, TermSnapshot};

/// Run a full two-round match over a term snapshot file and print the results
///
/// Usage: shadow-match <snapshot.json>
fn main() -> ExitCode {
    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("usage: shadow-match <snapshot.json>")?;

    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration ({}), using defaults", e);
        Settings {
            matching: Default::default(),
            logging: Default::default(),
        }
    });

    let raw = std::fs::read_to_string(&path)?;
    let snapshot: TermSnapshot = serde_json::from_str(&raw)?;

    let term = snapshot
        .hosts
        .first()
        .map(|h| h.term.clone())
        .or_else(|| snapshot.students.first().map(|s| s.term.clone()))
        .ok_or("snapshot contains no students or hosts")?;

    info!(
        term = %term,
        students = snapshot.students.len(),
        hosts = snapshot.hosts.len(),
        pins = snapshot.pins.len(),
        "loaded term snapshot"
    );

    let mut ledger = InMemoryLedger::new();
    ledger.register_hosts(&snapshot.hosts);

    let mut orchestrator = Orchestrator::new(
        term.clone(),
        snapshot.students.clone(),
        snapshot.hosts.clone(),
        settings.matching,
    );

    let round1 = orchestrator.run_round1(&snapshot.pins)?;
    orchestrator.promote(&round1, &mut ledger)?;

    let round2 = orchestrator.run_round2()?;
    orchestrator.promote(&round2, &mut ledger)?;

    let output = json!({
        "term": term,
        "round1": round1,
        "round2": round2,
        "assignments": ledger.list_by_term(&term),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
