//! VIGIL Simulated-Browser Assessment Runtime: Demo CLI
//!
//! Runs one or all of the four assessment scenarios, or writes a finished
//! assessment profile to disk and inspects it.  Each scenario uses real
//! VIGIL components (session state machine, chained audit log, schema
//! validator, frame heuristic) inside a simulated browser.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- timed-expiry
//!   cargo run -p demo -- export ./profile
//!   cargo run -p demo -- inspect ./profile

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vigil_audit::ChainedAuditRecorder;
use vigil_contracts::{
    answer::answered_count,
    assessment::Screen,
    config::AssessmentConfig,
    error::VigilResult,
    report::format_duration,
};
use vigil_core::{
    clock::SystemClock,
    store::AssessmentStore,
    traits::{AuditRecorder, KeyValueStore},
};
use vigil_ref_browser::{
    browser::SimulatedBrowser,
    platform::ScriptedCamera,
    scenarios::{camera_recovery, manual_submit, resume_after_reload, timed_expiry},
};
use vigil_store::FileStore;

// ── CLI definition ────────────────────────────────────────────────────────────

/// VIGIL proctored assessment runtime demo.
///
/// Each subcommand runs one or all of the four simulated-browser scenarios,
/// or exports and inspects a persisted assessment profile.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "VIGIL proctored assessment runtime demo",
    long_about = "Runs VIGIL assessment scenarios showing the screen flow, timer expiry,\n\
                  reload recovery, camera and fullscreen monitoring, and audit chain integrity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four scenarios in sequence.
    RunAll,
    /// Scenario 1: Timed Expiry (camera refused, auto-submit at 30:00).
    TimedExpiry,
    /// Scenario 2: Resume After Reload (answers and time survive a reload).
    ResumeAfterReload,
    /// Scenario 3: Camera Recovery (de-duplicated denials, grant, frame checks).
    CameraRecovery,
    /// Scenario 4: Manual Submit (vendor fullscreen, two-phase submit, reset).
    ManualSubmit,
    /// Run Scenario 1 and write the finished profile to DIR, one JSON file per key.
    Export {
        dir: PathBuf,
    },
    /// Print the screen, answers, audit summary and chain integrity stored in DIR.
    Inspect {
        dir: PathBuf,
        /// Settings file; only the storage namespace is used.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::TimedExpiry => timed_expiry::run_scenario(),
        Command::ResumeAfterReload => resume_after_reload::run_scenario(),
        Command::CameraRecovery => camera_recovery::run_scenario(),
        Command::ManualSubmit => manual_submit::run_scenario(),
        Command::Export { dir } => export(dir),
        Command::Inspect { dir, config } => inspect(dir, config),
    };

    match result {
        Ok(()) => {
            println!("All selected commands completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> VigilResult<()> {
    timed_expiry::run_scenario()?;
    resume_after_reload::run_scenario()?;
    camera_recovery::run_scenario()?;
    manual_submit::run_scenario()?;
    Ok(())
}

// ── Export / inspect ──────────────────────────────────────────────────────────

fn export(dir: PathBuf) -> VigilResult<()> {
    println!("=== Export: Scenario 1 profile → {} ===", dir.display());
    println!();

    let browser = SimulatedBrowser::new(ScriptedCamera::denying())?;
    drop(timed_expiry::play(&browser)?);

    let target = FileStore::open(dir)?;
    let mut written = 0;
    for key in browser.storage.keys() {
        if let Some(value) = browser.storage.get(&key)? {
            target.set(&key, value)?;
            written += 1;
        }
    }
    info!(keys = written, dir = %target.dir().display(), "profile exported");
    println!("  Keys written:           {}", written);
    println!();
    Ok(())
}

fn inspect(dir: PathBuf, config: Option<PathBuf>) -> VigilResult<()> {
    let config = match config {
        Some(path) => vigil_config::settings::from_file(&path)?,
        None => AssessmentConfig::default(),
    };
    let keys = config.storage.keys();
    let backend = Arc::new(FileStore::open(dir.clone())?);
    let store = AssessmentStore::new(backend.clone(), keys.clone());
    let audit = ChainedAuditRecorder::new(backend, keys.audit.clone(), Arc::new(SystemClock));
    let questions = vigil_config::bank::builtin()?;

    println!("=== Inspect: {} (namespace '{}') ===", dir.display(), config.storage.namespace);
    println!();

    let candidate = store.candidate();
    let state = store.state();
    println!("  Screen:                 {}", Screen::resolve(candidate.is_some(), &state));
    match &candidate {
        Some(c) => println!("  Candidate:              {} <{}>", c.full_name, c.email),
        None => println!("  Candidate:              (not registered)"),
    }
    if let Some(start) = state.start_time {
        println!("  Started:                {}", start);
    }
    if let Some(end) = state.submitted_at {
        println!("  Submitted:              {}", end);
    }
    if let (Some(start), Some(end)) = (state.start_time, state.submitted_at) {
        println!("  Time taken:             {}", format_duration((end - start).num_seconds()));
    }

    let answers = store.answers();
    println!("  Answered:               {}/{}", answered_count(&answers), questions.len());
    for (id, entry) in &answers {
        println!("    Q{:<2} {}", id, entry.answer);
    }

    let summary = audit.summarize();
    println!("  Tab switches:           {}", summary.tab_switches);
    println!(
        "  Camera denied:          {} ({} denial event(s), status {:?})",
        summary.camera_denied,
        summary.camera_denial_count,
        audit.camera_status()
    );
    println!("  Suspicious snapshots:   {}", summary.suspicious_snapshots);
    println!(
        "  Fullscreen exits:       {} ({} refusal(s))",
        summary.fullscreen_exits, summary.fullscreen_denials
    );
    if let Some(admission) = store.llm_admission() {
        println!("  LLM reported:           {}", admission.llm);
    }

    let log = audit.export_log();
    println!(
        "  Audit chain integrity:  {} ({} event(s))",
        if audit.verify_integrity() { "VERIFIED" } else { "FAILED" },
        log.events.len()
    );
    if !log.terminal_hash.is_empty() {
        println!("  Terminal hash:          {}", log.terminal_hash);
    }
    println!();
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("VIGIL: Proctored Assessment Runtime");
    println!("Simulated Browser Demo");
    println!("====================================");
    println!();
    println!("VIGIL assessment flow per candidate:");
    println!("  [1] Form: registration validated by JSON Schema + named rules");
    println!("  [2] Instructions: camera permission checked, denials de-duplicated");
    println!("  [3] Exam: countdown, debounced autosave, tab/fullscreen/frame monitors");
    println!("  [4] Submission: one flush, every resource released, state frozen");
    println!("  [5] Every proctoring signal appended to a SHA-256 audit chain");
    println!();
}
