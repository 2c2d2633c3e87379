//! Scenario 1: Timed Expiry
//!
//! The candidate registers (after one rejected attempt), refuses the camera,
//! answers only question 1, switches tabs once, and never submits.  The
//! countdown submits on its own at 30:00.
//!
//! The camera is refused three times (instructions check, exam start, exam
//! entry) inside one 60-second window, so exactly one `camera_denied` event
//! is logged.

use chrono::Duration;

use vigil_contracts::{
    assessment::Screen,
    audit::AuditEventKind,
    error::{VigilError, VigilResult},
    report::{format_duration, SubmissionReport},
};
use vigil_core::session::AssessmentSession;

use crate::{
    browser::SimulatedBrowser,
    mock_data::{candidate_form, rejected_form},
    platform::ScriptedCamera,
};

/// Drive the whole scenario and return the session on its final screen.
pub fn play(browser: &SimulatedBrowser) -> VigilResult<AssessmentSession> {
    let mut session = browser.open_tab()?;

    match session.register(&rejected_form()) {
        Err(VigilError::Validation { reason }) => {
            println!("  Registration attempt 1: REJECTED");
            for line in reason.split("; ") {
                println!("    - {}", line);
            }
        }
        Err(e) => return Err(e),
        Ok(_) => println!("  Registration attempt 1: unexpectedly accepted"),
    }

    let record = session.register(&candidate_form())?;
    println!("  Registration attempt 2: ACCEPTED ({})", record.email);

    let check = session.check_camera()?;
    println!("  Camera check:           {:?}", check);

    session.start_exam()?;
    println!(
        "  Exam started:           {} remaining",
        format_duration(session.time_remaining().num_seconds())
    );

    session.answer(1, "B")?;
    browser.advance(&mut session, Duration::milliseconds(500));
    println!("  Question 1 answered:    'B' (saved after debounce)");

    session.on_visibility_change(true);
    browser.advance(&mut session, Duration::seconds(20));
    session.on_visibility_change(false);
    println!("  Tab hidden once:        tab_switch logged");

    let fired = browser.advance(&mut session, Duration::minutes(30));
    println!("  Clock advanced 30:00:   {} timer(s) fired", fired);

    Ok(session)
}

fn print_report(report: &SubmissionReport) {
    println!("  Answered:               {}/{}", report.answered, report.total_questions);
    if let Some(secs) = report.time_taken_secs {
        println!("  Time taken:             {}", format_duration(secs));
    }
    println!("  Tab switches:           {}", report.audit.tab_switches);
    println!(
        "  Camera denied:          {} ({} denial event(s))",
        report.audit.camera_denied, report.audit.camera_denial_count
    );
    println!("  Total events:           {}", report.audit.total_events);
    println!("  Verdict:                {}", report.verdict.message);
}

/// Run Scenario 1: Timed Expiry.
pub fn run_scenario() -> VigilResult<()> {
    println!("=== Scenario 1: Timed Expiry ===");
    println!();

    let browser = SimulatedBrowser::new(ScriptedCamera::denying())?;
    let mut session = play(&browser)?;

    if session.screen() != Screen::Submission {
        println!("  Exam still running on the {} screen", session.screen());
        println!("  RESULT: UNEXPECTED");
        println!();
        return Ok(());
    }

    println!("  Auto-submitted:         YES (screen = {})", session.screen());
    let report = session.submission_report()?;
    print_report(&report);

    session.report_llm_usage("ChatGPT for question 3")?;
    println!(
        "  LLM admission stored:   {} llm_reported event(s)",
        browser.count(AuditEventKind::LlmReported)
    );

    println!(
        "  Audit chain integrity:  {} ({} event(s))",
        if browser.audit().verify_integrity() { "VERIFIED" } else { "FAILED" },
        browser.audit().events().len()
    );
    println!("  RESULT: SUBMITTED ON TIMEOUT (expected)");
    println!();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
