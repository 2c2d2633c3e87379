//! Scenario 4: Manual Submit
//!
//! Sub-case A: only the `moz` fullscreen prefix is available.  The candidate
//! works through six questions with save-and-next, marks one for review,
//! leaves fullscreen once, backs out of the first submit confirmation and
//! confirms the second.  A final reset wipes the profile.
//!
//! Sub-case B: the browser refuses fullscreen.  The refusal is logged and
//! the exam runs windowed.

use chrono::Duration;

use vigil_contracts::{
    assessment::SubmitOutcome,
    audit::AuditEventKind,
    error::VigilResult,
    report::format_duration,
};
use vigil_core::session::AssessmentSession;

use crate::{
    browser::SimulatedBrowser,
    mock_data::{candidate_form, sample_answers, well_lit_frame},
    platform::{ScriptedCamera, Vendor},
};

pub fn moz_only_browser() -> VigilResult<SimulatedBrowser> {
    Ok(SimulatedBrowser::new(ScriptedCamera::granting().with_feed(vec![well_lit_frame()]))?
        .with_vendors(&[Vendor::Moz]))
}

/// Register, start, and answer the sample set with save-and-next, marking
/// question 3 for review.
pub fn work_through(browser: &SimulatedBrowser) -> VigilResult<AssessmentSession> {
    let mut session = browser.open_tab()?;
    session.register(&candidate_form())?;
    session.check_camera()?;
    session.start_exam()?;

    for (id, answer) in sample_answers() {
        session.go_to(id)?;
        session.answer(id, answer)?;
        if id == 3 {
            session.mark_for_review()?;
        }
        session.save_and_next()?;
    }
    browser.advance(&mut session, Duration::minutes(5));
    Ok(session)
}

/// Run Scenario 4: Manual Submit (two sub-cases).
pub fn run_scenario() -> VigilResult<()> {
    println!("=== Scenario 4: Manual Submit ===");
    println!();

    // ── Sub-case A: vendor fallback, exit, two-phase submit, reset ───────────

    {
        println!("  Sub-case A: moz-prefixed fullscreen, confirm on second attempt");

        let browser = moz_only_browser()?;
        let mut session = work_through(&browser)?;
        println!(
            "  Fullscreen variant:     {} (active = {})",
            session.fullscreen().variant().unwrap_or("none"),
            browser.display.is_active()
        );

        browser.display.user_exit();
        session.on_fullscreen_change();
        println!(
            "  Candidate pressed Esc:  fullscreen_exit logged, re-entry not forced (active = {})",
            browser.display.is_active()
        );

        let progress = session.request_submit()?;
        println!(
            "  Submit requested:       {}/{} answered, {} marked, {} left",
            progress.answered,
            progress.total,
            progress.marked_for_review,
            format_duration(progress.remaining_secs as i64)
        );
        session.cancel_submit();
        println!("  Submit cancelled:       back on question {}", session.progress().current_question);

        session.answer(7, "C")?;
        session.request_submit()?;
        let outcome = session.confirm_submit()?;
        println!("  Submit confirmed:       {:?}", outcome);
        println!("  Confirm again:          {:?}", session.confirm_submit()?);

        let report = session.submission_report()?;
        println!("  Answered:               {}/{}", report.answered, report.total_questions);
        if let Some(secs) = report.time_taken_secs {
            println!("  Time taken:             {}", format_duration(secs));
        }
        println!("  Fullscreen exits:       {}", report.audit.fullscreen_exits);
        println!(
            "  Resources released:     {} stream(s), {} listener(s), {} timer(s)",
            browser.camera.live_streams(),
            browser.display.listener_count(),
            session.pending_timers()
        );

        session.reset()?;
        println!(
            "  After reset:            {} screen, {} stored key(s)",
            session.screen(),
            browser.storage.len()
        );
        println!("  RESULT: SUBMITTED MANUALLY (expected)");
        println!();
    }

    // ── Sub-case B: fullscreen refused ───────────────────────────────────────

    {
        println!("  Sub-case B: browser refuses fullscreen");

        let browser = SimulatedBrowser::new(ScriptedCamera::granting())?;
        browser.display.refuse_requests();
        let mut session = browser.open_tab()?;
        session.register(&candidate_form())?;
        session.start_exam()?;

        println!("  Screen:                 {}", session.screen());
        println!(
            "  Fullscreen denials:     {}",
            browser.count(AuditEventKind::FullscreenDenied)
        );
        session.request_submit()?;
        if session.confirm_submit()? == SubmitOutcome::Submitted {
            println!("  RESULT: EXAM RAN WINDOWED (expected)");
        }
        println!();
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
