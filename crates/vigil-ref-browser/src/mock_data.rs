//! Simulated candidates, answers and camera frames for the VIGIL reference
//! runtime.
//!
//! All data in this module is hardcoded and fictional.  Frames are tiny
//! synthetic images tuned against the default brightness/variance
//! thresholds (variance above 5000, or mean brightness outside 50..=200, is
//! flagged).

use chrono::{DateTime, Utc};

use vigil_contracts::{answer::QuestionId, candidate::CandidateRegistration, media::Frame};

const FRAME_WIDTH: u32 = 32;
const FRAME_HEIGHT: u32 = 24;

/// 2025-05-01 09:00:00 UTC, the start of every simulated session.
pub const EXAM_MORNING_UNIX: i64 = 1_746_090_000;

pub fn exam_morning() -> DateTime<Utc> {
    DateTime::from_timestamp(EXAM_MORNING_UNIX, 0).unwrap_or_default()
}

// ── Candidates ───────────────────────────────────────────────────────────────

/// A registration that passes every stock rule.
pub fn candidate_form() -> CandidateRegistration {
    CandidateRegistration {
        full_name: "Asha Rao".to_string(),
        email: "asha.rao@example.edu".to_string(),
        college: "Coastal Institute of Technology".to_string(),
        branch: "Computer Science".to_string(),
        cgpa: "8.4".to_string(),
        phone: "98450 12345".to_string(),
        password: "ledger-42".to_string(),
    }
}

/// A registration with a malformed email, a nine-digit phone and an
/// out-of-range CGPA.
pub fn rejected_form() -> CandidateRegistration {
    CandidateRegistration {
        email: "asha.rao-at-example".to_string(),
        phone: "98450 1234".to_string(),
        cgpa: "11.2".to_string(),
        ..candidate_form()
    }
}

// ── Answers ──────────────────────────────────────────────────────────────────

/// Valid answers for the first six questions of the built-in bank
/// (mcq, numerical, text, repeated).
pub fn sample_answers() -> Vec<(QuestionId, &'static str)> {
    vec![
        (1, "B"),
        (2, "70"),
        (3, "Segment churned users by tenure and last order, then compare their funnels."),
        (4, "A"),
        (5, "12.5"),
        (6, "Run a holdout test before rolling the change out to every region."),
    ]
}

// ── Camera frames ────────────────────────────────────────────────────────────

/// Evenly lit face-height frame: mean 119, no variance.
pub fn well_lit_frame() -> Frame {
    Frame::solid(FRAME_WIDTH, FRAME_HEIGHT, [128, 118, 112])
}

/// Lens covered or lights off: mean 18.
pub fn dark_frame() -> Frame {
    Frame::solid(FRAME_WIDTH, FRAME_HEIGHT, [18, 18, 18])
}

/// Pointed at a window: mean 235.
pub fn overexposed_frame() -> Frame {
    Frame::solid(FRAME_WIDTH, FRAME_HEIGHT, [235, 235, 235])
}

/// Alternating black and white pixels: mean 127.5, variance 16256.25.
pub fn cluttered_frame() -> Frame {
    let mut rgba = Vec::with_capacity((FRAME_WIDTH * FRAME_HEIGHT * 4) as usize);
    for i in 0..FRAME_WIDTH * FRAME_HEIGHT {
        let v = if i % 2 == 0 { 0 } else { 255 };
        rgba.extend_from_slice(&[v, v, v, 255]);
    }
    Frame { width: FRAME_WIDTH, height: FRAME_HEIGHT, rgba }
}
