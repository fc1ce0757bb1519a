//! Pure mastery arithmetic shared by every study mode.

use crate::model::{Mastery, StudyMode};

/// Passive review cannot push mastery past this value.
pub const FLIP_CEILING: u8 = 50;

/// Passive review earns at most this many points in one session.
pub const FLIP_MAX_GAIN_MINUTES: i64 = 30;

/// Compute the mastery a finished session leaves behind.
///
/// Challenge and Quiz are symmetric: every correct answer adds a point and
/// every incorrect answer removes one, clamped to [0, 100]. Flip is
/// time-based with a hard ceiling at 50: one point per full study minute, at
/// most 30, and never past the ceiling. A deck already above the ceiling is
/// left untouched.
///
/// Callers must pass the counters frozen at session completion; the result
/// is only meaningful for one specific `study_secs` snapshot.
#[must_use]
pub fn new_mastery(
    mode: StudyMode,
    initial: Mastery,
    correct: u32,
    incorrect: u32,
    study_secs: u64,
) -> Mastery {
    match mode {
        StudyMode::Challenge | StudyMode::Quiz => {
            let delta = i64::from(correct) - i64::from(incorrect);
            Mastery::clamped(i64::from(initial.value()) + delta)
        }
        StudyMode::Flip => flip_mastery(initial, study_secs),
    }
}

fn flip_mastery(initial: Mastery, study_secs: u64) -> Mastery {
    if initial.value() > FLIP_CEILING {
        return initial;
    }

    let minutes = i64::try_from(study_secs / 60).unwrap_or(i64::MAX);
    let gain = minutes.min(FLIP_MAX_GAIN_MINUTES);
    let capped = (i64::from(initial.value()) + gain).min(i64::from(FLIP_CEILING));
    Mastery::clamped(capped)
}
