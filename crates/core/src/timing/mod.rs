//! Session timing primitives.
//!
//! Both timers are logical state machines over injected timestamps: callers
//! pass `now` (usually from a [`crate::Clock`]) and read derived values. The
//! original 1 Hz tick is an observation of these values, not a thread, so
//! there is no interval to leak when a session is dropped.

mod question_timer;
mod study_clock;

pub use question_timer::QuestionTimer;
pub use study_clock::StudyClock;
