use chrono::{DateTime, Duration, Utc};

/// Optional per-question countdown.
///
/// An untimed timer never arms and never expires. A timed one is re-armed
/// once per question; `arm` resets remaining time to the full limit before
/// activating, so a stale deadline from the previous question can never
/// carry over. Expiry is reported by `poll` exactly once, after which the
/// timer has disarmed itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionTimer {
    limit: Duration,
    is_timed: bool,
    deadline: Option<DateTime<Utc>>,
}

impl QuestionTimer {
    /// A countdown with the given per-question limit.
    #[must_use]
    pub fn timed(limit: Duration) -> Self {
        Self {
            limit,
            is_timed: true,
            deadline: None,
        }
    }

    /// A timer that never activates.
    #[must_use]
    pub fn untimed() -> Self {
        Self {
            limit: Duration::zero(),
            is_timed: false,
            deadline: None,
        }
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.is_timed
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Reset remaining time to the full limit and start counting down.
    ///
    /// No-op when untimed. Ordering matters: the previous deadline is
    /// dropped before the new one is set, never merged with it.
    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.deadline = None;
        if self.is_timed {
            self.deadline = Some(now + self.limit);
        }
    }

    /// Halt the countdown, called the instant an answer is recorded.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Seconds left on the countdown, `None` when not armed.
    #[must_use]
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> Option<u64> {
        let deadline = self.deadline?;
        let left = (deadline - now).max(Duration::zero());
        Some(u64::try_from(left.num_seconds()).unwrap_or(0))
    }

    /// Report expiry. Returns `true` at most once per arming; the timer
    /// disarms itself on the expiring poll so a later poll stays quiet.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
