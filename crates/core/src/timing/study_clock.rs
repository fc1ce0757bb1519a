use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockState {
    Idle,
    Running { since: DateTime<Utc> },
    Paused,
    Stopped,
}

/// Accumulates wall-clock study time across start/pause/resume cycles.
///
/// `stop` is terminal: once a session has frozen its elapsed time for the
/// mastery computation, no later call may move the value again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyClock {
    state: ClockState,
    accumulated: Duration,
}

impl Default for StudyClock {
    fn default() -> Self {
        Self::new()
    }
}

impl StudyClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ClockState::Idle,
            accumulated: Duration::zero(),
        }
    }

    /// Begin accumulating. No-op unless the clock is idle.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.state == ClockState::Idle {
            self.state = ClockState::Running { since: now };
        }
    }

    /// Freeze accumulation, folding the open interval into the total.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        if let ClockState::Running { since } = self.state {
            self.accumulated += span(since, now);
            self.state = ClockState::Paused;
        }
    }

    /// Restart accumulation from the frozen total. No-op unless paused.
    pub fn resume(&mut self, now: DateTime<Utc>) {
        if self.state == ClockState::Paused {
            self.state = ClockState::Running { since: now };
        }
    }

    /// Finalize accumulation permanently.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        if let ClockState::Running { since } = self.state {
            self.accumulated += span(since, now);
        }
        self.state = ClockState::Stopped;
    }

    /// Total accumulated study time as of `now`.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        match self.state {
            ClockState::Running { since } => self.accumulated + span(since, now),
            _ => self.accumulated,
        }
    }

    /// Whole elapsed seconds, the consumer-visible tick value.
    #[must_use]
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from(self.elapsed(now).num_seconds()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state == ClockState::Stopped
    }
}

// A backwards wall clock must not subtract study time.
fn span(since: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - since).max(Duration::zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn secs(n: i64) -> Duration {
        Duration::seconds(n)
    }

    #[test]
    fn clock_accumulates_while_running() {
        let t0 = fixed_now();
        let mut clock = StudyClock::new();
        clock.start(t0);

        assert_eq!(clock.elapsed_secs(t0 + secs(7)), 7);
        assert_eq!(clock.elapsed_secs(t0 + secs(42)), 42);
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let t0 = fixed_now();
        let mut clock = StudyClock::new();
        clock.start(t0);
        clock.pause(t0 + secs(10));

        // Frozen during the pause.
        assert_eq!(clock.elapsed_secs(t0 + secs(60)), 10);

        clock.resume(t0 + secs(60));
        assert_eq!(clock.elapsed_secs(t0 + secs(65)), 15);
    }

    #[test]
    fn second_start_is_a_no_op() {
        let t0 = fixed_now();
        let mut clock = StudyClock::new();
        clock.start(t0);
        clock.start(t0 + secs(30));

        assert_eq!(clock.elapsed_secs(t0 + secs(40)), 40);
    }

    #[test]
    fn stop_is_terminal() {
        let t0 = fixed_now();
        let mut clock = StudyClock::new();
        clock.start(t0);
        clock.stop(t0 + secs(25));

        assert!(clock.is_stopped());
        assert_eq!(clock.elapsed_secs(t0 + secs(100)), 25);

        // No call revives a stopped clock.
        clock.start(t0 + secs(100));
        clock.resume(t0 + secs(100));
        assert_eq!(clock.elapsed_secs(t0 + secs(200)), 25);
    }

    #[test]
    fn backwards_time_does_not_subtract() {
        let t0 = fixed_now();
        let mut clock = StudyClock::new();
        clock.start(t0);
        assert_eq!(clock.elapsed_secs(t0 - secs(5)), 0);
    }
}
