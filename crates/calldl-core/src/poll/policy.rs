use std::time::Duration;

use crate::config::PollConfig;

/// How long a poll may keep going before it gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    /// Never give up; past the soft timeout a diagnostic is logged and polling continues.
    Persistent,
    /// Give up once the elapsed time reaches the deadline.
    Deadline(Duration),
    /// Exactly one attempt. For elements that may legitimately never appear.
    Once,
}

/// Decision returned by the poll policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    /// Stop polling and report absence.
    GiveUp,
    /// Probe again after the given delay.
    RetryAfter(Duration),
}

/// Poll cadence with optional exponential backoff and caps.
///
/// With `interval == max_interval` (the default) the cadence is fixed.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Delay after the first failed attempt.
    pub interval: Duration,
    /// Upper bound on the delay between attempts.
    pub max_interval: Duration,
    /// Elapsed time after which a "still waiting" diagnostic is emitted.
    pub soft_timeout: Duration,
    pub mode: PollMode,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            max_interval: Duration::from_millis(100),
            soft_timeout: Duration::from_secs(30),
            mode: PollMode::Persistent,
        }
    }
}

impl From<&PollConfig> for PollPolicy {
    fn from(cfg: &PollConfig) -> Self {
        let interval = Duration::from_millis(cfg.interval_ms.max(1));
        let max_interval = Duration::from_millis(cfg.max_interval_ms.max(cfg.interval_ms).max(1));
        let mode = match cfg.hard_timeout_secs {
            Some(secs) => PollMode::Deadline(Duration::from_secs(secs)),
            None => PollMode::Persistent,
        };
        Self {
            interval,
            max_interval,
            soft_timeout: Duration::from_secs(cfg.soft_timeout_secs),
            mode,
        }
    }
}

impl PollPolicy {
    /// Single-attempt policy: check once, report absence instead of waiting.
    pub fn once() -> Self {
        Self {
            mode: PollMode::Once,
            ..Self::default()
        }
    }

    /// Fixed-cadence persistent policy.
    pub fn persistent(interval: Duration, soft_timeout: Duration) -> Self {
        Self {
            interval,
            max_interval: interval,
            soft_timeout,
            mode: PollMode::Persistent,
        }
    }

    /// Same cadence, different mode.
    pub fn with_mode(self, mode: PollMode) -> Self {
        Self { mode, ..self }
    }

    /// Decide what to do after failed attempt number `attempt` (1-based),
    /// `elapsed` after the first attempt started.
    pub fn decide(&self, attempt: u32, elapsed: Duration) -> PollDecision {
        match self.mode {
            PollMode::Once => return PollDecision::GiveUp,
            PollMode::Deadline(limit) if elapsed >= limit => return PollDecision::GiveUp,
            PollMode::Deadline(_) | PollMode::Persistent => {}
        }

        // interval * 2^(attempt-1), capped.
        let exp = 1u32 << attempt.saturating_sub(1).min(16);
        let delay = self.interval.saturating_mul(exp).min(self.max_interval);
        PollDecision::RetryAfter(delay)
    }

    /// Whether `elapsed` has crossed the soft timeout.
    pub fn past_soft_timeout(&self, elapsed: Duration) -> bool {
        elapsed > self.soft_timeout
    }
}
