//! Reconnect policies
//!
//! A policy maps the number of consecutive failed attempts to the delay
//! before the next one, or to `None` when the stream should give up.

use std::time::Duration;

use ama_common::{ReconnectMode, ReconnectSettings};
use rand::Rng;

/// Default first backoff delay
const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Default backoff ceiling
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Default attempt cap
const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// What the stream does after its socket drops or a handshake fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconnectPolicy {
    /// Stay disconnected
    Never,
    /// Retry right away
    Immediate { max_attempts: Option<u32> },
    /// Retry after the same delay every time
    FixedDelay {
        delay: Duration,
        max_attempts: Option<u32>,
    },
    /// Double the delay each attempt up to `max`
    ///
    /// With `jitter`, each delay is drawn uniformly from `[d/2, d]`.
    ExponentialBackoff {
        initial: Duration,
        max: Duration,
        max_attempts: Option<u32>,
        jitter: bool,
    },
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::ExponentialBackoff {
            initial: DEFAULT_INITIAL_DELAY,
            max: DEFAULT_MAX_DELAY,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
            jitter: true,
        }
    }
}

impl ReconnectPolicy {
    /// Build a policy from configuration
    pub fn from_settings(settings: &ReconnectSettings) -> Self {
        let delay = Duration::from_millis(settings.delay_ms);
        match settings.mode {
            ReconnectMode::Never => Self::Never,
            ReconnectMode::Immediate => Self::Immediate {
                max_attempts: settings.max_attempts,
            },
            ReconnectMode::Fixed => Self::FixedDelay {
                delay,
                max_attempts: settings.max_attempts,
            },
            ReconnectMode::Backoff => Self::ExponentialBackoff {
                initial: delay,
                max: Duration::from_millis(settings.max_delay_ms).max(delay),
                max_attempts: settings.max_attempts,
                jitter: settings.jitter,
            },
        }
    }

    /// Delay before retry number `attempt` (1-based), or `None` to give up
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || self.exhausted(attempt) {
            return None;
        }

        match self {
            Self::Never => None,
            Self::Immediate { .. } => Some(Duration::ZERO),
            Self::FixedDelay { delay, .. } => Some(*delay),
            Self::ExponentialBackoff {
                initial,
                max,
                jitter,
                ..
            } => {
                let factor = 2u32.saturating_pow(attempt - 1);
                let delay = initial.saturating_mul(factor).min(*max);
                if *jitter {
                    Some(apply_jitter(delay))
                } else {
                    Some(delay)
                }
            }
        }
    }

    fn max_attempts(&self) -> Option<u32> {
        match self {
            Self::Never => Some(0),
            Self::Immediate { max_attempts }
            | Self::FixedDelay { max_attempts, .. }
            | Self::ExponentialBackoff { max_attempts, .. } => *max_attempts,
        }
    }

    fn exhausted(&self, attempt: u32) -> bool {
        self.max_attempts().is_some_and(|max| attempt > max)
    }
}

fn apply_jitter(delay: Duration) -> Duration {
    let half = delay / 2;
    if half.is_zero() {
        return delay;
    }
    half + rand::thread_rng().gen_range(Duration::ZERO..=half)
}
