//! Retry policy and attempt state machine.
//!
//! The completion client drives a [`RetryMachine`] through its states:
//!
//! ```text
//! Attempting(n) --success--------------------------> Succeeded
//! Attempting(n) --retryable failure, n < max-------> BackingOff(n, delay)
//! Attempting(n) --retryable failure, n == max------> ExhaustedFailed
//! BackingOff(n) --delay elapsed--------------------> Attempting(n + 1)
//! ```
//!
//! Non-retryable failures leave the machine; the caller returns the error
//! directly.

use std::time::Duration;

/// Exponential backoff parameters.
///
/// The wait before retrying after failed attempt `n` (1-based) is
/// `backoff_unit * backoff_base^n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Growth factor between successive waits.
    pub backoff_base: f64,
    /// Duration of one backoff unit.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            backoff_base: 1.5,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Policy that retries without waiting. Handy in tests.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff_unit: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Wait after failed attempt `attempt` (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if self.backoff_unit.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.backoff_unit.as_secs_f64() * self.backoff_base.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Start a fresh attempt sequence.
    #[must_use]
    pub fn start(&self) -> RetryMachine {
        RetryMachine {
            policy: *self,
            state: RetryState::Attempting { attempt: 1 },
        }
    }
}

/// Where an attempt sequence currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Attempt number `attempt` (1-based) is about to run or running.
    Attempting { attempt: u32 },
    /// Attempt `attempt` failed; wait `delay` before the next one.
    BackingOff { attempt: u32, delay: Duration },
    /// Attempt `attempts` succeeded.
    Succeeded { attempts: u32 },
    /// Every allowed attempt failed.
    ExhaustedFailed { attempts: u32 },
}

/// Tracks one request's attempts against a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryMachine {
    policy: RetryPolicy,
    state: RetryState,
}

impl RetryMachine {
    #[must_use]
    pub const fn state(&self) -> RetryState {
        self.state
    }

    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Attempt number currently in flight, or the last one made.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self.state {
            RetryState::Attempting { attempt } | RetryState::BackingOff { attempt, .. } => attempt,
            RetryState::Succeeded { attempts } | RetryState::ExhaustedFailed { attempts } => {
                attempts
            }
        }
    }

    /// Record that the current attempt succeeded.
    pub fn succeed(&mut self) -> RetryState {
        if let RetryState::Attempting { attempt } = self.state {
            self.state = RetryState::Succeeded { attempts: attempt };
        }
        self.state
    }

    /// Record a retryable failure of the current attempt.
    ///
    /// Moves to [`RetryState::BackingOff`] while attempts remain, otherwise
    /// to [`RetryState::ExhaustedFailed`]. No wait follows the last attempt.
    pub fn fail(&mut self) -> RetryState {
        if let RetryState::Attempting { attempt } = self.state {
            self.state = if attempt >= self.policy.max_attempts {
                RetryState::ExhaustedFailed { attempts: attempt }
            } else {
                RetryState::BackingOff {
                    attempt,
                    delay: self.policy.delay_after(attempt),
                }
            };
        }
        self.state
    }

    /// Record that the backoff wait is over.
    pub fn resume(&mut self) -> RetryState {
        if let RetryState::BackingOff { attempt, .. } = self.state {
            self.state = RetryState::Attempting {
                attempt: attempt + 1,
            };
        }
        self.state
    }
}
