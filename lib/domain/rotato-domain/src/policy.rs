//! Noise-tolerant convergence policy.

use std::time::Duration;

use serde::Serialize;

use crate::error::ConfigError;

/// "`required_successes` healthy readings within `max_attempts` evaluations,
/// `poll_interval` apart."
///
/// Successes are counted cumulatively, not as a streak. Construction enforces
/// `1 <= required_successes <= max_attempts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConvergencePolicy {
    required_successes: u32,
    max_attempts: u32,
    poll_interval: Duration,
}

impl ConvergencePolicy {
    pub fn new(
        required_successes: u32,
        max_attempts: u32,
        poll_interval: Duration,
    ) -> Result<Self, ConfigError> {
        if required_successes == 0 {
            return Err(ConfigError::InvalidPolicy(
                "required_successes must be at least 1".to_string(),
            ));
        }
        if max_attempts < required_successes {
            return Err(ConfigError::InvalidPolicy(format!(
                "max_attempts ({max_attempts}) must be >= required_successes ({required_successes})"
            )));
        }
        Ok(Self {
            required_successes,
            max_attempts,
            poll_interval,
        })
    }

    pub fn required_successes(&self) -> u32 {
        self.required_successes
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Longest a single wait can block.
    pub fn budget(&self) -> Duration {
        self.poll_interval.saturating_mul(self.max_attempts)
    }
}
