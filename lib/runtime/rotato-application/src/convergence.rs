//! Retry-with-required-successes waits.

use tokio::time::sleep;
use tracing::{debug, info, warn};

use rotato_domain::{ConvergencePolicy, ConvergenceTimeout};
use rotato_ports::HealthProbe;

/// Counters of a wait that reached its required healthy readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convergence {
    pub attempts: u32,
    pub successes: u32,
}

/// Drives a probe until it has produced `required_successes` healthy
/// readings, cumulatively, within `max_attempts` evaluations.
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceWaiter {
    policy: ConvergencePolicy,
}

impl ConvergenceWaiter {
    pub fn new(policy: ConvergencePolicy) -> Self {
        Self { policy }
    }

    /// Every evaluation, the first included, is preceded by one poll
    /// interval of sleep so a just-finished action has time to show up in
    /// cluster status.
    pub async fn wait_for(&self, probe: &dyn HealthProbe) -> Result<Convergence, ConvergenceTimeout> {
        let required = self.policy.required_successes();
        let max_attempts = self.policy.max_attempts();
        let mut attempts = 0;
        let mut successes = 0;
        let mut last_details = Vec::new();

        while attempts < max_attempts {
            sleep(self.policy.poll_interval()).await;
            attempts += 1;

            let verdict = probe.evaluate().await;
            if verdict.healthy {
                successes += 1;
                debug!(
                    probe = probe.name(),
                    attempts, successes, required, "healthy reading"
                );
                if successes == required {
                    info!(probe = probe.name(), attempts, successes, "probe converged");
                    return Ok(Convergence {
                        attempts,
                        successes,
                    });
                }
            } else {
                debug!(
                    probe = probe.name(),
                    attempts,
                    successes,
                    details = ?verdict.details,
                    "unhealthy reading"
                );
                last_details = verdict.details;
            }
        }

        warn!(
            probe = probe.name(),
            attempts, successes, required, "probe did not converge"
        );
        Err(ConvergenceTimeout {
            probe: probe.name().to_string(),
            attempts,
            successes,
            required,
            last_details,
        })
    }
}
