//! Per-target maintenance through the automation runner.

use std::sync::Arc;

use tracing::{error, info};

use rotato_domain::{ActionFailure, MaintenanceKind, MaintenanceOutcome, RunnerConfig, Target};
use rotato_ports::{AutomationRunnerPort, PlaybookRequest, RUNNER_SUCCESS_STATUS};

/// Applies the selected playbook to one target at a time.
///
/// A failed action is reported, never retried.
#[derive(Clone)]
pub struct MaintenanceExecutor {
    runner: Arc<dyn AutomationRunnerPort>,
    upgrade_playbook: String,
    reboot_playbook: String,
}

impl MaintenanceExecutor {
    pub fn new(runner: Arc<dyn AutomationRunnerPort>, config: &RunnerConfig) -> Self {
        Self {
            runner,
            upgrade_playbook: config.upgrade_playbook.clone(),
            reboot_playbook: config.reboot_playbook.clone(),
        }
    }

    pub fn playbook_for(&self, kind: MaintenanceKind) -> &str {
        match kind {
            MaintenanceKind::Upgrade => &self.upgrade_playbook,
            MaintenanceKind::Reboot => &self.reboot_playbook,
        }
    }

    pub async fn apply(&self, target: &Target, kind: MaintenanceKind) -> MaintenanceOutcome {
        // A previous execution can leave files behind that make the runner
        // refuse to start, so the workspace is always cleared first.
        if let Err(err) = self.runner.clear_stale_artifacts() {
            error!(
                host = %target,
                dir = %self.runner.working_dir().display(),
                "failed to clear stale runner artifacts: {err:#}"
            );
            return MaintenanceOutcome::Failed(ActionFailure::Invocation {
                reason: format!("failed to clear stale runner artifacts: {err:#}"),
            });
        }

        let request = PlaybookRequest {
            host: target.address.clone(),
            playbook: self.playbook_for(kind).to_string(),
            ident: runner_ident(kind, target),
        };
        info!(
            host = %target,
            origin = target.origin.as_str(),
            playbook = %request.playbook,
            "applying {kind}"
        );

        match self.runner.run_playbook(&request).await {
            Ok(status) if status == RUNNER_SUCCESS_STATUS => {
                info!(host = %target, "{kind} finished");
                MaintenanceOutcome::Succeeded
            }
            Ok(status) => {
                error!(host = %target, status = %status, "{kind} failed");
                MaintenanceOutcome::Failed(ActionFailure::RunnerStatus { status })
            }
            Err(err) => {
                error!(host = %target, "automation runner could not be invoked: {err:#}");
                MaintenanceOutcome::Failed(ActionFailure::Invocation {
                    reason: format!("{err:#}"),
                })
            }
        }
    }
}

/// Artifact directory name for one execution, safe to use as a path
/// component.
pub(crate) fn runner_ident(kind: MaintenanceKind, target: &Target) -> String {
    let host: String = target
        .address
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{kind}-{host}")
}
