use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use rotato_domain::RunnerConfig;
use rotato_ports::{AutomationRunnerPort, PlaybookRequest, RUNNER_SUCCESS_STATUS};

use crate::workspace::Workspace;

/// Lines of runner stderr kept in the log when a playbook fails.
const STDERR_TAIL_LINES: usize = 20;

/// Runs playbooks with `ansible-runner run <dir> -p <playbook> --ident <ident>`.
#[derive(Debug, Clone)]
pub struct AnsibleRunner {
    binary: String,
    workspace: Workspace,
}

impl AnsibleRunner {
    pub fn new(binary: impl Into<String>, private_data_dir: PathBuf) -> Self {
        Self {
            binary: binary.into(),
            workspace: Workspace::new(private_data_dir),
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(config.binary.clone(), config.private_data_dir.clone())
    }
}

#[async_trait]
impl AutomationRunnerPort for AnsibleRunner {
    fn working_dir(&self) -> PathBuf {
        self.workspace.root().to_path_buf()
    }

    fn clear_stale_artifacts(&self) -> Result<()> {
        self.workspace.clear().with_context(|| {
            format!(
                "Failed to clear runner workspace {}",
                self.workspace.root().display()
            )
        })
    }

    async fn run_playbook(&self, request: &PlaybookRequest) -> Result<String> {
        self.workspace
            .stage_inventory(&request.host)
            .context("Failed to write runner inventory")?;

        info!(
            binary = %self.binary,
            host = %request.host,
            playbook = %request.playbook,
            ident = %request.ident,
            "starting automation runner"
        );
        let output = Command::new(&self.binary)
            .arg("run")
            .arg(self.workspace.root())
            .arg("-p")
            .arg(&request.playbook)
            .arg("--ident")
            .arg(&request.ident)
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to launch {}", self.binary))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            debug!(host = %request.host, "{line}");
        }

        let recorded = self
            .workspace
            .read_status(&request.ident)
            .context("Failed to read runner status")?;
        let status = recorded.unwrap_or_else(|| {
            // No artifact: fall back to the exit code.
            if output.status.success() {
                RUNNER_SUCCESS_STATUS.to_string()
            } else {
                "failed".to_string()
            }
        });

        if status != RUNNER_SUCCESS_STATUS {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = &lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..];
            warn!(
                host = %request.host,
                status = %status,
                exit = ?output.status.code(),
                "runner did not succeed:\n{}",
                tail.join("\n")
            );
        }
        Ok(status)
    }
}
