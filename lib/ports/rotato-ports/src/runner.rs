use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

/// Status string the runner reports for a playbook that completed cleanly.
pub const RUNNER_SUCCESS_STATUS: &str = "successful";

/// One playbook execution against a single host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybookRequest {
    pub host: String,
    pub playbook: String,
    /// Name of the artifact directory for this execution.
    pub ident: String,
}

/// External automation runner.
#[async_trait]
pub trait AutomationRunnerPort: Send + Sync {
    /// Working directory shared by every execution.
    fn working_dir(&self) -> PathBuf;

    /// Remove whatever a previous execution left in the working directory.
    fn clear_stale_artifacts(&self) -> Result<()>;

    /// Run the playbook and return the runner's completion status. `Err`
    /// means the runner could not be invoked at all.
    async fn run_playbook(&self, request: &PlaybookRequest) -> Result<String>;
}
