//! Maintenance kinds and per-target outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The disruptive action applied to every target of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceKind {
    Upgrade,
    Reboot,
}

impl MaintenanceKind {
    pub fn from_reboot_flag(reboot: bool) -> Self {
        if reboot {
            MaintenanceKind::Reboot
        } else {
            MaintenanceKind::Upgrade
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceKind::Upgrade => "upgrade",
            MaintenanceKind::Reboot => "reboot",
        }
    }
}

impl fmt::Display for MaintenanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a maintenance action did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionFailure {
    /// The runner completed but reported something other than `successful`.
    #[error("automation runner reported status `{status}`")]
    RunnerStatus { status: String },

    /// The runner could not be prepared or started.
    #[error("automation runner could not be invoked: {reason}")]
    Invocation { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaintenanceOutcome {
    Succeeded,
    Failed(ActionFailure),
}
