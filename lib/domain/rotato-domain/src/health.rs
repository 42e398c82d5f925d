//! Health probe identities and verdicts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of cluster health concerns a run gates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    NodeReadiness,
    StorageCluster,
    Workloads,
    Daemons,
}

impl ProbeKind {
    /// Default gating order.
    pub const ALL: [ProbeKind; 4] = [
        ProbeKind::NodeReadiness,
        ProbeKind::StorageCluster,
        ProbeKind::Workloads,
        ProbeKind::Daemons,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::NodeReadiness => "node_readiness",
            ProbeKind::StorageCluster => "storage_cluster",
            ProbeKind::Workloads => "workloads",
            ProbeKind::Daemons => "daemons",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one probe evaluation at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthVerdict {
    pub probe: String,
    pub healthy: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl HealthVerdict {
    pub fn healthy(probe: impl Into<String>) -> Self {
        Self {
            probe: probe.into(),
            healthy: true,
            details: Vec::new(),
        }
    }

    pub fn unhealthy(probe: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            probe: probe.into(),
            healthy: false,
            details,
        }
    }

    /// Healthy exactly when no problem was recorded.
    pub fn from_problems(probe: impl Into<String>, problems: Vec<String>) -> Self {
        if problems.is_empty() {
            Self::healthy(probe)
        } else {
            Self::unhealthy(probe, problems)
        }
    }
}
