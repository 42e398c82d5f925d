//! Error taxonomy for a maintenance run.
//!
//! Transient query failures never appear here: probes fold them into an
//! unhealthy verdict. Everything below is fatal to the run.

use std::path::PathBuf;

use thiserror::Error;

use crate::maintenance::ActionFailure;

/// Invalid startup configuration. Raised before any cluster interaction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("invalid convergence policy: {0}")]
    InvalidPolicy(String),
}

/// A probe exhausted its attempt budget without reaching the required number
/// of healthy readings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "probe `{probe}` did not converge: {successes}/{required} healthy readings after {attempts} attempts"
)]
pub struct ConvergenceTimeout {
    pub probe: String,
    pub attempts: u32,
    pub successes: u32,
    pub required: u32,
    /// Diagnostics from the final unhealthy reading.
    pub last_details: Vec<String>,
}

/// Fatal error that ends a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("failed to discover cluster members")]
    Discovery {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("preflight health check failed, no target was touched")]
    Preflight(#[source] ConvergenceTimeout),

    #[error("maintenance of {target} failed")]
    Action {
        target: String,
        #[source]
        source: ActionFailure,
    },

    #[error("cluster did not converge after maintenance of {target}")]
    PostWait {
        target: String,
        #[source]
        source: ConvergenceTimeout,
    },
}
