//! Configuration file model.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::ConfigError;
use crate::health::ProbeKind;
use crate::policy::ConvergencePolicy;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RotatoConfig {
    /// Hosts maintained after the discovered cluster members, in this order.
    #[serde(default)]
    #[validate(custom(function = "validate_hosts"))]
    pub extra_hosts: Vec<String>,

    /// Kubeconfig context to use; the current context when unset.
    #[serde(default)]
    pub kube_context: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub convergence: ConvergenceConfig,

    #[serde(default)]
    #[validate(nested)]
    pub storage: StorageClusterRef,

    #[serde(default)]
    pub workloads: WorkloadsConfig,

    /// Probes gating every wait, evaluated in this order.
    #[serde(default = "default_probes")]
    #[validate(length(min = 1), custom(function = "validate_probes"))]
    pub probes: Vec<ProbeKind>,

    #[serde(default)]
    #[validate(nested)]
    pub runner: RunnerConfig,
}

impl Default for RotatoConfig {
    fn default() -> Self {
        Self {
            extra_hosts: Vec::new(),
            kube_context: None,
            convergence: ConvergenceConfig::default(),
            storage: StorageClusterRef::default(),
            workloads: WorkloadsConfig::default(),
            probes: default_probes(),
            runner: RunnerConfig::default(),
        }
    }
}

impl RotatoConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        // Surface policy errors at load time rather than at first wait.
        config.convergence.policy()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_attempt_budget"))]
pub struct ConvergenceConfig {
    #[serde(default = "default_required_successes")]
    #[validate(range(min = 1))]
    pub required_successes: u32,

    #[serde(default = "default_max_attempts")]
    #[validate(range(min = 1))]
    pub max_attempts: u32,

    #[serde(default = "default_poll_interval_secs")]
    #[validate(range(min = 1, max = 3600))]
    pub poll_interval_secs: u64,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            required_successes: default_required_successes(),
            max_attempts: default_max_attempts(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl ConvergenceConfig {
    pub fn policy(&self) -> Result<ConvergencePolicy, ConfigError> {
        ConvergencePolicy::new(
            self.required_successes,
            self.max_attempts,
            Duration::from_secs(self.poll_interval_secs),
        )
    }
}

/// Location of the storage-cluster custom object and its healthy sentinel.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields, default)]
pub struct StorageClusterRef {
    #[validate(length(min = 1))]
    pub group: String,
    #[validate(length(min = 1))]
    pub version: String,
    #[validate(length(min = 1))]
    pub kind: String,
    #[validate(length(min = 1))]
    pub plural: String,
    #[validate(length(min = 1))]
    pub namespace: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub healthy_status: String,
}

impl Default for StorageClusterRef {
    fn default() -> Self {
        Self {
            group: "ceph.rook.io".to_string(),
            version: "v1".to_string(),
            kind: "CephCluster".to_string(),
            plural: "cephclusters".to_string(),
            namespace: "rook-ceph".to_string(),
            name: "rook-ceph".to_string(),
            healthy_status: "HEALTH_OK".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct WorkloadsConfig {
    /// Namespaces whose Deployments and DaemonSets gate a wait. Empty means
    /// every namespace.
    pub namespaces: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields, default)]
pub struct RunnerConfig {
    #[validate(length(min = 1))]
    pub binary: String,
    pub private_data_dir: PathBuf,
    #[validate(length(min = 1))]
    pub upgrade_playbook: String,
    #[validate(length(min = 1))]
    pub reboot_playbook: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            binary: "ansible-runner".to_string(),
            private_data_dir: PathBuf::from("/var/lib/rotato/runner"),
            upgrade_playbook: "apt_upgrade.yml".to_string(),
            reboot_playbook: "reboot.yml".to_string(),
        }
    }
}

fn default_probes() -> Vec<ProbeKind> {
    ProbeKind::ALL.to_vec()
}

fn default_required_successes() -> u32 {
    3
}

fn default_max_attempts() -> u32 {
    60
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn validate_hosts(hosts: &[String]) -> Result<(), ValidationError> {
    if hosts.iter().any(|host| host.trim().is_empty()) {
        return Err(ValidationError::new("blank_host"));
    }
    Ok(())
}

fn validate_probes(probes: &[ProbeKind]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if probes.iter().all(|probe| seen.insert(*probe)) {
        Ok(())
    } else {
        Err(ValidationError::new("duplicate_probe"))
    }
}

fn validate_attempt_budget(config: &ConvergenceConfig) -> Result<(), ValidationError> {
    if config.max_attempts < config.required_successes {
        return Err(ValidationError::new("max_attempts_below_required_successes"));
    }
    Ok(())
}
