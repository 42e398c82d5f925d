//! Test doubles for the cluster, the runner, and individual probes.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use rotato_domain::{HealthVerdict, StorageClusterRef};
use rotato_ports::{
    AutomationRunnerPort, ClusterQueryPort, ConditionStatus, HealthProbe, NodeAddress, NodeInfo,
    PlaybookRequest, RolloutStatus,
};

/// Replays a fixed sequence of readings, then keeps returning `fallback`.
pub struct ScriptedProbe {
    name: String,
    readings: Mutex<VecDeque<bool>>,
    fallback: bool,
    evaluations: AtomicU32,
    members: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    pub fn new(name: &str, readings: &[bool], fallback: bool) -> Self {
        Self {
            name: name.to_string(),
            readings: Mutex::new(readings.iter().copied().collect()),
            fallback,
            evaluations: AtomicU32::new(0),
            members: Mutex::default(),
        }
    }

    pub fn always(name: &str, healthy: bool) -> Self {
        Self::new(name, &[], healthy)
    }

    pub fn evaluations(&self) -> u32 {
        self.evaluations.load(Ordering::SeqCst)
    }

    pub fn members(&self) -> Vec<String> {
        self.members.lock().expect("members lock poisoned").clone()
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn expect_members(&self, members: &[String]) {
        *self.members.lock().expect("members lock poisoned") = members.to_vec();
    }

    async fn evaluate(&self) -> HealthVerdict {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        let healthy = self
            .readings
            .lock()
            .expect("readings lock poisoned")
            .pop_front()
            .unwrap_or(self.fallback);
        if healthy {
            HealthVerdict::healthy(&self.name)
        } else {
            HealthVerdict::unhealthy(&self.name, vec![format!("{} unhealthy", self.name)])
        }
    }
}

pub fn node(name: &str, ip: &str, ready: Option<ConditionStatus>) -> NodeInfo {
    NodeInfo {
        name: name.to_string(),
        addresses: vec![
            NodeAddress {
                kind: "Hostname".to_string(),
                address: name.to_string(),
            },
            NodeAddress {
                kind: "InternalIP".to_string(),
                address: ip.to_string(),
            },
        ],
        ready,
    }
}

pub fn rollout(name: &str, unavailable: i32) -> RolloutStatus {
    RolloutStatus {
        namespace: "default".to_string(),
        name: name.to_string(),
        unavailable,
    }
}

/// Cluster whose query results are fixed up front. `None` means the query
/// fails.
#[derive(Default)]
pub struct FakeCluster {
    pub nodes: Option<Vec<NodeInfo>>,
    pub storage: Option<Option<String>>,
    pub deployments: Option<Vec<RolloutStatus>>,
    pub daemon_sets: Option<Vec<RolloutStatus>>,
    pub seen_namespaces: Mutex<Vec<Vec<String>>>,
}

impl FakeCluster {
    pub fn with_nodes(nodes: Vec<NodeInfo>) -> Self {
        Self {
            nodes: Some(nodes),
            ..Self::default()
        }
    }
}

fn unreachable_api<T>() -> Result<T> {
    Err(anyhow!("connection refused"))
}

#[async_trait]
impl ClusterQueryPort for FakeCluster {
    async fn list_nodes(&self) -> Result<Vec<NodeInfo>> {
        self.nodes.clone().map_or_else(unreachable_api, Ok)
    }

    async fn storage_health(&self, _cluster: &StorageClusterRef) -> Result<Option<String>> {
        self.storage.clone().map_or_else(unreachable_api, Ok)
    }

    async fn list_deployments(&self, namespaces: &[String]) -> Result<Vec<RolloutStatus>> {
        self.seen_namespaces
            .lock()
            .expect("namespaces lock poisoned")
            .push(namespaces.to_vec());
        self.deployments.clone().map_or_else(unreachable_api, Ok)
    }

    async fn list_daemon_sets(&self, namespaces: &[String]) -> Result<Vec<RolloutStatus>> {
        self.seen_namespaces
            .lock()
            .expect("namespaces lock poisoned")
            .push(namespaces.to_vec());
        self.daemon_sets.clone().map_or_else(unreachable_api, Ok)
    }
}

/// Records every call. Hosts listed in `statuses` get that status; others
/// succeed. Hosts in `unlaunchable` fail to start.
#[derive(Default)]
pub struct FakeRunner {
    pub statuses: HashMap<String, String>,
    pub unlaunchable: Vec<String>,
    pub cleanup_fails: bool,
    pub calls: Mutex<Vec<String>>,
    pub requests: Mutex<Vec<PlaybookRequest>>,
}

impl FakeRunner {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    pub fn runs(&self) -> Vec<PlaybookRequest> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }
}

#[async_trait]
impl AutomationRunnerPort for FakeRunner {
    fn working_dir(&self) -> PathBuf {
        PathBuf::from("/tmp/rotato-fake")
    }

    fn clear_stale_artifacts(&self) -> Result<()> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push("clear".to_string());
        if self.cleanup_fails {
            return Err(anyhow!("permission denied"));
        }
        Ok(())
    }

    async fn run_playbook(&self, request: &PlaybookRequest) -> Result<String> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(format!("run:{}", request.host));
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request.clone());
        if self.unlaunchable.contains(&request.host) {
            return Err(anyhow!("ansible-runner: not found"));
        }
        Ok(self
            .statuses
            .get(&request.host)
            .cloned()
            .unwrap_or_else(|| "successful".to_string()))
    }
}
