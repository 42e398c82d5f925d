use anyhow::Result;
use async_trait::async_trait;

use rotato_domain::StorageClusterRef;

/// Tri-state value of a node condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl ConditionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "True" => ConditionStatus::True,
            "False" => ConditionStatus::False,
            _ => ConditionStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAddress {
    /// Address type as reported by the cluster, e.g. `InternalIP`.
    pub kind: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub name: String,
    pub addresses: Vec<NodeAddress>,
    /// Value of the `Ready` condition; `None` when the node reports none.
    pub ready: Option<ConditionStatus>,
}

impl NodeInfo {
    /// Address used to reach the node for maintenance: its internal IP,
    /// then its hostname address, then its name.
    pub fn maintenance_address(&self) -> &str {
        ["InternalIP", "Hostname"]
            .iter()
            .find_map(|kind| {
                self.addresses
                    .iter()
                    .find(|address| address.kind == *kind && !address.address.is_empty())
            })
            .map(|address| address.address.as_str())
            .unwrap_or(self.name.as_str())
    }
}

/// Availability counters of a replicated workload or daemon set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloutStatus {
    pub namespace: String,
    pub name: String,
    pub unavailable: i32,
}

/// Read-only queries against the cluster.
#[async_trait]
pub trait ClusterQueryPort: Send + Sync {
    /// Cluster members in the order the API returns them.
    async fn list_nodes(&self) -> Result<Vec<NodeInfo>>;

    /// `status.ceph.health` of the storage-cluster object, `None` when the
    /// field is missing.
    async fn storage_health(&self, cluster: &StorageClusterRef) -> Result<Option<String>>;

    /// Deployments in `namespaces`, or in every namespace when empty.
    async fn list_deployments(&self, namespaces: &[String]) -> Result<Vec<RolloutStatus>>;

    /// DaemonSets in `namespaces`, or in every namespace when empty.
    async fn list_daemon_sets(&self, namespaces: &[String]) -> Result<Vec<RolloutStatus>>;
}
