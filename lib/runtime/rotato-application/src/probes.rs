//! Cluster health probes.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tracing::{info, warn};

use rotato_domain::{HealthVerdict, ProbeKind, RotatoConfig, StorageClusterRef};
use rotato_ports::{ClusterQueryPort, ConditionStatus, HealthProbe, RolloutStatus};

/// The four cluster health concerns, each reading through the cluster port.
#[derive(Clone)]
pub enum ClusterProbe {
    /// Every discovered member is listed and its `Ready` condition is `True`.
    NodeReadiness {
        cluster: Arc<dyn ClusterQueryPort>,
        members: Arc<RwLock<Vec<String>>>,
    },
    /// The storage cluster reports exactly its healthy sentinel.
    StorageCluster {
        cluster: Arc<dyn ClusterQueryPort>,
        target: StorageClusterRef,
    },
    /// No Deployment has unavailable replicas.
    Workloads {
        cluster: Arc<dyn ClusterQueryPort>,
        namespaces: Vec<String>,
    },
    /// No DaemonSet has unavailable instances.
    Daemons {
        cluster: Arc<dyn ClusterQueryPort>,
        namespaces: Vec<String>,
    },
}

impl ClusterProbe {
    pub fn new(kind: ProbeKind, cluster: Arc<dyn ClusterQueryPort>, config: &RotatoConfig) -> Self {
        match kind {
            ProbeKind::NodeReadiness => ClusterProbe::NodeReadiness {
                cluster,
                members: Arc::default(),
            },
            ProbeKind::StorageCluster => ClusterProbe::StorageCluster {
                cluster,
                target: config.storage.clone(),
            },
            ProbeKind::Workloads => ClusterProbe::Workloads {
                cluster,
                namespaces: config.workloads.namespaces.clone(),
            },
            ProbeKind::Daemons => ClusterProbe::Daemons {
                cluster,
                namespaces: config.workloads.namespaces.clone(),
            },
        }
    }

    pub fn kind(&self) -> ProbeKind {
        match self {
            ClusterProbe::NodeReadiness { .. } => ProbeKind::NodeReadiness,
            ClusterProbe::StorageCluster { .. } => ProbeKind::StorageCluster,
            ClusterProbe::Workloads { .. } => ProbeKind::Workloads,
            ClusterProbe::Daemons { .. } => ProbeKind::Daemons,
        }
    }

    async fn node_readiness(
        &self,
        cluster: &dyn ClusterQueryPort,
        members: &RwLock<Vec<String>>,
    ) -> HealthVerdict {
        let nodes = match cluster.list_nodes().await {
            Ok(nodes) => nodes,
            Err(err) => return self.query_failed("node list", err),
        };
        let expected = members.read().unwrap_or_else(PoisonError::into_inner).clone();
        if nodes.is_empty() && expected.is_empty() {
            return HealthVerdict::unhealthy(
                self.name(),
                vec!["no cluster members reported".to_string()],
            );
        }

        let mut problems: Vec<String> = nodes
            .iter()
            .filter_map(|node| match &node.ready {
                Some(ConditionStatus::True) => None,
                Some(ConditionStatus::False) => Some(format!("{} not ready (Ready=False)", node.name)),
                Some(ConditionStatus::Unknown) => {
                    Some(format!("{} not ready (Ready=Unknown)", node.name))
                }
                None => Some(format!("{} reports no Ready condition", node.name)),
            })
            .collect();
        let listed: HashSet<&str> = nodes.iter().map(|node| node.name.as_str()).collect();
        problems.extend(
            expected
                .iter()
                .filter(|member| !listed.contains(member.as_str()))
                .map(|member| format!("{member} not listed")),
        );
        HealthVerdict::from_problems(self.name(), problems)
    }

    async fn storage_cluster(
        &self,
        cluster: &dyn ClusterQueryPort,
        target: &StorageClusterRef,
    ) -> HealthVerdict {
        match cluster.storage_health(target).await {
            Ok(Some(health)) => {
                info!(cluster = %target.name, health = %health, "storage cluster health");
                if health == target.healthy_status {
                    HealthVerdict::healthy(self.name())
                } else {
                    HealthVerdict::unhealthy(
                        self.name(),
                        vec![format!("{}/{} reports {health}", target.namespace, target.name)],
                    )
                }
            }
            Ok(None) => HealthVerdict::unhealthy(
                self.name(),
                vec![format!(
                    "{}/{} has no status.ceph.health",
                    target.namespace, target.name
                )],
            ),
            Err(err) => self.query_failed("storage cluster", err),
        }
    }

    fn rollout_verdict(&self, noun: &str, rollouts: &[RolloutStatus]) -> HealthVerdict {
        let problems = rollouts
            .iter()
            .filter(|rollout| rollout.unavailable > 0)
            .map(|rollout| {
                format!(
                    "{}/{}: {} unavailable {noun}",
                    rollout.namespace, rollout.name, rollout.unavailable
                )
            })
            .collect();
        HealthVerdict::from_problems(self.name(), problems)
    }

    fn query_failed(&self, what: &str, err: anyhow::Error) -> HealthVerdict {
        warn!(probe = self.name(), "{what} query failed: {err:#}");
        HealthVerdict::unhealthy(self.name(), vec![format!("{what} query failed: {err:#}")])
    }
}

#[async_trait]
impl HealthProbe for ClusterProbe {
    fn name(&self) -> &str {
        self.kind().as_str()
    }

    fn expect_members(&self, expected: &[String]) {
        if let ClusterProbe::NodeReadiness { members, .. } = self {
            *members.write().unwrap_or_else(PoisonError::into_inner) = expected.to_vec();
        }
    }

    async fn evaluate(&self) -> HealthVerdict {
        match self {
            ClusterProbe::NodeReadiness { cluster, members } => {
                self.node_readiness(cluster.as_ref(), members).await
            }
            ClusterProbe::StorageCluster { cluster, target } => {
                self.storage_cluster(cluster.as_ref(), target).await
            }
            ClusterProbe::Workloads {
                cluster,
                namespaces,
            } => match cluster.list_deployments(namespaces).await {
                Ok(rollouts) => self.rollout_verdict("replicas", &rollouts),
                Err(err) => self.query_failed("deployment list", err),
            },
            ClusterProbe::Daemons {
                cluster,
                namespaces,
            } => match cluster.list_daemon_sets(namespaces).await {
                Ok(rollouts) => self.rollout_verdict("instances", &rollouts),
                Err(err) => self.query_failed("daemon set list", err),
            },
        }
    }
}

/// Probes for `config.probes`, in the configured order.
pub fn build_probes(
    cluster: Arc<dyn ClusterQueryPort>,
    config: &RotatoConfig,
) -> Vec<Arc<dyn HealthProbe>> {
    config
        .probes
        .iter()
        .map(|kind| {
            Arc::new(ClusterProbe::new(*kind, Arc::clone(&cluster), config)) as Arc<dyn HealthProbe>
        })
        .collect()
}
