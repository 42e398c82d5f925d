//! Conversions from API objects to port types.

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use k8s_openapi::api::core::v1::Node;
use kube::ResourceExt;
use serde_json::Value;

use rotato_ports::{ConditionStatus, NodeAddress, NodeInfo, RolloutStatus};

pub fn node_info(node: &Node) -> NodeInfo {
    let status = node.status.as_ref();
    let addresses = status
        .and_then(|status| status.addresses.as_ref())
        .map(|addresses| {
            addresses
                .iter()
                .map(|address| NodeAddress {
                    kind: address.type_.clone(),
                    address: address.address.clone(),
                })
                .collect()
        })
        .unwrap_or_default();
    let ready = status
        .and_then(|status| status.conditions.as_ref())
        .and_then(|conditions| conditions.iter().find(|condition| condition.type_ == "Ready"))
        .map(|condition| ConditionStatus::parse(&condition.status));

    NodeInfo {
        name: node.name_any(),
        addresses,
        ready,
    }
}

pub fn deployment_status(deployment: &Deployment) -> RolloutStatus {
    RolloutStatus {
        namespace: deployment.namespace().unwrap_or_default(),
        name: deployment.name_any(),
        unavailable: deployment
            .status
            .as_ref()
            .and_then(|status| status.unavailable_replicas)
            .unwrap_or(0),
    }
}

pub fn daemon_set_status(daemon_set: &DaemonSet) -> RolloutStatus {
    RolloutStatus {
        namespace: daemon_set.namespace().unwrap_or_default(),
        name: daemon_set.name_any(),
        unavailable: daemon_set
            .status
            .as_ref()
            .and_then(|status| status.number_unavailable)
            .unwrap_or(0),
    }
}

/// `status.ceph.health` of a CephCluster object.
pub fn ceph_health(data: &Value) -> Option<String> {
    data.pointer("/status/ceph/health")
        .and_then(Value::as_str)
        .map(str::to_string)
}
