use std::fmt::Debug;

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use k8s_openapi::api::core::v1::Node;
use kube::api::{Api, ApiResource, DynamicObject, ListParams};
use kube::config::KubeConfigOptions;
use kube::core::GroupVersionKind;
use kube::{Client, Config, Resource};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use rotato_domain::StorageClusterRef;
use rotato_ports::{ClusterQueryPort, NodeInfo, RolloutStatus};

use crate::mapping;

/// [`ClusterQueryPort`] backed by a kube client.
#[derive(Clone)]
pub struct KubeClusterQuery {
    client: Client,
}

impl KubeClusterQuery {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the kubeconfig, using `context` when given and
    /// the inferred configuration (current context or in-cluster) otherwise.
    pub async fn connect(context: Option<&str>) -> Result<Self> {
        let client = match context {
            Some(context) => {
                let options = KubeConfigOptions {
                    context: Some(context.to_string()),
                    ..KubeConfigOptions::default()
                };
                let config = Config::from_kubeconfig(&options)
                    .await
                    .with_context(|| format!("Failed to load kubeconfig context {context}"))?;
                Client::try_from(config).context("Failed to create kube client")?
            }
            None => Client::try_default()
                .await
                .context("Failed to create kube client")?,
        };
        info!(context = context.unwrap_or("<default>"), "connected to cluster");
        Ok(Self { client })
    }

    async fn list_namespaced<K>(&self, namespaces: &[String]) -> Result<Vec<K>>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        let params = ListParams::default();
        if namespaces.is_empty() {
            let api: Api<K> = Api::all(self.client.clone());
            return Ok(api.list(&params).await?.items);
        }

        let mut items = Vec::new();
        for namespace in namespaces {
            let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
            let list = api
                .list(&params)
                .await
                .with_context(|| format!("namespace {namespace}"))?;
            items.extend(list.items);
        }
        Ok(items)
    }
}

#[async_trait]
impl ClusterQueryPort for KubeClusterQuery {
    async fn list_nodes(&self) -> Result<Vec<NodeInfo>> {
        let api: Api<Node> = Api::all(self.client.clone());
        let nodes = api.list(&ListParams::default()).await?;
        debug!(count = nodes.items.len(), "listed nodes");
        Ok(nodes.items.iter().map(mapping::node_info).collect())
    }

    async fn storage_health(&self, cluster: &StorageClusterRef) -> Result<Option<String>> {
        let gvk = GroupVersionKind::gvk(&cluster.group, &cluster.version, &cluster.kind);
        let resource = ApiResource::from_gvk_with_plural(&gvk, &cluster.plural);
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), &cluster.namespace, &resource);
        let object = api.get(&cluster.name).await.with_context(|| {
            format!(
                "{}/{} {}/{}",
                cluster.group, cluster.plural, cluster.namespace, cluster.name
            )
        })?;
        Ok(mapping::ceph_health(&object.data))
    }

    async fn list_deployments(&self, namespaces: &[String]) -> Result<Vec<RolloutStatus>> {
        let deployments = self.list_namespaced::<Deployment>(namespaces).await?;
        Ok(deployments.iter().map(mapping::deployment_status).collect())
    }

    async fn list_daemon_sets(&self, namespaces: &[String]) -> Result<Vec<RolloutStatus>> {
        let daemon_sets = self.list_namespaced::<DaemonSet>(namespaces).await?;
        Ok(daemon_sets.iter().map(mapping::daemon_set_status).collect())
    }
}
