//! Cluster queries over the Kubernetes API.

mod cluster;
mod mapping;

pub use cluster::KubeClusterQuery;
