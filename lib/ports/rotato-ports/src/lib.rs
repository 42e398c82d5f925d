//! Ports between the maintenance control loop and the outside world.
//!
//! The control loop only ever talks to the cluster and to the automation
//! runner through these traits, so every collaborator can be swapped for a
//! test double.

mod cluster;
mod probe;
mod runner;

pub use cluster::{ClusterQueryPort, ConditionStatus, NodeAddress, NodeInfo, RolloutStatus};
pub use probe::HealthProbe;
pub use runner::{AutomationRunnerPort, PlaybookRequest, RUNNER_SUCCESS_STATUS};
