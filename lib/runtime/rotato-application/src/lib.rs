//! The maintenance control loop: health probes, convergence waits, per-target
//! actions, and the orchestrator that sequences them.

pub mod action;
pub mod convergence;
pub mod orchestrator;
pub mod probes;

pub use action::MaintenanceExecutor;
pub use convergence::{Convergence, ConvergenceWaiter};
pub use orchestrator::{FleetOrchestrator, RunOutcome};
pub use probes::{ClusterProbe, build_probes};

#[cfg(test)]
mod test_support;
