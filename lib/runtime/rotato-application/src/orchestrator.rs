//! The fleet maintenance control loop.

use std::sync::Arc;

use tracing::{error, info};

use rotato_domain::{
    ConvergenceTimeout, Event, EventBus, EventLevel, MaintenanceKind, MaintenanceOutcome,
    RunError, RunReport, RunState, Target, build_target_list,
};
use rotato_ports::{ClusterQueryPort, HealthProbe};

use crate::action::MaintenanceExecutor;
use crate::convergence::ConvergenceWaiter;

/// Result of [`FleetOrchestrator::run`]: the report is produced either way.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    pub error: Option<RunError>,
}

impl RunOutcome {
    pub fn into_result(self) -> Result<RunReport, RunError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.report),
        }
    }
}

/// Sequences discovery, preflight, and per-target act/wait cycles.
///
/// Targets are processed one at a time in list order. The first fatal error
/// stops the run; later targets are never touched.
pub struct FleetOrchestrator {
    cluster: Arc<dyn ClusterQueryPort>,
    probes: Vec<Arc<dyn HealthProbe>>,
    waiter: ConvergenceWaiter,
    executor: MaintenanceExecutor,
    extra_hosts: Vec<String>,
}

impl FleetOrchestrator {
    pub fn new(
        cluster: Arc<dyn ClusterQueryPort>,
        probes: Vec<Arc<dyn HealthProbe>>,
        waiter: ConvergenceWaiter,
        executor: MaintenanceExecutor,
        extra_hosts: Vec<String>,
    ) -> Self {
        Self {
            cluster,
            probes,
            waiter,
            executor,
            extra_hosts,
        }
    }

    pub fn probe_names(&self) -> Vec<&str> {
        self.probes.iter().map(|probe| probe.name()).collect()
    }

    /// Discovered cluster members followed by the configured extra hosts.
    ///
    /// The member names are handed to every probe, so readiness checks keep
    /// accounting for a member that later drops out of the listing.
    pub async fn discover(&self) -> Result<Vec<Target>, RunError> {
        let nodes = self
            .cluster
            .list_nodes()
            .await
            .map_err(|err| RunError::Discovery { source: err.into() })?;
        let members: Vec<String> = nodes.iter().map(|node| node.name.clone()).collect();
        for probe in &self.probes {
            probe.expect_members(&members);
        }
        Ok(build_target_list(
            nodes
                .iter()
                .map(|node| node.maintenance_address().to_string()),
            self.extra_hosts.iter().cloned(),
        ))
    }

    pub async fn run(&self, kind: MaintenanceKind) -> RunOutcome {
        let mut state = RunState::new(kind);
        let mut events = EventBus::default();
        events.push(Event::new(
            EventLevel::Info,
            format!("Starting {kind} run"),
        ));

        let error = match self.drive(&mut state, &mut events).await {
            Ok(()) => {
                info!(targets = state.targets().len(), "{kind} run complete");
                events.push(Event::new(
                    EventLevel::Info,
                    format!("Completed {kind} of {} targets", state.completed()),
                ));
                None
            }
            Err(err) => {
                let cause = error_chain(&err);
                error!(phase = %state.phase(), "{kind} run failed: {cause}");
                state.fail(cause.clone());
                events.push(Event::new(EventLevel::Error, cause));
                Some(err)
            }
        };

        RunOutcome {
            report: RunReport::from_state(&state, &events),
            error,
        }
    }

    async fn drive(&self, state: &mut RunState, events: &mut EventBus) -> Result<(), RunError> {
        let targets = self.discover().await?;
        info!(count = targets.len(), "discovered targets");
        events.push(Event::new(
            EventLevel::Info,
            format!("Discovered {} targets", targets.len()),
        ));
        state.discovered(targets);

        self.wait_for_all(events, "preflight")
            .await
            .map_err(RunError::Preflight)?;

        while state.begin_next_target() {
            let Some(target) = state.current_target().cloned() else {
                break;
            };
            events.push(Event::new(
                EventLevel::Info,
                format!("Applying {} to {target}", state.kind()),
            ));

            if let MaintenanceOutcome::Failed(source) =
                self.executor.apply(&target, state.kind()).await
            {
                return Err(RunError::Action {
                    target: target.address,
                    source,
                });
            }
            state.action_applied();

            self.wait_for_all(events, &target.address)
                .await
                .map_err(|source| RunError::PostWait {
                    target: target.address.clone(),
                    source,
                })?;
            state.target_converged();
            events.push(Event::new(
                EventLevel::Info,
                format!("{target} done ({}/{})", state.completed(), state.targets().len()),
            ));
        }
        Ok(())
    }

    /// Wait on every probe in declared order; the first timeout wins.
    async fn wait_for_all(
        &self,
        events: &mut EventBus,
        stage: &str,
    ) -> Result<(), ConvergenceTimeout> {
        for probe in &self.probes {
            let convergence = self.waiter.wait_for(probe.as_ref()).await?;
            events.push(Event::new(
                EventLevel::Info,
                format!(
                    "{stage}: {} converged after {} attempts",
                    probe.name(),
                    convergence.attempts
                ),
            ));
        }
        Ok(())
    }
}

fn error_chain(err: &RunError) -> String {
    anyhow::Chain::new(err)
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}
