use serde::Serialize;

use crate::events::{Event, EventBus};
use crate::maintenance::MaintenanceKind;
use crate::run::{RunPhase, RunState};
use crate::target::Target;

/// What a run did, returned whether it finished or failed.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub kind: MaintenanceKind,
    pub targets: Vec<Target>,
    pub completed: usize,
    pub failed_at: Option<usize>,
    pub phase: RunPhase,
    pub events: Vec<Event>,
}

impl RunReport {
    pub fn from_state(state: &RunState, events: &EventBus) -> Self {
        Self {
            kind: state.kind(),
            targets: state.targets().to_vec(),
            completed: state.completed(),
            failed_at: state.failed_at(),
            phase: state.phase().clone(),
            events: events.events().to_vec(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.phase == RunPhase::Done
    }

    /// Targets never reached because the run stopped early.
    pub fn untouched(&self) -> &[Target] {
        let start = match self.failed_at {
            Some(index) => index + 1,
            None => self.completed,
        };
        self.targets.get(start..).unwrap_or(&[])
    }
}
