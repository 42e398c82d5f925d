//! Per-invocation run state and the orchestrator's phase machine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::maintenance::MaintenanceKind;
use crate::target::Target;

/// Phase of one run.
///
/// `Discovering -> PreflightWaiting -> (Acting(i) -> PostWaiting(i))* -> Done`,
/// with `Failed` reachable from every non-terminal phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum RunPhase {
    Discovering,
    PreflightWaiting,
    Acting { index: usize },
    PostWaiting { index: usize },
    Done,
    Failed { cause: String },
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Done | RunPhase::Failed { .. })
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Discovering => f.write_str("discovering"),
            RunPhase::PreflightWaiting => f.write_str("preflight"),
            RunPhase::Acting { index } => write!(f, "acting[{index}]"),
            RunPhase::PostWaiting { index } => write!(f, "post-wait[{index}]"),
            RunPhase::Done => f.write_str("done"),
            RunPhase::Failed { cause } => write!(f, "failed: {cause}"),
        }
    }
}

/// Process-wide state for one run. Never persisted; the position only moves
/// forward.
#[derive(Debug, Clone)]
pub struct RunState {
    kind: MaintenanceKind,
    targets: Vec<Target>,
    position: usize,
    phase: RunPhase,
    failed_at: Option<usize>,
}

impl RunState {
    pub fn new(kind: MaintenanceKind) -> Self {
        Self {
            kind,
            targets: Vec::new(),
            position: 0,
            phase: RunPhase::Discovering,
            failed_at: None,
        }
    }

    pub fn kind(&self) -> MaintenanceKind {
        self.kind
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn phase(&self) -> &RunPhase {
        &self.phase
    }

    /// Number of targets whose post-action wait has completed.
    pub fn completed(&self) -> usize {
        self.position
    }

    /// Index of the target being worked on when the run failed.
    pub fn failed_at(&self) -> Option<usize> {
        self.failed_at
    }

    pub fn current_target(&self) -> Option<&Target> {
        self.targets.get(self.position)
    }

    /// Fix the target list and leave `Discovering`.
    pub fn discovered(&mut self, targets: Vec<Target>) {
        debug_assert_eq!(self.phase, RunPhase::Discovering);
        self.targets = targets;
        self.phase = RunPhase::PreflightWaiting;
    }

    /// Leave preflight, or the previous target's post-wait, for the next
    /// target. Returns `false` and enters `Done` when no target remains.
    pub fn begin_next_target(&mut self) -> bool {
        if self.position < self.targets.len() {
            self.phase = RunPhase::Acting {
                index: self.position,
            };
            true
        } else {
            self.phase = RunPhase::Done;
            false
        }
    }

    pub fn action_applied(&mut self) {
        if let RunPhase::Acting { index } = self.phase {
            self.phase = RunPhase::PostWaiting { index };
        }
    }

    pub fn target_converged(&mut self) {
        if let RunPhase::PostWaiting { index } = self.phase {
            self.position = index + 1;
        }
    }

    pub fn fail(&mut self, cause: impl Into<String>) {
        if !self.phase.is_terminal() {
            if let RunPhase::Acting { index } | RunPhase::PostWaiting { index } = self.phase {
                self.failed_at = Some(index);
            }
            self.phase = RunPhase::Failed {
                cause: cause.into(),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::build_target_list;

    #[test]
    fn walks_every_target_in_order() {
        let mut state = RunState::new(MaintenanceKind::Upgrade);
        state.discovered(build_target_list(["a", "b"], Vec::<String>::new()));
        assert_eq!(state.phase(), &RunPhase::PreflightWaiting);

        let mut visited = Vec::new();
        while state.begin_next_target() {
            visited.push(state.current_target().unwrap().address.clone());
            state.action_applied();
            assert!(matches!(state.phase(), RunPhase::PostWaiting { .. }));
            state.target_converged();
        }
        assert_eq!(visited, ["a", "b"]);
        assert_eq!(state.phase(), &RunPhase::Done);
        assert_eq!(state.completed(), 2);
    }

    #[test]
    fn failure_is_terminal() {
        let mut state = RunState::new(MaintenanceKind::Reboot);
        state.discovered(build_target_list(["a"], Vec::<String>::new()));
        state.begin_next_target();
        state.fail("runner failed");
        state.fail("second cause");
        assert_eq!(
            state.phase(),
            &RunPhase::Failed {
                cause: "runner failed".to_string()
            }
        );
        assert_eq!(state.completed(), 0);
        assert_eq!(state.failed_at(), Some(0));
    }

    #[test]
    fn empty_target_list_goes_straight_to_done() {
        let mut state = RunState::new(MaintenanceKind::Upgrade);
        state.discovered(Vec::new());
        assert!(!state.begin_next_target());
        assert_eq!(state.phase(), &RunPhase::Done);
    }
}
