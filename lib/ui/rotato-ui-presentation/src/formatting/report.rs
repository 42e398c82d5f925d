use rotato_domain::{RunPhase, RunReport};

/// Summary printed at the end of a run.
pub fn report_lines(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();
    let total = report.targets.len();
    match &report.phase {
        RunPhase::Done => lines.push(format!(
            "{} complete: {}/{} targets",
            report.kind, report.completed, total
        )),
        RunPhase::Failed { cause } => {
            lines.push(format!(
                "{} failed after {}/{} targets",
                report.kind, report.completed, total
            ));
            lines.push(format!("cause: {cause}"));
            if let Some(target) = report.failed_at.and_then(|index| report.targets.get(index)) {
                lines.push(format!("stopped at: {}", target.address));
            }
            let untouched = report.untouched();
            if !untouched.is_empty() {
                let addresses: Vec<&str> = untouched.iter().map(|t| t.address.as_str()).collect();
                lines.push(format!("not attempted: {}", addresses.join(", ")));
            }
        }
        phase => lines.push(format!("{} interrupted during {phase}", report.kind)),
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotato_domain::{EventBus, MaintenanceKind, RunState, build_target_list};

    #[test]
    fn failed_run_names_stop_point_and_remaining_targets() {
        let mut state = RunState::new(MaintenanceKind::Reboot);
        state.discovered(build_target_list(["10.0.0.1", "10.0.0.2"], ["10.0.9.9"]));
        state.begin_next_target();
        state.action_applied();
        state.target_converged();
        state.begin_next_target();
        state.fail("maintenance of 10.0.0.2 failed");
        let report = RunReport::from_state(&state, &EventBus::default());

        assert_eq!(
            report_lines(&report),
            [
                "reboot failed after 1/3 targets",
                "cause: maintenance of 10.0.0.2 failed",
                "stopped at: 10.0.0.2",
                "not attempted: 10.0.9.9",
            ]
        );
    }

    #[test]
    fn finished_run_is_one_line() {
        let mut state = RunState::new(MaintenanceKind::Upgrade);
        state.discovered(build_target_list(["10.0.0.1"], Vec::<String>::new()));
        while state.begin_next_target() {
            state.action_applied();
            state.target_converged();
        }
        let report = RunReport::from_state(&state, &EventBus::default());
        assert_eq!(report_lines(&report), ["upgrade complete: 1/1 targets"]);
    }
}
