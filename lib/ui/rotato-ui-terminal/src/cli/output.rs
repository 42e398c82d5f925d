use anyhow::Result;

use rotato_domain::{ConvergencePolicy, MaintenanceKind, RunError, RunReport, Target};
use rotato_ui_presentation::formatting::{problem_lines, report_lines, target_lines};

pub fn print_plan(
    kind: MaintenanceKind,
    playbook: &str,
    probes: &[&str],
    policy: &ConvergencePolicy,
    targets: &[Target],
) {
    println!("{kind} plan ({playbook}), {} targets:", targets.len());
    for line in target_lines(targets) {
        println!("  {line}");
    }
    println!(
        "Gates: {} ({} of {} readings, every {}s)",
        probes.join(", "),
        policy.required_successes(),
        policy.max_attempts(),
        policy.poll_interval().as_secs()
    );
}

pub fn print_report(report: &RunReport, error: Option<&RunError>) {
    for line in report_lines(report) {
        println!("{line}");
    }
    if let Some(error) = error {
        for line in problem_lines(error) {
            eprintln!("  {line}");
        }
    }
}

pub fn print_json(report: &RunReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
