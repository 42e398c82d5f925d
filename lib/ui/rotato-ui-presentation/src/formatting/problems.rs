use rotato_domain::RunError;

/// Diagnostics worth showing under a fatal error, beyond its message.
pub fn problem_lines(error: &RunError) -> Vec<String> {
    let timeout = match error {
        RunError::Preflight(timeout) => timeout,
        RunError::PostWait { source, .. } => source,
        _ => return Vec::new(),
    };
    timeout
        .last_details
        .iter()
        .map(|detail| format!("{}: {detail}", timeout.probe))
        .collect()
}
