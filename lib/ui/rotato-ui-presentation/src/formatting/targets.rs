use rotato_domain::Target;

/// One numbered line per target, in processing order.
pub fn target_lines(targets: &[Target]) -> Vec<String> {
    let width = targets.len().to_string().len();
    targets
        .iter()
        .enumerate()
        .map(|(index, target)| {
            format!(
                "{:>width$}. {} ({})",
                index + 1,
                target.address,
                target.origin.as_str()
            )
        })
        .collect()
}
