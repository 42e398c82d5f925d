//! Shared formatting helpers used by the CLI.

mod problems;
mod report;
mod targets;

pub use problems::problem_lines;
pub use report::report_lines;
pub use targets::target_lines;
