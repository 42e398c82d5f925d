//! Playbook execution through the `ansible-runner` command line.

mod runner;
mod workspace;

pub use runner::AnsibleRunner;
