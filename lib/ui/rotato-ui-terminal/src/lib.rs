//! Terminal front end for rolling maintenance runs.

pub mod paths;

#[cfg(feature = "rotato-cli")]
pub mod cli;
