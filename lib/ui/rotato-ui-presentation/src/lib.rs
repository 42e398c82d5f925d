//! Presentation helpers shared by terminal front ends.

pub mod formatting;
