//! Side-effecting edges of the garden: report output and config files.

pub mod config;
pub mod report;
