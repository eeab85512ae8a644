//! Scenario suites bundled with the demo binary.

pub mod array;
pub mod ftp;
pub mod thing;
