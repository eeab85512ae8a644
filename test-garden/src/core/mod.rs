//! Deterministic, pure logic shared by the garden.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod classifier;
pub mod filter;
pub mod ledger;
pub mod navigator;
pub mod types;
