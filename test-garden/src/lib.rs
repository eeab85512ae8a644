//! A garden of forking tests.
//!
//! Scenarios nest: an inner scenario shares every line of setup its ancestors
//! executed before reaching it. The shared setup is executed once for each
//! leaf that needs it, so a leaf never observes state mutated by a sibling.
//! Instead of suspending and resuming closures, the whole tree is re-run once
//! per leaf and a position vector steers each pass to the next unvisited leaf.
//!
//! The crate is split the same way as the rest of the workspace:
//!
//! - **[`core`]**: Pure, deterministic logic (navigation, filtering, outcome
//!   classification, teardown bookkeeping). No I/O.
//! - **[`io`]**: Report output and configuration files.
//!
//! [`Garden`] wires the two together and runs the pass loop. The free
//! functions in [`api`] give the same operations without threading a handle.
//!
//! ```no_run
//! use test_garden::{check, cleanup, scenario};
//!
//! scenario("array", || {
//!     let mut a: Vec<i32> = (0..=10).collect();
//!     cleanup(|| println!("array torn down"));
//!
//!     scenario("push", || {
//!         a.push(11);
//!         check!(a.len() == 12);
//!     });
//!
//!     scenario("fresh", || {
//!         check!(a.len() == 11, "setup re-ran, got {}", a.len());
//!     });
//! });
//! ```

pub mod api;
pub mod assert;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod garden;
pub mod io;
pub mod logging;
mod signal;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::api::{cleanup, configure, scenario, stub, try_cleanup};
pub use crate::assert::{AssertionFailed, fail};
pub use crate::core::classifier::IntoOutcome;
pub use crate::core::types::{Status, StatusCounters, Summary};
pub use crate::error::GardenError;
pub use crate::garden::Garden;
pub use crate::io::config::GardenConfig;
pub use crate::io::report::{Reporter, StdoutReporter};
