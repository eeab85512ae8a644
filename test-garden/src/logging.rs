//! Development-time tracing for debugging the pass loop.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: Dev diagnostics via `RUST_LOG`, output to stderr.
//!   Navigator decisions and pass boundaries show up here.
//!
//! - **Report lines (`io/report`)**: The `T:`/`P:`/`F:`/`E:` lines and the
//!   summary. Always emitted through a `Reporter`, unaffected by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber used by the demo binary.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` applies (the binary
/// passes `warn`, or `test_garden=debug` under `--trace`). Returns `false`
/// when a global subscriber was already installed, e.g. by a test harness.
///
/// # Example
/// ```bash
/// RUST_LOG=test_garden=trace cargo run -- --suite ftp
/// ```
pub fn init(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact().with_target(false))
        .try_init()
        .is_ok()
}
