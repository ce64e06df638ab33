//! Shared setup for integration tests.
//!
//! Build with `--features tracing` to see the tree's own events. Filtering is
//! controlled with `RUST_LOG` (default `bstree=debug`):
//!
//! ```bash
//! RUST_LOG=bstree=trace cargo test --features tracing -- --nocapture
//! ```

#![allow(dead_code)]

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Ensures tracing is only initialized once across all tests.
static INIT: Once = Once::new();

/// Default filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "bstree=debug";

/// Install a fmt subscriber that writes through the test harness so output is
/// captured per test. Safe to call from every test; only the first call does anything.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
