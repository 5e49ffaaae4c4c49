//! Test Utilities Crate
//!
//! Shared test infrastructure for the ledger entity engine test suite:
//!
//! - `ledger`: `MemoryLedger`, an in-memory double for the `LedgerGateway`
//!   port with append-only per-key history and an offline switch
//! - `init_tracing`: opt-in tracing output for test debugging

pub mod ledger;

pub use ledger::MemoryLedger;

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes a tracing subscriber once per test binary
///
/// Honors `RUST_LOG`; silent by default so test output stays clean.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
