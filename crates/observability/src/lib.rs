//! Process-wide tracing setup shared by the server binary and tests.

/// Subscriber construction (filter, format).
pub mod tracing;

pub use crate::tracing::{DEFAULT_FILTER, init_with_filter};

/// Install the JSON subscriber, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; only the first call installs anything.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}
