//! Testing infrastructure for reportkit integration tests.
//!
//! This crate provides utilities for writing integration tests without a
//! server:
//! - `MockTransport`: scripted in-memory transport that records requests
//! - `fixtures`: JSON builders and paged-collection handlers
//! - `assertions`: checks on recorded requests

pub mod assertions;
pub mod fixtures;
pub mod mock;

pub use mock::MockTransport;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a `RUST_LOG`-driven fmt subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
