// tests/common.rs
//! Shared test utilities — logging setup and process-wide engines
//!
//! PBKDF2 costs 100k rounds per key, so every test in a binary shares the
//! same provider and pays it once.

#![allow(dead_code)]

use std::sync::OnceLock;

use memory_cipher::{Engine, KeyProvider};

#[cfg(feature = "logging")]
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const TEST_MASTER_SECRET: &[u8] = b"test-master-secret-2025";
pub const OTHER_MASTER_SECRET: &[u8] = b"a-completely-different-secret";

/// Initialize test-friendly logging. Idempotent.
pub fn setup() {
    #[cfg(feature = "logging")]
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

/// Engine over [`TEST_MASTER_SECRET`]
pub fn engine() -> &'static Engine {
    static ENGINE: OnceLock<Engine> = OnceLock::new();
    setup();
    ENGINE.get_or_init(|| {
        Engine::new(KeyProvider::from_bytes(TEST_MASTER_SECRET.to_vec()).expect("test secret"))
    })
}

/// Engine over [`OTHER_MASTER_SECRET`], for wrong-key tests
pub fn other_engine() -> &'static Engine {
    static ENGINE: OnceLock<Engine> = OnceLock::new();
    ENGINE.get_or_init(|| {
        Engine::new(KeyProvider::from_bytes(OTHER_MASTER_SECRET.to_vec()).expect("other secret"))
    })
}
