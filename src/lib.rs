// src/lib.rs
//! memory-cipher — deterministic searchable encryption for sensitive memory-log text
//!
//! Features:
//! - AES-256-GCM envelopes (`HE_v2`) with content-derived nonces
//! - Equality queries without decryption, substring queries with it
//! - Read-only support and migration for legacy CBC envelopes (`HE_v1`)
//! - Purpose-scoped keys from a single master secret (PBKDF2 + SHA-256)
//! - Parallel batch operations
//! - Master secret and derived keys zeroized on drop

pub mod aliases;
pub mod batch;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod engine;
pub mod enums;
pub mod envelope;
pub mod error;
pub mod key_ops;
pub mod search;

// Re-export everything users need at the crate root
pub use aliases::{DerivedKey, MasterSecret};
pub use config::{load as load_config, Config};
pub use engine::{needs_migration, Engine};
pub use enums::{EnvelopeVersion, KeyPurpose};
pub use envelope::{is_encrypted, CiphertextEnvelope};
pub use error::{CoreError, Result};
pub use key_ops::KeyProvider;
pub use search::SearchOutcome;
