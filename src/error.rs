// src/error.rs
//! Public error type for the entire crate
//!
//! Every failure is terminal for the operation that raised it. Messages never
//! carry plaintext or key material.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Unsupported envelope version: {0}")]
    UnsupportedVersion(String),

    #[error("Decryption failed")]
    DecryptionFailure,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailure(String),

    #[error("Master secret not available: {0}")]
    MissingMasterSecret(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
