// src/crypto/mod.rs
//! Pure cryptographic operations — no I/O, no configuration
//!
//! All functions work on in-memory values and explicit keys.
mod decrypt;
mod encrypt;
mod legacy;
mod rotate;

pub use decrypt::decrypt_v2;
pub use encrypt::{derive_iv, encrypt_bytes, encrypt_text};
pub use legacy::decrypt_legacy;
pub use rotate::upgrade_from_legacy;
