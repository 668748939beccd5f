// src/consts.rs
//! Shared constants — envelope markers and security parameters
//!
//! Everything here is part of the stored format. Changing a value makes
//! existing envelopes unreadable.

/// Version marker of the current authenticated format
pub const V2_MARKER: &str = "HE_v2";

/// Version marker of the deprecated CBC format (read-only)
pub const V1_MARKER: &str = "HE_v1";

/// Common stem of every version marker, used to tell "unknown version" from "not an envelope"
pub const MARKER_STEM: &str = "HE_v";

/// Field delimiter inside an envelope
pub const DELIMITER: char = ':';

/// Fields after the marker: iv, auth tag, ciphertext
pub const V2_FIELD_COUNT: usize = 3;

/// Fields after the marker: iv, ciphertext
pub const V1_FIELD_COUNT: usize = 2;

/// AES-256 key length in bytes
pub const KEY_LENGTH: usize = 32;

/// Nonce length for v2 (first 16 bytes of SHA-256 of the plaintext)
pub const IV_LENGTH: usize = 16;

/// GCM authentication tag length
pub const TAG_LENGTH: usize = 16;

/// PBKDF2 rounds for the v2 key hierarchy
pub const KDF_ITERATIONS: u32 = 100_000;

/// Fixed v2 salt — not configurable so envelopes stay portable across deployments
pub const KDF_SALT: &[u8] = b"memory-cipher/v2/kdf-salt";

/// PBKDF2 rounds of the legacy v1 key, kept exactly as originally shipped
pub const LEGACY_KDF_ITERATIONS: u32 = 10_000;

/// Salt of the legacy v1 key
pub const LEGACY_KDF_SALT: &[u8] = b"memory-cipher/v1/legacy-salt";

/// How much a late substring hit can lower the score (hit at the very end ≈ 0.7)
pub const SUBSTRING_POSITION_WEIGHT: f64 = 0.3;

/// Environment variable pointing at the TOML config file
pub const CONFIG_PATH_ENV: &str = "MEMCIPHER_CONFIG";

/// Config file looked up in the working directory when `MEMCIPHER_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "memory-cipher.toml";

/// Default environment variable holding the master secret
pub const DEFAULT_MASTER_KEY_ENV: &str = "MEMCIPHER_MASTER_KEY";

/// When set, dev keys from the config file are ignored
pub const TEST_MODE_ENV: &str = "MEMCIPHER_TEST_MODE";
