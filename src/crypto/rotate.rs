// src/crypto/rotate.rs
use crate::aliases::DerivedKey;
use crate::envelope::CiphertextEnvelope;
use crate::error::{CoreError, Result};

use super::{decrypt_legacy, encrypt_text};

/// One-time migration: `HE_v1` → `HE_v2` under the current text key.
///
/// Only v1 input is accepted. A v2 envelope is rejected with
/// `UnsupportedVersion`, so sweeping the same stored value twice is a no-op.
pub fn upgrade_from_legacy(
    envelope: &CiphertextEnvelope,
    legacy_key: &DerivedKey,
    key: &DerivedKey,
) -> Result<CiphertextEnvelope> {
    let CiphertextEnvelope::V1 { iv, ciphertext } = envelope else {
        return Err(CoreError::UnsupportedVersion(format!(
            "migration expects a v1 envelope, got {}",
            envelope.version()
        )));
    };

    let plaintext = decrypt_legacy(iv, ciphertext, legacy_key)?;
    encrypt_text(&plaintext, key)
}
