// src/crypto/encrypt.rs
use aes::Aes256;
use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::AesGcm;
use sha2::{Digest, Sha256};

use crate::aliases::DerivedKey;
use crate::consts::{IV_LENGTH, TAG_LENGTH};
use crate::envelope::CiphertextEnvelope;
use crate::error::{CoreError, Result};

/// AES-256-GCM with a 128-bit nonce
pub(crate) type Aes256Gcm16 = AesGcm<Aes256, U16>;

pub(crate) fn cipher_for(key: &DerivedKey) -> Result<Aes256Gcm16> {
    Aes256Gcm16::new_from_slice(key.expose_secret()).map_err(|_| {
        CoreError::KeyDerivationFailure(format!(
            "derived key has {} bytes, AES-256 needs 32",
            key.expose_secret().len()
        ))
    })
}

/// Nonce = first 16 bytes of SHA-256(plaintext).
///
/// The same text under the same key always yields the same envelope, so two
/// stored values reveal whether they are equal.
pub fn derive_iv(plaintext: &[u8]) -> [u8; IV_LENGTH] {
    let digest = Sha256::digest(plaintext);
    let mut iv = [0u8; IV_LENGTH];
    iv.copy_from_slice(&digest[..IV_LENGTH]);
    iv
}

/// Encrypt UTF-8 text → `HE_v2` envelope
pub fn encrypt_text(plaintext: &str, key: &DerivedKey) -> Result<CiphertextEnvelope> {
    if plaintext.is_empty() {
        return Err(CoreError::InvalidInput("cannot encrypt an empty value".into()));
    }

    let iv = derive_iv(plaintext.as_bytes());
    let cipher = cipher_for(key)?;
    let mut buffer = plaintext.as_bytes().to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&iv), b"", &mut buffer)
        .map_err(|_| CoreError::InvalidInput("value too large to encrypt".into()))?;

    let mut auth_tag = [0u8; TAG_LENGTH];
    auth_tag.copy_from_slice(&tag);

    Ok(CiphertextEnvelope::V2 {
        iv,
        auth_tag,
        ciphertext: buffer,
    })
}

/// Same as [`encrypt_text`] for callers holding raw bytes; rejects non-UTF-8
pub fn encrypt_bytes(plaintext: &[u8], key: &DerivedKey) -> Result<CiphertextEnvelope> {
    let text = std::str::from_utf8(plaintext)
        .map_err(|e| CoreError::InvalidInput(format!("value is not UTF-8 text: {e}")))?;
    encrypt_text(text, key)
}
