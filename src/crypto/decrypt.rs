// src/crypto/decrypt.rs
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::AeadInPlace;

use super::encrypt::cipher_for;
use crate::aliases::DerivedKey;
use crate::consts::{IV_LENGTH, TAG_LENGTH};
use crate::error::{CoreError, Result};

/// Verify and decrypt one v2 payload. The tag is checked before any
/// plaintext is released; a mismatch is `DecryptionFailure`.
pub fn decrypt_v2(
    iv: &[u8; IV_LENGTH],
    auth_tag: &[u8; TAG_LENGTH],
    ciphertext: &[u8],
    key: &DerivedKey,
) -> Result<String> {
    let cipher = cipher_for(key)?;
    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(iv),
            b"",
            &mut buffer,
            GenericArray::from_slice(auth_tag),
        )
        .map_err(|_| CoreError::DecryptionFailure)?;

    String::from_utf8(buffer).map_err(|_| CoreError::DecryptionFailure)
}
