// src/crypto/legacy.rs
//! `HE_v1` reader — AES-256-CBC with PKCS#7 padding, no authentication.
//!
//! Nothing in this crate writes v1 any more; old envelopes are read here and
//! upgraded through [`super::upgrade_from_legacy`].

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};

use crate::aliases::DerivedKey;
use crate::error::{CoreError, Result};

type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Decrypt a v1 payload. Every failure, including a wrong IV length, is
/// reported as `DecryptionFailure`.
pub fn decrypt_legacy(iv: &[u8], ciphertext: &[u8], key: &DerivedKey) -> Result<String> {
    let decryptor = Aes256CbcDec::new_from_slices(key.expose_secret(), iv)
        .map_err(|_| CoreError::DecryptionFailure)?;

    let mut buffer = ciphertext.to_vec();
    let plaintext = decryptor
        .decrypt_padded_mut::<Pkcs7>(&mut buffer)
        .map_err(|_| CoreError::DecryptionFailure)?;

    String::from_utf8(plaintext.to_vec()).map_err(|_| CoreError::DecryptionFailure)
}

#[cfg(test)]
pub(crate) fn seal_legacy(plaintext: &str, iv: &[u8; 16], key: &DerivedKey) -> Vec<u8> {
    use cbc::cipher::BlockEncryptMut;

    let len = plaintext.len();
    let mut buffer = vec![0u8; len + 16 - len % 16];
    buffer[..len].copy_from_slice(plaintext.as_bytes());
    cbc::Encryptor::<Aes256>::new_from_slices(key.expose_secret(), iv)
        .unwrap()
        .encrypt_padded_mut::<Pkcs7>(&mut buffer, len)
        .unwrap()
        .to_vec()
}
