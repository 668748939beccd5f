// tests/support.rs
//! Legacy fixture builder
//!
//! The crate never writes HE_v1, so fixtures are produced here with an
//! independent CBC encoder and the provider's legacy key.

#![allow(dead_code)]

use aes::Aes256;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use memory_cipher::KeyProvider;

pub const FIXED_IV: [u8; 16] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
    0x0f,
];

/// Raw CBC ciphertext of `plaintext` under the legacy key
pub fn cbc_encrypt(keys: &KeyProvider, iv: &[u8; 16], plaintext: &str) -> Vec<u8> {
    let key = keys.legacy_key();
    let len = plaintext.len();
    let mut buffer = vec![0u8; len + 16 - len % 16];
    buffer[..len].copy_from_slice(plaintext.as_bytes());
    cbc::Encryptor::<Aes256>::new_from_slices(key.expose_secret(), iv)
        .expect("legacy key and iv lengths")
        .encrypt_padded_mut::<Pkcs7>(&mut buffer, len)
        .expect("buffer sized for padding")
        .to_vec()
}

/// `HE_v1:<iv>:<ciphertext>` the way the old writer produced it
pub fn seal_v1(keys: &KeyProvider, iv: &[u8; 16], plaintext: &str) -> String {
    format!(
        "HE_v1:{}:{}",
        STANDARD.encode(iv),
        STANDARD.encode(cbc_encrypt(keys, iv, plaintext))
    )
}
