// src/key_ops.rs
//! Key derivation — one master secret, many purpose-scoped keys
//!
//! Two stages for the v2 hierarchy:
//! 1. PBKDF2-HMAC-SHA256 stretches the master secret with a fixed salt.
//! 2. The stretched material is bound to a [`KeyPurpose`] by hashing it with
//!    the purpose label; blocks are chained with a big-endian counter until
//!    the requested length is reached.
//!
//! The legacy v1 key uses its own salt and round count and no purpose binding.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, TryLockError};

use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::aliases::{DerivedKey, MasterSecret};
use crate::config::Config;
use crate::consts::{
    KDF_ITERATIONS, KDF_SALT, KEY_LENGTH, LEGACY_KDF_ITERATIONS, LEGACY_KDF_SALT,
};
use crate::enums::KeyPurpose;
use crate::error::{CoreError, Result};

/// Stretch the master secret. Output is always [`KEY_LENGTH`] bytes.
fn stretch(master: &[u8], salt: &[u8], rounds: u32) -> Vec<u8> {
    let mut material = vec![0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(master, salt, rounds, &mut material);
    material
}

/// Bind stretched material to a purpose and cut it to `length` bytes.
fn bind_purpose(material: &[u8], purpose: KeyPurpose, length: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(length + KEY_LENGTH);
    let mut counter: u32 = 0;
    while out.len() < length {
        let block = Sha256::new()
            .chain_update(material)
            .chain_update(purpose.label().as_bytes())
            .chain_update(counter.to_be_bytes())
            .finalize();
        out.extend_from_slice(&block);
        counter += 1;
    }
    out.truncate(length);
    out
}

/// Pure derivation of a purpose key. Slow: runs the full PBKDF2 stretch.
pub fn derive_key(master: &[u8], purpose: KeyPurpose, length: usize) -> Result<Vec<u8>> {
    if length == 0 {
        return Err(CoreError::KeyDerivationFailure(
            "requested key length must be positive".into(),
        ));
    }
    let mut material = stretch(master, KDF_SALT, KDF_ITERATIONS);
    let key = bind_purpose(&material, purpose, length);
    material.fill(0);
    Ok(key)
}

/// Pure derivation of the legacy v1 key.
pub fn derive_legacy_key(master: &[u8]) -> Vec<u8> {
    stretch(master, LEGACY_KDF_SALT, LEGACY_KDF_ITERATIONS)
}

/// Owns the master secret and hands out derived keys.
///
/// Built once at startup and shared (`Arc`) by every engine. Derived keys are
/// cached per `(purpose, length)`; the cache lock is held while deriving so
/// PBKDF2 runs at most once per entry.
pub struct KeyProvider {
    master: MasterSecret,
    cache: Mutex<HashMap<(KeyPurpose, usize), Arc<DerivedKey>>>,
    legacy: OnceLock<Arc<DerivedKey>>,
}

impl KeyProvider {
    pub fn new(master: MasterSecret) -> Result<Self> {
        if master.expose_secret().is_empty() {
            return Err(CoreError::MissingMasterSecret(
                "master secret must not be empty".into(),
            ));
        }
        Ok(Self {
            master,
            cache: Mutex::new(HashMap::new()),
            legacy: OnceLock::new(),
        })
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::new(MasterSecret::new(bytes.into()))
    }

    /// Resolve the master secret the way [`Config`] describes and wrap it
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.master_secret()?)
    }

    /// Get (or compute once) the key for `purpose`
    pub fn derive(&self, purpose: KeyPurpose, length: usize) -> Result<Arc<DerivedKey>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(key) = cache.get(&(purpose, length)) {
            return Ok(Arc::clone(key));
        }

        info!(%purpose, length, "deriving purpose key");
        let key = Arc::new(DerivedKey::new(derive_key(
            self.master.expose_secret(),
            purpose,
            length,
        )?));
        cache.insert((purpose, length), Arc::clone(&key));
        Ok(key)
    }

    /// 256-bit key for the default purpose of this crate
    pub fn text_key(&self) -> Result<Arc<DerivedKey>> {
        self.derive(KeyPurpose::TextEncryption, KEY_LENGTH)
    }

    /// Key for reading `HE_v1` envelopes
    pub fn legacy_key(&self) -> Arc<DerivedKey> {
        let key = self.legacy.get_or_init(|| {
            debug!("deriving legacy v1 key");
            Arc::new(DerivedKey::new(derive_legacy_key(
                self.master.expose_secret(),
            )))
        });
        Arc::clone(key)
    }
}

impl fmt::Debug for KeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never wait on a derivation in progress
        let cached = match self.cache.try_lock() {
            Ok(cache) => cache.len().to_string(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().len().to_string(),
            Err(TryLockError::WouldBlock) => "busy".to_owned(),
        };
        f.debug_struct("KeyProvider")
            .field("master", &"[REDACTED]")
            .field("cached_keys", &format_args!("{cached}"))
            .field("legacy_derived", &self.legacy.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_purpose_is_deterministic() {
        let material = [0x42u8; 32];
        let a = bind_purpose(&material, KeyPurpose::TextEncryption, 32);
        let b = bind_purpose(&material, KeyPurpose::TextEncryption, 32);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn purposes_are_domain_separated() {
        let material = [0x42u8; 32];
        let text = bind_purpose(&material, KeyPurpose::TextEncryption, 32);
        let numeric = bind_purpose(&material, KeyPurpose::NumericEncryption, 32);
        let search = bind_purpose(&material, KeyPurpose::SearchIndexing, 32);
        assert_ne!(text, numeric);
        assert_ne!(text, search);
        assert_ne!(numeric, search);
    }

    #[test]
    fn longer_keys_extend_shorter_ones() {
        let material = [7u8; 32];
        let short = bind_purpose(&material, KeyPurpose::TextEncryption, 16);
        let long = bind_purpose(&material, KeyPurpose::TextEncryption, 80);
        assert_eq!(long.len(), 80);
        assert_eq!(&long[..16], short.as_slice());
    }

    #[test]
    fn first_block_is_plain_sha256_of_material_label_counter() {
        let material = [1u8; 32];
        let mut input = material.to_vec();
        input.extend_from_slice(b"search-indexing");
        input.extend_from_slice(&0u32.to_be_bytes());
        let expected = Sha256::digest(&input);
        assert_eq!(
            bind_purpose(&material, KeyPurpose::SearchIndexing, 32),
            expected.to_vec()
        );
    }

    #[test]
    fn zero_length_is_rejected() {
        let err = derive_key(b"secret", KeyPurpose::TextEncryption, 0).unwrap_err();
        assert!(matches!(err, CoreError::KeyDerivationFailure(_)));
    }

    #[test]
    fn empty_master_secret_is_rejected() {
        let err = KeyProvider::from_bytes(Vec::new()).unwrap_err();
        assert!(matches!(err, CoreError::MissingMasterSecret(_)));
    }

    #[test]
    fn debug_does_not_wait_for_the_cache_lock() {
        let provider = KeyProvider::from_bytes(b"secret".to_vec()).unwrap();
        let held = provider.cache.lock().unwrap();
        let rendered = format!("{provider:?}");
        drop(held);
        assert!(rendered.contains("cached_keys: busy"), "{rendered}");
        assert!(format!("{provider:?}").contains("cached_keys: 0"));
    }

    #[test]
    fn debug_output_never_shows_the_secret() {
        let provider = KeyProvider::from_bytes(b"super-secret-value".to_vec()).unwrap();
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("REDACTED"));
    }
}
