// src/engine.rs
//! The public face of the crate — what memory-log consumers call
//!
//! ```no_run
//! use memory_cipher::{Engine, KeyProvider};
//!
//! let engine = Engine::new(KeyProvider::from_bytes(b"from-your-secret-store".to_vec())?);
//! let stored = engine.encrypt_to_string("123 Main Street")?;
//! assert_eq!(engine.decrypt(&stored)?, "123 Main Street");
//! assert!(engine.query(&stored, "main")?.matches);
//! # Ok::<(), memory_cipher::CoreError>(())
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::aliases::DerivedKey;
use crate::batch;
use crate::config::Config;
use crate::crypto::{
    decrypt_legacy, decrypt_v2, encrypt_bytes, encrypt_text, upgrade_from_legacy,
};
use crate::envelope::{envelope_version, CiphertextEnvelope};
use crate::enums::EnvelopeVersion;
use crate::error::{CoreError, Result};
use crate::key_ops::KeyProvider;
use crate::search::{self, SearchOutcome};

/// Deterministic searchable encryption over one [`KeyProvider`].
///
/// Cheap to clone; clones share the provider and its key cache.
#[derive(Debug, Clone)]
pub struct Engine {
    keys: Arc<KeyProvider>,
    parallel: bool,
}

impl Engine {
    pub fn new(keys: KeyProvider) -> Self {
        Self::with_shared_keys(Arc::new(keys))
    }

    pub fn with_shared_keys(keys: Arc<KeyProvider>) -> Self {
        Self {
            keys,
            parallel: true,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(KeyProvider::from_config(config)?).with_parallel(config.batch.parallel))
    }

    /// Toggle rayon fan-out for batch calls. Results are identical either way.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn keys(&self) -> &KeyProvider {
        &self.keys
    }

    fn text_key(&self) -> Result<Arc<DerivedKey>> {
        self.keys.text_key()
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<CiphertextEnvelope> {
        let envelope = encrypt_text(plaintext, &*self.text_key()?)?;
        debug!(len = plaintext.len(), "encrypted value");
        Ok(envelope)
    }

    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<CiphertextEnvelope> {
        encrypt_bytes(plaintext, &*self.text_key()?)
    }

    /// [`Engine::encrypt`] straight to the stored string form
    pub fn encrypt_to_string(&self, plaintext: &str) -> Result<String> {
        Ok(self.encrypt(plaintext)?.encode())
    }

    /// Parse and decrypt a stored string (v1 or v2)
    pub fn decrypt(&self, envelope: &str) -> Result<String> {
        self.decrypt_envelope(&parse_stored(envelope)?)
    }

    pub fn decrypt_envelope(&self, envelope: &CiphertextEnvelope) -> Result<String> {
        debug!(version = %envelope.version(), "decrypting value");
        match envelope {
            CiphertextEnvelope::V2 {
                iv,
                auth_tag,
                ciphertext,
            } => decrypt_v2(iv, auth_tag, ciphertext, &*self.text_key()?),
            CiphertextEnvelope::V1 { iv, ciphertext } => {
                decrypt_legacy(iv, ciphertext, &self.keys.legacy_key())
            }
        }
    }

    pub fn batch_encrypt<S>(&self, values: &[S]) -> Result<Vec<CiphertextEnvelope>>
    where
        S: AsRef<str> + Sync,
    {
        batch::encrypt_all(self, values)
    }

    pub fn batch_decrypt<S>(&self, envelopes: &[S]) -> Result<Vec<String>>
    where
        S: AsRef<str> + Sync,
    {
        batch::decrypt_all(self, envelopes)
    }

    /// Equality / substring query; see [`crate::search`]
    pub fn query(&self, envelope: &str, term: &str) -> Result<SearchOutcome> {
        search::evaluate(self, envelope, term)
    }

    pub fn query_many<S>(&self, envelopes: &[S], term: &str) -> Result<Vec<SearchOutcome>>
    where
        S: AsRef<str> + Sync,
    {
        batch::query_all(self, envelopes, term)
    }

    /// Upgrade a `HE_v1` envelope. Anything else is `UnsupportedVersion`.
    pub fn migrate(&self, envelope: &str) -> Result<CiphertextEnvelope> {
        let parsed = parse_stored(envelope)?;
        let upgraded = upgrade_from_legacy(&parsed, &self.keys.legacy_key(), &*self.text_key()?)?;
        debug!("migrated v1 envelope");
        Ok(upgraded)
    }

    pub fn migrate_all<S>(&self, envelopes: &[S]) -> Result<Vec<CiphertextEnvelope>>
    where
        S: AsRef<str> + Sync,
    {
        batch::migrate_all(self, envelopes)
    }

    /// Decrypt then encrypt under the current key and format.
    ///
    /// With an unchanged key a v2 input comes back byte-identical; v1 input
    /// comes back upgraded.
    pub fn reencrypt(&self, envelope: &str) -> Result<CiphertextEnvelope> {
        let plaintext = self.decrypt(envelope)?;
        self.encrypt(&plaintext)
    }
}

/// True when `value` is a stored envelope that [`Engine::migrate`] would accept
pub fn needs_migration(value: &str) -> bool {
    matches!(envelope_version(value), Some(v) if v < EnvelopeVersion::CURRENT)
}

/// Parse a stored value for reading.
///
/// A v1 value that fails to parse is reported like any other legacy read
/// failure (`DecryptionFailure`); v2 and unknown markers keep the codec error.
pub(crate) fn parse_stored(value: &str) -> Result<CiphertextEnvelope> {
    match CiphertextEnvelope::parse(value) {
        Err(CoreError::MalformedEnvelope(reason))
            if envelope_version(value) == Some(EnvelopeVersion::V1) =>
        {
            debug!(%reason, "unreadable v1 envelope");
            Err(CoreError::DecryptionFailure)
        }
        other => other,
    }
}
