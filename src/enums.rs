// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the tags that end up in derived keys or in stored
//! envelopes: key purposes and envelope versions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{V1_MARKER, V2_MARKER};

/// Domain-separation tag for key derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum KeyPurpose {
    TextEncryption,
    NumericEncryption,
    SearchIndexing,
}

impl KeyPurpose {
    /// Label mixed into the derived key. Part of the stored format.
    pub const fn label(self) -> &'static str {
        match self {
            KeyPurpose::TextEncryption => "text-encryption",
            KeyPurpose::NumericEncryption => "numeric-encryption",
            KeyPurpose::SearchIndexing => "search-indexing",
        }
    }
}

impl fmt::Display for KeyPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// On-disk envelope versions this crate can read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnvelopeVersion {
    /// AES-256-CBC, no authentication. Decrypt-only.
    V1,
    /// AES-256-GCM with a content-derived nonce.
    V2,
}

impl EnvelopeVersion {
    pub const CURRENT: EnvelopeVersion = EnvelopeVersion::V2;

    pub const fn marker(self) -> &'static str {
        match self {
            EnvelopeVersion::V1 => V1_MARKER,
            EnvelopeVersion::V2 => V2_MARKER,
        }
    }

    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            V1_MARKER => Some(EnvelopeVersion::V1),
            V2_MARKER => Some(EnvelopeVersion::V2),
            _ => None,
        }
    }
}

impl fmt::Display for EnvelopeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}
