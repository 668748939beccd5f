// src/envelope.rs
//! Text envelope codec
//!
//! ```text
//! HE_v2:<iv_b64>:<auth_tag_b64>:<ciphertext_b64>
//! HE_v1:<iv_b64>:<ciphertext_b64>
//! ```
//!
//! Fields are standard base64 with padding. Decoding is canonical, so any
//! string that parses encodes back to the exact same bytes.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::consts::{
    DELIMITER, IV_LENGTH, MARKER_STEM, TAG_LENGTH, V1_FIELD_COUNT, V2_FIELD_COUNT,
};
use crate::enums::EnvelopeVersion;
use crate::error::{CoreError, Result};

/// One stored encrypted value. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CiphertextEnvelope {
    V1 {
        iv: Vec<u8>,
        ciphertext: Vec<u8>,
    },
    V2 {
        iv: [u8; IV_LENGTH],
        auth_tag: [u8; TAG_LENGTH],
        ciphertext: Vec<u8>,
    },
}

/// True iff `value` carries a known version marker. Never fails.
pub fn is_encrypted(value: &str) -> bool {
    [EnvelopeVersion::V1, EnvelopeVersion::V2]
        .iter()
        .any(|v| {
            value
                .strip_prefix(v.marker())
                .is_some_and(|rest| rest.starts_with(DELIMITER))
        })
}

/// The version an envelope string claims, without validating its fields
pub fn envelope_version(value: &str) -> Option<EnvelopeVersion> {
    let (marker, _) = value.split_once(DELIMITER)?;
    EnvelopeVersion::from_marker(marker)
}

fn decode_field(name: &str, field: &str) -> Result<Vec<u8>> {
    if field.is_empty() {
        return Err(CoreError::MalformedEnvelope(format!("empty {name} field")));
    }
    STANDARD
        .decode(field)
        .map_err(|e| CoreError::MalformedEnvelope(format!("{name} is not valid base64: {e}")))
}

fn fixed_field<const N: usize>(name: &str, field: &str) -> Result<[u8; N]> {
    let bytes = decode_field(name, field)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        CoreError::MalformedEnvelope(format!("{name} must be {N} bytes, got {len}"))
    })
}

fn split_fields(rest: &str, expected: usize, version: EnvelopeVersion) -> Result<Vec<&str>> {
    let fields: Vec<&str> = rest.split(DELIMITER).collect();
    if fields.len() != expected {
        return Err(CoreError::MalformedEnvelope(format!(
            "{version} expects {expected} fields after the marker, got {}",
            fields.len()
        )));
    }
    Ok(fields)
}

impl CiphertextEnvelope {
    /// Parse a stored string.
    ///
    /// A `HE_v…` marker this crate does not know yields `UnsupportedVersion`;
    /// anything else that is not a well-formed envelope yields `MalformedEnvelope`.
    pub fn parse(value: &str) -> Result<Self> {
        let Some((marker, rest)) = value.split_once(DELIMITER) else {
            return Err(CoreError::MalformedEnvelope(
                "missing version marker delimiter".into(),
            ));
        };

        let version = match EnvelopeVersion::from_marker(marker) {
            Some(v) => v,
            None if marker.starts_with(MARKER_STEM) => {
                return Err(CoreError::UnsupportedVersion(marker.to_owned()));
            }
            None => {
                return Err(CoreError::MalformedEnvelope(
                    "unknown envelope marker".into(),
                ));
            }
        };

        match version {
            EnvelopeVersion::V2 => {
                let fields = split_fields(rest, V2_FIELD_COUNT, version)?;
                Ok(CiphertextEnvelope::V2 {
                    iv: fixed_field("iv", fields[0])?,
                    auth_tag: fixed_field("auth tag", fields[1])?,
                    ciphertext: decode_field("ciphertext", fields[2])?,
                })
            }
            EnvelopeVersion::V1 => {
                let fields = split_fields(rest, V1_FIELD_COUNT, version)?;
                Ok(CiphertextEnvelope::V1 {
                    iv: decode_field("iv", fields[0])?,
                    ciphertext: decode_field("ciphertext", fields[1])?,
                })
            }
        }
    }

    pub fn version(&self) -> EnvelopeVersion {
        match self {
            CiphertextEnvelope::V1 { .. } => EnvelopeVersion::V1,
            CiphertextEnvelope::V2 { .. } => EnvelopeVersion::V2,
        }
    }

    pub fn ciphertext(&self) -> &[u8] {
        match self {
            CiphertextEnvelope::V1 { ciphertext, .. } | CiphertextEnvelope::V2 { ciphertext, .. } => {
                ciphertext
            }
        }
    }

    /// Textual form for storage
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CiphertextEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = self.version().marker();
        match self {
            CiphertextEnvelope::V1 { iv, ciphertext } => write!(
                f,
                "{marker}{DELIMITER}{}{DELIMITER}{}",
                STANDARD.encode(iv),
                STANDARD.encode(ciphertext)
            ),
            CiphertextEnvelope::V2 {
                iv,
                auth_tag,
                ciphertext,
            } => write!(
                f,
                "{marker}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
                STANDARD.encode(iv),
                STANDARD.encode(auth_tag),
                STANDARD.encode(ciphertext)
            ),
        }
    }
}

impl FromStr for CiphertextEnvelope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
