// src/search.rs
//! Equality and substring queries over stored envelopes
//!
//! The fast path re-encrypts the query term with the same deterministic
//! engine and compares ciphertext fields, which answers "is this the whole
//! value" without touching plaintext. Anything else falls back to a full
//! decryption and a case-insensitive substring scan.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::SUBSTRING_POSITION_WEIGHT;
use crate::engine::{parse_stored, Engine};
use crate::envelope::CiphertextEnvelope;
use crate::error::Result;

/// Result of one query against one envelope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub matches: bool,
    /// 1.0 for a whole-value match, position-weighted for substring hits, 0 otherwise
    pub score: f64,
    pub via_decryption: bool,
}

impl SearchOutcome {
    pub const NO_MATCH: SearchOutcome = SearchOutcome {
        matches: false,
        score: 0.0,
        via_decryption: false,
    };

    pub const EXACT: SearchOutcome = SearchOutcome {
        matches: true,
        score: 1.0,
        via_decryption: false,
    };
}

/// Position-weighted score of `term` inside `plaintext`, case-insensitive.
///
/// `1.0 - (index / len) * 0.3`, with index and length counted in characters
/// of the original plaintext. `None` when the term does not occur.
pub fn substring_score(plaintext: &str, term: &str) -> Option<f64> {
    // Lowercasing can expand a char ('İ' -> "i̇"), so every byte of the
    // lowered text remembers which plaintext char produced it
    let mut haystack = String::with_capacity(plaintext.len());
    let mut origin = Vec::with_capacity(plaintext.len());
    for (index, ch) in plaintext.chars().enumerate() {
        haystack.extend(ch.to_lowercase());
        origin.resize(haystack.len(), index);
    }
    let needle: String = term.chars().flat_map(char::to_lowercase).collect();
    let byte_index = haystack.find(&needle)?;

    let total = plaintext.chars().count();
    if total == 0 {
        return Some(1.0);
    }
    let index = origin.get(byte_index).copied().unwrap_or(0);
    Some(1.0 - (index as f64 / total as f64) * SUBSTRING_POSITION_WEIGHT)
}

/// Evaluate `term` against one stored envelope. Never mutates anything.
pub fn evaluate(engine: &Engine, envelope: &str, term: &str) -> Result<SearchOutcome> {
    if envelope.is_empty() || term.is_empty() {
        return Ok(SearchOutcome::NO_MATCH);
    }

    let stored = parse_stored(envelope)?;

    if let CiphertextEnvelope::V2 { ciphertext, .. } = &stored {
        let probe = engine.encrypt(term)?;
        if probe.ciphertext() == ciphertext.as_slice() {
            debug!("search matched on ciphertext equality");
            return Ok(SearchOutcome::EXACT);
        }
    }

    let plaintext = engine.decrypt_envelope(&stored)?;
    let outcome = match substring_score(&plaintext, term) {
        Some(score) => SearchOutcome {
            matches: true,
            score,
            via_decryption: true,
        },
        None => SearchOutcome {
            via_decryption: true,
            ..SearchOutcome::NO_MATCH
        },
    };
    debug!(matches = outcome.matches, "search fell back to decryption");
    Ok(outcome)
}
