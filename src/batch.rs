// src/batch.rs
//! Fan-out of single-item operations over collections
//!
//! Each item is processed independently on rayon's pool; no state is shared
//! beyond the read-only key cache. Output order matches input order.
//!
//! Failure policy: the whole batch fails. Every item is attempted, then the
//! first error in input order is returned and no partial output escapes.

use rayon::prelude::*;
use tracing::warn;

use crate::engine::Engine;
use crate::envelope::CiphertextEnvelope;
use crate::error::Result;
use crate::search::SearchOutcome;

/// Apply `op` to every item, in parallel when `parallel` is set
pub fn fan_out<T, R, F>(items: &[T], parallel: bool, op: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R> + Sync + Send,
{
    let results: Vec<Result<R>> = if parallel {
        items.par_iter().map(&op).collect()
    } else {
        items.iter().map(&op).collect()
    };

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        warn!(failed, total = items.len(), "batch rejected");
    }
    results.into_iter().collect()
}

pub fn encrypt_all<S>(engine: &Engine, values: &[S]) -> Result<Vec<CiphertextEnvelope>>
where
    S: AsRef<str> + Sync,
{
    fan_out(values, engine.is_parallel(), |v| engine.encrypt(v.as_ref()))
}

pub fn decrypt_all<S>(engine: &Engine, envelopes: &[S]) -> Result<Vec<String>>
where
    S: AsRef<str> + Sync,
{
    fan_out(envelopes, engine.is_parallel(), |e| engine.decrypt(e.as_ref()))
}

pub fn migrate_all<S>(engine: &Engine, envelopes: &[S]) -> Result<Vec<CiphertextEnvelope>>
where
    S: AsRef<str> + Sync,
{
    fan_out(envelopes, engine.is_parallel(), |e| engine.migrate(e.as_ref()))
}

pub fn query_all<S>(engine: &Engine, envelopes: &[S], term: &str) -> Result<Vec<SearchOutcome>>
where
    S: AsRef<str> + Sync,
{
    fan_out(envelopes, engine.is_parallel(), |e| {
        engine.query(e.as_ref(), term)
    })
}
