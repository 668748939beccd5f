// src/config/mod.rs
//! Configuration for memory-cipher
//!
//! Lazy-loaded global config from TOML, with the master secret itself read
//! from the environment.

pub use app::{load, load_from, Batch, Config, Features, Keys};

mod app;
mod defaults;
