// src/config/app.rs
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::{debug, warn};

use super::defaults::*;
use crate::aliases::MasterSecret;
use crate::consts::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, TEST_MODE_ENV};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_keys")]
    pub keys: Keys,
    #[serde(default = "default_batch")]
    pub batch: Batch,
    #[serde(default = "default_features")]
    pub features: Features,
}

#[derive(Clone, Deserialize)]
pub struct Keys {
    /// Environment variable that holds the master secret
    #[serde(default = "default_master_key_env")]
    pub master_key_env: String,
    /// Development-only fallback, honored when `features.use_dev_keys` is on
    #[serde(default)]
    pub dev_master_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Batch {
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Features {
    #[serde(default)]
    pub use_dev_keys: bool,
}

impl std::fmt::Debug for Keys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keys")
            .field("master_key_env", &self.master_key_env)
            .field(
                "dev_master_key",
                &self.dev_master_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keys: default_keys(),
            batch: default_batch(),
            features: default_features(),
        }
    }
}

impl Config {
    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut conf: Config = toml::from_str(content)?;
        conf.apply_env_overrides();
        Ok(conf)
    }

    fn apply_env_overrides(&mut self) {
        // Test runs must never pick up a dev key from a stray config file
        if std::env::var_os(TEST_MODE_ENV).is_some() {
            self.features.use_dev_keys = false;
        }
    }

    /// Resolve the master secret: environment first, then the dev fallback
    pub fn master_secret(&self) -> Result<MasterSecret> {
        if let Some(value) = std::env::var_os(&self.keys.master_key_env) {
            let bytes = value.into_encoded_bytes();
            if !bytes.is_empty() {
                return Ok(MasterSecret::new(bytes));
            }
        }

        if self.features.use_dev_keys {
            if let Some(dev) = &self.keys.dev_master_key {
                warn!("using development master key from config");
                return Ok(MasterSecret::new(dev.as_bytes().to_vec()));
            }
        }

        Err(CoreError::MissingMasterSecret(format!(
            "set {} or enable features.use_dev_keys with keys.dev_master_key",
            self.keys.master_key_env
        )))
    }
}

/// Read a config file, or built-in defaults when the file does not exist
pub fn load_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        let mut conf = Config::default();
        conf.apply_env_overrides();
        return Ok(conf);
    }
    let content = std::fs::read_to_string(path)?;
    Config::from_toml(&content)
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Process-wide config, loaded once from `MEMCIPHER_CONFIG` (or the default path)
pub fn load() -> Result<&'static Config> {
    if let Some(conf) = CONFIG.get() {
        return Ok(conf);
    }
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let conf = load_from(path)?;
    Ok(CONFIG.get_or_init(|| conf))
}
