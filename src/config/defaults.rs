// src/config/defaults.rs
use crate::config::app::{Batch, Features, Keys};
use crate::consts::DEFAULT_MASTER_KEY_ENV;

pub fn default_master_key_env() -> String {
    DEFAULT_MASTER_KEY_ENV.into()
}

pub fn default_parallel() -> bool {
    true
}

pub fn default_keys() -> Keys {
    Keys {
        master_key_env: default_master_key_env(),
        dev_master_key: None,
    }
}

pub fn default_batch() -> Batch {
    Batch {
        parallel: default_parallel(),
    }
}

pub fn default_features() -> Features {
    Features {
        use_dev_keys: false,
    }
}
