// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Storage port for preference blobs and the service that keeps
//! [`ConvertPrefs`] in it.
//!
//! Each dialect has its own blob under [`prefs_key`]; a separate
//! [`ACTIVE_DIALECT_KEY`] blob remembers which dialect was saved last so a
//! run without `--dialect` picks it up.

use nfl_syntax::Dialect;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::prefs::{prefs_key, ActiveDialect, ConvertPrefs, ACTIVE_DIALECT_KEY};

/// Storage port for raw JSON blobs keyed by name.
pub trait ConfigStore {
    /// Load a raw blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Blob is not the JSON we expect.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Store could not be located or opened.
    #[error("unavailable: {0}")]
    Unavailable(String),
    /// Key or stored value rejected.
    #[error("invalid {key}: {reason}")]
    Invalid {
        /// Offending key.
        key: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Loads and saves per-dialect [`ConvertPrefs`] through a [`ConfigStore`].
pub struct PrefsService<S> {
    store: S,
}

impl<S> PrefsService<S> {
    /// Create a service over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> PrefsService<S>
where
    S: ConfigStore,
{
    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Dialect of the last save; `terse` when nothing was saved.
    pub fn active_dialect(&self) -> Result<Dialect, ConfigError> {
        Ok(self
            .read::<ActiveDialect>(ACTIVE_DIALECT_KEY)?
            .unwrap_or_default()
            .dialect)
    }

    /// Validated prefs for `dialect`, or for the active dialect when `None`.
    /// Missing fields take their defaults.
    pub fn load(&self, dialect: Option<Dialect>) -> Result<ConvertPrefs, ConfigError> {
        let dialect = match dialect {
            Some(dialect) => dialect,
            None => self.active_dialect()?,
        };
        let mut prefs = self
            .read::<ConvertPrefs>(&prefs_key(dialect))?
            .unwrap_or_default();
        prefs.dialect = dialect;
        prefs.validate()?;
        Ok(prefs)
    }

    /// Validate `prefs`, store them under their dialect's key and make that
    /// dialect the active one.
    pub fn save(&self, prefs: &ConvertPrefs) -> Result<(), ConfigError> {
        prefs.validate()?;
        self.write(&prefs_key(prefs.dialect), prefs)?;
        self.write(
            ACTIVE_DIALECT_KEY,
            &ActiveDialect {
                dialect: prefs.dialect,
            },
        )
    }
}
