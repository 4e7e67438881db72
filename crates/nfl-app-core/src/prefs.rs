// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved conversion preferences, one set per dialect.

use nfl_formats::{Registry, NFL_FORMAT};
use nfl_syntax::Dialect;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Key holding the dialect used when no dialect is requested.
pub const ACTIVE_DIALECT_KEY: &str = "dialect";

/// Key holding the [`ConvertPrefs`] of `dialect` (`convert.terse`, `convert.block`).
pub fn prefs_key(dialect: Dialect) -> String {
    format!("convert.{dialect}")
}

/// Defaults applied by the CLI when no flag overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertPrefs {
    /// Dialect these preferences belong to; implied by the storage key.
    #[serde(skip)]
    pub dialect: Dialect,
    /// Target format when converting from NFL without `--to`.
    pub format: String,
    /// Pack name stamped onto block-dialect conversions.
    pub pack_name: String,
    /// Pack version stamped onto block-dialect conversions.
    pub pack_version: String,
    /// Report skipped NFL lines instead of dropping them quietly.
    pub strict: bool,
}

impl Default for ConvertPrefs {
    fn default() -> Self {
        Self {
            dialect: Dialect::Terse,
            format: "jsonld".into(),
            pack_name: "Converted_Pack".into(),
            pack_version: "2025-07-04".into(),
            strict: false,
        }
    }
}

impl ConvertPrefs {
    /// Defaults for `dialect`.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// The default format must be a non-NFL format registered for the
    /// dialect, and the pack stamp needs a name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            key: prefs_key(self.dialect),
            reason,
        };
        let registered = Registry::for_dialect(self.dialect).get(&self.format).is_some();
        if self.format == NFL_FORMAT || !registered {
            return Err(invalid(format!(
                "'{}' is not a {} target format",
                self.format, self.dialect
            )));
        }
        if self.pack_name.trim().is_empty() {
            return Err(invalid("pack name is empty".into()));
        }
        Ok(())
    }
}

/// Blob stored under [`ACTIVE_DIALECT_KEY`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub(crate) struct ActiveDialect {
    pub(crate) dialect: Dialect,
}
