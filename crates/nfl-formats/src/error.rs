// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type for adapter dispatch and target-format reading.

use nfl_graph::{PackSchemaError, StoreError};
use thiserror::Error;

/// Everything a conversion can fail with. Reader errors are passed through
/// unchanged; a failed conversion yields no partial output.
#[derive(Debug, Error)]
pub enum FormatError {
    /// No adapter registered under this name.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    /// Adapter has no deserialize half.
    #[error("format '{0}' cannot be converted back to NFL")]
    NoReverse(String),
    /// Payload variant does not fit the adapter.
    #[error("format '{format}' expects {expected} content")]
    PayloadKind {
        /// Adapter name.
        format: &'static str,
        /// Human description of the accepted payload.
        expected: &'static str,
    },
    /// CSV header lacks a required column.
    #[error("missing CSV column '{0}'")]
    MissingColumn(&'static str),
    /// A required field/element/attribute is absent.
    #[error("{format}: missing required field '{field}'")]
    MissingField {
        /// Adapter name.
        format: &'static str,
        /// Field name.
        field: &'static str,
    },
    /// Turtle syntax error.
    #[error("turtle line {line}: {message}")]
    Turtle {
        /// 1-based source line.
        line: usize,
        /// Description.
        message: String,
    },
    /// JSON reader/writer failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML reader/writer failure.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// CSV reader/writer failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// XML reader failure.
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Example-pack contract violation.
    #[error("example pack: {0}")]
    PackSchema(#[from] PackSchemaError),
    /// Persistence collaborator failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
