// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! NFL grammar: line-oriented graph descriptions in two surface dialects.
//!
//! - [`Dialect::Terse`]: one construct per line, pipe-separated clauses
//!   (`node:Alice|etikedo:"Alice Smith"|role:lead`). Trait clauses merge
//!   straight into the node's loose trait bag; relationships default to `""`.
//! - [`Dialect::Block`]: `pack:`/`node:`/`edge:` headers followed by indented
//!   `| key: value` lines, with named `| trait.<name>` sub-blocks;
//!   relationships default to `"relatedTo"`.
//!
//! Parsing is total. Lines that match no construct are dropped; use
//! [`parse_with_diagnostics`] to see which.

mod block;
pub mod props;
mod terse;
mod writer;

use std::fmt;
use std::str::FromStr;

use nfl_graph::{Graph, DEFAULT_RELATIONSHIP};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use writer::write;

/// Surface grammar selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Pipe-delimited single-line dialect.
    #[default]
    Terse,
    /// Indentation-block dialect with pack metadata and named traits.
    Block,
}

impl Dialect {
    /// Both dialects, terse first.
    pub const ALL: [Dialect; 2] = [Dialect::Terse, Dialect::Block];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Terse => "terse",
            Dialect::Block => "block",
        }
    }

    /// Relationship used when an edge line names none.
    pub fn default_relationship(self) -> &'static str {
        match self {
            Dialect::Terse => "",
            Dialect::Block => DEFAULT_RELATIONSHIP,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown dialect name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown NFL dialect: {0}")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "terse" | "pipe" => Ok(Dialect::Terse),
            "block" | "indent" => Ok(Dialect::Block),
            other => Err(UnknownDialect(other.to_owned())),
        }
    }
}

/// Why a line was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No construct matched.
    Unrecognized,
    /// Header line without an identifier.
    MissingId,
    /// `edge:` line whose endpoints could not be read.
    MalformedEdge,
    /// Property line without `key:`.
    MalformedProperty,
    /// Property or trait line with no open pack/node/edge to attach to.
    NoContext,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::Unrecognized => "unrecognized line",
            SkipReason::MissingId => "missing identifier",
            SkipReason::MalformedEdge => "malformed edge",
            SkipReason::MalformedProperty => "malformed property",
            SkipReason::NoContext => "nothing to attach to",
        })
    }
}

/// A dropped source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line_no: usize,
    /// The line as written (trailing whitespace removed).
    pub text: String,
    /// Classification.
    pub reason: SkipReason,
}

/// Graph plus the lines the parser could not use.
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    /// Parsed graph.
    pub graph: Graph,
    /// Dropped lines in source order.
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    skipped: Vec<SkippedLine>,
}

impl Diagnostics {
    pub(crate) fn skip(&mut self, line_no: usize, text: &str, reason: SkipReason) {
        tracing::trace!(line_no, %reason, "skipping NFL line");
        self.skipped.push(SkippedLine {
            line_no,
            text: text.trim_end().to_owned(),
            reason,
        });
    }
}

/// Lines with their 1-based numbers, skipping blanks and `#` comments.
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().enumerate().filter_map(|(idx, line)| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            None
        } else {
            Some((idx + 1, line))
        }
    })
}

/// Parse NFL text. Never fails; empty input yields an empty graph.
pub fn parse(text: &str, dialect: Dialect) -> Graph {
    parse_with_diagnostics(text, dialect).graph
}

/// Parse NFL text and report every dropped line.
pub fn parse_with_diagnostics(text: &str, dialect: Dialect) -> Parsed {
    let mut diag = Diagnostics::default();
    let graph = match dialect {
        Dialect::Terse => terse::parse(text, &mut diag),
        Dialect::Block => block::parse(text, &mut diag),
    };
    tracing::debug!(
        %dialect,
        nodes = graph.node_count(),
        edges = graph.edges().len(),
        skipped = diag.skipped.len(),
        "parsed NFL"
    );
    Parsed {
        graph,
        skipped: diag.skipped,
    }
}

/// Parse and re-emit in canonical form.
pub fn canonicalize(text: &str, dialect: Dialect) -> String {
    write(&parse(text, dialect), dialect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_names_round_trip() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.as_str().parse::<Dialect>(), Ok(dialect));
        }
        assert_eq!("pipe".parse::<Dialect>(), Ok(Dialect::Terse));
        assert!("xml".parse::<Dialect>().is_err());
    }

    #[test]
    fn empty_input_is_empty_graph() {
        for dialect in Dialect::ALL {
            let parsed = parse_with_diagnostics("", dialect);
            assert!(parsed.graph.is_empty());
            assert!(parsed.skipped.is_empty());
        }
    }

    #[test]
    fn comments_and_blanks_are_not_diagnosed() {
        let parsed = parse_with_diagnostics("# header\n\n   \n# more", Dialect::Terse);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn default_relationship_differs_per_dialect() {
        assert_eq!(Dialect::Terse.default_relationship(), "");
        assert_eq!(Dialect::Block.default_relationship(), "relatedTo");
    }
}
