// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Property clauses: `key:value` / `key:"value"`.

use nfl_graph::PropertyMap;

/// Remove one layer of surrounding double quotes when both are present.
pub fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Wrap a value in double quotes.
pub fn quote(value: &str) -> String {
    format!("\"{value}\"")
}

/// Quote only when a bare token would not read back unchanged.
pub fn quote_if_needed(value: &str) -> String {
    let ambiguous = value.is_empty()
        || value.trim() != value
        || (value.len() >= 2 && value.starts_with('"') && value.ends_with('"'));
    if ambiguous {
        quote(value)
    } else {
        value.to_owned()
    }
}

/// Header token (`node:`, `pack:`, edge endpoints): bare unless it is
/// empty or holds whitespace.
pub fn quote_token(token: &str) -> String {
    if token.is_empty() || token.contains(char::is_whitespace) {
        quote(token)
    } else {
        token.to_owned()
    }
}

/// Split one clause at its first colon. Returns `None` for blank clauses,
/// clauses without a colon, and clauses with an empty key.
pub fn parse_clause(clause: &str) -> Option<(String, String)> {
    let clause = clause.trim();
    let (key, value) = clause.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_owned(), strip_quotes(value.trim()).to_owned()))
}

/// Parse a pipe-separated run of clauses into an ordered bag. Later keys
/// overwrite earlier ones in place.
pub fn parse_props(clauses: &str) -> PropertyMap {
    clauses.split('|').filter_map(parse_clause).collect()
}

/// Remove every alias key from `props` and return the first non-empty value.
pub fn take_alias(props: &mut PropertyMap, aliases: &[&str]) -> Option<String> {
    let mut found = None;
    for alias in aliases {
        if let Some(value) = props.shift_remove(*alias) {
            if found.is_none() && !value.is_empty() {
                found = Some(value);
            }
        }
    }
    found
}
