// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for NFL tools (config storage, per-dialect
//! conversion prefs).
//! Keeps the CLI and any future front ends thin.

pub mod config;
pub mod prefs;
