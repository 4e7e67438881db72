// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand bodies.
#![allow(clippy::print_stdout)]

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use comfy_table::Table;
use nfl_app_core::prefs::ConvertPrefs;
use nfl_formats::{ConvertOptions, Converter, Payload, Registry, NFL_FORMAT};
use nfl_syntax::{parse_with_diagnostics, Dialect, Parsed};

use crate::{CheckArgs, ConvertArgs};

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
        }
        None => io::read_to_string(io::stdin()).context("read stdin"),
    }
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}

fn emit(output: Option<&PathBuf>, text: &str) -> Result<()> {
    match output {
        Some(path) => write_file(path, text),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("write stdout")?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n").context("write stdout")?;
            }
            Ok(())
        }
    }
}

fn report_skipped(parsed: &Parsed, strict: bool) -> Result<()> {
    for skipped in &parsed.skipped {
        tracing::warn!(line = skipped.line_no, reason = %skipped.reason, text = %skipped.text, "skipped line");
    }
    if strict && !parsed.skipped.is_empty() {
        bail!("{} line(s) skipped", parsed.skipped.len());
    }
    Ok(())
}

/// `--to`, else the saved default from NFL, else `nfl`.
pub(crate) fn target_format(args: &ConvertArgs, prefs: &ConvertPrefs) -> String {
    match &args.to {
        Some(to) => to.clone(),
        None if args.from == NFL_FORMAT => prefs.format.clone(),
        None => NFL_FORMAT.to_owned(),
    }
}

pub(crate) fn convert(args: &ConvertArgs, to: &str, prefs: &ConvertPrefs) -> Result<()> {
    let converter = Converter::new(prefs.dialect).with_options(ConvertOptions {
        pack_name: prefs.pack_name.clone(),
        pack_version: prefs.pack_version.clone(),
    });
    match (args.from == NFL_FORMAT, to == NFL_FORMAT) {
        (true, false) => {
            let text = read_input(args.input.as_ref())?;
            let parsed = parse_with_diagnostics(&text, prefs.dialect);
            report_skipped(&parsed, prefs.strict)?;
            let payload = converter
                .from_nfl(&parsed.graph, to)
                .with_context(|| format!("convert nfl -> {to}"))?;
            match (&payload, &args.nodes) {
                (Payload::Tables { nodes, edges }, Some(nodes_path)) => {
                    write_file(nodes_path, nodes)?;
                    match &args.edges {
                        Some(edges_path) => write_file(edges_path, edges),
                        None if edges.lines().count() > 1 => {
                            bail!("graph has edges; pass --edges to write them")
                        }
                        None => Ok(()),
                    }
                }
                _ => emit(args.output.as_ref(), &payload.render()?),
            }
        }
        (false, true) => {
            let payload = match &args.nodes {
                Some(nodes) => Payload::Tables {
                    nodes: read_input(Some(nodes))?,
                    edges: match &args.edges {
                        Some(edges) => read_input(Some(edges))?,
                        None => String::new(),
                    },
                },
                None => Payload::Text(read_input(args.input.as_ref())?),
            };
            let nfl = converter
                .to_nfl(&payload, &args.from)
                .with_context(|| format!("convert {} -> nfl", args.from))?;
            emit(args.output.as_ref(), &nfl)
        }
        _ => bail!(
            "exactly one of --from/--to must be `{NFL_FORMAT}` (got {} -> {to})",
            args.from
        ),
    }
}

pub(crate) fn check(args: &CheckArgs, dialect: Dialect, strict: bool) -> Result<()> {
    let text = read_input(args.input.as_ref())?;
    let parsed = parse_with_diagnostics(&text, dialect);
    let graph = &parsed.graph;
    println!(
        "nodes: {}, edges: {}, skipped: {}",
        graph.node_count(),
        graph.edges().len(),
        parsed.skipped.len()
    );
    for skipped in &parsed.skipped {
        println!("  line {}: {} | {}", skipped.line_no, skipped.reason, skipped.text);
    }
    let dangling = graph.dangling_edges().count();
    if dangling > 0 {
        println!("dangling edges: {dangling}");
    }
    if strict && !parsed.skipped.is_empty() {
        bail!("{} line(s) skipped", parsed.skipped.len());
    }
    Ok(())
}

pub(crate) fn formats(dialect: Dialect) {
    let registry = Registry::for_dialect(dialect);
    let mut table = Table::new();
    table.set_header(vec!["format", "title", "to nfl"]);
    for name in registry.names() {
        if let Some(adapter) = registry.get(name) {
            let reverse = if adapter.reconstruct.is_some() { "yes" } else { "no" };
            table.add_row(vec![name, adapter.title, reverse]);
        }
    }
    println!("{dialect} dialect\n{table}");
}
