// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `nfl`: convert between NFL and the supported graph formats.
//!
//! Stored preferences (default target format, pack stamp, strictness) are
//! kept per dialect in the platform config dir, along with the dialect used
//! last. Flags override them for one run and `--save-prefs` writes the
//! merged result back.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use nfl_app_core::config::PrefsService;
use nfl_app_core::prefs::ConvertPrefs;
use nfl_config_fs::FsConfigStore;
use nfl_formats::NFL_FORMAT;
use nfl_syntax::Dialect;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nfl", author, version, about = "NFL graph format converter")]
struct Cli {
    /// Read and write preferences under this directory instead of the platform config dir.
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// NFL dialect (terse or block); defaults to the dialect saved last.
    #[arg(long, global = true)]
    dialect: Option<Dialect>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert NFL to another format or back. Exactly one side must be `nfl`.
    Convert(ConvertArgs),
    /// Parse NFL and report counts and skipped lines.
    Check(CheckArgs),
    /// List the formats registered for the dialect.
    Formats,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Source format.
    #[arg(long, default_value = NFL_FORMAT)]
    from: String,
    /// Target format; the saved default when converting from NFL, `nfl` otherwise.
    #[arg(long)]
    to: Option<String>,
    /// Input file; stdin when omitted or `-`.
    input: Option<PathBuf>,
    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Node table for CSV (read when converting from csv, written when converting to it).
    #[arg(long)]
    nodes: Option<PathBuf>,
    /// Edge table for CSV.
    #[arg(long, requires = "nodes")]
    edges: Option<PathBuf>,
    /// Pack name stamped onto block-dialect output.
    #[arg(long)]
    pack_name: Option<String>,
    /// Pack version stamped onto block-dialect output.
    #[arg(long)]
    pack_version: Option<String>,
    /// Fail when the NFL input has lines the parser skipped.
    #[arg(long)]
    strict: bool,
    /// Persist the effective preferences (including the target format) for later runs.
    #[arg(long)]
    save_prefs: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// NFL file; stdin when omitted or `-`.
    input: Option<PathBuf>,
    /// Exit with an error when any line was skipped.
    #[arg(long)]
    strict: bool,
}

fn open_prefs(config_dir: Option<&PathBuf>) -> Option<PrefsService<FsConfigStore>> {
    let store = match config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    };
    match store {
        Ok(store) => Some(PrefsService::new(store)),
        Err(err) => {
            tracing::warn!(%err, "config store unavailable; using default preferences");
            None
        }
    }
}

fn load_prefs(
    service: Option<&PrefsService<FsConfigStore>>,
    dialect: Option<Dialect>,
) -> ConvertPrefs {
    let fallback = || ConvertPrefs::for_dialect(dialect.unwrap_or_default());
    let Some(service) = service else {
        return fallback();
    };
    service.load(dialect).unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring unreadable preferences");
        fallback()
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let service = open_prefs(cli.config_dir.as_ref());
    let mut prefs = load_prefs(service.as_ref(), cli.dialect);

    match cli.command {
        Command::Convert(args) => {
            if let Some(name) = &args.pack_name {
                prefs.pack_name.clone_from(name);
            }
            if let Some(version) = &args.pack_version {
                prefs.pack_version.clone_from(version);
            }
            prefs.strict |= args.strict;
            let target = commands::target_format(&args, &prefs);
            if args.save_prefs {
                if args.from == NFL_FORMAT {
                    prefs.format.clone_from(&target);
                }
                match &service {
                    Some(service) => service.save(&prefs)?,
                    None => anyhow::bail!("cannot save preferences: config store unavailable"),
                }
                tracing::info!(dialect = %prefs.dialect, "preferences saved");
            }
            commands::convert(&args, &target, &prefs)
        }
        Command::Check(args) => commands::check(&args, prefs.dialect, prefs.strict || args.strict),
        Command::Formats => {
            commands::formats(prefs.dialect);
            Ok(())
        }
    }
}
