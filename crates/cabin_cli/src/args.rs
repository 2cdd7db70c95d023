// crates/cabin_cli/src/args.rs
//
// Offline CLI surface.
// - Exactly one of --manifest or --input.
// - No networked paths: any scheme ("https://", "file:", ...) is rejected.
// - Seed accepts a decimal u64 or 0x-hex (1..=16 digits).
// - Flags win over manifest values; unset values fall back to defaults.

use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

use cabin_io::looks_like_url_strict;
use cabin_io::manifest::RenderKind;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "cabin-draw",
    disable_help_subcommand = true,
    about = "Run a seeded snake-draft cabin draw offline"
)]
pub struct Args {
    /// Draw manifest JSON (input path plus optional seed, executed_by, out_dir, render).
    #[arg(long, conflicts_with = "input", required_unless_present = "input")]
    pub manifest: Option<PathBuf>,

    /// Draw file JSON (drawing, participants, periods, apartments, wishes).
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// RNG seed. Omit for an unseeded draw, recorded as "random".
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u64>,

    /// Who ran the draw; carried into the record. Default: "cli".
    #[arg(long)]
    pub executed_by: Option<String>,

    /// Output directory. Default: "out".
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Summary format(s) to write next to execution.json.
    #[arg(long, value_parser = parse_render)]
    pub render: Vec<RenderKind>,

    /// Load and validate the input only.
    #[arg(long)]
    pub validate_only: bool,

    /// Only warnings and errors on stderr.
    #[arg(long)]
    pub quiet: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("path must be a local file (no scheme): {0}")]
    NonLocalPath(String),
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("--executed-by must not be empty")]
    EmptyExecutor,
}

/// Decimal u64 or 0x-hex with 1..=16 digits.
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty seed".into());
    }
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => {
            if hex.is_empty() || hex.len() > 16 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err("hex seed must be 1..16 hex digits".into());
            }
            u64::from_str_radix(hex, 16).map_err(|_| "hex seed out of range".into())
        }
        None => s.parse::<u64>().map_err(|_| "decimal seed must be a valid u64".into()),
    }
}

pub fn parse_render(s: &str) -> Result<RenderKind, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "text" | "txt" => Ok(RenderKind::Text),
        "json" => Ok(RenderKind::Json),
        "html" => Ok(RenderKind::Html),
        other => Err(format!("unknown format {other:?} (expected text, json or html)")),
    }
}

fn ensure_local(p: &Path) -> Result<(), CliError> {
    match p.to_str() {
        Some(s) if looks_like_url_strict(s) => Err(CliError::NonLocalPath(s.to_string())),
        _ => Ok(()),
    }
}

fn ensure_local_file(p: &Path, label: &str) -> Result<(), CliError> {
    ensure_local(p)?;
    if !p.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Checks clap cannot express: offline paths, existence, non-empty executor.
pub fn validate(args: &Args) -> Result<(), CliError> {
    if let Some(m) = &args.manifest {
        ensure_local_file(m, "--manifest")?;
    }
    if let Some(i) = &args.input {
        ensure_local_file(i, "--input")?;
    }
    if let Some(out) = &args.out {
        ensure_local(out)?;
    }
    if matches!(&args.executed_by, Some(who) if who.trim().is_empty()) {
        return Err(CliError::EmptyExecutor);
    }
    Ok(())
}

pub fn parse_and_validate() -> Result<Args, CliError> {
    let args = Args::parse();
    validate(&args)?;
    Ok(args)
}
