// crates/cabin_cli/src/main.rs
//
// cabin-draw: load → draw → write execution.json (+ optional summaries).
// Exit codes are stable for scripts; see `exitcodes`.

mod args;
mod telemetry;

mod exitcodes {
    pub const OK: u8 = 0;
    /// Bad flags, invalid input, or an unmet draw precondition.
    pub const VALIDATION: u8 = 2;
    /// The engine broke one of its own invariants.
    pub const INVARIANT: u8 = 3;
    pub const IO: u8 = 4;
    pub const RENDER: u8 = 5;
}

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info};

use cabin_io::canonical_json;
use cabin_io::loader::{self, LoadedDraw};
use cabin_io::manifest::{self, RenderKind};
use cabin_io::IoError;
use cabin_pipeline::{engine_identifiers, run_with_ctx, DrawExecution, PipelineCtx, PipelineError};
use cabin_report::{build_summary, render_text, DrawSummary, ReportError};

use args::{parse_and_validate, Args};

const DEFAULT_OUT_DIR: &str = "out";
const DEFAULT_EXECUTED_BY: &str = "cli";
const EXECUTION_FILE: &str = "execution.json";

#[derive(Debug, Error)]
enum MainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Invariant(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Render(String),
}

impl MainError {
    fn exit_code(&self) -> u8 {
        match self {
            MainError::Validation(_) => exitcodes::VALIDATION,
            MainError::Invariant(_) => exitcodes::INVARIANT,
            MainError::Io(_) => exitcodes::IO,
            MainError::Render(_) => exitcodes::RENDER,
        }
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Json { .. } | IoError::Manifest(_) | IoError::Validate(_) | IoError::Hash(_) => {
            MainError::Validation(e.to_string())
        }
        IoError::Read(_) | IoError::Write(_) | IoError::Path(_) => MainError::Io(e.to_string()),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Io(io) => map_io_err(io),
        ref other if other.is_invariant_violation() => MainError::Invariant(other.to_string()),
        other => MainError::Validation(other.to_string()),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    MainError::Render(e.to_string())
}

/// Flags and manifest merged; flags win.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RunPlan {
    input: PathBuf,
    seed: Option<u64>,
    executed_by: String,
    out_dir: PathBuf,
    render: Vec<RenderKind>,
}

fn resolve_plan(args: &Args) -> Result<RunPlan, MainError> {
    let man = match &args.manifest {
        Some(path) => Some(manifest::load_manifest(path).map_err(map_io_err)?),
        None => None,
    };
    let input = match (&args.input, &man) {
        (Some(p), _) => p.clone(),
        (None, Some(m)) => m.input.clone(),
        (None, None) => return Err(MainError::Validation("one of --manifest or --input is required".into())),
    };

    let mut render = if args.render.is_empty() {
        man.as_ref().map(|m| m.render.clone()).unwrap_or_default()
    } else {
        args.render.clone()
    };
    render.sort_unstable();
    render.dedup();

    Ok(RunPlan {
        input,
        seed: args.seed.or(man.as_ref().and_then(|m| m.seed)),
        executed_by: args
            .executed_by
            .clone()
            .or_else(|| man.as_ref().and_then(|m| m.executed_by.clone()))
            .unwrap_or_else(|| DEFAULT_EXECUTED_BY.to_string()),
        out_dir: args
            .out
            .clone()
            .or_else(|| man.as_ref().and_then(|m| m.out_dir.clone()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
        render,
    })
}

fn load(plan: &RunPlan) -> Result<LoadedDraw, MainError> {
    loader::load_draw_file(&plan.input).map_err(map_io_err)
}

fn main() -> ExitCode {
    let args = match parse_and_validate() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("cabin-draw: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION);
        }
    };
    telemetry::init(&args.log_level, args.quiet);

    let result = if args.validate_only {
        validate_only(&args)
    } else {
        run_once(&args)
    };

    match result {
        Ok(()) => ExitCode::from(exitcodes::OK),
        Err(e) => {
            error!(error = %e, "cabin-draw failed");
            eprintln!("cabin-draw: error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Load and validate only. No RNG, no artifacts.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let plan = resolve_plan(args)?;
    let loaded = load(&plan)?;
    if loaded.input.participants.is_empty() {
        return Err(MainError::Validation("no participant submitted a wish".into()));
    }
    if !args.quiet {
        eprintln!(
            "validate-only: {} OK ({} of {} participants with wishes, {} wishes)",
            plan.input.display(),
            loaded.input.participants.len(),
            loaded.catalog_participants,
            loaded.input.wishes.len()
        );
    }
    Ok(())
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let plan = resolve_plan(args)?;
    let loaded = load(&plan)?;

    let ctx = PipelineCtx {
        loaded,
        seed: plan.seed,
        executed_by: plan.executed_by.clone(),
        executed_at: Utc::now(),
        engine: engine_identifiers(),
    };
    let exec = run_with_ctx(ctx).map_err(map_pipeline_err)?;

    write_artifacts(&plan.out_dir, &exec)?;
    render_summaries(&plan, &exec)?;

    info!(id = %exec.id, out = %plan.out_dir.display(), "artifacts written");
    if !args.quiet {
        for line in &exec.audit_log {
            eprintln!("{line}");
        }
    }
    println!("{}", exec.id);
    Ok(())
}

fn write_artifacts(out_dir: &Path, exec: &DrawExecution) -> Result<(), MainError> {
    fs::create_dir_all(out_dir)
        .map_err(|e| MainError::Io(format!("mkdir {}: {e}", out_dir.display())))?;
    canonical_json::write_canonical_file(&out_dir.join(EXECUTION_FILE), exec).map_err(map_io_err)
}

fn render_summaries(plan: &RunPlan, exec: &DrawExecution) -> Result<(), MainError> {
    if plan.render.is_empty() {
        return Ok(());
    }
    let summary = build_summary(exec);
    for kind in &plan.render {
        let body = render_one(*kind, &summary)?;
        let path = plan.out_dir.join(kind.file_name());
        canonical_json::write_bytes_atomic(&path, body.as_bytes()).map_err(map_io_err)?;
    }
    Ok(())
}

fn render_one(kind: RenderKind, summary: &DrawSummary) -> Result<String, MainError> {
    match kind {
        RenderKind::Text => Ok(render_text(summary)),
        RenderKind::Json => render_json_summary(summary),
        RenderKind::Html => render_html_summary(summary),
    }
}

fn render_json_summary(summary: &DrawSummary) -> Result<String, MainError> {
    #[cfg(feature = "report-json")]
    {
        cabin_report::render_json(summary).map_err(map_report_err)
    }
    #[cfg(not(feature = "report-json"))]
    {
        let _ = summary;
        Err(MainError::Render("json summary not enabled (build with feature `report-json`)".into()))
    }
}

fn render_html_summary(summary: &DrawSummary) -> Result<String, MainError> {
    #[cfg(feature = "report-html")]
    {
        cabin_report::render_html(summary).map_err(map_report_err)
    }
    #[cfg(not(feature = "report-html"))]
    {
        let _ = summary;
        Err(MainError::Render("html summary not enabled (build with feature `report-html`)".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabin_pipeline::{DraftError, LedgerError};
    use clap::Parser;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn flags_win_over_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let man = write(
            dir.path(),
            "m.json",
            r#"{"input":"draw.json","seed":1,"executed_by":"board","out_dir":"results","render":["text"]}"#,
        );
        let m = man.to_str().unwrap();

        let from_manifest = resolve_plan(&Args::try_parse_from(["cabin-draw", "--manifest", m]).unwrap()).unwrap();
        assert_eq!(from_manifest.input, dir.path().join("draw.json"));
        assert_eq!(from_manifest.seed, Some(1));
        assert_eq!(from_manifest.executed_by, "board");
        assert_eq!(from_manifest.out_dir, dir.path().join("results"));
        assert_eq!(from_manifest.render, [RenderKind::Text]);

        let args = Args::try_parse_from([
            "cabin-draw", "--manifest", m, "--seed", "0x10", "--executed-by", "ops", "--out", "elsewhere",
            "--render", "html",
        ])
        .unwrap();
        let plan = resolve_plan(&args).unwrap();
        assert_eq!(plan.seed, Some(16));
        assert_eq!(plan.executed_by, "ops");
        assert_eq!(plan.out_dir, PathBuf::from("elsewhere"));
        assert_eq!(plan.render, [RenderKind::Html]);
    }

    #[test]
    fn defaults_without_manifest() {
        let args = Args::try_parse_from(["cabin-draw", "--input", "d.json"]).unwrap();
        let plan = resolve_plan(&args).unwrap();
        assert_eq!(plan.seed, None);
        assert_eq!(plan.executed_by, "cli");
        assert_eq!(plan.out_dir, PathBuf::from("out"));
        assert!(plan.render.is_empty());
    }

    #[test]
    fn error_buckets() {
        assert_eq!(map_io_err(IoError::Validate("x".into())).exit_code(), exitcodes::VALIDATION);
        assert_eq!(map_io_err(IoError::Read("x".into())).exit_code(), exitcodes::IO);
        assert_eq!(
            map_pipeline_err(PipelineError::Draft(DraftError::NoParticipants)).exit_code(),
            exitcodes::VALIDATION
        );
        assert_eq!(map_pipeline_err(PipelineError::Build("x".into())).exit_code(), exitcodes::INVARIANT);
        let taken = LedgerError::SlotTaken { period: "w15".parse().unwrap(), apartment: "a1".parse().unwrap() };
        assert_eq!(
            map_pipeline_err(PipelineError::Draft(DraftError::Invariant(taken))).exit_code(),
            exitcodes::INVARIANT
        );
        assert_eq!(map_report_err(ReportError::Template("x".into())).exit_code(), exitcodes::RENDER);
    }
}
