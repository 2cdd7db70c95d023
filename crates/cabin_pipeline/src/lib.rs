//! One draw, end to end: load, order, allocate, summarize, record.
//! JSON, hashing and file access go through `cabin_io`; the algorithm lives in
//! `cabin_algo`. Locking and persistence of the returned record belong to the
//! caller.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use cabin_algo::run_draw;
use cabin_core::DrawRng;
use cabin_io::{loader::{self, LoadedDraw}, manifest, IoError};

pub mod build_execution;

pub use cabin_algo::{DraftError, DrawStatistics, LedgerError, TurnRecord};
pub use build_execution::{
    build_execution, execution_id, verify_execution_id, AllocationRecord, DrawExecution,
    DrawPosition,
};

/// Engine identifiers recorded in every execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub build: String,
}

/// Pipeline context: input already loaded and validated by cabin_io.
#[derive(Debug, Clone)]
pub struct PipelineCtx {
    pub loaded: LoadedDraw,
    /// `None` draws from OS entropy and is recorded as "random".
    pub seed: Option<u64>,
    /// Opaque; carried through to the record only.
    pub executed_by: String,
    pub executed_at: DateTime<Utc>,
    pub engine: EngineMeta,
}

/// Values that take precedence over a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOverrides {
    pub seed: Option<u64>,
    pub executed_by: Option<String>,
}

/// Single error surface for the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error("build error: {0}")]
    Build(String),
}

impl PipelineError {
    /// Bad input or environment: validation failures and draft preconditions.
    pub fn is_precondition(&self) -> bool {
        match self {
            PipelineError::Draft(e) => !e.is_invariant_violation(),
            PipelineError::Io(e) => matches!(
                e,
                IoError::Json { .. } | IoError::Manifest(_) | IoError::Validate(_) | IoError::Hash(_)
            ),
            PipelineError::Build(_) => false,
        }
    }

    /// An engine bug, never a property of the input.
    pub fn is_invariant_violation(&self) -> bool {
        match self {
            PipelineError::Draft(e) => e.is_invariant_violation(),
            PipelineError::Build(_) => true,
            PipelineError::Io(_) => false,
        }
    }
}

/// Run one draw over a preloaded context.
pub fn run_with_ctx(ctx: PipelineCtx) -> Result<DrawExecution, PipelineError> {
    let mut rng = DrawRng::from_optional_seed(ctx.seed);
    info!(
        drawing = %ctx.loaded.drawing.id,
        executed_by = %ctx.executed_by,
        seed = %rng.seed(),
        "pipeline started"
    );

    let outcome = run_draw(&ctx.loaded.input, &mut rng)?;
    let exec = build_execution(
        &ctx.loaded,
        outcome,
        ctx.executed_by,
        ctx.executed_at,
        ctx.engine,
    )?;

    info!(id = %exec.id, allocations = exec.allocations.len(), "execution built");
    Ok(exec)
}

/// Convenience entry: manifest → load → run. Overrides win over manifest values.
pub fn run_from_manifest_path<P: AsRef<Path>>(
    path: P,
    overrides: RunOverrides,
) -> Result<DrawExecution, PipelineError> {
    let man = manifest::load_manifest(path.as_ref())?;
    let loaded = loader::load_draw_file(&man.input)?;
    let ctx = PipelineCtx {
        loaded,
        seed: overrides.seed.or(man.seed),
        executed_by: overrides
            .executed_by
            .or(man.executed_by)
            .unwrap_or_else(|| "cli".to_string()),
        executed_at: Utc::now(),
        engine: engine_identifiers(),
    };
    run_with_ctx(ctx)
}

/// Engine identifiers for use in execution records.
pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        vendor: "cabin".to_string(),
        name: "cabin_draw".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: option_env!("CABIN_DRAW_BUILD").unwrap_or("dev").to_string(),
    }
}
