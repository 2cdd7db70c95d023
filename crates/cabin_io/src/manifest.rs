// crates/cabin_io/src/manifest.rs
//
// Draw manifest: a small JSON file naming the draw input and run options.
// - Paths are local only: any "<scheme>://" (or http:/https:) is rejected.
// - Relative paths resolve against the manifest's directory.
// - Every field except `input` is optional; CLI flags override what is set here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{looks_like_url_strict, IoError};

/// Human-readable summary formats written next to the execution record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    Text,
    Json,
    Html,
}

impl RenderKind {
    /// File name of the rendered summary.
    pub fn file_name(self) -> &'static str {
        match self {
            RenderKind::Text => "summary.txt",
            RenderKind::Json => "summary.json",
            RenderKind::Html => "summary.html",
        }
    }
}

/// External manifest as written by users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrawManifest {
    pub input: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub executed_by: Option<String>,
    #[serde(default)]
    pub out_dir: Option<String>,
    #[serde(default)]
    pub render: Option<Vec<RenderKind>>,
}

/// Manifest with paths resolved against its directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedManifest {
    pub input: PathBuf,
    pub seed: Option<u64>,
    pub executed_by: Option<String>,
    pub out_dir: Option<PathBuf>,
    pub render: Vec<RenderKind>,
}

fn offline_check(field: &str, value: &str) -> Result<(), IoError> {
    if value.trim().is_empty() {
        return Err(IoError::Manifest(format!("{field} must not be empty")));
    }
    if looks_like_url_strict(value) {
        return Err(IoError::Manifest(format!("{field} must be a local path, got {value}")));
    }
    Ok(())
}

#[inline]
fn join_under(base: &Path, rel: &str) -> PathBuf {
    let p = Path::new(rel);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

/// Shape and offline policy. Performs no I/O.
pub fn validate_manifest(man: &DrawManifest) -> Result<(), IoError> {
    offline_check("input", &man.input)?;
    if let Some(out) = &man.out_dir {
        offline_check("out_dir", out)?;
    }
    if let Some(who) = &man.executed_by {
        if who.trim().is_empty() {
            return Err(IoError::Manifest("executed_by must not be empty".into()));
        }
    }
    if matches!(&man.render, Some(r) if r.is_empty()) {
        return Err(IoError::Manifest("render must list at least one format".into()));
    }
    Ok(())
}

/// Resolve relative paths against `base`. Render kinds are deduplicated and
/// ordered.
pub fn resolve_paths(man: &DrawManifest, base: &Path) -> ResolvedManifest {
    let mut render = man.render.clone().unwrap_or_default();
    render.sort_unstable();
    render.dedup();
    ResolvedManifest {
        input: join_under(base, &man.input),
        seed: man.seed,
        executed_by: man.executed_by.clone(),
        out_dir: man.out_dir.as_deref().map(|o| join_under(base, o)),
        render,
    }
}

/// Read, validate and resolve a manifest file.
pub fn load_manifest(path: &Path) -> Result<ResolvedManifest, IoError> {
    let text = fs::read_to_string(path)
        .map_err(|e| IoError::Read(format!("{}: {e}", path.display())))?;
    let man: DrawManifest = serde_json::from_str(&text).map_err(|e| IoError::Json {
        pointer: "/".into(),
        msg: format!("{}: {e}", path.display()),
    })?;
    validate_manifest(&man)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let resolved = resolve_paths(&man, base);
    debug!(manifest = %path.display(), input = %resolved.input.display(), "manifest resolved");
    Ok(resolved)
}
