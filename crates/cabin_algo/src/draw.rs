//! One-call draw: order + shuffle + engine + transcript + statistics.

use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use cabin_core::{Allocation, DrawInput, DrawRng, ParticipantId, SeedEcho};

use crate::audit::AuditRecorder;
use crate::engine::{run_snake_draft, TurnRecord};
use crate::error::DraftError;
use crate::summary::{summarize, DrawStatistics};

/// Everything a run produces, owned and detached from the input tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub seed: SeedEcho,
    pub draw_order: Vec<ParticipantId>,
    pub allocations: Vec<Allocation>,
    pub turns: Vec<TurnRecord>,
    pub statistics: DrawStatistics,
    pub audit_log: Vec<String>,
}

pub fn run_draw(input: &DrawInput, rng: &mut DrawRng) -> Result<DrawOutcome, DraftError> {
    let span = info_span!("draw", seed = %rng.seed(), participants = input.participants.len());
    let _enter = span.enter();
    info!(wishes = input.wishes.len(), "draw started");

    let mut audit = AuditRecorder::new();
    let outcome = run_snake_draft(input, rng, &mut audit)?;

    let statistics = summarize(&outcome.allocations, &input.participants);
    audit.record_summary(&statistics);

    for p in outcome.order.forward() {
        if !outcome.allocations.iter().any(|a| a.participant == p.id) {
            warn!(participant = %p.id, "participant received no allocation");
        }
    }
    info!(
        allocations = statistics.total_allocations,
        with_zero = statistics.with_zero,
        with_one = statistics.with_one,
        with_two = statistics.with_two,
        rng_words = rng.words_consumed() as u64,
        "draw finished"
    );

    Ok(DrawOutcome {
        seed: rng.seed(),
        draw_order: outcome.order.forward().iter().map(|p| p.id.clone()).collect(),
        allocations: outcome.allocations,
        turns: outcome.turns,
        statistics,
        audit_log: audit.into_lines(),
    })
}
