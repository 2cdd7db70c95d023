// crates/cabin_pipeline/src/build_execution.rs
//
// Assemble the immutable DrawExecution record from a finished draw.
// - Allocations are denormalized with display fields so the record stands on
//   its own after the catalog changes.
// - `outcome_sha256` covers what the seed determines (order, allocations,
//   turns, statistics, audit); it is equal for equal seeded runs.
// - `id` = "EXE:" + SHA-256 of the canonical record without its id.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use cabin_algo::{DrawOutcome, DrawStatistics, TurnRecord};
use cabin_core::{ApartmentId, DrawInput, ParticipantId, PeriodId, SeedEcho};
use cabin_io::{hasher, loader::LoadedDraw};

use crate::{EngineMeta, PipelineError};

/// One granted slot with the names a reader needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub participant: ParticipantId,
    pub participant_name: String,
    pub participant_email: String,
    pub period: PeriodId,
    pub period_description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub apartment: ApartmentId,
    pub apartment_name: String,
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawPosition {
    pub position: usize,
    pub participant: ParticipantId,
    pub name: String,
}

/// Immutable output bundle of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawExecution {
    pub id: String,
    pub drawing_id: String,
    pub season: String,
    pub executed_at: DateTime<Utc>,
    pub executed_by: String,
    #[serde(with = "seed_field")]
    pub seed: SeedEcho,
    pub engine: EngineMeta,
    pub input_sha256: String,
    pub outcome_sha256: String,
    pub draw_order: Vec<DrawPosition>,
    pub allocations: Vec<AllocationRecord>,
    pub turns: Vec<TurnRecord>,
    pub statistics: DrawStatistics,
    pub audit_log: Vec<String>,
}

/// Seed as a plain number, or the string `"random"`.
mod seed_field {
    use cabin_core::SeedEcho;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(seed: &SeedEcho, s: S) -> Result<S::Ok, S::Error> {
        match seed {
            SeedEcho::Fixed(n) => s.serialize_u64(*n),
            SeedEcho::Random => s.serialize_str("random"),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Fixed(u64),
        Label(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SeedEcho, D::Error> {
        match Wire::deserialize(d)? {
            Wire::Fixed(n) => Ok(SeedEcho::Fixed(n)),
            Wire::Label(s) if s == "random" => Ok(SeedEcho::Random),
            Wire::Label(s) => Err(de::Error::custom(format!("invalid seed {s:?}"))),
        }
    }
}

fn denormalize(input: &DrawInput, outcome: &DrawOutcome) -> Result<Vec<AllocationRecord>, PipelineError> {
    outcome
        .allocations
        .iter()
        .map(|a| {
            let who = input
                .participant(&a.participant)
                .ok_or_else(|| PipelineError::Build(format!("allocation for unknown participant {}", a.participant)))?;
            let period = input
                .period(&a.period)
                .ok_or_else(|| PipelineError::Build(format!("allocation for unknown period {}", a.period)))?;
            let apt = input
                .apartment(&a.apartment)
                .ok_or_else(|| PipelineError::Build(format!("allocation for unknown apartment {}", a.apartment)))?;
            Ok(AllocationRecord {
                participant: a.participant.clone(),
                participant_name: who.name.clone(),
                participant_email: who.email.clone(),
                period: a.period.clone(),
                period_description: period.description.clone(),
                start_date: period.start_date,
                end_date: period.end_date,
                apartment: a.apartment.clone(),
                apartment_name: apt.name.clone(),
                priority: a.priority,
            })
        })
        .collect()
}

/// Build the record for `outcome`. Fails only on internal inconsistencies.
pub fn build_execution(
    loaded: &LoadedDraw,
    outcome: DrawOutcome,
    executed_by: String,
    executed_at: DateTime<Utc>,
    engine: EngineMeta,
) -> Result<DrawExecution, PipelineError> {
    let allocations = denormalize(&loaded.input, &outcome)?;
    let draw_order = outcome
        .draw_order
        .iter()
        .enumerate()
        .map(|(i, id)| DrawPosition {
            position: i + 1,
            participant: id.clone(),
            name: loaded
                .input
                .participant(id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
        })
        .collect::<Vec<_>>();

    #[derive(Serialize)]
    struct OutcomeDigest<'a> {
        draw_order: &'a [ParticipantId],
        allocations: &'a [cabin_core::Allocation],
        turns: &'a [TurnRecord],
        statistics: &'a DrawStatistics,
        audit_log: &'a [String],
    }
    let outcome_sha256 = hasher::sha256_canonical(&OutcomeDigest {
        draw_order: &outcome.draw_order,
        allocations: &outcome.allocations,
        turns: &outcome.turns,
        statistics: &outcome.statistics,
        audit_log: &outcome.audit_log,
    })?;

    let mut exec = DrawExecution {
        id: String::new(),
        drawing_id: loaded.drawing.id.clone(),
        season: loaded.drawing.season.clone(),
        executed_at,
        executed_by,
        seed: outcome.seed,
        engine,
        input_sha256: loaded.input_sha256.clone(),
        outcome_sha256,
        draw_order,
        allocations,
        turns: outcome.turns,
        statistics: outcome.statistics,
        audit_log: outcome.audit_log,
    };
    exec.id = execution_id(&exec)?;
    Ok(exec)
}

/// Content id of `exec`, ignoring whatever is currently in `exec.id`.
pub fn execution_id(exec: &DrawExecution) -> Result<String, PipelineError> {
    let mut value = serde_json::to_value(exec).map_err(|e| PipelineError::Build(e.to_string()))?;
    if let Some(obj) = value.as_object_mut() {
        obj.remove("id");
    }
    Ok(hasher::execution_id_from_canonical(&value)?)
}

/// Recompute the id and compare with the stored one.
pub fn verify_execution_id(exec: &DrawExecution) -> Result<bool, PipelineError> {
    Ok(execution_id(exec)? == exec.id)
}
