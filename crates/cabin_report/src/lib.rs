//! Presentation model and offline renderers for a finished draw.
//!
//! - No I/O here. Callers pass a `DrawExecution` already in memory.
//! - Row order is stable: participants follow the draw order, slots follow the
//!   allocation order, periods sort by start date then id.
//! - Dates are rendered as `YYYY-MM-DD`, the execution time as RFC 3339 UTC.

#![deny(unsafe_code)]

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use cabin_pipeline::{AllocationRecord, DrawExecution};

pub mod render_text;
#[cfg(feature = "render_json")]
pub mod render_json;
#[cfg(feature = "render_html")]
pub mod render_html;

pub use render_text::render_text;
#[cfg(feature = "render_json")]
pub use render_json::render_json;
#[cfg(feature = "render_html")]
pub use render_html::render_html;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("template error: {0}")]
    Template(String),
    #[error("serialize error: {0}")]
    Serialize(String),
}

// ===== Model =====

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DrawSummary {
    pub title: String,
    pub drawing_id: String,
    pub season: String,
    pub execution_id: String,
    pub executed_at: String,
    pub executed_by: String,
    /// Number, or "random" for an unseeded run.
    pub seed: String,
    pub participants: Vec<ParticipantRow>,
    pub periods: Vec<PeriodRow>,
    pub totals: Totals,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParticipantRow {
    pub position: usize,
    pub name: String,
    /// Empty when the participant got nothing.
    pub slots: Vec<SlotRow>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlotRow {
    pub period: String,
    pub start_date: String,
    pub end_date: String,
    pub apartment: String,
    pub priority: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PeriodRow {
    pub period: String,
    pub start_date: String,
    pub end_date: String,
    pub allocated: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub participants: u32,
    pub allocations: u32,
    pub with_zero: u32,
    pub with_one: u32,
    pub with_two: u32,
}

// ===== API =====

fn slot(a: &AllocationRecord) -> SlotRow {
    SlotRow {
        period: a.period_description.clone(),
        start_date: a.start_date.to_string(),
        end_date: a.end_date.to_string(),
        apartment: a.apartment_name.clone(),
        priority: a.priority,
    }
}

/// Build the presentation model. Pure; reads only the record.
pub fn build_summary(exec: &DrawExecution) -> DrawSummary {
    let participants = exec
        .draw_order
        .iter()
        .map(|d| ParticipantRow {
            position: d.position,
            name: d.name.clone(),
            slots: exec
                .allocations
                .iter()
                .filter(|a| a.participant == d.participant)
                .map(slot)
                .collect(),
        })
        .collect();

    // Descriptions come from the denormalized allocations; statistics only
    // list periods that received at least one slot.
    let described: BTreeMap<_, _> = exec.allocations.iter().map(|a| (&a.period, a)).collect();
    let mut periods: Vec<PeriodRow> = exec
        .statistics
        .per_period
        .iter()
        .map(|(id, n)| match described.get(id) {
            Some(a) => PeriodRow {
                period: a.period_description.clone(),
                start_date: a.start_date.to_string(),
                end_date: a.end_date.to_string(),
                allocated: *n,
            },
            None => PeriodRow {
                period: id.to_string(),
                start_date: String::new(),
                end_date: String::new(),
                allocated: *n,
            },
        })
        .collect();
    periods.sort_by(|a, b| (&a.start_date, &a.period).cmp(&(&b.start_date, &b.period)));

    let s = &exec.statistics;
    DrawSummary {
        title: format!("Cabin draw results: {}", exec.season),
        drawing_id: exec.drawing_id.clone(),
        season: exec.season.clone(),
        execution_id: exec.id.clone(),
        executed_at: exec.executed_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        executed_by: exec.executed_by.clone(),
        seed: exec.seed.to_string(),
        participants,
        periods,
        totals: Totals {
            participants: s.total_participants,
            allocations: s.total_allocations,
            with_zero: s.with_zero,
            with_one: s.with_one,
            with_two: s.with_two,
        },
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_draw_order_and_keep_empty_participants() {
        let s = build_summary(&fixture::execution());
        let names: Vec<&str> = s.participants.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Bo", "Ada <&>", "Cy"]);
        assert_eq!(s.participants[0].slots.len(), 1);
        assert_eq!(s.participants[1].slots.len(), 2);
        assert!(s.participants[2].slots.is_empty());
        assert_eq!(s.participants[1].slots[1].apartment, "Lower floor");
    }

    #[test]
    fn periods_sorted_by_start_date_with_counts() {
        let s = build_summary(&fixture::execution());
        let rows: Vec<(&str, u32)> = s.periods.iter().map(|p| (p.period.as_str(), p.allocated)).collect();
        assert_eq!(rows, [("Easter week", 1), ("Week after Easter", 2)]);
    }

    #[test]
    fn header_fields() {
        let s = build_summary(&fixture::execution());
        assert_eq!(s.title, "Cabin draw results: Easter 2025");
        assert_eq!(s.seed, "42");
        assert_eq!(s.executed_at, "2025-03-01T12:00:00Z");
        assert_eq!(s.totals.allocations, 3);
        assert_eq!(s.totals.with_zero, 1);
    }
}
