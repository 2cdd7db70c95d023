//! Aggregate statistics of a finished draw.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use cabin_core::{Allocation, Participant, ParticipantId, PeriodId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawStatistics {
    pub total_participants: u32,
    pub with_zero: u32,
    pub with_one: u32,
    pub with_two: u32,
    pub total_allocations: u32,
    pub per_period: BTreeMap<PeriodId, u32>,
}

/// Pure function of `allocations` and the participant list. Participants who
/// appear in no allocation count as zero; repeated participant ids count once.
pub fn summarize(allocations: &[Allocation], participants: &[Participant]) -> DrawStatistics {
    let mut held: BTreeMap<&ParticipantId, u32> = BTreeMap::new();
    let mut per_period: BTreeMap<PeriodId, u32> = BTreeMap::new();
    for a in allocations {
        *held.entry(&a.participant).or_insert(0) += 1;
        *per_period.entry(a.period.clone()).or_insert(0) += 1;
    }

    let ids: BTreeSet<&ParticipantId> = participants.iter().map(|p| &p.id).collect();
    let mut stats = DrawStatistics {
        total_participants: saturating_count(ids.len()),
        total_allocations: saturating_count(allocations.len()),
        per_period,
        ..DrawStatistics::default()
    };
    for id in ids {
        match held.get(id).copied().unwrap_or(0) {
            0 => stats.with_zero = stats.with_zero.saturating_add(1),
            1 => stats.with_one = stats.with_one.saturating_add(1),
            _ => stats.with_two = stats.with_two.saturating_add(1),
        }
    }
    stats
}

fn saturating_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
