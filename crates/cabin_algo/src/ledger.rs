//! Per-run bookkeeping of claimed slots and per-participant holdings.

use std::collections::{BTreeMap, BTreeSet};

use cabin_core::{ApartmentId, ParticipantId, PeriodId};

use crate::error::LedgerError;

/// Hard cap of allocations one participant may receive in a run.
pub const MAX_ALLOCATIONS_PER_PARTICIPANT: u32 = 2;

/// Created empty at the start of a run and dropped with it.
#[derive(Debug, Default, Clone)]
pub struct SlotLedger {
    claimed: BTreeMap<PeriodId, BTreeSet<ApartmentId>>,
    counts: BTreeMap<ParticipantId, u32>,
    periods: BTreeMap<ParticipantId, BTreeSet<PeriodId>>,
}

impl SlotLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_free(&self, period: &PeriodId, apartment: &ApartmentId) -> bool {
        self.claimed
            .get(period)
            .map_or(true, |apts| !apts.contains(apartment))
    }

    /// True if `participant` already holds any apartment in `period`.
    pub fn has_period(&self, participant: &ParticipantId, period: &PeriodId) -> bool {
        self.periods
            .get(participant)
            .map_or(false, |ps| ps.contains(period))
    }

    pub fn count_for(&self, participant: &ParticipantId) -> u32 {
        self.counts.get(participant).copied().unwrap_or(0)
    }

    #[inline]
    pub fn has_capacity(&self, participant: &ParticipantId) -> bool {
        self.count_for(participant) < MAX_ALLOCATIONS_PER_PARTICIPANT
    }

    /// Total slots claimed so far.
    pub fn claimed_len(&self) -> usize {
        self.claimed.values().map(BTreeSet::len).sum()
    }

    /// Record a grant. All checks run before any mutation, so a failed claim
    /// leaves the ledger unchanged.
    pub fn claim(
        &mut self,
        participant: &ParticipantId,
        period: &PeriodId,
        apartment: &ApartmentId,
    ) -> Result<(), LedgerError> {
        if !self.is_free(period, apartment) {
            return Err(LedgerError::SlotTaken {
                period: period.clone(),
                apartment: apartment.clone(),
            });
        }
        if !self.has_capacity(participant) {
            return Err(LedgerError::CapExceeded { participant: participant.clone() });
        }
        if self.has_period(participant, period) {
            return Err(LedgerError::PeriodHeld {
                participant: participant.clone(),
                period: period.clone(),
            });
        }

        self.claimed
            .entry(period.clone())
            .or_default()
            .insert(apartment.clone());
        *self.counts.entry(participant.clone()).or_insert(0) += 1;
        self.periods
            .entry(participant.clone())
            .or_default()
            .insert(period.clone());
        Ok(())
    }
}
