//! Error taxonomy of a draw.
//!
//! Precondition failures abort before the ledger is touched. Ledger errors are
//! invariant violations: the engine checks `is_free`/`has_period`/capacity
//! before claiming, so reaching one means the engine itself is wrong.

use cabin_core::{ApartmentId, ParticipantId, PeriodId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("slot {period}/{apartment} is already claimed")]
    SlotTaken { period: PeriodId, apartment: ApartmentId },
    #[error("participant {participant} already holds the maximum number of allocations")]
    CapExceeded { participant: ParticipantId },
    #[error("participant {participant} already holds period {period}")]
    PeriodHeld { participant: ParticipantId, period: PeriodId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("no participants")]
    NoParticipants,
    #[error("wish references unknown participant {0}")]
    UnknownParticipant(ParticipantId),
    #[error("wish references unknown period {0}")]
    UnknownPeriod(PeriodId),
    #[error("wish references unknown apartment {0}")]
    UnknownApartment(ApartmentId),
    #[error("waitlist is empty")]
    EmptyWaitlist,
    #[error("internal invariant violated: {0}")]
    Invariant(#[from] LedgerError),
}

impl DraftError {
    /// `true` for engine bugs, `false` for bad input.
    #[inline]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, DraftError::Invariant(_))
    }
}
