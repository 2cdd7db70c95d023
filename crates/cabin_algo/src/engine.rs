//! Snake-draft allocation engine.
//!
//! Contract:
//! - Preconditions (non-empty participant set, every wish referencing a known
//!   participant, period and apartment) are checked before any state exists.
//! - RNG access is fixed: one shuffle of the canonically sorted participants,
//!   then, per participant in forward order, one shuffle per priority tier.
//! - Exactly `2 × participants` turns; at most one grant per turn.
//! - A wish tries its apartments in `(sort_order, id)` order.
//! - "Nothing free" is data ([`TurnOutcome::Skipped`]), never an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cabin_core::determinism::sort_apartments_canonical;
use cabin_core::{
    Allocation, Apartment, ApartmentId, DrawInput, DrawRng, ParticipantId, Period, PeriodId, Wish,
};

use crate::audit::{AuditEvent, AuditSink};
use crate::error::DraftError;
use crate::ledger::{SlotLedger, MAX_ALLOCATIONS_PER_PARTICIPANT};
use crate::order::{build_draft_order, DraftOrder, Round};
use crate::shuffle::shuffle_by_priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    CapReached,
    NoAvailableWish,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnOutcome {
    Granted { period: PeriodId, apartment: ApartmentId, priority: u32 },
    Skipped { reason: SkipReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub index: usize,
    pub round: Round,
    pub position: usize,
    pub participant: ParticipantId,
    #[serde(flatten)]
    pub outcome: TurnOutcome,
}

#[derive(Debug, Clone)]
pub struct DraftOutcome<'a> {
    pub order: DraftOrder<'a>,
    /// Append order = grant order.
    pub allocations: Vec<Allocation>,
    pub turns: Vec<TurnRecord>,
}

/// A wish resolved against the catalog, apartments in try-order.
struct Candidate<'a> {
    wish: &'a Wish,
    period: &'a Period,
    apartments: Vec<&'a Apartment>,
}

fn check_preconditions(input: &DrawInput) -> Result<(), DraftError> {
    if input.participants.is_empty() {
        return Err(DraftError::NoParticipants);
    }
    for w in &input.wishes {
        if input.participant(&w.participant).is_none() {
            return Err(DraftError::UnknownParticipant(w.participant.clone()));
        }
        if input.period(&w.period).is_none() {
            return Err(DraftError::UnknownPeriod(w.period.clone()));
        }
        if let Some(a) = w.apartments.iter().find(|a| input.apartment(a).is_none()) {
            return Err(DraftError::UnknownApartment(a.clone()));
        }
    }
    Ok(())
}

fn resolve<'a>(input: &'a DrawInput, wish: &'a Wish) -> Option<Candidate<'a>> {
    let period = input.period(&wish.period)?;
    let mut apartments = wish
        .apartments
        .iter()
        .map(|id| input.apartment(id))
        .collect::<Option<Vec<_>>>()?;
    sort_apartments_canonical(&mut apartments);
    apartments.dedup_by(|a, b| a.id == b.id);
    Some(Candidate { wish, period, apartments })
}

/// Run the snake draft over `input`.
pub fn run_snake_draft<'a, S: AuditSink + ?Sized>(
    input: &'a DrawInput,
    rng: &mut DrawRng,
    audit: &mut S,
) -> Result<DraftOutcome<'a>, DraftError> {
    check_preconditions(input)?;

    let order = build_draft_order(&input.participants, rng)?;
    let total = order.len();

    audit.record(AuditEvent::Banner("SNAKE DRAFT"));
    audit.record(AuditEvent::Seed(rng.seed()));
    audit.record(AuditEvent::ParticipantCount(order.forward().len()));
    audit.record(AuditEvent::Blank);
    audit.record(AuditEvent::Banner("DRAW ORDER"));
    for (i, p) in order.forward().iter().enumerate() {
        audit.record(AuditEvent::DrawPosition { position: i + 1, participant: p });
    }
    audit.record(AuditEvent::Blank);
    audit.record(AuditEvent::Banner("SNAKE ORDER"));
    audit.record(AuditEvent::RoundOrder { round: Round::Down, order: order.forward() });
    audit.record(AuditEvent::RoundOrder { round: Round::Up, order: order.forward() });
    audit.record(AuditEvent::Blank);
    audit.record(AuditEvent::Banner("ALLOCATION"));

    // Wish lists are prepared once per participant, in forward order, and
    // reused for both turns.
    let mut prepared: BTreeMap<&ParticipantId, Vec<Candidate<'a>>> = BTreeMap::new();
    for &p in order.forward() {
        let shuffled = shuffle_by_priority(input.wishes_of(&p.id), rng);
        let candidates = shuffled
            .into_iter()
            .filter_map(|w| resolve(input, w))
            .collect();
        prepared.insert(&p.id, candidates);
    }

    let mut ledger = SlotLedger::new();
    let mut allocations: Vec<Allocation> = Vec::new();
    let mut turns: Vec<TurnRecord> = Vec::with_capacity(total);

    for turn in order.turns() {
        let p = turn.participant;
        audit.record(AuditEvent::Blank);
        audit.record(AuditEvent::TurnStarted { turn, total });

        let outcome = if !ledger.has_capacity(&p.id) {
            audit.record(AuditEvent::CapReached);
            debug!(participant = %p.id, turn = turn.index + 1, "cap reached, skipping");
            TurnOutcome::Skipped { reason: SkipReason::CapReached }
        } else {
            let candidates = prepared.get(&p.id).map(Vec::as_slice).unwrap_or(&[]);
            let held = ledger.count_for(&p.id);
            audit.record(AuditEvent::Evaluating { held, wishes: candidates.len() });
            debug!(
                participant = %p.id,
                turn = turn.index + 1,
                round = %turn.round,
                held,
                "evaluating wishes"
            );

            let mut granted = None;
            for c in candidates {
                audit.record(AuditEvent::WishTried {
                    priority: c.wish.priority,
                    period: c.period,
                    apartments: &c.apartments,
                });
                if ledger.has_period(&p.id, &c.period.id) {
                    audit.record(AuditEvent::PeriodAlreadyHeld);
                    continue;
                }
                match c.apartments.iter().find(|a| ledger.is_free(&c.period.id, &a.id)) {
                    Some(apt) => {
                        ledger.claim(&p.id, &c.period.id, &apt.id)?;
                        allocations.push(Allocation {
                            participant: p.id.clone(),
                            period: c.period.id.clone(),
                            apartment: apt.id.clone(),
                            priority: c.wish.priority,
                        });
                        audit.record(AuditEvent::Granted { apartment: apt, period: c.period });
                        info!(
                            participant = %p.id,
                            period = %c.period.id,
                            apartment = %apt.id,
                            priority = c.wish.priority,
                            "granted"
                        );
                        granted = Some(TurnOutcome::Granted {
                            period: c.period.id.clone(),
                            apartment: apt.id.clone(),
                            priority: c.wish.priority,
                        });
                        break;
                    }
                    None => audit.record(AuditEvent::NoFreeUnit),
                }
            }

            granted.unwrap_or_else(|| {
                audit.record(AuditEvent::NoGrantThisRound);
                debug!(participant = %p.id, turn = turn.index + 1, "no available wish this round");
                TurnOutcome::Skipped { reason: SkipReason::NoAvailableWish }
            })
        };

        turns.push(TurnRecord {
            index: turn.index,
            round: turn.round,
            position: turn.position,
            participant: p.id.clone(),
            outcome,
        });
    }

    debug_assert!(order
        .forward()
        .iter()
        .all(|p| ledger.count_for(&p.id) <= MAX_ALLOCATIONS_PER_PARTICIPANT));
    debug_assert_eq!(ledger.claimed_len(), allocations.len());

    Ok(DraftOutcome { order, allocations, turns })
}
