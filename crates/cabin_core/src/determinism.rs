//! Determinism utilities: stable ordering for draw tables.
//!
//! Every shuffle in the engine starts from a canonical order, so a seeded run
//! depends only on the *set* of participants and wishes, never on the order a
//! caller happened to supply them in.

use core::cmp::Ordering;

use alloc::vec::Vec;

use crate::entities::{Apartment, Participant, Wish};
use crate::ids::{ApartmentId, ParticipantId, PeriodId};

/* -------------------------------------------------------------------------- */
/*                               Stable Ordering                              */
/* -------------------------------------------------------------------------- */

/// Provide a **total**, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

impl StableOrd for ParticipantId {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl StableOrd for PeriodId {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl StableOrd for ApartmentId {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl StableOrd for Apartment {
    /// Canonical apartment order is **always** `(sort_order, apartment_id)`.
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        match self.sort_order.cmp(&other.sort_order) {
            Ordering::Equal => self.id.stable_cmp(&other.id),
            o => o,
        }
    }
}

impl StableOrd for Participant {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.id.stable_cmp(&other.id)
    }
}

impl StableOrd for Wish {
    /// `(priority, period, apartments, comment)`; the participant is not part
    /// of the key because wishes are only ever compared within one owner.
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.period.stable_cmp(&other.period))
            .then_with(|| self.apartments.cmp(&other.apartments))
            .then_with(|| self.comment.cmp(&other.comment))
    }
}

/* -------------------------------------------------------------------------- */
/*                            Canonical sort helpers                           */
/* -------------------------------------------------------------------------- */

/// Sort apartments **in place** into canonical try-order.
#[inline]
pub fn sort_apartments_canonical(xs: &mut [&Apartment]) {
    xs.sort_by(|a, b| a.stable_cmp(b));
}

/// Sort participants **in place** by ascending id and drop repeated ids.
pub fn sort_participants_canonical(xs: &mut Vec<&Participant>) {
    xs.sort_by(|a, b| a.stable_cmp(b));
    xs.dedup_by(|a, b| a.id == b.id);
}

/// Sort wishes **in place** into canonical order (tier first).
#[inline]
pub fn sort_wishes_canonical(xs: &mut [&Wish]) {
    xs.sort_by(|a, b| a.stable_cmp(b));
}
