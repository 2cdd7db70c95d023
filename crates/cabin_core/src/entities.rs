//! Read-only draw tables and the allocation value produced by a run.
//!
//! Everything here is plain data: the engine receives these by reference and
//! never reaches back into a persistence layer while it runs.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{ApartmentId, ParticipantId, PeriodId};

/// A person taking part in the draw. Immutable for the duration of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub email: String,
}

/// A disjoint time window. The engine treats it as an opaque key; dates and
/// description are carried for presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Period {
    pub id: PeriodId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sort_order: i32,
}

/// A bookable unit. Lower `sort_order` is tried first when a wish names
/// several acceptable apartments.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Apartment {
    pub id: ApartmentId,
    pub name: String,
    pub sort_order: i32,
}

/// One prioritized wish. `priority` 1 is the most preferred.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wish {
    pub participant: ParticipantId,
    pub period: PeriodId,
    pub priority: u32,
    pub apartments: Vec<ApartmentId>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub comment: Option<String>,
}

/// A granted slot. Append-only within a run.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Allocation {
    pub participant: ParticipantId,
    pub period: PeriodId,
    pub apartment: ApartmentId,
    /// Priority of the wish that produced the grant.
    pub priority: u32,
}

/// Flat, in-memory input of one draw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DrawInput {
    pub participants: Vec<Participant>,
    pub periods: BTreeMap<PeriodId, Period>,
    pub apartments: BTreeMap<ApartmentId, Apartment>,
    pub wishes: Vec<Wish>,
}

impl DrawInput {
    /// All wishes submitted by `participant`, in input order.
    pub fn wishes_of<'a>(&'a self, participant: &'a ParticipantId) -> impl Iterator<Item = &'a Wish> + 'a {
        self.wishes.iter().filter(move |w| &w.participant == participant)
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    pub fn period(&self, id: &PeriodId) -> Option<&Period> {
        self.periods.get(id)
    }

    pub fn apartment(&self, id: &ApartmentId) -> Option<&Apartment> {
        self.apartments.get(id)
    }
}
