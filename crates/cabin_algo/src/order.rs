//! Snake turn order: one shuffled forward pass, then the same order reversed.

use std::fmt;

use serde::{Deserialize, Serialize};

use cabin_core::determinism::sort_participants_canonical;
use cabin_core::{DrawRng, Participant};

use crate::error::DraftError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    /// First pass, forward order.
    Down,
    /// Second pass, reversed order.
    Up,
}

impl Round {
    #[inline]
    pub fn number(self) -> u32 {
        match self {
            Round::Down => 1,
            Round::Up => 2,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Round::Down => "down",
            Round::Up => "up",
        })
    }
}

/// One turn of the snake sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn<'a> {
    /// 0-based index into the full sequence.
    pub index: usize,
    pub round: Round,
    /// 1-based position of the participant in the forward order.
    pub position: usize,
    pub participant: &'a Participant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftOrder<'a> {
    forward: Vec<&'a Participant>,
}

impl<'a> DraftOrder<'a> {
    #[inline]
    pub fn forward(&self) -> &[&'a Participant] {
        &self.forward
    }

    /// Total turns (= 2 × participants).
    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len() * 2
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Down pass followed by the up pass.
    pub fn turns(&self) -> impl Iterator<Item = Turn<'a>> + '_ {
        let n = self.forward.len();
        let down = self.forward.iter().enumerate().map(|(i, p)| Turn {
            index: i,
            round: Round::Down,
            position: i + 1,
            participant: *p,
        });
        let up = self.forward.iter().enumerate().rev().map(move |(i, p)| Turn {
            index: 2 * n - 1 - i,
            round: Round::Up,
            position: i + 1,
            participant: *p,
        });
        down.chain(up)
    }
}

/// Deduplicate and canonically sort `participants`, then shuffle once.
///
/// Fails with [`DraftError::NoParticipants`] before touching the RNG when the
/// set is empty.
pub fn build_draft_order<'a>(
    participants: &'a [Participant],
    rng: &mut DrawRng,
) -> Result<DraftOrder<'a>, DraftError> {
    if participants.is_empty() {
        return Err(DraftError::NoParticipants);
    }
    let mut forward: Vec<&'a Participant> = participants.iter().collect();
    sort_participants_canonical(&mut forward);
    rng.shuffle_in_place(&mut forward);
    Ok(DraftOrder { forward })
}
