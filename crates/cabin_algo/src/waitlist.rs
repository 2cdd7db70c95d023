//! Single-winner lottery over a waitlist of competing requests.
//!
//! Used when several pending requests target the same apartment and dates.
//! Serializing concurrent runs for the same waitlist is the caller's job.

use cabin_core::DrawRng;
use tracing::info;

use crate::error::DraftError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistDraw<T> {
    pub winner: T,
    /// Everyone else, in input order.
    pub losers: Vec<T>,
}

/// Pick one entry uniformly. A lone entry wins without touching the RNG; an
/// empty list is an error, not a panic.
pub fn pick_winner<T>(mut entries: Vec<T>, rng: &mut DrawRng) -> Result<WaitlistDraw<T>, DraftError> {
    let (ix, _) = rng.choose(&entries).map_err(|_| DraftError::EmptyWaitlist)?;
    info!(entrants = entries.len(), winner_index = ix, seed = %rng.seed(), "waitlist drawn");
    let winner = entries.remove(ix);
    Ok(WaitlistDraw { winner, losers: entries })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_waitlist_is_an_error() {
        let err = pick_winner(Vec::<u8>::new(), &mut DrawRng::from_seed_u64(1)).unwrap_err();
        assert_eq!(err, DraftError::EmptyWaitlist);
    }

    #[test]
    fn lone_entry_wins_without_randomness() {
        let mut rng = DrawRng::from_seed_u64(1);
        let draw = pick_winner(vec!["only"], &mut rng).unwrap();
        assert_eq!(draw.winner, "only");
        assert!(draw.losers.is_empty());
        assert_eq!(rng.words_consumed(), 0);
    }

    #[test]
    fn winner_plus_losers_is_the_input() {
        for seed in 0..20 {
            let draw = pick_winner(vec![1, 2, 3, 4], &mut DrawRng::from_seed_u64(seed)).unwrap();
            let mut all = draw.losers.clone();
            all.push(draw.winner);
            all.sort_unstable();
            assert_eq!(all, [1, 2, 3, 4]);
            assert!(draw.losers.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn every_entry_can_win() {
        let mut seen = [false; 3];
        for seed in 0..64 {
            let draw = pick_winner(vec![0usize, 1, 2], &mut DrawRng::from_seed_u64(seed)).unwrap();
            seen[draw.winner] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
