//! Priority-tier shuffle of one participant's wishes.

use cabin_core::determinism::sort_wishes_canonical;
use cabin_core::{DrawRng, Wish};

/// Group by `priority`, shuffle inside each tier, concatenate tiers in
/// ascending priority order.
///
/// Wishes are canonically sorted first, so the result depends only on the set
/// of wishes and the RNG state. Tiers of a single wish consume no randomness.
pub fn shuffle_by_priority<'a, I>(wishes: I, rng: &mut DrawRng) -> Vec<&'a Wish>
where
    I: IntoIterator<Item = &'a Wish>,
{
    let mut out: Vec<&'a Wish> = wishes.into_iter().collect();
    sort_wishes_canonical(&mut out);

    let mut start = 0;
    while start < out.len() {
        let tier = out[start].priority;
        let end = out[start..]
            .iter()
            .position(|w| w.priority != tier)
            .map_or(out.len(), |off| start + off);
        rng.shuffle_in_place(&mut out[start..end]);
        start = end;
    }
    out
}
