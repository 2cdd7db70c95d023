// crates/cabin_core/src/rng.rs
//
// Seeded randomness for the draw: participant order and in-tier wish order.
// Integer-only, unbiased ranges via rejection sampling, explicit seed mapping.
//
// With a seed, two `DrawRng`s driven by the same sequence of calls yield
// bit-identical results on every platform (pin rand_chacha/rand_core).
// Without a seed the stream is keyed from OS entropy and is not reproducible.

use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// The seed a run actually used, echoed into the execution record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeedEcho {
    Fixed(u64),
    /// No seed given; the stream came from OS entropy.
    Random,
}

impl SeedEcho {
    #[inline]
    pub fn as_u64(self) -> Option<u64> {
        match self {
            SeedEcho::Fixed(s) => Some(s),
            SeedEcho::Random => None,
        }
    }
}

impl fmt::Display for SeedEcho {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedEcho::Fixed(s) => write!(f, "{s}"),
            SeedEcho::Random => f.write_str("random"),
        }
    }
}

/// ChaCha20-backed random source, constructed explicitly and passed by
/// `&mut` into every operation that needs it.
#[derive(Debug, Clone)]
pub struct DrawRng {
    rng: ChaCha20Rng,
    seed: SeedEcho,
    words_consumed: u128,
}

impl DrawRng {
    /// Construct from a 64-bit seed. The mapping to the ChaCha20 32-byte seed
    /// is explicit: `seed.to_le_bytes()` into the first 8 bytes; the remaining
    /// 24 bytes are zero.
    #[inline]
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut seed32 = [0u8; 32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        Self {
            rng: ChaCha20Rng::from_seed(seed32),
            seed: SeedEcho::Fixed(seed),
            words_consumed: 0,
        }
    }

    /// Non-reproducible source keyed from the operating system.
    #[cfg(feature = "std")]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
            seed: SeedEcho::Random,
            words_consumed: 0,
        }
    }

    /// `Some(seed)` → reproducible stream; `None` → OS entropy.
    #[cfg(feature = "std")]
    #[inline]
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::from_seed_u64(s),
            None => Self::from_entropy(),
        }
    }

    #[inline]
    pub fn seed(&self) -> SeedEcho {
        self.seed
    }

    /// Total number of 64-bit words drawn so far, rejected draws included.
    #[inline]
    pub fn words_consumed(&self) -> u128 {
        self.words_consumed
    }

    /// The only place the counter advances.
    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.words_consumed = self.words_consumed.saturating_add(1);
        self.rng.next_u64()
    }

    /// Unbiased integer in `[0, n)`; `None` if `n == 0`.
    ///
    /// `threshold = 2^64 mod n` (computed as `wrapping_neg() % n`); a word `x`
    /// is accepted when `x >= threshold`, after which `x % n` is uniform.
    #[inline]
    pub fn gen_range(&mut self, n: u64) -> Option<u64> {
        if n == 0 {
            return None;
        }
        let threshold = n.wrapping_neg() % n;
        loop {
            let x = self.next_u64();
            if x >= threshold {
                return Some(x % n);
            }
        }
    }

    /// Fisher–Yates: for `i` in `len-1 ..= 1`, `j ~ U[0, i]`, `swap(i, j)`.
    /// Slices of length 0 or 1 consume no randomness.
    pub fn shuffle_in_place<T>(&mut self, slice: &mut [T]) {
        let len = slice.len();
        if len <= 1 {
            return;
        }
        for i in (1..len).rev() {
            let j = match self.gen_range((i as u64) + 1) {
                Some(v) => v as usize,
                None => unreachable!("gen_range(>0) must return Some"),
            };
            slice.swap(i, j);
        }
    }

    /// Owned variant of [`DrawRng::shuffle_in_place`].
    #[inline]
    pub fn shuffled<T>(&mut self, mut items: Vec<T>) -> Vec<T> {
        self.shuffle_in_place(&mut items);
        items
    }

    /// Choose a single index in `[0, n)`; `None` if `n == 0`.
    #[inline]
    pub fn choose_index(&mut self, n: usize) -> Option<usize> {
        self.gen_range(n as u64).map(|v| v as usize)
    }

    /// Choose one element uniformly. A single-element slice is returned
    /// without drawing from the stream.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Result<(usize, &'a T), CoreError> {
        let ix = match items.len() {
            0 => return Err(CoreError::EmptyChoiceSet),
            1 => 0,
            n => self.choose_index(n).ok_or(CoreError::EmptyChoiceSet)?,
        };
        items.get(ix).map(|x| (ix, x)).ok_or(CoreError::EmptyChoiceSet)
    }
}
