//! Core types, identifiers, ordering helpers and the seeded draw RNG.
//!
//! This crate is **I/O-free**. It defines the stable types shared across the
//! draw engine (`cabin_algo`, `cabin_io`, `cabin_pipeline`, `cabin_report`,
//! `cabin_cli`):
//!
//! - Identifier tokens: `ParticipantId`, `PeriodId`, `ApartmentId`
//! - Read-only draw tables: `Participant`, `Period`, `Apartment`, `Wish`, `DrawInput`
//! - The `Allocation` value produced by a run
//! - Canonical ordering helpers
//! - Seedable RNG (ChaCha20) for participant order and in-tier wish order
//!
//! Serialization derives are gated behind the `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidId,
        EmptyChoiceSet,
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidId => write!(f, "invalid id"),
                CoreError::EmptyChoiceSet => write!(f, "empty choice set"),
            }
        }
    }

    impl From<crate::ids::IdError> for CoreError {
        #[inline]
        fn from(_: crate::ids::IdError) -> Self {
            CoreError::InvalidId
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub mod determinism;
pub mod entities;
pub mod ids;
pub mod rng;

pub use chrono::NaiveDate;
pub use entities::{Allocation, Apartment, DrawInput, Participant, Period, Wish};
pub use errors::CoreError;
pub use ids::{ApartmentId, IdError, ParticipantId, PeriodId};
pub use rng::{DrawRng, SeedEcho};
