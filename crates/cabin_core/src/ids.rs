//! crates/cabin_core/src/ids.rs
//! Identifier newtypes for the draw tables (participants, periods, apartments).
//! Deterministic, ASCII-only, strict shapes; no I/O.

use alloc::borrow::ToOwned;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors returned when validating or parsing IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    Empty,
    NonAscii,
    TooLong,
    BadShape,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::Empty => f.write_str("identifier is empty"),
            IdError::NonAscii => f.write_str("identifier is not ASCII"),
            IdError::TooLong => f.write_str("identifier is too long"),
            IdError::BadShape => f.write_str("identifier contains forbidden characters"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IdError {}

pub const TOKEN_MAX_LEN: usize = 128;

/// Quickly verify ASCII (no NUL).
#[inline]
fn is_ascii_no_nul(s: &str) -> bool {
    !s.as_bytes().iter().any(|&b| b == 0 || b > 0x7F)
}

/// Token charset: ^[A-Za-z0-9_.:@+-]{1,128}$ (ASCII only).
/// Covers database keys, UUIDs and e-mail style participant ids.
#[inline]
pub fn is_valid_token(s: &str) -> bool {
    let bs = s.as_bytes();
    if bs.is_empty() || bs.len() > TOKEN_MAX_LEN || !is_ascii_no_nul(s) {
        return false;
    }
    bs.iter().all(|&b| {
        b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b':' | b'@' | b'+' | b'-')
    })
}

fn check_token(s: &str) -> Result<(), IdError> {
    if s.is_empty() {
        return Err(IdError::Empty);
    }
    if !is_ascii_no_nul(s) {
        return Err(IdError::NonAscii);
    }
    if s.len() > TOKEN_MAX_LEN {
        return Err(IdError::TooLong);
    }
    if !is_valid_token(s) {
        return Err(IdError::BadShape);
    }
    Ok(())
}

macro_rules! token_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        pub struct $name(String);

        impl $name {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl FromStr for $name {
            type Err = IdError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                check_token(s)?;
                Ok($name(s.to_owned()))
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IdError;
            #[inline]
            fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;
            fn try_from(value: String) -> Result<Self, Self::Error> {
                check_token(&value)?;
                Ok($name(value))
            }
        }

        impl From<$name> for String {
            #[inline]
            fn from(value: $name) -> String { value.0 }
        }
    }
}

token_newtype!(
    /// Participant (person who submitted wishes).
    ParticipantId
);
token_newtype!(
    /// Period (disjoint time window of a drawing).
    PeriodId
);
token_newtype!(
    /// Apartment (bookable unit of the cabin).
    ApartmentId
);
