//! Age restriction of a toy.
//!
//! # Invariants
//! - In memory the range is inclusive on both ends and `lower <= upper`.
//! - In storage the range is half-open: `[lower, upper + 1)`.
//! - Every write path uses `to_storage`, every read path `from_storage`.

use super::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Inclusive child-age range `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAgeRange", into = "RawAgeRange")]
pub struct AgeRange {
    lower: u32,
    upper: u32,
}

#[derive(Serialize, Deserialize)]
struct RawAgeRange {
    lower: u32,
    upper: u32,
}

impl AgeRange {
    /// Builds an inclusive range; a single age (`lower == upper`) is allowed.
    pub fn new(lower: u32, upper: u32) -> Result<Self, ModelError> {
        if lower > upper {
            return Err(ModelError::InvalidAgeRange {
                lower: i64::from(lower),
                upper: i64::from(upper),
            });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(self) -> u32 {
        self.lower
    }

    pub fn upper(self) -> u32 {
        self.upper
    }

    /// True when every age in `other` is also in `self`.
    pub fn contains(self, other: AgeRange) -> bool {
        self.lower <= other.lower && self.upper >= other.upper
    }

    /// Half-open `(lower, upper_exclusive)` bounds as persisted.
    pub fn to_storage(self) -> (i64, i64) {
        (i64::from(self.lower), i64::from(self.upper) + 1)
    }

    /// Rebuilds a range from persisted half-open bounds.
    pub fn from_storage(lower: i64, upper_exclusive: i64) -> Result<Self, ModelError> {
        let invalid = || ModelError::InvalidAgeRange {
            lower,
            upper: upper_exclusive,
        };
        let lower_value = u32::try_from(lower).map_err(|_| invalid())?;
        let upper_value = upper_exclusive
            .checked_sub(1)
            .and_then(|upper| u32::try_from(upper).ok())
            .ok_or_else(invalid)?;
        Self::new(lower_value, upper_value).map_err(|_| invalid())
    }
}

impl Display for AgeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.lower, self.upper)
    }
}

impl TryFrom<RawAgeRange> for AgeRange {
    type Error = ModelError;

    fn try_from(raw: RawAgeRange) -> Result<Self, Self::Error> {
        Self::new(raw.lower, raw.upper)
    }
}

impl From<AgeRange> for RawAgeRange {
    fn from(range: AgeRange) -> Self {
        Self {
            lower: range.lower,
            upper: range.upper,
        }
    }
}
