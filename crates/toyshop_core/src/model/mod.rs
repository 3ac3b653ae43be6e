//! Plain data records for the toy shop catalogue and calendar.
//!
//! # Responsibility
//! - Define `Event` and `Toy` plus the value types they carry.
//! - Keep persistence out of the records; repositories own SQL.
//!
//! # Invariants
//! - An entity is saved iff its id differs from `UNSAVED_ID`.
//! - `AgeRange` is inclusive in memory; storage conversion lives on the type.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod age_range;
pub mod event;
pub mod money;
pub mod toy;

/// Store-assigned surrogate key.
pub type EntityId = i64;

/// Sentinel id of an entity that has not been persisted yet.
pub const UNSAVED_ID: EntityId = -1;

/// Value-level validation failures raised by model constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Identity was requested from an entity that was never saved.
    UnsavedEntity(&'static str),
    InvalidAgeRange { lower: i64, upper: i64 },
    InvalidMoney(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsavedEntity(entity) => {
                write!(f, "{entity} has no id because it is not saved yet")
            }
            Self::InvalidAgeRange { lower, upper } => {
                write!(f, "invalid age range: lower {lower}, upper {upper}")
            }
            Self::InvalidMoney(message) => write!(f, "invalid money value: {message}"),
        }
    }
}

impl Error for ModelError {}
