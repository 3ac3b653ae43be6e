//! Catalogue toy record.
//!
//! # Invariants
//! - `id()` refuses to answer for unsaved toys instead of leaking the sentinel.
//! - `quantity` is non-negative by type.

use super::age_range::AgeRange;
use super::money::Money;
use super::{EntityId, ModelError, UNSAVED_ID};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toy {
    id: EntityId,
    pub name: String,
    pub cost: Money,
    pub quantity: u32,
    pub age: AgeRange,
}

impl Toy {
    /// Creates an unsaved toy.
    pub fn new(name: impl Into<String>, cost: Money, quantity: u32, age: AgeRange) -> Self {
        Self::with_id(UNSAVED_ID, name, cost, quantity, age)
    }

    /// Creates a toy with a known store id.
    pub fn with_id(
        id: EntityId,
        name: impl Into<String>,
        cost: Money,
        quantity: u32,
        age: AgeRange,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            quantity,
            age,
        }
    }

    /// Store id of a saved toy.
    ///
    /// # Errors
    /// - `ModelError::UnsavedEntity` when the toy was never saved.
    pub fn id(&self) -> Result<EntityId, ModelError> {
        if self.is_saved() {
            Ok(self.id)
        } else {
            Err(ModelError::UnsavedEntity("toy"))
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id != UNSAVED_ID
    }

    pub(crate) fn mark_saved(&mut self, id: EntityId) {
        self.id = id;
    }

    pub(crate) fn mark_unsaved(&mut self) {
        self.id = UNSAVED_ID;
    }
}

impl Display for Toy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(id: {}, name: {}, cost: {}, quantity: {}, age: {})",
            self.id, self.name, self.cost, self.quantity, self.age
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Toy;
    use crate::model::age_range::AgeRange;
    use crate::model::money::Money;
    use crate::model::ModelError;

    fn sample() -> Toy {
        Toy::new("Lego", Money::from_major(150), 3, AgeRange::new(3, 9).unwrap())
    }

    #[test]
    fn unsaved_toy_has_no_id() {
        let toy = sample();
        assert!(!toy.is_saved());
        assert_eq!(toy.id(), Err(ModelError::UnsavedEntity("toy")));
    }

    #[test]
    fn saved_state_follows_id() {
        let mut toy = sample();
        toy.mark_saved(7);
        assert_eq!(toy.id(), Ok(7));
        toy.mark_unsaved();
        assert!(!toy.is_saved());
    }

    #[test]
    fn display_lists_every_field() {
        assert_eq!(
            sample().to_string(),
            "(id: -1, name: Lego, cost: 150.00, quantity: 3, age: 3 - 9)"
        );
    }
}
