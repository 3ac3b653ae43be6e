//! Toy catalogue use-cases.
//!
//! # Responsibility
//! - Guard add/edit input: non-blank name, strictly ordered age bounds.
//! - Expose catalogue queries with lenient ordering input.
//! - Project toys into catalogue table rows.

use super::{ServiceError, ServiceResult};
use crate::model::age_range::AgeRange;
use crate::model::money::Money;
use crate::model::toy::Toy;
use crate::model::EntityId;
use crate::repo::toy_repo::{ToyOrder, ToyRepository};
use serde::Serialize;

/// Form input for adding or editing a toy. Age bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToyDraft {
    pub name: String,
    pub cost: Money,
    pub quantity: u32,
    pub age_lower: u32,
    pub age_upper: u32,
}

/// One catalogue table line, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToyRow {
    pub id: EntityId,
    pub name: String,
    pub cost: String,
    pub quantity: u32,
    pub ages: String,
}

impl ToyRow {
    /// Fails only for unsaved toys, which have no id to show.
    pub fn from_toy(toy: &Toy) -> ServiceResult<Self> {
        Ok(Self {
            id: toy.id().map_err(|err| ServiceError::Repo(err.into()))?,
            name: toy.name.clone(),
            cost: toy.cost.to_string(),
            quantity: toy.quantity,
            ages: toy.age.to_string(),
        })
    }
}

/// Catalogue service over any toy repository.
pub struct ToyService<R: ToyRepository> {
    repo: R,
}

impl<R: ToyRepository> ToyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates `draft` and stores it as a new toy.
    pub fn add_toy(&self, draft: &ToyDraft) -> ServiceResult<Toy> {
        let age = validate_draft(draft)?;
        let toy = self
            .repo
            .create(&draft.name, draft.cost, draft.quantity, age)?;
        Ok(toy)
    }

    /// Replaces every field of toy `id` with `draft`.
    pub fn edit_toy(&self, id: EntityId, draft: &ToyDraft) -> ServiceResult<Toy> {
        let age = validate_draft(draft)?;
        let mut toy = self.repo.find_by_id(id)?;
        toy.name = draft.name.clone();
        toy.cost = draft.cost;
        toy.quantity = draft.quantity;
        toy.age = age;
        self.repo.update(&toy)?;
        Ok(toy)
    }

    pub fn toy(&self, id: EntityId) -> ServiceResult<Toy> {
        Ok(self.repo.find_by_id(id)?)
    }

    pub fn remove_toy(&self, id: EntityId) -> ServiceResult<()> {
        let mut toy = self.repo.find_by_id(id)?;
        self.repo.delete(&mut toy)?;
        Ok(())
    }

    /// Removes every toy named exactly `name`; zero matches is fine.
    pub fn remove_by_name(&self, name: &str) -> ServiceResult<usize> {
        Ok(self.repo.delete_by_name(name)?)
    }

    /// Toys suitable for every age in `[lower, upper]`.
    ///
    /// `order` is `cost`, `name` or `quantity`; anything else means unsorted.
    pub fn search_by_age(&self, lower: u32, upper: u32, order: &str) -> ServiceResult<Vec<Toy>> {
        let ages = query_range(lower, upper)?;
        Ok(self
            .repo
            .find_by_age_range(ages, ToyOrder::parse_lenient(order))?)
    }

    pub fn most_expensive(
        &self,
        lower: u32,
        upper: u32,
        budget: Money,
    ) -> ServiceResult<Option<Toy>> {
        let ages = query_range(lower, upper)?;
        Ok(self.repo.find_most_expensive_within_budget(ages, budget)?)
    }

    /// Applies `percentage / 100` to the cost of matching toys.
    pub fn increase_cost(&self, lower: u32, upper: u32, percentage: u32) -> ServiceResult<usize> {
        let ages = query_range(lower, upper)?;
        Ok(self.repo.increase_cost_for_age_range(ages, percentage)?)
    }

    pub fn catalog(&self) -> ServiceResult<Vec<ToyRow>> {
        self.repo.find_all()?.iter().map(ToyRow::from_toy).collect()
    }

    /// Catalogue rows for an age search, in the requested order.
    pub fn search_rows(&self, lower: u32, upper: u32, order: &str) -> ServiceResult<Vec<ToyRow>> {
        self.search_by_age(lower, upper, order)?
            .iter()
            .map(ToyRow::from_toy)
            .collect()
    }
}

fn validate_draft(draft: &ToyDraft) -> ServiceResult<AgeRange> {
    if draft.name.trim().is_empty() {
        return Err(ServiceError::EmptyName);
    }
    if draft.age_lower >= draft.age_upper {
        return Err(ServiceError::InvalidAgeRange {
            lower: draft.age_lower,
            upper: draft.age_upper,
        });
    }
    query_range(draft.age_lower, draft.age_upper)
}

fn query_range(lower: u32, upper: u32) -> ServiceResult<AgeRange> {
    AgeRange::new(lower, upper).map_err(|_| ServiceError::InvalidAgeRange { lower, upper })
}
