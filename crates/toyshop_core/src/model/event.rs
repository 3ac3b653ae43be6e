//! Calendar event record.

use super::{EntityId, UNSAVED_ID};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reminder shown on the shop calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    id: EntityId,
    pub description: String,
    pub date_created: NaiveDate,
}

impl Event {
    /// Creates an unsaved event (`id == UNSAVED_ID`).
    pub fn new(description: impl Into<String>, date_created: NaiveDate) -> Self {
        Self::with_id(UNSAVED_ID, description, date_created)
    }

    /// Creates an event with a known store id.
    ///
    /// Used by row mapping and by callers that already hold an id.
    pub fn with_id(id: EntityId, description: impl Into<String>, date_created: NaiveDate) -> Self {
        Self {
            id,
            description: description.into(),
            date_created,
        }
    }

    /// Store id, or `UNSAVED_ID` when never saved.
    pub fn id(&self) -> EntityId {
        self.id
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
