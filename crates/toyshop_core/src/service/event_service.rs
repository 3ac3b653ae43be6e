//! Calendar event use-cases.

use super::{ServiceError, ServiceResult};
use crate::model::event::Event;
use crate::model::EntityId;
use crate::repo::event_repo::EventRepository;
use chrono::{Local, NaiveDate};
use serde::Serialize;

/// One calendar table line, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    pub id: EntityId,
    pub description: String,
    pub date: String,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id(),
            description: event.description.clone(),
            date: event.date_created.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Calendar service over any event repository.
pub struct EventService<R: EventRepository> {
    repo: R,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_event(&self, description: &str, date: NaiveDate) -> ServiceResult<Event> {
        ensure_description(description)?;
        Ok(self.repo.create(description, date)?)
    }

    /// Rewrites description and date of event `id`.
    pub fn edit_event(
        &self,
        id: EntityId,
        description: &str,
        date: NaiveDate,
    ) -> ServiceResult<Event> {
        ensure_description(description)?;
        let mut event = self.repo.find_by_id(id)?;
        event.description = description.to_string();
        event.date_created = date;
        self.repo.update(&event)?;
        Ok(event)
    }

    pub fn event(&self, id: EntityId) -> ServiceResult<Event> {
        Ok(self.repo.find_by_id(id)?)
    }

    pub fn remove_event(&self, id: EntityId) -> ServiceResult<()> {
        let mut event = self.repo.find_by_id(id)?;
        self.repo.delete(&mut event)?;
        Ok(())
    }

    pub fn events_on(&self, date: NaiveDate) -> ServiceResult<Vec<Event>> {
        Ok(self.repo.find_by_date(date)?)
    }

    /// Events dated today in local time, as the start screen lists them.
    pub fn todays_events(&self) -> ServiceResult<Vec<Event>> {
        self.events_on(Local::now().date_naive())
    }

    pub fn catalog(&self) -> ServiceResult<Vec<EventRow>> {
        Ok(self.repo.find_all()?.iter().map(EventRow::from).collect())
    }
}

fn ensure_description(description: &str) -> ServiceResult<()> {
    if description.trim().is_empty() {
        return Err(ServiceError::EmptyDescription);
    }
    Ok(())
}
