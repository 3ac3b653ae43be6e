//! Event repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD plus date and full-table queries over `events`.
//!
//! # Invariants
//! - `create` returns the record carrying its store-assigned id.
//! - `delete` always leaves the in-memory record unsaved.
//! - Deleting an unsaved record touches nothing and succeeds.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::db::ConnectionProvider;
use crate::model::event::Event;
use crate::model::EntityId;
use chrono::NaiveDate;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

const EVENT_SELECT_SQL: &str = "SELECT id, description, date_created FROM events";
const ENTITY: &str = "event";

/// Repository interface for calendar events.
pub trait EventRepository {
    fn create(&self, description: &str, date_created: NaiveDate) -> RepoResult<Event>;
    fn update(&self, event: &Event) -> RepoResult<()>;
    fn delete(&self, event: &mut Event) -> RepoResult<()>;
    fn find_by_date(&self, date_created: NaiveDate) -> RepoResult<Vec<Event>>;
    fn find_by_id(&self, id: EntityId) -> RepoResult<Event>;
    fn find_all(&self) -> RepoResult<Vec<Event>>;

    /// Inserts an unsaved event or rewrites a saved one.
    fn save(&self, event: &mut Event) -> RepoResult<()> {
        if event.is_saved() {
            return self.update(event);
        }
        let created = self.create(&event.description, event.date_created)?;
        event.mark_saved(created.id());
        Ok(())
    }
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Builds a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["events"])?;
        Ok(Self { conn })
    }

    /// Builds a repository over the provider's connection.
    pub fn from_provider(provider: &'conn ConnectionProvider) -> RepoResult<Self> {
        Self::try_new(provider.get()?)
    }

    fn query_events(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create(&self, description: &str, date_created: NaiveDate) -> RepoResult<Event> {
        let id: EntityId = self.conn.query_row(
            "INSERT INTO events (description, date_created)
             VALUES (?1, ?2)
             RETURNING id;",
            params![description, date_created],
            |row| row.get(0),
        )?;
        debug!("event=event_create module=repo status=ok id={id}");
        Ok(Event::with_id(id, description, date_created))
    }

    fn update(&self, event: &Event) -> RepoResult<()> {
        if !event.is_saved() {
            return Err(RepoError::Unsaved(ENTITY));
        }

        let changed = self.conn.execute(
            "UPDATE events
             SET description = ?1, date_created = ?2
             WHERE id = ?3;",
            params![event.description, event.date_created, event.id()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                id: event.id(),
            });
        }
        Ok(())
    }

    fn delete(&self, event: &mut Event) -> RepoResult<()> {
        if !event.is_saved() {
            return Ok(());
        }

        let removed = self
            .conn
            .execute("DELETE FROM events WHERE id = ?1;", [event.id()])?;
        debug!(
            "event=event_delete module=repo status=ok id={} removed={}",
            event.id(),
            removed
        );
        event.mark_unsaved();
        Ok(())
    }

    fn find_by_date(&self, date_created: NaiveDate) -> RepoResult<Vec<Event>> {
        self.query_events(
            &format!("{EVENT_SELECT_SQL} WHERE date_created = ?1;"),
            [date_created],
        )
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Event> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;
        let event = stmt
            .query_row([id], |row| Ok(parse_event_row(row)))
            .optional()?;
        match event {
            Some(parsed) => parsed,
            None => Err(RepoError::NotFound { entity: ENTITY, id }),
        }
    }

    fn find_all(&self) -> RepoResult<Vec<Event>> {
        self.query_events(&format!("{EVENT_SELECT_SQL};"), [])
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let id: EntityId = row.get("id")?;
    let date_created: NaiveDate = row.get("date_created").map_err(|err| {
        RepoError::InvalidData(format!("invalid date in events.date_created for id {id}: {err}"))
    })?;
    Ok(Event::with_id(id, row.get::<_, String>("description")?, date_created))
}
