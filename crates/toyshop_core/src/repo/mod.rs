//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQL details from services and the CLI.
//!
//! # Invariants
//! - Every statement is parameterized; only whitelisted column names are
//!   ever formatted into SQL text.
//! - Each call prepares, runs and drops its own statement; SQLite autocommit
//!   commits mutations immediately.
//! - Repositories are only built on migrated connections.

use crate::config::ConfigurationError;
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::{EntityId, ModelError};
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod event_repo;
pub mod toy_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by all entity repositories.
#[derive(Debug)]
pub enum RepoError {
    /// No connection was configured on the provider.
    Configuration(ConfigurationError),
    /// Driver-level or constraint failure.
    Db(DbError),
    NotFound {
        entity: &'static str,
        id: EntityId,
    },
    /// Operation needs a persisted entity.
    Unsaved(&'static str),
    /// A stored row cannot be mapped back to a record.
    InvalidData(String),
    /// Scaling a toy's cost leaves the representable range.
    CostOverflow {
        id: EntityId,
        percentage: u32,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl RepoError {
    /// True when the store rejected a write because of a schema constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)))
                if err.code == ErrorCode::ConstraintViolation
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "there is no {entity} with id {id}"),
            Self::Unsaved(entity) => write!(f, "{entity} is not saved yet"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::CostOverflow { id, percentage } => write!(
                f,
                "cost of toy {id} overflows when scaled by {percentage}%"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigurationError> for RepoError {
    fn from(value: ConfigurationError) -> Self {
        Self::Configuration(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ModelError> for RepoError {
    fn from(value: ModelError) -> Self {
        match value {
            ModelError::UnsavedEntity(entity) => Self::Unsaved(entity),
            other => Self::InvalidData(other.to_string()),
        }
    }
}

/// Rejects connections that did not go through migrations.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    required_tables: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in required_tables {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(RepoError::MissingRequiredTable(*table));
        }
    }

    Ok(())
}
