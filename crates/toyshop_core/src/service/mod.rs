//! Use-case services over the repositories.
//!
//! # Responsibility
//! - Validate user input before it reaches a repository.
//! - Shape query results into table rows for front ends.
//!
//! # Invariants
//! - Services stay storage-agnostic: they only see repository traits.

use crate::model::EntityId;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod event_service;
pub mod toy_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error returned by use-case services.
#[derive(Debug)]
pub enum ServiceError {
    /// Toy name is empty or whitespace only.
    EmptyName,
    /// Event description is empty or whitespace only.
    EmptyDescription,
    /// Age bounds are out of order for the requested operation.
    InvalidAgeRange { lower: u32, upper: u32 },
    NotFound { entity: &'static str, id: EntityId },
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::InvalidAgeRange { lower, upper } => write!(
                f,
                "minimum age {lower} must be less than maximum age {upper}"
            ),
            Self::NotFound { entity, id } => write!(f, "there is no {entity} with id {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}
