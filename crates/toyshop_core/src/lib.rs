//! Persistence core for the toy shop inventory.
//! Toys and calendar events live here; front ends only call services.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigurationError, DbLocation, StoreConfig};
pub use db::ConnectionProvider;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::age_range::AgeRange;
pub use model::event::Event;
pub use model::money::Money;
pub use model::toy::Toy;
pub use model::{EntityId, ModelError, UNSAVED_ID};
pub use repo::event_repo::{EventRepository, SqliteEventRepository};
pub use repo::toy_repo::{SqliteToyRepository, ToyOrder, ToyRepository};
pub use repo::{RepoError, RepoResult};
pub use service::event_service::{EventRow, EventService};
pub use service::toy_service::{ToyDraft, ToyRow, ToyService};
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
