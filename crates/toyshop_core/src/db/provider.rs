//! Holder for the one connection the application works against.
//!
//! # Responsibility
//! - Keep the connection opened at startup until shutdown.
//! - Fail loudly when a caller asks for it before startup set it.
//!
//! # Invariants
//! - At most one connection is held; `set` replaces, never pools.
//! - No reconnection: a dead connection surfaces as query failures.

use crate::config::ConfigurationError;
use log::{info, warn};
use rusqlite::Connection;

/// Explicit replacement for a process-global connection handle.
///
/// Owned by the application root and lent to repositories by reference.
#[derive(Debug, Default)]
pub struct ConnectionProvider {
    conn: Option<Connection>,
}

impl ConnectionProvider {
    /// Creates an empty provider. `get` fails until `set` is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `conn`, dropping (and closing) any previous connection.
    pub fn set(&mut self, conn: Connection) {
        if self.conn.replace(conn).is_some() {
            warn!("event=connection_set module=db status=ok replaced=true");
        } else {
            info!("event=connection_set module=db status=ok replaced=false");
        }
    }

    /// Borrows the stored connection.
    ///
    /// # Errors
    /// - `ConfigurationError::MissingConnection` when nothing was set.
    pub fn get(&self) -> Result<&Connection, ConfigurationError> {
        self.conn
            .as_ref()
            .ok_or(ConfigurationError::MissingConnection)
    }

    pub fn is_set(&self) -> bool {
        self.conn.is_some()
    }

    /// Hands the connection back, leaving the provider empty.
    pub fn take(&mut self) -> Option<Connection> {
        self.conn.take()
    }
}
