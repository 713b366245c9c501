//! # arbor-store
//!
//! `SQLite` persistence for the arbor platform.
//!
//! - Connection pooling (`r2d2` + `rusqlite`) with WAL and foreign keys
//! - Embedded, idempotent schema migrations
//! - Stateless repositories: every method takes a `&Connection` so callers
//!   decide transaction boundaries (mutating flows hold one
//!   `rusqlite::Transaction` across several repository calls)

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod time;

pub use connection::{ConnectionConfig, ConnectionPool, PooledConnection, new_file, new_in_memory};
pub use errors::{Result, StoreError};
pub use migrations::run_migrations;
