//! # arbor-server
//!
//! Axum HTTP server for the arbor platform.
//!
//! - `GET /health`: liveness and uptime
//! - `POST /rpc`: bearer-authenticated RPC dispatch
//! - Graceful shutdown via `CancellationToken`

#![deny(unsafe_code)]

pub mod config;
pub mod health;
pub mod server;
pub mod shutdown;

pub use config::ServerConfig;
pub use server::{AppState, ArborServer};
pub use shutdown::ShutdownCoordinator;
