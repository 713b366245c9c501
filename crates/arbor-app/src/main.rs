//! # arbor-app
//!
//! Arbor platform server binary: wires settings, logging, the database
//! pool, and the RPC registry into the HTTP server.

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use arbor_rpc::context::RpcContext;
use arbor_rpc::handlers::register_all;
use arbor_rpc::registry::MethodRegistry;
use arbor_server::{ArborServer, ServerConfig};
use arbor_store::ConnectionConfig;

/// Arbor platform server.
#[derive(Parser, Debug)]
#[command(name = "arbor", about = "Arbor platform server")]
struct Cli {
    /// Host to bind (overrides settings if specified).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings if specified).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the `SQLite` database (overrides settings if specified).
    #[arg(long)]
    db_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = arbor_settings::load_settings().context("failed to load settings")?;
    if let Some(host) = cli.host {
        settings.server.host = host;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    if let Some(db_path) = cli.db_path {
        settings.database.path = db_path;
    }

    arbor_logging::init_logging(&settings.logging);

    let pool = arbor_store::new_file(
        &settings.database.path,
        &ConnectionConfig {
            pool_size: settings.database.pool_size,
            busy_timeout_ms: settings.database.busy_timeout_ms,
            cache_size_kib: settings.database.cache_size_kib,
        },
    )
    .context("failed to open database")?;
    {
        let conn = pool.get().context("failed to check out a connection")?;
        let _ = arbor_store::run_migrations(&conn).context("failed to run migrations")?;
    }

    let mut registry = MethodRegistry::new();
    register_all(&mut registry);

    let config = ServerConfig::from(&settings.server);
    let ctx = RpcContext {
        pool,
        settings: settings.clone(),
    };
    let server = ArborServer::new(config.clone(), registry, ctx);
    let shutdown = server.shutdown().clone();
    let router = server.router();

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "arbor server listening");

    let token = shutdown.token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            shutdown.shutdown();
        }
    });

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { token.cancelled().await })
        .await
        .context("server error")?;

    info!("arbor server stopped");
    Ok(())
}
