//! # matrix-sql-server
//!
//! HTTP(S) API server for the `matrix_sql` database.
//!
//! Startup sequence: load configuration from the environment, trigger lazy
//! pool initialization, bind the listener (TLS when configured and the
//! certificate material loads, plaintext otherwise) and serve until Ctrl-C.
//!
//! ## Usage
//!
//! ```bash
//! cargo run
//! ```

use axum_server::Handle;
use matrix_sql_server::{config::ServerConfig, db, routes, server};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matrix_sql_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "matrix-sql-server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = ServerConfig::from_env();
    let handle = Handle::new();

    let mut server_task = tokio::spawn(server::serve(
        config,
        routes::router(),
        handle.clone(),
    ));

    tokio::select! {
        // Bind failures and other server errors propagate to the process
        result = &mut server_task => result??,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, exiting...");
            handle.graceful_shutdown(Some(Duration::from_secs(10)));
            server_task.await??;
        }
    }

    db::close_pool().await;
    Ok(())
}
