/// Server bootstrap
///
/// Starts the listener on `0.0.0.0:<port>`. TLS is attempted only when the
/// configuration asks for it; any failure loading the key/certificate pair
/// is logged and the server falls back to plaintext HTTP on the same port
/// rather than aborting startup. Listener bind failures are not recovered
/// here and propagate to the caller.
///
/// # Example
///
/// ```no_run
/// use matrix_sql_server::{config::ServerConfig, routes, server};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::from_env();
///     server::run(config, routes::router()).await
/// }
/// ```

use crate::{app, config::ServerConfig, db};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use std::net::SocketAddr;
use tracing::{info, warn};

/// How the listener will accept connections.
///
/// Selected once at startup from configuration, never from request state.
pub enum ListenMode {
    /// TLS with the loaded certificate material
    Https(RustlsConfig),

    /// Plaintext HTTP (either configured, or the fallback after a TLS
    /// material failure)
    Http,
}

impl ListenMode {
    /// URL scheme for startup logging
    pub fn scheme(&self) -> &'static str {
        match self {
            ListenMode::Https(_) => "https",
            ListenMode::Http => "http",
        }
    }
}

async fn load_tls_config(config: &ServerConfig) -> std::io::Result<RustlsConfig> {
    RustlsConfig::from_pem_file(&config.ssl_cert_path, &config.ssl_key_path).await
}

/// Picks the listening mode from configuration.
///
/// The certificate load result is branched on explicitly so the degraded
/// path is visible: missing files, malformed PEM and similar errors all
/// produce `ListenMode::Http` with a warning, never a startup failure.
pub async fn select_listen_mode(config: &ServerConfig) -> ListenMode {
    if !config.use_https {
        return ListenMode::Http;
    }

    match load_tls_config(config).await {
        Ok(tls) => {
            info!(
                cert = %config.ssl_cert_path,
                key = %config.ssl_key_path,
                "TLS material loaded"
            );
            ListenMode::Https(tls)
        }
        Err(err) => {
            warn!(
                error = %err,
                cert = %config.ssl_cert_path,
                key = %config.ssl_key_path,
                "Failed to load TLS material, falling back to plaintext HTTP"
            );
            ListenMode::Http
        }
    }
}

/// Runs the server until shutdown.
pub async fn run(config: ServerConfig, api_routes: Router) -> anyhow::Result<()> {
    serve(config, api_routes, Handle::new()).await
}

/// Runs the server with a caller-supplied handle.
///
/// The handle observes readiness (`Handle::listening` resolves once the
/// listener accepts connections) and drives graceful shutdown. Used by
/// `main` and by integration tests that need the bound address.
pub async fn serve(
    config: ServerConfig,
    api_routes: Router,
    handle: Handle,
) -> anyhow::Result<()> {
    // Trigger pool creation before accepting traffic. The pool is lazy, so
    // this never blocks on database I/O; handlers connect on first query.
    db::init_pool(None).await;

    let app = app::build_router(&config, api_routes);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let mode = select_listen_mode(&config).await;

    tokio::spawn(announce_listening(handle.clone(), mode.scheme()));

    match mode {
        ListenMode::Https(tls) => {
            axum_server::bind_rustls(addr, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        ListenMode::Http => {
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }

    Ok(())
}

async fn announce_listening(handle: Handle, scheme: &'static str) {
    if let Some(addr) = handle.listening().await {
        info!("Server running on {}://{}", scheme, addr);
    }
}
