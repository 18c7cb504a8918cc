/// Configuration management for the server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct. All values have development-friendly
/// defaults; nothing here fails on a missing variable.
///
/// # Environment Variables
///
/// - `PORT`: Port to bind to (default: 3000)
/// - `USE_HTTPS`: Must equal the literal `true` to enable server-side TLS
/// - `SSL_KEY_PATH`: Path to the TLS private key (default: ./ssl/key.pem)
/// - `SSL_CERT_PATH`: Path to the TLS certificate (default: ./ssl/cert.pem)
/// - `CORS_ORIGINS`: Comma-separated origin allow-list override
/// - `RUST_LOG`: Log level (default: info)
///
/// Database variables (`DB_USER`, `DB_PASSWORD`, ...) are read separately by
/// [`crate::db::DbConfig::from_env`] at first pool access.
///
/// # Example
///
/// ```no_run
/// use matrix_sql_server::config::ServerConfig;
///
/// let config = ServerConfig::from_env();
/// println!("Server will listen on {}", config.bind_address());
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Origins allowed to make credentialed cross-origin requests.
///
/// Extend via the `CORS_ORIGINS` environment variable rather than editing
/// this list.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "https://sql-dqn-front-end-sigma.vercel.app",
];

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind to (all interfaces)
    pub port: u16,

    /// Whether to attempt HTTPS; on certificate failure the server falls
    /// back to plaintext on the same port
    pub use_https: bool,

    /// Path to the TLS private key (PEM)
    pub ssl_key_path: String,

    /// Path to the TLS certificate (PEM)
    pub ssl_cert_path: String,

    /// CORS origin allow-list
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            use_https: false,
            ssl_key_path: "./ssl/key.pem".to_string(),
            ssl_cert_path: "./ssl/cert.pem".to_string(),
            cors_origins: DEFAULT_CORS_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables
    ///
    /// Missing or malformed values fall back to defaults; misconfiguration
    /// is deferred to the component that consumes the value (e.g. a bad
    /// certificate path surfaces as the plaintext fallback at startup).
    pub fn from_env() -> Self {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        // Only the literal "true" enables TLS; "TRUE", "1" etc. do not.
        let use_https = env::var("USE_HTTPS").as_deref() == Ok("true");

        let ssl_key_path =
            env::var("SSL_KEY_PATH").unwrap_or(defaults.ssl_key_path);
        let ssl_cert_path =
            env::var("SSL_CERT_PATH").unwrap_or(defaults.ssl_cert_path);

        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(list) => list
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            Err(_) => defaults.cors_origins,
        };

        Self {
            port,
            use_https,
            ssl_key_path,
            ssl_cert_path,
            cors_origins,
        }
    }

    /// Returns the server bind address (all interfaces)
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize tests that touch
    // them so they don't observe each other's values.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_server_env() {
        for key in ["PORT", "USE_HTTPS", "SSL_KEY_PATH", "SSL_CERT_PATH", "CORS_ORIGINS"] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_defaults_when_env_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_server_env();

        let config = ServerConfig::from_env();
        assert_eq!(config.port, 3000);
        assert!(!config.use_https);
        assert_eq!(config.ssl_key_path, "./ssl/key.pem");
        assert_eq!(config.ssl_cert_path, "./ssl/cert.pem");
        assert_eq!(config.cors_origins.len(), 3);
    }

    #[test]
    fn test_use_https_requires_literal_true() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_server_env();

        for value in ["TRUE", "1", "yes", "True"] {
            env::set_var("USE_HTTPS", value);
            assert!(
                !ServerConfig::from_env().use_https,
                "{value:?} must not enable HTTPS"
            );
        }

        env::set_var("USE_HTTPS", "true");
        assert!(ServerConfig::from_env().use_https);

        clear_server_env();
    }

    #[test]
    fn test_malformed_port_falls_back() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_server_env();

        env::set_var("PORT", "not-a-port");
        assert_eq!(ServerConfig::from_env().port, 3000);

        env::set_var("PORT", "8443");
        assert_eq!(ServerConfig::from_env().port, 8443);

        clear_server_env();
    }

    #[test]
    fn test_cors_origins_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_server_env();

        env::set_var("CORS_ORIGINS", "https://a.example, https://b.example");
        let config = ServerConfig::from_env();
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );

        clear_server_env();
    }

    #[test]
    fn test_bind_address() {
        let config = ServerConfig {
            port: 8080,
            ..ServerConfig::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
