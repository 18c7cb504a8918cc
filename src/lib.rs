//! # matrix-sql-server
//!
//! HTTP(S) API server fronting the `matrix_sql` PostgreSQL database.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `db`: Shared database connection pool
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: Built-in API route handlers
//! - `server`: Listener bootstrap (TLS with plaintext fallback)

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod server;
