/// Live-listener test for the TLS-to-plaintext fallback
///
/// Boots the real server with HTTPS requested but no certificate material
/// present, then talks plain HTTP to the bound port. Runs without a
/// database; the health route degrades instead of failing.

use axum_server::Handle;
use matrix_sql_server::{config::ServerConfig, routes, server};
use std::time::Duration;

#[tokio::test]
async fn test_missing_certificate_still_serves_plaintext_http() {
    let config = ServerConfig {
        port: 0,
        use_https: true,
        ssl_cert_path: "/nonexistent/cert.pem".to_string(),
        ssl_key_path: "/nonexistent/key.pem".to_string(),
        ..ServerConfig::default()
    };

    let handle = Handle::new();
    let server_task = tokio::spawn(server::serve(config, routes::router(), handle.clone()));

    // Readiness: the handle resolves once the listener accepts connections.
    let addr = tokio::time::timeout(Duration::from_secs(10), handle.listening())
        .await
        .expect("listener did not come up in time")
        .expect("listener failed to bind");

    let url = format!("http://127.0.0.1:{}/health", addr.port());
    let response = reqwest::get(&url).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["status"] == "healthy" || body["status"] == "degraded");
    assert!(body["version"].is_string());

    handle.shutdown();
    server_task.await.unwrap().unwrap();
}
