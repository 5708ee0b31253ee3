//! Integration tests for server construction and graceful shutdown.

mod common;

use std::sync::Arc;

use common::{config_for, dead_address, spawn, start_server};
use isoserve::server::{self, AppState};

#[tokio::test]
async fn instances_are_independent() {
    let root_a = tempfile::tempdir().unwrap();
    let root_b = tempfile::tempdir().unwrap();
    std::fs::write(root_a.path().join("who.txt"), "a").unwrap();
    std::fs::write(root_b.path().join("who.txt"), "b").unwrap();

    let dead = dead_address().await;
    let a = start_server(config_for(dead, root_a.path())).await;
    let b = start_server(config_for(dead, root_b.path())).await;

    let body_a = reqwest::get(a.url("/who.txt")).await.unwrap().text().await.unwrap();
    let body_b = reqwest::get(b.url("/who.txt")).await.unwrap().text().await.unwrap();
    assert_eq!(body_a, "a");
    assert_eq!(body_b, "b");
}

#[tokio::test]
async fn state_reflects_config() {
    let root = tempfile::tempdir().unwrap();
    let mut config = config_for(dead_address().await, root.path());
    config.upstream_timeout_ms = 1_234;
    config.excluded_proxy_headers = vec!["etag".into()];

    let state = AppState::new(config);
    assert_eq!(state.upstream_timeout.as_millis(), 1_234);
    assert!(state.excluded_headers.is_excluded("ETag"));
    assert!(!state.excluded_headers.is_excluded("Date"));
}

#[tokio::test]
async fn graceful_shutdown_works() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("index.html"), "<html></html>").unwrap();
    let state = Arc::new(AppState::new(config_for(dead_address().await, root.path())));
    let running = spawn(server::build_router(state)).await;

    // Verify server is running
    let url = running.url("/index.html");
    assert!(reqwest::get(&url).await.is_ok());

    // Dropping the handle sends the shutdown signal
    drop(running);

    // Give it a moment to shut down
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    // Server should no longer accept connections
    let result = reqwest::get(&url).await;
    assert!(result.is_err());
}
