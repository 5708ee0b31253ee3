//! Shared helpers for integration tests: an in-process dev server and a
//! stub upstream bundler, both on ephemeral ports.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use isoserve::config::model::Config;
use isoserve::server::{self, AppState};

/// A `Date` value no live server would send, so a relayed copy is easy to spot.
pub const STALE_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

pub struct Running {
    pub addr: SocketAddr,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl Running {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn spawn(router: Router) -> Running {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    Running {
        addr,
        shutdown: Some(shutdown_tx),
    }
}

/// Stub bundler dev server.
pub fn upstream_router() -> Router {
    Router::new()
        .route(
            "/dist/app.js",
            get(|| async {
                (
                    [
                        ("content-type", "application/javascript"),
                        ("date", STALE_DATE),
                        ("cross-origin-opener-policy", "unsafe-none"),
                        ("cross-origin-embedder-policy", "unsafe-none"),
                        ("x-bundler", "stub"),
                    ],
                    "console.log('app');",
                )
            }),
        )
        .route(
            "/dist/app.wasm",
            get(|| async { (StatusCode::NOT_FOUND, "not found") }),
        )
        .route(
            "/dist/echo",
            get(|uri: axum::http::Uri| async move { uri.to_string() }),
        )
        .route(
            "/dist/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        )
        .route(
            "/dist/cors",
            get(|| async { ([("access-control-allow-origin", "https://example.com")], "cors") }),
        )
        .route(
            "/dist/old.js",
            get(|| async { (StatusCode::MOVED_PERMANENTLY, [("location", "/dist/new.js")]) }),
        )
        .route("/dist/new.js", get(|| async { "NEW" }))
        .route(
            "/dist/loop.js",
            get(|| async { (StatusCode::FOUND, [("location", "loop.js")]) }),
        )
        .route("/distillery", get(|| async { "distillery" }))
}

/// A client that never follows redirects itself, so what the server relays
/// is what the test sees.
pub fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

pub async fn start_upstream() -> Running {
    spawn(upstream_router()).await
}

pub fn config_for(upstream: SocketAddr, root: &Path) -> Config {
    Config {
        upstream_base_url: format!("http://{upstream}"),
        document_root: root.to_path_buf(),
        upstream_timeout_ms: 2_000,
        ..Config::default()
    }
}

pub async fn start_server(config: Config) -> Running {
    let state = Arc::new(AppState::new(config));
    spawn(server::build_router(state)).await
}

/// An address nothing listens on.
pub async fn dead_address() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn assert_isolated(resp: &reqwest::Response) {
    let headers = resp.headers();
    assert_eq!(headers["cross-origin-opener-policy"], "same-origin");
    assert_eq!(headers["cross-origin-embedder-policy"], "require-corp");
    assert_eq!(headers["access-control-allow-origin"], "*");
    for name in [
        "cross-origin-opener-policy",
        "cross-origin-embedder-policy",
        "access-control-allow-origin",
    ] {
        assert_eq!(headers.get_all(name).iter().count(), 1, "{name} duplicated");
    }
}
