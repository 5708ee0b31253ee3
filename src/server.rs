//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared, read-only state holding the
//! config, the upstream HTTP client, and the file service), [`build_router`]
//! for constructing the router with its middleware layers,
//! [`build_http_client`] for the connection-pooled hyper client, and
//! [`shutdown_signal`] for SIGTERM / Ctrl+C handling.
//!
//! Everything a server needs is passed in through [`Config`]; nothing is
//! process-global, so several instances can run side by side in one
//! process.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::response::Response;
use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::model::Config;
use crate::middleware;
use crate::proxy::headers::ExcludedHeaders;
use crate::proxy::routing::{route_request, RouteKind};
use crate::{proxy, static_files};

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>;

pub struct AppState {
    pub config: Config,
    pub http_client: HttpClient,
    pub excluded_headers: ExcludedHeaders,
    pub upstream_timeout: Duration,
    pub serve_dir: ServeDir,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            http_client: build_http_client(),
            excluded_headers: ExcludedHeaders::new(&config.excluded_proxy_headers),
            upstream_timeout: Duration::from_millis(config.upstream_timeout_ms),
            serve_dir: static_files::build_serve_dir(&config.document_root),
            config,
        }
    }
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    // When multiple rustls crypto providers are compiled in, rustls cannot
    // auto-detect which one to use. Explicitly install `ring`.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::isolation_headers()),
        )
        .with_state(state)
}

async fn dispatch(State(state): State<Arc<AppState>>, req: Request) -> Response {
    match route_request(req.method(), req.uri().path(), &state.config.proxy_prefix) {
        RouteKind::Proxy => {
            let (parts, _) = req.into_parts();
            proxy::forward(state, parts.uri, &parts.headers).await
        }
        RouteKind::Static => static_files::serve(state, req).await,
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
