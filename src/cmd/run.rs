//! `isoserve run` — start the dev server.
//!
//! Layers the config (defaults, file, flags), validates it, binds the
//! listener, announces the URL, and serves until Ctrl+C or SIGTERM.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::model::Config;
use crate::config::{self, validation};
use crate::error::IsoserveError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), IsoserveError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let cwd = std::env::current_dir()?;
    let mut config = config::load(args.config.as_deref(), &cwd).await?;
    apply_overrides(&mut config, &args);

    if let Err(errors) = validation::validate(&config) {
        return Err(IsoserveError::ConfigValidation { errors });
    }
    ensure_document_root(&config.document_root).await?;

    let ip: IpAddr = config.host.parse()?;
    let addr = SocketAddr::new(ip, config.listen_port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let port = listener.local_addr()?.port();

    tracing::info!(
        addr = %addr,
        upstream = %config.upstream_base_url,
        prefix = %config.proxy_prefix,
        root = %config.document_root.display(),
        propagate_status = config.propagate_upstream_status,
        "isoserve started"
    );
    println!("Serving at http://localhost:{port}");

    let router = server::build_router(Arc::new(AppState::new(config)));

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("isoserve stopped");
    Ok(())
}

/// Apply CLI flags on top of the file/default layer. Only flags that were
/// actually given take effect.
pub fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(port) = args.port {
        config.listen_port = port;
    }
    if let Some(ref host) = args.host {
        config.host.clone_from(host);
    }
    if let Some(ref upstream) = args.upstream {
        config.upstream_base_url.clone_from(upstream);
    }
    if let Some(ref root) = args.document_root {
        config.document_root.clone_from(root);
    }
    if let Some(ref prefix) = args.prefix {
        config.proxy_prefix.clone_from(prefix);
    }
    if let Some(timeout) = args.timeout {
        config.upstream_timeout_ms = timeout;
    }
    if args.propagate_status {
        config.propagate_upstream_status = true;
    }
}

async fn ensure_document_root(root: &Path) -> Result<(), IsoserveError> {
    match tokio::fs::metadata(root).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(IsoserveError::DocumentRootNotFound {
            path: root.to_path_buf(),
        }),
    }
}
