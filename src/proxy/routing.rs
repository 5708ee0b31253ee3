//! Prefix-based request classification.
//!
//! [`classify`] decides whether a request goes to the upstream bundler or
//! to the static file service. The test is a plain string prefix, not a
//! segment match: with the default `/dist` prefix, `/distillery` is
//! proxied too. Bundler output paths are expected to sit under the prefix
//! and nothing else should share its leading characters.

use axum::http::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Proxy,
    Static,
}

#[must_use]
pub fn classify(path: &str, prefix: &str) -> RouteKind {
    if path.starts_with(prefix) {
        RouteKind::Proxy
    } else {
        RouteKind::Static
    }
}

/// Only `GET` is forwarded; any other method falls through to the file
/// service, which answers `HEAD` and rejects the rest.
#[must_use]
pub fn route_request(method: &Method, path: &str, prefix: &str) -> RouteKind {
    if method == Method::GET {
        classify(path, prefix)
    } else {
        RouteKind::Static
    }
}
