//! Cross-origin isolation headers applied to every response.
//!
//! Browsers only expose `SharedArrayBuffer` (and with it threaded wasm)
//! to documents served with `COOP: same-origin` and
//! `COEP: require-corp`. The wildcard `Access-Control-Allow-Origin` lets
//! the bundler's assets load under that policy. The layers override, so
//! an upstream copy of any of these never shows up twice.

use axum::http::{HeaderName, HeaderValue};
use tower::layer::util::{Identity, Stack};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

pub const ISOLATION_HEADERS: [(&str, &str); 3] = [
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-embedder-policy", "require-corp"),
    ("access-control-allow-origin", "*"),
];

pub type IsolationLayer = Stack<
    SetResponseHeaderLayer<HeaderValue>,
    Stack<
        SetResponseHeaderLayer<HeaderValue>,
        Stack<SetResponseHeaderLayer<HeaderValue>, Identity>,
    >,
>;

fn overriding(name: &'static str, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

#[must_use]
pub fn isolation_headers() -> IsolationLayer {
    let [(coop, coop_value), (coep, coep_value), (acao, acao_value)] = ISOLATION_HEADERS;
    ServiceBuilder::new()
        .layer(overriding(coop, coop_value))
        .layer(overriding(coep, coep_value))
        .layer(overriding(acao, acao_value))
        .into_inner()
}
