//! Forwarding of bundler requests to the upstream dev server.
//!
//! [`forward`] issues a `GET` for the same path and query against the
//! configured upstream base URL, relays the filtered upstream headers
//! ([`headers`]), and streams the upstream body back without buffering.
//! Classification of which requests land here lives in [`routing`].
//!
//! Upstream redirects are followed, up to [`MAX_REDIRECTS`] hops, and only
//! the final response is relayed.
//!
//! By default the client always sees `200`, whatever the upstream said.
//! Set `propagate_upstream_status` to relay the real status instead.

pub mod headers;
pub mod routing;

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http_body_util::Full;

use crate::server::AppState;

/// Join the upstream base URL and the original path-and-query.
pub fn upstream_uri(base: &str, original: &Uri) -> Result<Uri, axum::http::uri::InvalidUri> {
    let path_and_query = original
        .path_and_query()
        .map_or("/", axum::http::uri::PathAndQuery::as_str);
    format!("{}{}", base.trim_end_matches('/'), path_and_query).parse()
}

/// Redirect hops followed before giving up with `502`.
pub const MAX_REDIRECTS: usize = 10;

/// Correlation id for log lines: the caller's `x-correlation-id` when it is
/// a printable header value, otherwise a fresh v4 UUID.
#[must_use]
pub fn correlation_id(req_headers: &HeaderMap) -> String {
    req_headers
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from)
}

/// Resolve a `Location` value against the URI that produced it.
pub fn redirect_target(current: &Uri, location: &str) -> Option<Uri> {
    let base = url::Url::parse(&current.to_string()).ok()?;
    let next = base.join(location).ok()?;
    next.as_str().parse().ok()
}

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error(transparent)]
    Request(#[from] hyper_util::client::legacy::Error),

    #[error("could not build upstream request: {0}")]
    Build(#[from] axum::http::Error),

    #[error("redirect from {from} has no usable Location")]
    BadLocation { from: Uri },

    #[error("more than {} redirects", MAX_REDIRECTS)]
    TooManyRedirects,
}

/// GET `target`, following upstream redirects the way a browser-facing
/// fetch would, and return the first non-redirect response.
async fn fetch(
    state: &AppState,
    mut target: Uri,
    correlation_id: &str,
) -> Result<hyper::Response<hyper::body::Incoming>, FetchError> {
    for _ in 0..=MAX_REDIRECTS {
        let request = hyper::Request::get(target.clone()).body(Full::new(Bytes::new()))?;
        let response = state.http_client.request(request).await?;

        if !is_followed_redirect(response.status()) {
            return Ok(response);
        }

        let next = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|location| redirect_target(&target, location))
            .ok_or_else(|| FetchError::BadLocation {
                from: target.clone(),
            })?;

        tracing::debug!(
            correlation_id,
            from = %target,
            to = %next,
            status = response.status().as_u16(),
            "following upstream redirect"
        );
        target = next;
    }
    Err(FetchError::TooManyRedirects)
}

const fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

pub async fn forward(state: Arc<AppState>, uri: Uri, req_headers: &HeaderMap) -> Response {
    let correlation_id = correlation_id(req_headers);

    let config = &state.config;
    let target = match upstream_uri(&config.upstream_base_url, &uri) {
        Ok(target) => target,
        Err(e) => {
            tracing::error!(
                correlation_id = %correlation_id,
                path = %uri,
                error = %e,
                "could not build upstream URI"
            );
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };

    let start = Instant::now();
    let result = tokio::time::timeout(
        state.upstream_timeout,
        fetch(&state, target.clone(), &correlation_id),
    )
    .await;
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    let upstream = match result {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::warn!(
                correlation_id = %correlation_id,
                target = %target,
                error = %e,
                latency_ms,
                "upstream request failed"
            );
            return StatusCode::BAD_GATEWAY.into_response();
        }
        Err(_) => {
            tracing::warn!(
                correlation_id = %correlation_id,
                target = %target,
                latency_ms,
                "upstream request timed out"
            );
            return StatusCode::GATEWAY_TIMEOUT.into_response();
        }
    };

    let upstream_status = upstream.status();
    let status = if config.propagate_upstream_status {
        upstream_status
    } else {
        StatusCode::OK
    };

    tracing::info!(
        correlation_id = %correlation_id,
        target = %target,
        upstream_status = upstream_status.as_u16(),
        status = status.as_u16(),
        latency_ms,
        "proxied"
    );

    let (parts, body) = upstream.into_parts();
    let relayed = headers::copy_upstream_headers(&parts.headers, &state.excluded_headers);

    let mut response = Response::new(Body::new(body));
    *response.status_mut() = status;
    *response.headers_mut() = relayed;
    response
}
