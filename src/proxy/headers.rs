//! Upstream response header filtering.
//!
//! [`title_case`] normalizes a header name to Title-Case-With-Hyphens
//! independently of how any HTTP stack stores names. [`ExcludedHeaders`]
//! holds the configured drop list in that normalized form, and
//! [`copy_upstream_headers`] relays everything else from the bundler's
//! response, minus hop-by-hop headers this server owns.

use std::sync::LazyLock;

use axum::http::{HeaderMap, HeaderName};

static HOP_BY_HOP: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    [
        "connection",
        "keep-alive",
        "transfer-encoding",
        "te",
        "trailer",
        "upgrade",
        "proxy-authorization",
        "proxy-authenticate",
    ]
    .iter()
    .filter_map(|name| name.parse::<HeaderName>().ok())
    .collect()
});

/// Split on `-`, capitalize each segment (first char upper, rest lower),
/// rejoin with `-`. `content-type` and `CONTENT-TYPE` both become
/// `Content-Type`.
#[must_use]
pub fn title_case(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, Default)]
pub struct ExcludedHeaders {
    names: Vec<String>,
}

impl ExcludedHeaders {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|n| title_case(n.as_ref())).collect(),
        }
    }

    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        let normalized = title_case(name);
        self.names
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(&normalized))
    }
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.iter().any(|h| h == name)
}

/// Copy upstream headers that are neither excluded nor hop-by-hop.
///
/// Multi-valued headers (`Set-Cookie`, `Vary`, ...) keep every value.
/// `HeaderMap` only ever holds valid names and values, so nothing here
/// can fail mid-copy.
#[must_use]
pub fn copy_upstream_headers(upstream: &HeaderMap, excluded: &ExcludedHeaders) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if is_hop_by_hop(name) {
            continue;
        }
        if excluded.is_excluded(name.as_str()) {
            tracing::trace!(header = %name, "dropping excluded upstream header");
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}
