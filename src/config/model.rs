//! Serde data structures for the isoserve configuration file.
//!
//! [`Config`] is the single root type. Every field has a default that
//! matches the stock dev setup (port 3000, bundler on 3001, `/dist`
//! proxied), so an empty file or no file at all is a valid config.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM: &str = "http://localhost:3001";
pub const DEFAULT_PREFIX: &str = "/dist";

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_upstream() -> String {
    DEFAULT_UPSTREAM.to_string()
}

fn default_excluded_headers() -> Vec<String> {
    vec![
        "Cross-Origin-Embedder-Policy".to_string(),
        "Cross-Origin-Opener-Policy".to_string(),
        "Date".to_string(),
    ]
}

fn default_document_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

const fn default_timeout() -> u64 {
    30_000
}

fn default_mime_overrides() -> BTreeMap<String, String> {
    BTreeMap::from([("wasm".to_string(), "application/wasm".to_string())])
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_port")]
    pub listen_port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_upstream")]
    pub upstream_base_url: String,

    /// Upstream response headers dropped before relaying, compared in
    /// Title-Case-With-Hyphens form.
    #[serde(default = "default_excluded_headers")]
    pub excluded_proxy_headers: Vec<String>,

    #[serde(default = "default_document_root")]
    pub document_root: PathBuf,

    #[serde(default = "default_prefix")]
    pub proxy_prefix: String,

    /// Upper bound on waiting for upstream response headers.
    #[serde(default = "default_timeout")]
    pub upstream_timeout_ms: u64,

    /// Relay the upstream status instead of always answering 200.
    #[serde(default)]
    pub propagate_upstream_status: bool,

    /// File extension (no leading dot) to `Content-Type`.
    #[serde(default = "default_mime_overrides")]
    pub mime_overrides: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_port: default_port(),
            host: default_host(),
            upstream_base_url: default_upstream(),
            excluded_proxy_headers: default_excluded_headers(),
            document_root: default_document_root(),
            proxy_prefix: default_prefix(),
            upstream_timeout_ms: default_timeout(),
            propagate_upstream_status: false,
            mime_overrides: default_mime_overrides(),
        }
    }
}
