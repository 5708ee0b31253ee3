//! isoserve is a cross-origin isolated development server.
//!
//! It serves static files from a document root and forwards every `GET`
//! whose path starts with a fixed prefix (`/dist` by default) to the
//! bundler's own dev server, so both appear to the browser as one origin.
//! Every response carries `Cross-Origin-Opener-Policy: same-origin`,
//! `Cross-Origin-Embedder-Policy: require-corp`, and
//! `Access-Control-Allow-Origin: *`, which is what shared-memory workers
//! need.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, validate).
//! - [`config`] -- Layered configuration: defaults, file, flags.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`middleware`] -- Cross-origin isolation header layers.
//! - [`proxy`] -- Prefix routing, upstream header filtering, and streaming
//!   forwarding to the bundler.
//! - [`server`] -- Axum router, shared state, HTTP client, and graceful
//!   shutdown.
//! - [`static_files`] -- File serving, directory listings, MIME overrides.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod proxy;
pub mod server;
pub mod static_files;
