//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, validate), and their associated argument structs.
//! Every `run` flag is optional and has an environment variable
//! equivalent; anything left unset falls back to the config file and
//! then to the built-in defaults.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "isoserve",
    version,
    about = "Cross-origin isolated dev server: static files plus a bundler proxy",
    propagate_version = true,
    args_conflicts_with_subcommands = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        isoserve                             Serve . on :3000, proxy /dist to :3001\n  \
        isoserve run -u http://localhost:5173 Proxy to a different bundler port\n  \
        isoserve validate isoserve.yaml      Check a config file"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Flags for the implicit `run` when no subcommand is given
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the dev server (default)
    #[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        isoserve run                                 Defaults, or ./isoserve.yaml if present\n  \
        isoserve run -c dev.toml                     Specific config file\n  \
        isoserve run -r public --prefix /build       Serve ./public, proxy /build\n  \
        isoserve run --propagate-status --pretty     Relay upstream status codes")]
    Run(Box<RunArgs>),

    /// Validate a config file without starting
    Validate(ValidateArgs),
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "ISOSERVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen port [default: 3000]
    #[arg(short, long, env = "ISOSERVE_PORT")]
    pub port: Option<u16>,

    /// Listen address [default: 0.0.0.0]
    #[arg(long, env = "ISOSERVE_HOST")]
    pub host: Option<String>,

    /// Upstream bundler base URL [default: http://localhost:3001]
    #[arg(short, long, env = "ISOSERVE_UPSTREAM")]
    pub upstream: Option<String>,

    /// Document root for static files [default: .]
    #[arg(short = 'r', long = "root", env = "ISOSERVE_ROOT")]
    pub document_root: Option<PathBuf>,

    /// Path prefix forwarded to the upstream [default: /dist]
    #[arg(long, env = "ISOSERVE_PREFIX")]
    pub prefix: Option<String>,

    /// Relay the upstream status code instead of always answering 200
    #[arg(long, env = "ISOSERVE_PROPAGATE_STATUS")]
    pub propagate_status: bool,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Upstream response timeout in milliseconds [default: 30000]
    #[arg(long, env = "ISOSERVE_TIMEOUT_MS", help_heading = "Tuning")]
    pub timeout: Option<u64>,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "isoserve.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Clone, Debug, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
