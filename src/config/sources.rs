//! File-based config loading.
//!
//! [`parse_config_str`] picks a deserializer by file extension (YAML,
//! JSON, TOML, each behind its own feature flag). [`load_file`] reads
//! and validates a file; [`detect_file`] looks for a conventionally
//! named config in the working directory.

use std::path::{Path, PathBuf};

use super::model::Config;
use super::validation::validate;
use crate::error::IsoserveError;

/// File names probed, in order, when no `--config` is given. Only formats
/// compiled into this build are listed, so a stray file in a format the
/// binary cannot read is ignored instead of failing startup.
pub const CANDIDATES: &[&str] = &[
    #[cfg(feature = "yaml")]
    "isoserve.yaml",
    #[cfg(feature = "yaml")]
    "isoserve.yml",
    #[cfg(feature = "json")]
    "isoserve.json",
    #[cfg(feature = "toml")]
    "isoserve.toml",
];

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, IsoserveError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| IsoserveError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| IsoserveError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| IsoserveError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(IsoserveError::UnsupportedFormat(other.to_string())),
    }
}

/// Read, parse, and validate a config file.
pub async fn load_file(path: &Path) -> Result<Config, IsoserveError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IsoserveError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IsoserveError::Io(e)
        }
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validate(&config) {
        return Err(IsoserveError::ConfigValidation { errors });
    }

    Ok(config)
}

/// Find the first conventionally named config file in `dir`.
pub async fn detect_file(dir: &Path) -> Option<PathBuf> {
    for name in CANDIDATES {
        let path = dir.join(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Some(path);
        }
    }
    None
}
