//! Configuration loading and validation.
//!
//! The effective [`Config`](model::Config) is layered: built-in defaults,
//! then an optional config file, then CLI flags. Once the server starts
//! the config is frozen and shared read-only across request tasks.

pub mod model;
pub mod sources;
pub mod validation;

use std::path::Path;

use crate::error::IsoserveError;
use model::Config;

/// Load the file layer: the explicit path if one was given, otherwise the
/// first conventionally named file in `cwd`, otherwise plain defaults.
pub async fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Config, IsoserveError> {
    if let Some(path) = explicit {
        return sources::load_file(path).await;
    }

    match sources::detect_file(cwd).await {
        Some(path) => {
            tracing::info!(path = %path.display(), "auto-detected config file");
            sources::load_file(&path).await
        }
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(None, dir.path()).await.unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("custom.yaml");
        let err = load(Some(&missing), dir.path()).await.unwrap_err();
        assert!(matches!(err, IsoserveError::ConfigFileNotFound { .. }));
    }

    #[cfg(feature = "yaml")]
    #[tokio::test]
    async fn detected_file_is_validated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("isoserve.yaml"), "proxy_prefix: dist\n").unwrap();
        let err = load(None, dir.path()).await.unwrap_err();
        assert!(matches!(err, IsoserveError::ConfigValidation { .. }));
    }

    #[cfg(not(feature = "json"))]
    #[tokio::test]
    async fn unreadable_format_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("isoserve.json"), "{}").unwrap();
        let config = load(None, dir.path()).await.unwrap();
        assert_eq!(config, Config::default());
    }
}
