//! `isoserve validate`: load a config file through the same path `run`
//! uses and report either the effective settings or every problem found.

use serde_json::{json, Value};

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::model::Config;
use crate::config::sources;
use crate::config::validation::format_validation_report;
use crate::error::{IsoserveError, ValidationError};

pub async fn execute(args: &ValidateArgs) -> Result<(), IsoserveError> {
    let path = &args.config;
    let shown = path.display().to_string();

    match sources::load_file(path).await {
        Ok(config) => {
            match args.format {
                ValidateFormat::Text => println!("\u{2713} {}", format_validation_report(&shown, &config)),
                ValidateFormat::Json => println!("{}", settings_json(&config)),
            }
            Ok(())
        }
        Err(IsoserveError::ConfigValidation { errors }) => {
            match args.format {
                ValidateFormat::Text => {
                    eprintln!("\u{2717} {shown} has {} errors\n", errors.len());
                    for error in &errors {
                        eprintln!("{error}");
                    }
                }
                ValidateFormat::Json => println!("{}", errors_json(&errors)),
            }
            Err(IsoserveError::ConfigValidation { errors })
        }
        Err(e) => Err(e),
    }
}

/// Effective settings of a valid config, as printed by `--format json`.
#[must_use]
pub fn settings_json(config: &Config) -> Value {
    json!({
        "valid": true,
        "listen": format!("{}:{}", config.host, config.listen_port),
        "upstream_base_url": config.upstream_base_url,
        "proxy_prefix": config.proxy_prefix,
        "upstream_timeout_ms": config.upstream_timeout_ms,
        "propagate_upstream_status": config.propagate_upstream_status,
        "excluded_proxy_headers": config.excluded_proxy_headers,
        "document_root": config.document_root.display().to_string(),
        "mime_overrides": config.mime_overrides,
    })
}

#[must_use]
pub fn errors_json(errors: &[ValidationError]) -> Value {
    let errors: Vec<Value> = errors
        .iter()
        .map(|e| json!({ "field": e.field, "message": e.message, "suggestion": e.suggestion }))
        .collect();
    json!({ "valid": false, "errors": errors })
}
