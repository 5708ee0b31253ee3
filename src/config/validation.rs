//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for values that
//! would only fail later at request time: a malformed upstream URL, a
//! prefix that can never match, header names or content types that
//! cannot be put on the wire. All problems are collected, not just the
//! first one.

use axum::http::{HeaderName, HeaderValue};
use url::Url;

use super::model::Config;
use crate::error::ValidationError;

/// Validate the upstream base URL. Returns `Ok(())` or a human-readable error.
pub fn validate_upstream_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.query().is_some() || parsed.fragment().is_some() {
                Err("base URL cannot carry a query or fragment".into())
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

/// Validate the proxy prefix. Returns `Ok(())` or a human-readable error.
pub fn validate_prefix(prefix: &str) -> Result<(), String> {
    if prefix.is_empty() {
        return Err("prefix cannot be empty".into());
    }
    if !prefix.starts_with('/') {
        return Err(format!("prefix must start with '/' (did you mean '/{prefix}'?)"));
    }
    Ok(())
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(msg) = validate_upstream_url(&config.upstream_base_url) {
        errors.push(ValidationError {
            field: "upstream_base_url".into(),
            message: msg,
            suggestion: if config.upstream_base_url.contains("://") {
                None
            } else {
                Some(format!("did you mean 'http://{}'?", config.upstream_base_url))
            },
        });
    }

    if let Err(msg) = validate_prefix(&config.proxy_prefix) {
        errors.push(ValidationError {
            field: "proxy_prefix".into(),
            message: msg,
            suggestion: None,
        });
    }

    for name in &config.excluded_proxy_headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError {
                field: "excluded_proxy_headers".into(),
                message: format!("'{name}' is not a valid header name"),
                suggestion: None,
            });
        }
    }

    for (ext, content_type) in &config.mime_overrides {
        if ext.is_empty() {
            errors.push(ValidationError {
                field: "mime_overrides".into(),
                message: "extension cannot be empty".into(),
                suggestion: None,
            });
        } else if let Some(bare) = ext.strip_prefix('.') {
            errors.push(ValidationError {
                field: "mime_overrides".into(),
                message: format!("extension '{ext}' must not start with '.'"),
                suggestion: Some(format!("did you mean '{bare}'?")),
            });
        }
        if HeaderValue::from_str(content_type).is_err() {
            errors.push(ValidationError {
                field: "mime_overrides".into(),
                message: format!("'{content_type}' is not a valid content type for '{ext}'"),
                suggestion: None,
            });
        }
    }

    if config.upstream_timeout_ms == 0 {
        errors.push(ValidationError {
            field: "upstream_timeout_ms".into(),
            message: "timeout must be greater than zero".into(),
            suggestion: None,
        });
    }

    if config.document_root.as_os_str().is_empty() {
        errors.push(ValidationError {
            field: "document_root".into(),
            message: "document root cannot be empty".into(),
            suggestion: Some("use '.' for the working directory".into()),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let overrides = config
        .mime_overrides
        .iter()
        .map(|(ext, ty)| format!(".{ext} -> {ty}"))
        .collect::<Vec<_>>()
        .join(", ");

    let lines = [
        format!("  listen:   {}:{}", config.host, config.listen_port),
        format!(
            "  proxy:    {}* -> {}",
            config.proxy_prefix, config.upstream_base_url
        ),
        format!("  timeout:  {}ms", config.upstream_timeout_ms),
        format!(
            "  status:   {}",
            if config.propagate_upstream_status {
                "upstream"
            } else {
                "always 200"
            }
        ),
        format!("  excluded: {}", config.excluded_proxy_headers.join(", ")),
        format!("  root:     {}", config.document_root.display()),
        format!("  mime:     {overrides}"),
    ];

    format!("{path} is valid\n{}", lines.join("\n"))
}
