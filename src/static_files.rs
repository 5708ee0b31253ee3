//! Static file serving from the document root.
//!
//! Plain files go through `tower_http`'s [`ServeDir`], which handles MIME
//! inference, conditional requests, ranges, and directory redirects.
//! Around it this module adds what a browser dev workflow expects from a
//! simple file server:
//!
//! - `index.htm` as a second index candidate after `index.html`,
//! - an HTML listing for directories with no index file,
//! - configured `Content-Type` overrides by extension (`.wasm`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use askama::Template;
use axum::body::Body;
use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::http::uri::PathAndQuery;
use axum::http::{HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::server::AppState;

/// Characters escaped in listing links, on top of controls.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'&')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[must_use]
pub fn build_serve_dir(root: &Path) -> ServeDir {
    ServeDir::new(root).append_index_html_on_directories(true)
}

pub async fn serve(state: Arc<AppState>, mut req: Request) -> Response {
    let request_path = req.uri().path().to_owned();
    let listable = req.method() == Method::GET || req.method() == Method::HEAD;

    if listable {
        match resolve_directory(&state.config.document_root, &request_path).await {
            DirectoryTarget::Delegate => {}
            DirectoryTarget::IndexHtm => match with_path_suffix(req.uri(), "index.htm") {
                Ok(uri) => *req.uri_mut() = uri,
                Err(e) => {
                    tracing::warn!(path = %request_path, error = %e, "could not rewrite index path");
                }
            },
            DirectoryTarget::Listing(dir) => {
                let head = req.method() == Method::HEAD;
                return listing_response(&dir, &request_path, head).await;
            }
        }
    }

    let served_path = req.uri().path().to_owned();
    let response = match state.serve_dir.clone().oneshot(req).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };

    tracing::debug!(path = %served_path, status = response.status().as_u16(), "static");

    apply_mime_override(response, &served_path, &state.config.mime_overrides)
}

/// Replace `Content-Type` on a successful response when the request path
/// ends in an overridden extension. Extension lookup ignores case.
#[must_use]
pub fn apply_mime_override(
    mut response: Response,
    request_path: &str,
    overrides: &BTreeMap<String, String>,
) -> Response {
    if !response.status().is_success() {
        return response;
    }
    let Some(content_type) = override_for(request_path, overrides) else {
        return response;
    };
    match HeaderValue::from_str(content_type) {
        Ok(value) => {
            response.headers_mut().insert(CONTENT_TYPE, value);
        }
        Err(e) => {
            tracing::warn!(content_type, error = %e, "invalid mime override, skipping");
        }
    }
    response
}

#[must_use]
pub fn override_for<'a>(
    request_path: &str,
    overrides: &'a BTreeMap<String, String>,
) -> Option<&'a str> {
    let file_name = request_path.rsplit('/').next()?;
    let (_, ext) = file_name.rsplit_once('.')?;
    overrides
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(ext))
        .map(|(_, content_type)| content_type.as_str())
}

#[derive(Debug, PartialEq, Eq)]
enum DirectoryTarget {
    Delegate,
    IndexHtm,
    Listing(PathBuf),
}

async fn resolve_directory(root: &Path, request_path: &str) -> DirectoryTarget {
    // Without the trailing slash ServeDir issues the redirect itself.
    if !request_path.ends_with('/') {
        return DirectoryTarget::Delegate;
    }
    let Some(dir) = resolve_fs_path(root, request_path) else {
        return DirectoryTarget::Delegate;
    };
    if !is_dir(&dir).await {
        return DirectoryTarget::Delegate;
    }
    if is_file(&dir.join("index.html")).await {
        return DirectoryTarget::Delegate;
    }
    if is_file(&dir.join("index.htm")).await {
        return DirectoryTarget::IndexHtm;
    }
    DirectoryTarget::Listing(dir)
}

/// Map a URL path onto the document root. `None` for anything that is
/// not valid UTF-8 once decoded or that tries to climb out of the root.
#[must_use]
pub fn resolve_fs_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8().ok()?;
    let mut full = root.to_path_buf();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => full.push(s),
        }
    }
    Some(full)
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

fn with_path_suffix(uri: &Uri, suffix: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{}{suffix}?{query}", uri.path()),
        None => format!("{}{suffix}", uri.path()),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>()?);
    Ok(Uri::from_parts(parts)?)
}

async fn listing_response(dir: &Path, request_path: &str, head: bool) -> Response {
    let entries = match read_entries(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "could not list directory");
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let display_path = percent_decode_str(request_path).decode_utf8_lossy();
    let html = match render_listing(&display_path, &entries) {
        Ok(html) => html,
        Err(e) => {
            tracing::error!(dir = %dir.display(), error = %e, "could not render listing");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let body = if head { Body::empty() } else { Body::from(html) };

    (
        [(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"))],
        body,
    )
        .into_response()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    is_dir: bool,
}

async fn read_entries(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        // Follow symlinks so a linked directory still gets its slash.
        let is_dir = tokio::fs::metadata(entry.path())
            .await
            .is_ok_and(|m| m.is_dir());
        entries.push(Entry { name, is_dir });
    }
    entries.sort_by_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Directory listing page, rendered from `templates/listing.html`.
#[derive(Template)]
#[template(path = "listing.html")]
struct ListingTemplate<'a> {
    title: &'a str,
    rows: Vec<ListingRow>,
}

struct ListingRow {
    href: String,
    label: String,
}

fn render_listing(display_path: &str, entries: &[Entry]) -> askama::Result<String> {
    let rows = entries
        .iter()
        .map(|entry| {
            let slash = if entry.is_dir { "/" } else { "" };
            ListingRow {
                href: format!("{}{slash}", utf8_percent_encode(&entry.name, SEGMENT)),
                label: format!("{}{slash}", entry.name),
            }
        })
        .collect();
    ListingTemplate {
        title: display_path,
        rows,
    }
    .render()
}
