//! Directory-backed bundle files.
//!
//! [`StaticAssets`] answers fallback requests from an unpacked Swagger UI
//! distribution on disk, with:
//!
//! - cache headers (`Cache-Control`, `ETag`, `Last-Modified`)
//! - conditional requests (`If-None-Match`, `If-Modified-Since`)
//! - protection against directory traversal and hidden files
//!
//! # Example
//!
//! ```rust
//! use docserve::StaticAssets;
//!
//! let assets = StaticAssets::new("./swagger-ui-dist")
//!     .cache_control("public, max-age=3600");
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use thiserror::Error;

use crate::assets::{detect_mime_type, set_default_content_type, write_error, AssetHandler, AssetRequest};
use crate::recorder::ResponseWriter;

/// Errors that can occur when serving a bundle file.
#[derive(Debug, Error)]
pub enum StaticFileError {
    /// The requested file was not found.
    #[error("File not found: {0}")]
    NotFound(String),

    /// The path is forbidden (e.g., directory traversal attempt).
    #[error("Forbidden path: {0}")]
    Forbidden(String),

    /// Method not allowed (e.g., POST to a bundle file).
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// I/O error while reading the file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StaticFileError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Serves bundle files from a directory.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    /// Directory holding the bundle files
    root: PathBuf,

    /// Cache-Control header value
    cache_control: Option<String>,

    /// Whether to include `ETag` headers
    etag_enabled: bool,

    /// Whether to include Last-Modified headers
    last_modified_enabled: bool,

    /// Whether to serve hidden files (starting with .)
    serve_hidden: bool,
}

impl StaticAssets {
    /// Creates a handler for the given directory.
    #[must_use]
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            cache_control: None,
            etag_enabled: true,
            last_modified_enabled: true,
            serve_hidden: false,
        }
    }

    /// Sets the Cache-Control header value for responses.
    #[must_use]
    pub fn cache_control<S: Into<String>>(mut self, value: S) -> Self {
        self.cache_control = Some(value.into());
        self
    }

    /// Enables or disables `ETag` headers.
    #[must_use]
    pub fn etag(mut self, enabled: bool) -> Self {
        self.etag_enabled = enabled;
        self
    }

    /// Enables or disables Last-Modified headers.
    #[must_use]
    pub fn last_modified(mut self, enabled: bool) -> Self {
        self.last_modified_enabled = enabled;
        self
    }

    /// Enables or disables serving hidden files (starting with `.`).
    #[must_use]
    pub fn serve_hidden(mut self, enabled: bool) -> Self {
        self.serve_hidden = enabled;
        self
    }

    /// Returns the root directory path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn try_serve(
        &self,
        request: &AssetRequest<'_>,
        writer: &mut dyn ResponseWriter,
    ) -> Result<(), StaticFileError> {
        if request.method != Method::GET && request.method != Method::HEAD {
            return Err(StaticFileError::MethodNotAllowed);
        }

        let relative = request
            .relative_path()
            .ok_or_else(|| StaticFileError::NotFound(request.path.to_string()))?;
        let file_path = self.resolve_path(relative)?;
        if !file_path.is_file() {
            return Err(StaticFileError::NotFound(relative.to_string()));
        }

        let metadata = std::fs::metadata(&file_path)?;
        let modified = metadata.modified().ok();
        let etag = if self.etag_enabled {
            generate_etag(&metadata, &file_path)
        } else {
            None
        };

        if self.is_not_modified(request.headers, etag.as_deref(), modified) {
            self.write_cache_headers(writer, etag.as_deref(), None);
            writer.write_status(StatusCode::NOT_MODIFIED);
            return Ok(());
        }

        let content = if request.method == Method::GET {
            std::fs::read(&file_path)?
        } else {
            Vec::new()
        };

        set_default_content_type(writer, detect_mime_type(relative));
        writer
            .headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from(metadata.len()));
        self.write_cache_headers(writer, etag.as_deref(), modified);
        writer.write_status(StatusCode::OK);
        writer.write(&content);
        Ok(())
    }

    /// Resolves a relative path inside the root, refusing anything that
    /// escapes it.
    fn resolve_path(&self, relative: &str) -> Result<PathBuf, StaticFileError> {
        for component in Path::new(relative).components() {
            match component {
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(StaticFileError::Forbidden(
                        "Directory traversal not allowed".to_string(),
                    ));
                }
                Component::Normal(name) => {
                    if !self.serve_hidden && name.to_str().is_some_and(|n| n.starts_with('.')) {
                        return Err(StaticFileError::Forbidden(
                            "Hidden files not allowed".to_string(),
                        ));
                    }
                }
                Component::CurDir => {}
            }
        }

        let canonical = self
            .root
            .join(relative)
            .canonicalize()
            .map_err(|_| StaticFileError::NotFound(relative.to_string()))?;

        let canonical_root = self.root.canonicalize().map_err(|e| {
            StaticFileError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Asset directory not found: {}", e),
            ))
        })?;

        if !canonical.starts_with(&canonical_root) {
            return Err(StaticFileError::Forbidden(
                "Path escapes asset directory".to_string(),
            ));
        }

        Ok(canonical)
    }

    fn is_not_modified(
        &self,
        headers: &HeaderMap,
        etag: Option<&str>,
        modified: Option<SystemTime>,
    ) -> bool {
        if let (Some(etag), Some(value)) = (etag, header_str(headers, header::IF_NONE_MATCH)) {
            return etag_matches(value, etag);
        }

        if !self.last_modified_enabled {
            return false;
        }
        let (Some(modified), Some(value)) = (modified, header_str(headers, header::IF_MODIFIED_SINCE)) else {
            return false;
        };
        let Ok(since) = httpdate::parse_http_date(value) else {
            return false;
        };
        // HTTP dates carry whole seconds only
        match (
            modified.duration_since(SystemTime::UNIX_EPOCH),
            since.duration_since(SystemTime::UNIX_EPOCH),
        ) {
            (Ok(modified), Ok(since)) => modified.as_secs() <= since.as_secs(),
            _ => false,
        }
    }

    fn write_cache_headers(
        &self,
        writer: &mut dyn ResponseWriter,
        etag: Option<&str>,
        modified: Option<SystemTime>,
    ) {
        let headers = writer.headers_mut();
        if let Some(value) = self
            .cache_control
            .as_deref()
            .and_then(|v| HeaderValue::from_str(v).ok())
        {
            headers.insert(header::CACHE_CONTROL, value);
        }
        if let Some(value) = etag.and_then(|v| HeaderValue::from_str(v).ok()) {
            headers.insert(header::ETAG, value);
        }
        if self.last_modified_enabled {
            if let Some(value) = modified
                .map(httpdate::fmt_http_date)
                .and_then(|v| HeaderValue::from_str(&v).ok())
            {
                headers.insert(header::LAST_MODIFIED, value);
            }
        }
    }
}

impl AssetHandler for StaticAssets {
    fn serve(&self, request: &AssetRequest<'_>, writer: &mut dyn ResponseWriter) {
        if let Err(err) = self.try_serve(request, writer) {
            match &err {
                StaticFileError::Forbidden(_) => {
                    tracing::warn!(path = %request.path, error = %err, "Rejected asset request");
                }
                StaticFileError::IoError(_) => {
                    tracing::error!(path = %request.path, error = %err, "Failed to read asset");
                }
                StaticFileError::NotFound(_) | StaticFileError::MethodNotAllowed => {}
            }
            write_error(writer, err.status_code());
        }
    }
}

/// Weak comparison of an `If-None-Match` list against `etag`.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    let etag = etag.trim_start_matches("W/");
    if_none_match
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate.trim_start_matches("W/") == etag)
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Generates an `ETag` from modification time, size, and path.
fn generate_etag(metadata: &std::fs::Metadata, path: &Path) -> Option<String> {
    let modified = metadata.modified().ok()?;
    let duration = modified.duration_since(SystemTime::UNIX_EPOCH).ok()?;

    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);

    Some(format!(
        "\"{:x}-{:x}-{:x}\"",
        duration.as_secs(),
        metadata.len(),
        hasher.finish() % 0x10000
    ))
}
