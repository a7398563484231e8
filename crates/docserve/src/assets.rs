//! Fallback asset handlers.
//!
//! Everything other than `index.html` and `doc.json` is answered by an
//! [`AssetHandler`]: the Swagger UI bundle files themselves. Two handlers
//! ship with the crate, [`StaticAssets`](crate::StaticAssets) for a
//! directory on disk and [`MemoryAssets`] for bytes held in memory (for
//! example files compiled in with `include_bytes!`).
//!
//! Handlers write through a [`ResponseWriter`]. The adapter seeds the
//! writer with a `Content-Type` derived from the asset name; handlers only
//! set their own when none is present.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, StatusCode};

use crate::recorder::ResponseWriter;

/// A request forwarded to an [`AssetHandler`].
#[derive(Debug, Clone, Copy)]
pub struct AssetRequest<'a> {
    /// Request method.
    pub method: &'a Method,
    /// Request path, without the query string.
    pub path: &'a str,
    /// Mount prefix the handler was configured with.
    pub prefix: &'a str,
    /// Request headers.
    pub headers: &'a HeaderMap,
}

impl<'a> AssetRequest<'a> {
    /// The path relative to the mount prefix.
    ///
    /// Returns `None` when the path was not requested under the prefix.
    pub fn relative_path(&self) -> Option<&'a str> {
        self.path
            .strip_prefix(self.prefix)
            .map(|rest| rest.trim_start_matches('/'))
    }
}

/// Serves bundle files under a path prefix.
pub trait AssetHandler: Send + Sync {
    /// Answers `request` by writing status, headers, and body into `writer`.
    fn serve(&self, request: &AssetRequest<'_>, writer: &mut dyn ResponseWriter);
}

/// Sets `Content-Type` unless the writer already carries one.
pub(crate) fn set_default_content_type(writer: &mut dyn ResponseWriter, mime_type: &str) {
    let headers = writer.headers_mut();
    if headers.contains_key(header::CONTENT_TYPE) {
        return;
    }
    if let Ok(value) = HeaderValue::from_str(mime_type) {
        headers.insert(header::CONTENT_TYPE, value);
    }
}

/// Writes a plain-text error status.
pub(crate) fn write_error(writer: &mut dyn ResponseWriter, status: StatusCode) {
    let headers = writer.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.remove(header::CONTENT_LENGTH);
    if status == StatusCode::METHOD_NOT_ALLOWED {
        headers.insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
    }
    writer.write_status(status);
    writer.write(status.canonical_reason().unwrap_or_default().as_bytes());
}

/// Detects the MIME type for a file from its extension.
pub fn detect_mime_type(path: &str) -> &'static str {
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "yaml" | "yml" => "application/yaml",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",

        _ => "application/octet-stream",
    }
}

/// Bundle files held in memory.
///
/// # Example
///
/// ```rust
/// use docserve::MemoryAssets;
///
/// let assets = MemoryAssets::new()
///     .with_file("swagger-ui.css", "body { margin: 0 }")
///     .with_file("favicon-16x16.png", &b"\x89PNG"[..]);
/// assert_eq!(assets.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct MemoryAssets {
    files: HashMap<String, Bytes>,
}

impl MemoryAssets {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, replacing any previous content under `name`.
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        self.insert(name, content);
        self
    }

    /// Adds a file, replacing any previous content under `name`.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Bytes>) {
        let name = name.into();
        self.files
            .insert(name.trim_start_matches('/').to_string(), content.into());
    }

    /// Returns the content stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Bytes> {
        self.files.get(name)
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no files are stored.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetHandler for MemoryAssets {
    fn serve(&self, request: &AssetRequest<'_>, writer: &mut dyn ResponseWriter) {
        if request.method != Method::GET && request.method != Method::HEAD {
            write_error(writer, StatusCode::METHOD_NOT_ALLOWED);
            return;
        }

        let Some(content) = request.relative_path().and_then(|name| self.files.get(name)) else {
            write_error(writer, StatusCode::NOT_FOUND);
            return;
        };

        set_default_content_type(writer, detect_mime_type(request.path));
        writer
            .headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from(content.len()));
        writer.write_status(StatusCode::OK);
        if request.method == Method::GET {
            writer.write(content);
        }
    }
}

impl fmt::Debug for MemoryAssets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.files.keys().collect();
        names.sort();
        f.debug_struct("MemoryAssets").field("files", &names).finish()
    }
}
