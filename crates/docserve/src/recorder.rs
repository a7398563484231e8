//! Response capture and materialization.
//!
//! Fallback asset handlers write their answer imperatively through
//! [`ResponseWriter`]. [`ResponseRecorder`] buffers those writes and turns
//! them into a single [`HttpResponse`] once the handler returns.

use bytes::{Bytes, BytesMut};
use http::{header, HeaderMap, HeaderValue, Response, StatusCode};
use http_body_util::Full;

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Generic body sent for every internal failure.
pub const INTERNAL_ERROR_BODY: &str = "internal server error";

/// Write-oriented response interface handed to fallback asset handlers.
pub trait ResponseWriter {
    /// Mutable access to the response headers.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Sets the status code. Only the first call has an effect.
    fn write_status(&mut self, status: StatusCode);

    /// Appends to the body. Implies `200 OK` if no status was written yet.
    fn write(&mut self, chunk: &[u8]);
}

/// In-memory [`ResponseWriter`].
///
/// # Example
///
/// ```rust
/// use docserve::recorder::{ResponseRecorder, ResponseWriter};
/// use http::StatusCode;
///
/// let mut recorder = ResponseRecorder::new();
/// recorder.write(b"hello ");
/// recorder.write(b"world");
/// let response = recorder.into_response();
/// assert_eq!(response.status(), StatusCode::OK);
/// ```
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl ResponseRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder with `Content-Type` already set.
    ///
    /// Handlers that respect an existing `Content-Type` keep it.
    pub fn with_content_type(content_type: Option<&'static str>) -> Self {
        let mut recorder = Self::new();
        if let Some(content_type) = content_type {
            recorder
                .headers
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        recorder
    }

    /// Status written so far, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Headers written so far.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body written so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Materializes the captured response. No explicit status means `200 OK`.
    pub fn into_response(self) -> HttpResponse {
        let mut response = Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseWriter for ResponseRecorder {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    fn write(&mut self, chunk: &[u8]) {
        self.write_status(StatusCode::OK);
        self.body.extend_from_slice(chunk);
    }
}

/// A response produced by the adapter itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResponse {
    /// Status code.
    pub status: StatusCode,
    /// `Content-Type` header value, if any.
    pub content_type: Option<&'static str>,
    /// Body bytes.
    pub body: Bytes,
}

impl ResolvedResponse {
    /// A `200 OK` response.
    pub fn ok(content_type: Option<&'static str>, body: impl Into<Bytes>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type,
            body: body.into(),
        }
    }

    /// The generic `500` every internal failure maps to.
    pub fn internal_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            content_type: Some("text/plain; charset=utf-8"),
            body: Bytes::from_static(INTERNAL_ERROR_BODY.as_bytes()),
        }
    }

    /// Converts into the host response type, preserving status, content
    /// type and body exactly.
    pub fn into_response(self) -> HttpResponse {
        let mut response = Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        response
    }
}

/// `404 Not Found` with the standard reason phrase as body.
pub fn not_found() -> HttpResponse {
    ResolvedResponse {
        status: StatusCode::NOT_FOUND,
        content_type: Some("text/plain; charset=utf-8"),
        body: Bytes::from_static(b"Not Found"),
    }
    .into_response()
}

/// `404 Not Found` with no body, used by a disabled handler.
pub fn empty_not_found() -> HttpResponse {
    empty(StatusCode::NOT_FOUND)
}

/// `405 Method Not Allowed` with no body.
pub fn method_not_allowed() -> HttpResponse {
    let mut response = empty(StatusCode::METHOD_NOT_ALLOWED);
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET"));
    response
}

fn empty(status: StatusCode) -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}
