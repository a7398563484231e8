//! Test request building.

use crate::error::TestError;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use http_body_util::Full;

/// A test request that can be sent to a [`TestClient`](crate::TestClient).
#[derive(Debug, Clone)]
pub struct TestRequest {
    /// HTTP method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Bytes,
}

impl TestRequest {
    /// Creates a new GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Creates a new POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Creates a new PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Creates a new DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }

    /// Creates a new HEAD request.
    pub fn head(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::HEAD, uri)
    }

    /// Converts this request to an HTTP request.
    pub fn into_http_request(self) -> http::Request<Full<Bytes>> {
        let mut request = http::Request::new(Full::new(self.body));
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers;
        request
    }
}

/// Builder for constructing test requests.
///
/// Invalid header names or values are reported by [`build`](Self::build).
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    error: Option<String>,
}

impl TestRequestBuilder {
    /// Creates a new request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: None,
            error: None,
        }
    }

    /// Sets a header on the request.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let request = TestRequest::get("/swagger/swagger-ui.css")
    ///     .header("If-None-Match", "\"abc\"")
    ///     .build();
    /// ```
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref());
        let value = HeaderValue::try_from(value.as_ref());
        match (name, value) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            (Err(e), _) => self.error = Some(format!("Invalid header name: {e}")),
            (_, Err(e)) => self.error = Some(format!("Invalid header value: {e}")),
        }
        self
    }

    /// Sets a typed header on the request.
    pub fn header_typed(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the Accept header.
    pub fn accept(self, accept: impl AsRef<str>) -> Self {
        self.header(header::ACCEPT.as_str(), accept)
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Builds the test request.
    pub fn build(self) -> Result<TestRequest, TestError> {
        if let Some(error) = self.error {
            return Err(TestError::RequestBuild(error));
        }

        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("Invalid URI: {e}")))?;

        Ok(TestRequest {
            method: self.method,
            uri,
            headers: self.headers,
            body: self.body.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_request() {
        let request = TestRequest::get("/swagger/index.html").build().unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.uri.path(), "/swagger/index.html");
    }

    #[test]
    fn test_query_is_kept() {
        let request = TestRequest::get("/swagger/doc.json?v=2").build().unwrap();
        assert_eq!(request.uri.query(), Some("v=2"));
    }

    #[test]
    fn test_methods() {
        assert_eq!(TestRequest::post("/").build().unwrap().method, Method::POST);
        assert_eq!(TestRequest::put("/").build().unwrap().method, Method::PUT);
        assert_eq!(TestRequest::delete("/").build().unwrap().method, Method::DELETE);
        assert_eq!(TestRequest::head("/").build().unwrap().method, Method::HEAD);
    }

    #[test]
    fn test_header() {
        let request = TestRequest::get("/swagger/swagger-ui.css")
            .header("If-None-Match", "\"abc\"")
            .accept("text/css")
            .build()
            .unwrap();

        assert_eq!(request.headers.get("If-None-Match").unwrap(), "\"abc\"");
        assert_eq!(request.headers.get("Accept").unwrap(), "text/css");
    }

    #[test]
    fn test_invalid_header() {
        let result = TestRequest::get("/").header("bad header", "x").build();
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }

    #[test]
    fn test_invalid_uri() {
        let result = TestRequest::get("http://[::1").build();
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }

    #[test]
    fn test_raw_body() {
        let request = TestRequest::post("/data")
            .content_type("text/plain")
            .body("raw data")
            .build()
            .unwrap();

        assert_eq!(request.body.as_ref(), b"raw data");
        assert_eq!(request.headers.get("Content-Type").unwrap(), "text/plain");
    }

    #[test]
    fn test_into_http_request() {
        let request = TestRequest::get("/swagger/index.html?x=1")
            .header("X-Test", "value")
            .build()
            .unwrap();

        let http_request = request.into_http_request();
        assert_eq!(http_request.method(), Method::GET);
        assert_eq!(http_request.uri().path(), "/swagger/index.html");
        assert_eq!(http_request.uri().query(), Some("x=1"));
        assert_eq!(http_request.headers().get("X-Test").unwrap(), "value");
    }
}
