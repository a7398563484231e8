//! Test response wrapper.

use crate::error::TestError;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;

/// A test response with helper methods for assertions.
#[derive(Debug, Clone)]
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Creates a test response by collecting an HTTP response body.
    pub async fn from_http<B>(response: http::Response<B>) -> Result<Self, TestError>
    where
        B: http_body_util::BodyExt,
        B::Error: fmt::Display,
    {
        let (parts, body) = response.into_parts();
        let body_bytes = body
            .collect()
            .await
            .map_err(|e| TestError::BodyRead(e.to_string()))?
            .to_bytes();

        Ok(Self {
            status: parts.status,
            headers: parts.headers,
            body: body_bytes,
        })
    }

    /// Creates a test response from raw parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a u16.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns true if the status is successful (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns a reference to the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Gets a header value by name.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// Gets a header value as a string.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(header::CONTENT_TYPE.as_str())
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as a string.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        serde_json::from_slice(&self.body).map_err(TestError::Json)
    }

    /// Deserializes the body as a JSON Value.
    pub fn json_value(&self) -> Result<serde_json::Value, TestError> {
        self.json()
    }

    // Assertion methods

    /// Asserts that the status code equals the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {}",
            expected, self.status
        );
        self
    }

    /// Asserts that a header exists with the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the header doesn't exist or doesn't match.
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let expected = expected.as_ref();
        let actual = self
            .header_str(name)
            .unwrap_or_else(|| panic!("Header '{name}' not found"));
        assert_eq!(actual, expected, "Header '{name}' mismatch");
        self
    }

    /// Asserts that the Content-Type header equals `expected` exactly.
    ///
    /// # Panics
    ///
    /// Panics if Content-Type is missing or differs.
    pub fn assert_content_type(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        let actual = self
            .content_type()
            .unwrap_or_else(|| panic!("Content-Type header not found, expected '{expected}'"));
        assert_eq!(actual, expected, "Content-Type mismatch");
        self
    }

    /// Asserts that the body contains the expected substring.
    ///
    /// # Panics
    ///
    /// Panics if the body is not UTF-8 or doesn't contain the substring.
    pub fn assert_body_contains(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        let body = String::from_utf8_lossy(&self.body);
        assert!(
            body.contains(expected),
            "Body should contain '{expected}', got: {body}"
        );
        self
    }

    /// Asserts that the body equals the expected bytes.
    ///
    /// # Panics
    ///
    /// Panics if the body doesn't match.
    pub fn assert_body_eq(&self, expected: impl AsRef<[u8]>) -> &Self {
        assert_eq!(self.body.as_ref(), expected.as_ref(), "Body mismatch");
        self
    }

    /// Asserts that the body is empty.
    ///
    /// # Panics
    ///
    /// Panics if the body is not empty.
    pub fn assert_body_empty(&self) -> &Self {
        assert!(self.body.is_empty(), "Expected empty body, got {} bytes", self.body.len());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;

    fn response(status: StatusCode, content_type: &'static str, body: &'static str) -> TestResponse {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        TestResponse::new(status, headers, Bytes::from_static(body.as_bytes()))
    }

    #[tokio::test]
    async fn test_from_http() {
        let http_response = http::Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(Full::new(Bytes::from_static(b"<html></html>")))
            .unwrap();

        let response = TestResponse::from_http(http_response).await.unwrap();
        assert_eq!(response.status_code(), 200);
        assert!(response.is_success());
        assert_eq!(response.content_type(), Some("text/html; charset=utf-8"));
        assert_eq!(response.text().unwrap(), "<html></html>");
    }

    #[test]
    fn test_json() {
        let response = response(StatusCode::OK, "application/json", r#"{"openapi":"3.0.0"}"#);
        let value = response.json_value().unwrap();
        assert_eq!(value["openapi"], "3.0.0");
    }

    #[test]
    fn test_assertions_chain() {
        response(StatusCode::OK, "text/css; charset=utf-8", "body{}")
            .assert_status(StatusCode::OK)
            .assert_content_type("text/css; charset=utf-8")
            .assert_header("content-type", "text/css; charset=utf-8")
            .assert_body_contains("body")
            .assert_body_eq("body{}");
    }

    #[test]
    #[should_panic(expected = "Content-Type mismatch")]
    fn test_content_type_is_exact() {
        response(StatusCode::OK, "application/json; charset=utf-8", "{}")
            .assert_content_type("application/json");
    }

    #[test]
    fn test_empty_body() {
        TestResponse::new(StatusCode::NOT_FOUND, HeaderMap::new(), Bytes::new())
            .assert_status(StatusCode::NOT_FOUND)
            .assert_body_empty();
    }

    #[test]
    fn test_invalid_utf8() {
        let response = TestResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            Bytes::from_static(&[0xff, 0xfe]),
        );
        assert!(matches!(response.text(), Err(TestError::BodyRead(_))));
    }
}
