//! Test client for in-memory HTTP testing.

use crate::error::TestError;
use crate::request::{TestRequest, TestRequestBuilder};
use crate::response::TestResponse;
use bytes::Bytes;
use http::{Method, Request, Response};
use http_body_util::Full;
use hyper::service::Service;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Response type produced by handlers under test.
pub type HandlerResponse = Response<Full<Bytes>>;

type HandlerFuture = Pin<Box<dyn Future<Output = Result<HandlerResponse, TestError>> + Send>>;

type BoxedHandler = Arc<dyn Fn(TestRequest) -> HandlerFuture + Send + Sync>;

/// A test client for making in-memory HTTP requests.
///
/// No socket is bound; requests go straight to the handler.
///
/// # Example
///
/// ```ignore
/// use docserve_test::TestClient;
///
/// let handler = SwaggerHandler::wrap(assets, registry, Vec::new());
/// let client = TestClient::new(move |req| {
///     let handler = handler.clone();
///     async move { handler.handle(&req.into_http_request()) }
/// });
///
/// let response = client.get("/swagger/index.html").send().await;
/// assert_eq!(response.status_code(), 200);
/// ```
#[must_use]
pub struct TestClient {
    handler: BoxedHandler,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Creates a new test client with a handler function.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(TestRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResponse> + Send + 'static,
    {
        let handler = Arc::new(handler);
        Self {
            handler: Arc::new(move |req: TestRequest| -> HandlerFuture {
                let fut = handler(req);
                Box::pin(async move { Ok(fut.await) })
            }),
            default_headers: Vec::new(),
        }
    }

    /// Creates a test client driving a `hyper` service.
    ///
    /// Service errors surface as [`TestError::Service`].
    pub fn from_service<S>(service: S) -> Self
    where
        S: Service<Request<Full<Bytes>>, Response = HandlerResponse> + Send + Sync + 'static,
        S::Future: Send + 'static,
        S::Error: fmt::Display,
    {
        let service = Arc::new(service);
        Self {
            handler: Arc::new(move |req: TestRequest| -> HandlerFuture {
                let fut = service.call(req.into_http_request());
                Box::pin(async move { fut.await.map_err(|e| TestError::Service(e.to_string())) })
            }),
            default_headers: Vec::new(),
        }
    }

    /// Adds a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Creates a GET request builder.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::get(uri))
    }

    /// Creates a POST request builder.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::post(uri))
    }

    /// Creates a HEAD request builder.
    pub fn head(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::head(uri))
    }

    /// Creates a request builder with a custom method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequestBuilder::new(method, uri))
    }

    async fn send_internal(&self, request: TestRequest) -> Result<TestResponse, TestError> {
        let handler = Arc::clone(&self.handler);
        let response = (handler)(request).await?;
        TestResponse::from_http(response).await
    }
}

impl fmt::Debug for TestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestClient")
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

/// A request builder bound to a test client.
#[must_use]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: TestRequestBuilder,
}

impl<'a> TestClientRequest<'a> {
    fn new(client: &'a TestClient, builder: TestRequestBuilder) -> Self {
        let mut builder = builder;
        for (name, value) in &client.default_headers {
            builder = builder.header(name, value);
        }
        Self { client, builder }
    }

    /// Sets a header on the request.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Sends the request and returns the response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the handler fails.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(e) => panic!("test request failed: {e}"),
        }
    }

    /// Sends the request and returns a Result.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let request = self.builder.build()?;
        self.client.send_internal(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use std::convert::Infallible;
    use std::future::{ready, Ready};

    fn echo() -> TestClient {
        TestClient::new(|req| async move {
            let body = format!(
                "{{\"method\":\"{}\",\"path\":\"{}\"}}",
                req.method,
                req.uri.path()
            );
            Response::new(Full::new(Bytes::from(body)))
        })
    }

    #[derive(Clone)]
    struct Teapot;

    impl Service<Request<Full<Bytes>>> for Teapot {
        type Response = HandlerResponse;
        type Error = Infallible;
        type Future = Ready<Result<HandlerResponse, Infallible>>;

        fn call(&self, _req: Request<Full<Bytes>>) -> Self::Future {
            let mut response = Response::new(Full::new(Bytes::from_static(b"short and stout")));
            *response.status_mut() = StatusCode::IM_A_TEAPOT;
            ready(Ok(response))
        }
    }

    struct Failing;

    impl Service<Request<Full<Bytes>>> for Failing {
        type Response = HandlerResponse;
        type Error = String;
        type Future = Ready<Result<HandlerResponse, String>>;

        fn call(&self, _req: Request<Full<Bytes>>) -> Self::Future {
            ready(Err("unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_echo_client() {
        let response = echo().get("/swagger/index.html").send().await;
        assert_eq!(response.status_code(), 200);
        let json = response.json_value().unwrap();
        assert_eq!(json["method"], "GET");
        assert_eq!(json["path"], "/swagger/index.html");
    }

    #[tokio::test]
    async fn test_methods() {
        let client = echo();
        let post = client.post("/x").send().await;
        assert_eq!(post.json_value().unwrap()["method"], "POST");
        let head = client.head("/x").send().await;
        assert_eq!(head.json_value().unwrap()["method"], "HEAD");
        let patch = client.request(Method::PATCH, "/x").send().await;
        assert_eq!(patch.json_value().unwrap()["method"], "PATCH");
    }

    #[tokio::test]
    async fn test_default_headers() {
        let client = TestClient::new(|req| async move {
            let value = req
                .headers
                .get("X-Custom")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none")
                .to_string();
            Response::new(Full::new(Bytes::from(value)))
        })
        .with_default_header("X-Custom", "default-value");

        let response = client.get("/test").send().await;
        assert_eq!(response.text().unwrap(), "default-value");

        let response = client.get("/test").header("X-Custom", "override").send().await;
        assert_eq!(response.text().unwrap(), "override");
    }

    #[tokio::test]
    async fn test_from_service() {
        let client = TestClient::from_service(Teapot);
        let response = client.get("/anything").send().await;
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.text().unwrap(), "short and stout");
    }

    #[tokio::test]
    async fn test_service_error() {
        let client = TestClient::from_service(Failing);
        let result = client.get("/anything").try_send().await;
        assert!(matches!(result, Err(TestError::Service(ref msg)) if msg == "unavailable"));
    }

    #[tokio::test]
    async fn test_bad_request_build() {
        let result = echo().get("/x").header("bad header", "v").try_send().await;
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }
}
