//! # docserve-test
//!
//! In-memory HTTP testing for docserve handlers. Requests are built with a
//! fluent API, handed straight to the handler or `hyper` service under test,
//! and the response body is collected for assertions.
//!
//! ## Example
//!
//! ```ignore
//! use docserve::{MemoryAssets, MemoryRegistry, SwaggerHandler, SwaggerService};
//! use docserve_test::TestClient;
//!
//! #[tokio::test]
//! async fn serves_index() {
//!     let handler = SwaggerHandler::wrap(MemoryAssets::new(), MemoryRegistry::new(), Vec::new());
//!     let client = TestClient::from_service(SwaggerService::new(handler));
//!
//!     client
//!         .get("/swagger/index.html")
//!         .send()
//!         .await
//!         .assert_status(http::StatusCode::OK)
//!         .assert_content_type("text/html; charset=utf-8");
//! }
//! ```

mod client;
mod error;
mod request;
mod response;

pub use client::{HandlerResponse, TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
