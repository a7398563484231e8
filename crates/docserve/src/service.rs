//! `hyper` service wrapper.

use std::convert::Infallible;
use std::future::{ready, Ready};

use http::Request;
use hyper::service::Service;

use crate::handler::SwaggerHandler;
use crate::recorder::HttpResponse;

/// Exposes a [`SwaggerHandler`] as a [`hyper::service::Service`].
///
/// The handler never awaits, so the returned future is always ready.
///
/// ```rust,ignore
/// let service = SwaggerService::new(handler);
/// hyper::server::conn::http1::Builder::new()
///     .serve_connection(io, service)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct SwaggerService {
    handler: SwaggerHandler,
}

impl SwaggerService {
    /// Wraps `handler`.
    pub fn new(handler: SwaggerHandler) -> Self {
        Self { handler }
    }

    /// The wrapped handler.
    pub fn handler(&self) -> &SwaggerHandler {
        &self.handler
    }
}

impl From<SwaggerHandler> for SwaggerService {
    fn from(handler: SwaggerHandler) -> Self {
        Self::new(handler)
    }
}

impl<B> Service<Request<B>> for SwaggerService {
    type Response = HttpResponse;
    type Error = Infallible;
    type Future = Ready<Result<HttpResponse, Infallible>>;

    fn call(&self, request: Request<B>) -> Self::Future {
        ready(Ok(self.handler.handle(&request)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::registry::MemoryRegistry;
    use http::StatusCode;

    #[tokio::test]
    async fn test_service_call() {
        let registry = MemoryRegistry::new();
        registry.register("swagger", r#"{"openapi":"3.1.0"}"#);
        let service = SwaggerService::from(SwaggerHandler::wrap(
            MemoryAssets::new(),
            registry,
            Vec::new(),
        ));

        let response = service
            .call(Request::get("/docs/doc.json").body(()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(service.handler().prefix(), Some("/docs/"));

        let clone = service.clone();
        let response = clone
            .call(Request::get("/docs/missing.txt").body(()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
