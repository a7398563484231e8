//! The Swagger UI request handler.
//!
//! [`SwaggerHandler`] ties the pieces together for one mount point:
//!
//! 1. the request is classified by [`PathMatcher`]
//! 2. the first accepted request fixes the mount prefix
//! 3. the asset is resolved into a single materialized response
//!
//! A handler serves exactly one prefix for its lifetime. If the same handler
//! is reachable under several prefixes, the first request to arrive decides
//! the prefix handed to the fallback asset handler for all later requests.

use std::fmt;
use std::sync::{Arc, OnceLock};

use http::Request;

use crate::assets::{AssetHandler, AssetRequest};
use crate::config::{ConfigOption, SwaggerConfig};
use crate::matcher::{AssetName, PathMatcher, Rejection};
use crate::recorder::{empty_not_found, method_not_allowed, not_found, HttpResponse};
use crate::registry::DocRegistry;
use crate::resolver::{resolve_doc, resolve_fallback, resolve_index};

/// Serves Swagger UI and the API description under one mount prefix.
///
/// Cloning is cheap; clones share the captured prefix.
///
/// # Example
///
/// ```rust
/// use docserve::{config, MemoryAssets, MemoryRegistry, SwaggerHandler};
/// use http::{Request, StatusCode};
///
/// let registry = MemoryRegistry::new();
/// registry.register("swagger", "{}");
///
/// let handler = SwaggerHandler::wrap(
///     MemoryAssets::new(),
///     registry,
///     [config::title("Pet Store"), config::deep_linking(false)],
/// );
///
/// let request = Request::get("/swagger/doc.json").body(()).unwrap();
/// let response = handler.handle(&request);
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(handler.prefix(), Some("/swagger/"));
/// ```
#[derive(Clone)]
pub struct SwaggerHandler {
    config: Arc<SwaggerConfig>,
    matcher: PathMatcher,
    prefix: Arc<OnceLock<String>>,
    assets: Arc<dyn AssetHandler>,
    registry: Arc<dyn DocRegistry>,
    disabled: bool,
}

impl SwaggerHandler {
    /// Creates a handler from option functions applied over the defaults.
    pub fn wrap<A, R, I>(assets: A, registry: R, options: I) -> Self
    where
        A: AssetHandler + 'static,
        R: DocRegistry + 'static,
        I: IntoIterator<Item = ConfigOption>,
    {
        Self::custom(assets, registry, SwaggerConfig::with_options(options))
    }

    /// Creates a handler from a complete configuration.
    pub fn custom<A, R>(assets: A, registry: R, config: SwaggerConfig) -> Self
    where
        A: AssetHandler + 'static,
        R: DocRegistry + 'static,
    {
        Self {
            config: Arc::new(config.normalized()),
            matcher: PathMatcher::new(),
            prefix: Arc::new(OnceLock::new()),
            assets: Arc::new(assets),
            registry: Arc::new(registry),
            disabled: false,
        }
    }

    /// Like [`wrap`](Self::wrap), but answers every request with an empty
    /// `404` when the environment variable `env_name` is set to a non-empty
    /// value at construction time.
    pub fn disabling<A, R, I>(env_name: &str, assets: A, registry: R, options: I) -> Self
    where
        A: AssetHandler + 'static,
        R: DocRegistry + 'static,
        I: IntoIterator<Item = ConfigOption>,
    {
        Self::wrap(assets, registry, options).with_disabled(env_disables(env_name))
    }

    /// Like [`custom`](Self::custom), with the same environment gate as
    /// [`disabling`](Self::disabling).
    pub fn disabling_custom<A, R>(env_name: &str, assets: A, registry: R, config: SwaggerConfig) -> Self
    where
        A: AssetHandler + 'static,
        R: DocRegistry + 'static,
    {
        Self::custom(assets, registry, config).with_disabled(env_disables(env_name))
    }

    fn with_disabled(mut self, disabled: bool) -> Self {
        if disabled {
            tracing::info!(instance = %self.config.instance_name, "Swagger UI disabled by environment");
        }
        self.disabled = disabled;
        self
    }

    /// The configuration this handler was built with.
    pub fn config(&self) -> &SwaggerConfig {
        &self.config
    }

    /// Returns `true` if the environment gate turned the handler off.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The mount prefix, once the first request has been accepted.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.get().map(String::as_str)
    }

    /// Answers one request.
    pub fn handle<B>(&self, request: &Request<B>) -> HttpResponse {
        if self.disabled {
            return empty_not_found();
        }

        let uri = request.uri();
        let target = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());

        let response = match self.matcher.classify(request.method(), target) {
            Err(Rejection::MethodNotAllowed) => method_not_allowed(),
            Err(Rejection::NotFound) => not_found(),
            Ok(matched) => {
                let prefix = self.prefix.get_or_init(|| {
                    tracing::debug!(prefix = %matched.prefix, "Captured Swagger UI mount prefix");
                    matched.prefix.to_string()
                });
                match matched.asset {
                    AssetName::Index => resolve_index(&self.config).into_response(),
                    AssetName::DocJson => {
                        resolve_doc(&self.config, self.registry.as_ref()).into_response()
                    }
                    asset => {
                        let asset_request = AssetRequest {
                            method: request.method(),
                            path: uri.path(),
                            prefix,
                            headers: request.headers(),
                        };
                        resolve_fallback(Some(asset), &asset_request, self.assets.as_ref())
                    }
                }
            }
        };

        tracing::debug!(
            method = %request.method(),
            path = %uri.path(),
            status = response.status().as_u16(),
            "Swagger UI request"
        );
        response
    }
}

fn env_disables(env_name: &str) -> bool {
    std::env::var_os(env_name).is_some_and(|value| !value.is_empty())
}

impl fmt::Debug for SwaggerHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwaggerHandler")
            .field("config", &self.config)
            .field("prefix", &self.prefix.get())
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::config;
    use crate::registry::MemoryRegistry;
    use http::{header, Method, StatusCode};

    fn handler() -> SwaggerHandler {
        let registry = MemoryRegistry::new();
        registry.register("swagger", "{}");
        let assets = MemoryAssets::new()
            .with_file("favicon-16x16.png", &b"\x89PNG"[..])
            .with_file("swagger-ui.css", "body{}");
        SwaggerHandler::wrap(assets, registry, Vec::new())
    }

    fn get(handler: &SwaggerHandler, uri: &str) -> HttpResponse {
        handler.handle(&Request::get(uri).body(()).unwrap())
    }

    #[test]
    fn test_defaults_are_normalized() {
        let handler = SwaggerHandler::wrap(
            MemoryAssets::new(),
            MemoryRegistry::new(),
            [config::instance_name(""), config::title("")],
        );
        assert_eq!(handler.config().instance_name, "swagger");
        assert_eq!(handler.config().title, "Swagger UI");
    }

    #[test]
    fn test_method_not_allowed() {
        let handler = handler();
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::HEAD] {
            let request = Request::builder()
                .method(method)
                .uri("/swagger/index.html")
                .body(())
                .unwrap();
            assert_eq!(handler.handle(&request).status(), StatusCode::METHOD_NOT_ALLOWED);
        }
        assert_eq!(handler.prefix(), None);
    }

    #[test]
    fn test_unknown_path() {
        let handler = handler();
        assert_eq!(get(&handler, "/swagger/").status(), StatusCode::NOT_FOUND);
        assert_eq!(get(&handler, "/swagger/Index.html").status(), StatusCode::NOT_FOUND);
        assert_eq!(handler.prefix(), None);
    }

    #[test]
    fn test_query_string_accepted() {
        let handler = handler();
        let response = get(&handler, "/swagger/index.html?urls.primaryName=v1");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(handler.prefix(), Some("/swagger/"));
    }

    #[test]
    fn test_fallback_asset() {
        let handler = handler();
        let response = get(&handler, "/swagger/favicon-16x16.png");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
    }

    #[test]
    fn test_prefix_is_captured_once() {
        let handler = handler();
        assert_eq!(get(&handler, "/swagger/index.html").status(), StatusCode::OK);
        assert_eq!(get(&handler, "/docs/swagger-ui.css").status(), StatusCode::NOT_FOUND);
        assert_eq!(handler.prefix(), Some("/swagger/"));

        let clone = handler.clone();
        assert_eq!(get(&clone, "/swagger/swagger-ui.css").status(), StatusCode::OK);
    }

    #[test]
    fn test_concurrent_first_requests_agree() {
        let handler = handler();
        let prefixes = ["/a/", "/b/", "/c/", "/d/", "/e/", "/f/", "/g/", "/h/"];
        std::thread::scope(|scope| {
            for prefix in prefixes {
                let handler = &handler;
                scope.spawn(move || {
                    get(handler, &format!("{prefix}swagger-ui.css"));
                });
            }
        });
        let captured = handler.prefix().unwrap();
        assert!(prefixes.contains(&captured));
        assert_eq!(
            get(&handler, &format!("{captured}swagger-ui.css")).status(),
            StatusCode::OK
        );
    }

    #[test]
    fn test_disabled_handler() {
        let handler = handler().with_disabled(true);
        assert!(handler.is_disabled());
        for uri in ["/swagger/index.html", "/swagger/doc.json", "/anything"] {
            assert_eq!(get(&handler, uri).status(), StatusCode::NOT_FOUND);
        }
        let request = Request::post("/swagger/index.html").body(()).unwrap();
        assert_eq!(handler.handle(&request).status(), StatusCode::NOT_FOUND);
        assert_eq!(handler.prefix(), None);
    }

    #[test]
    fn test_unset_env_keeps_handler_enabled() {
        let handler = SwaggerHandler::disabling(
            "DOCSERVE_TEST_UNSET_GATE_7F3A",
            MemoryAssets::new(),
            MemoryRegistry::new(),
            Vec::new(),
        );
        assert!(!handler.is_disabled());
    }
}
