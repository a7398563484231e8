//! Handler assembly and routing.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use docserve::{DocRegistry, HttpResponse, MemoryRegistry, RegistryError, StaticAssets, SwaggerHandler};
use docserve_config::DocserveConfig;
use http::{header, HeaderValue, Request, Response, StatusCode};
use http_body_util::Full;

use crate::error::ServerError;

/// Serves one JSON file as the API description, re-read on every request.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    instance_name: String,
    path: PathBuf,
}

impl FileRegistry {
    /// Registers the file at `path` under `instance_name`.
    pub fn new(instance_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            instance_name: instance_name.into(),
            path: path.into(),
        }
    }

    /// Path of the description file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocRegistry for FileRegistry {
    fn read_doc(&self, name: &str) -> Result<String, RegistryError> {
        if name != self.instance_name {
            return Err(RegistryError::NotRegistered(name.to_string()));
        }
        std::fs::read_to_string(&self.path).map_err(|e| RegistryError::Source {
            name: name.to_string(),
            reason: format!("{}: {e}", self.path.display()),
        })
    }
}

/// Builds the Swagger UI handler described by `config`.
///
/// # Errors
///
/// Returns `ServerError::MissingAssets` if the asset directory does not
/// exist, or `ServerError::Config` if the swagger section is invalid.
pub fn build_handler(config: &DocserveConfig) -> Result<SwaggerHandler, ServerError> {
    if !config.assets.root.is_dir() {
        return Err(ServerError::MissingAssets(config.assets.root.clone()));
    }

    let mut assets = StaticAssets::new(&config.assets.root);
    if let Some(cache_control) = &config.assets.cache_control {
        assets = assets.cache_control(cache_control.clone());
    }

    let swagger = config.swagger_config()?;
    let handler = match &config.docs.document_path {
        Some(path) => {
            tracing::info!(path = %path.display(), instance = %swagger.instance_name, "Serving API description from file");
            wrap(config, assets, FileRegistry::new(swagger.instance_name.clone(), path), swagger)
        }
        None => {
            tracing::warn!("No docs.document_path configured, doc.json will answer 500");
            wrap(config, assets, MemoryRegistry::new(), swagger)
        }
    };
    Ok(handler)
}

fn wrap<R: DocRegistry + 'static>(
    config: &DocserveConfig,
    assets: StaticAssets,
    registry: R,
    swagger: docserve::SwaggerConfig,
) -> SwaggerHandler {
    match &config.docs.disable_env {
        Some(env_name) => SwaggerHandler::disabling_custom(env_name, assets, registry, swagger),
        None => SwaggerHandler::custom(assets, registry, swagger),
    }
}

/// Sends requests under the mount prefix to the Swagger UI handler.
#[derive(Debug, Clone)]
pub struct Router {
    prefix: String,
    handler: SwaggerHandler,
}

impl Router {
    /// Mounts `handler` under `prefix` (which ends in `/`).
    pub fn new(prefix: impl Into<String>, handler: SwaggerHandler) -> Self {
        Self {
            prefix: prefix.into(),
            handler,
        }
    }

    /// The mount prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The mounted handler.
    pub fn handler(&self) -> &SwaggerHandler {
        &self.handler
    }

    /// Routes one request.
    ///
    /// The bare prefix (with or without its trailing slash) redirects to
    /// `index.html`; other paths outside the prefix are `404`.
    pub fn route<B>(&self, request: &Request<B>) -> HttpResponse {
        let path = request.uri().path();
        let bare = self.prefix.trim_end_matches('/');
        if !self.handler.is_disabled() && (path == self.prefix || (!bare.is_empty() && path == bare)) {
            return redirect(&format!("{}index.html", self.prefix));
        }
        if path.starts_with(&self.prefix) {
            return self.handler.handle(request);
        }
        let mut response = Response::new(Full::new(Bytes::from_static(b"Not Found")));
        *response.status_mut() = StatusCode::NOT_FOUND;
        response
    }
}

fn redirect(location: &str) -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::MOVED_PERMANENTLY;
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with(dir: &TempDir) -> DocserveConfig {
        let mut config = DocserveConfig::default();
        config.assets.root = dir.path().to_path_buf();
        config
    }

    #[test]
    fn test_missing_assets_dir() {
        let mut config = DocserveConfig::default();
        config.assets.root = PathBuf::from("/nonexistent/swagger-ui-dist");
        assert!(matches!(build_handler(&config), Err(ServerError::MissingAssets(_))));
    }

    #[test]
    fn test_file_registry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("openapi.json");
        std::fs::write(&path, r#"{"openapi":"3.0.3"}"#).unwrap();

        let registry = FileRegistry::new("swagger", &path);
        assert_eq!(registry.read_doc("swagger").unwrap(), r#"{"openapi":"3.0.3"}"#);
        assert!(matches!(registry.read_doc("other"), Err(RegistryError::NotRegistered(_))));

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(registry.read_doc("swagger"), Err(RegistryError::Source { .. })));
    }

    #[test]
    fn test_router_redirects_bare_prefix() {
        let dir = TempDir::new().unwrap();
        let router = Router::new("/swagger/", build_handler(&config_with(&dir)).unwrap());

        for path in ["/swagger", "/swagger/"] {
            let response = router.route(&Request::get(path).body(()).unwrap());
            assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
            assert_eq!(
                response.headers().get(header::LOCATION).unwrap(),
                "/swagger/index.html"
            );
        }
    }

    #[test]
    fn test_router_outside_prefix() {
        let dir = TempDir::new().unwrap();
        let router = Router::new("/swagger/", build_handler(&config_with(&dir)).unwrap());
        let response = router.route(&Request::get("/index.html").body(()).unwrap());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(router.handler().prefix(), None);
    }

    #[test]
    fn test_root_prefix() {
        let dir = TempDir::new().unwrap();
        let router = Router::new("/", build_handler(&config_with(&dir)).unwrap());
        let response = router.route(&Request::get("/index.html").body(()).unwrap());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(router.handler().prefix(), Some("/"));
    }
}
