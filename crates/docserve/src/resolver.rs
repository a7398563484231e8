//! Per-asset response strategies.
//!
//! `index.html` is rendered from the template, `doc.json` comes from the
//! registry, and everything else is handed to the fallback [`AssetHandler`].
//! Failures of the first two are logged in full and answered with a generic
//! `500`.

use serde_json::{Map, Value};

use crate::assets::{AssetHandler, AssetRequest};
use crate::config::SwaggerConfig;
use crate::error::{DocsError, DocsResult};
use crate::matcher::AssetName;
use crate::recorder::{HttpResponse, ResolvedResponse, ResponseRecorder};
use crate::registry::DocRegistry;
use crate::template::render_index;

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json; charset=utf-8";

/// Renders the entry page.
pub fn resolve_index(config: &SwaggerConfig) -> ResolvedResponse {
    match render_index(config) {
        Ok(page) => ResolvedResponse::ok(Some(HTML), page),
        Err(err) => {
            tracing::error!(error = %err, "Failed to render Swagger UI index page");
            ResolvedResponse::internal_error()
        }
    }
}

/// Reads the description registered under the configured instance name.
pub fn resolve_doc(config: &SwaggerConfig, registry: &dyn DocRegistry) -> ResolvedResponse {
    match load_doc(&config.instance_name, registry) {
        Ok(body) => ResolvedResponse::ok(Some(JSON), body),
        Err(err) => {
            tracing::error!(
                instance = %config.instance_name,
                error = %err,
                "Failed to serve API description"
            );
            ResolvedResponse::internal_error()
        }
    }
}

fn load_doc(instance: &str, registry: &dyn DocRegistry) -> DocsResult<Vec<u8>> {
    let text = registry.read_doc(instance)?;
    round_trip(instance, &text)
}

/// Decodes `text` as a JSON object and encodes it again.
///
/// Key order and values are preserved, including numbers outside the
/// `i64`/`u64`/`f64` range.
pub fn round_trip(instance: &str, text: &str) -> DocsResult<Vec<u8>> {
    let document: Map<String, Value> =
        serde_json::from_str(text).map_err(|source| DocsError::Decode {
            instance: instance.to_string(),
            source,
        })?;
    serde_json::to_vec(&document).map_err(|source| DocsError::Encode {
        instance: instance.to_string(),
        source,
    })
}

/// Delegates to the fallback handler and captures what it wrote.
///
/// The recorder is seeded with the content type implied by `asset`, if any.
pub fn resolve_fallback(
    asset: Option<AssetName>,
    request: &AssetRequest<'_>,
    assets: &dyn AssetHandler,
) -> HttpResponse {
    let mut recorder = ResponseRecorder::with_content_type(asset.and_then(|a| a.content_type()));
    assets.serve(request, &mut recorder);
    recorder.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::registry::{MemoryRegistry, RegistryError};
    use http::{header, HeaderMap, Method, StatusCode};

    #[test]
    fn test_index() {
        let config = SwaggerConfig::default().with_url("/api/doc.json");
        let resolved = resolve_index(&config);
        assert_eq!(resolved.status, StatusCode::OK);
        assert_eq!(resolved.content_type, Some(HTML));
        let body = std::str::from_utf8(&resolved.body).unwrap();
        assert!(body.contains(r#"url: "/api/doc.json""#));
    }

    #[test]
    fn test_doc_missing() {
        let registry = MemoryRegistry::new();
        let resolved = resolve_doc(&SwaggerConfig::default(), &registry);
        assert_eq!(resolved, ResolvedResponse::internal_error());
    }

    #[test]
    fn test_doc_round_trip() {
        let registry = MemoryRegistry::new();
        registry.register(
            "swagger",
            r#"{"openapi":"3.0.0","info":{"title":"Pets","version":"1"},"paths":{}}"#,
        );
        let resolved = resolve_doc(&SwaggerConfig::default(), &registry);
        assert_eq!(resolved.status, StatusCode::OK);
        assert_eq!(resolved.content_type, Some(JSON));
        assert_eq!(
            &resolved.body[..],
            br#"{"openapi":"3.0.0","info":{"title":"Pets","version":"1"},"paths":{}}"#
        );
    }

    #[test]
    fn test_doc_uses_instance_name() {
        let registry = MemoryRegistry::new();
        registry.register("swagger", r#"{"which":"default"}"#);
        registry.register("admin", r#"{"which":"admin"}"#);
        let config = SwaggerConfig::default().with_instance_name("admin");
        assert_eq!(&resolve_doc(&config, &registry).body[..], br#"{"which":"admin"}"#);
    }

    #[test]
    fn test_doc_not_an_object() {
        let registry = MemoryRegistry::new();
        registry.register("swagger", "[1, 2, 3]");
        let resolved = resolve_doc(&SwaggerConfig::default(), &registry);
        assert_eq!(resolved.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(&resolved.body[..], b"internal server error");
    }

    #[test]
    fn test_doc_source_failure() {
        let registry = |name: &str| -> Result<String, RegistryError> {
            Err(RegistryError::Source {
                name: name.to_string(),
                reason: "generator crashed".to_string(),
            })
        };
        let resolved = resolve_doc(&SwaggerConfig::default(), &registry);
        assert_eq!(resolved.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!String::from_utf8_lossy(&resolved.body).contains("generator crashed"));
    }

    #[test]
    fn test_round_trip_errors() {
        assert!(matches!(round_trip("x", "not json"), Err(DocsError::Decode { .. })));
        assert_eq!(round_trip("x", " { } ").unwrap(), b"{}");
    }

    #[test]
    fn test_round_trip_keeps_number_text() {
        let big = r#"{"max":18446744073709551616,"id":12345678901234567890123}"#;
        assert_eq!(round_trip("swagger", big).unwrap(), big.as_bytes());

        let decimal = r#"{"v":0.1000000000000000055511151231257827,"e":1.5e300}"#;
        assert_eq!(round_trip("swagger", decimal).unwrap(), decimal.as_bytes());
    }

    #[test]
    fn test_round_trip_keeps_key_order() {
        let text = r#"{"paths":{},"openapi":"3.0.0","info":{"version":"1","title":"Pets"}}"#;
        assert_eq!(round_trip("swagger", text).unwrap(), text.as_bytes());
    }

    #[test]
    fn test_fallback_seeds_content_type() {
        let assets = MemoryAssets::new().with_file("swagger-ui.css", "body{}");
        let headers = HeaderMap::new();
        let request = AssetRequest {
            method: &Method::GET,
            path: "/swagger/swagger-ui.css",
            prefix: "/swagger/",
            headers: &headers,
        };
        let response = resolve_fallback(Some(AssetName::SwaggerUiCss), &request, &assets);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/css; charset=utf-8"
        );
    }

    #[test]
    fn test_fallback_without_status_is_ok() {
        struct Silent;
        impl AssetHandler for Silent {
            fn serve(&self, _: &AssetRequest<'_>, _: &mut dyn crate::recorder::ResponseWriter) {}
        }
        let headers = HeaderMap::new();
        let request = AssetRequest {
            method: &Method::GET,
            path: "/swagger/swagger-ui.js.map",
            prefix: "/swagger/",
            headers: &headers,
        };
        let response = resolve_fallback(Some(AssetName::SwaggerUiJsMap), &request, &Silent);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }
}
