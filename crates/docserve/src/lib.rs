//! # docserve
//!
//! Serves the Swagger UI bundle and an API description document through an
//! `http`/`hyper` request pipeline.
//!
//! A [`SwaggerHandler`] answers GET requests for a fixed set of Swagger UI
//! file names under whatever prefix it is mounted at:
//!
//! - `index.html` is rendered from a template using [`SwaggerConfig`]
//! - `doc.json` is read from a [`DocRegistry`] and re-encoded as JSON
//! - every other bundle file is delegated to an [`AssetHandler`]
//!
//! ## Quick Start
//!
//! ```rust
//! use docserve::{config, MemoryRegistry, StaticAssets, SwaggerHandler, SwaggerService};
//!
//! let registry = MemoryRegistry::new();
//! registry.register("swagger", r#"{"openapi":"3.0.0","info":{},"paths":{}}"#);
//!
//! let handler = SwaggerHandler::wrap(
//!     StaticAssets::new("./swagger-ui-dist").cache_control("public, max-age=3600"),
//!     registry,
//!     [config::title("Pet Store API"), config::doc_expansion(config::DocExpansion::None)],
//! );
//!
//! // Hand this to `hyper::server::conn::http1::Builder::serve_connection`.
//! let service = SwaggerService::new(handler);
//! # let _ = service;
//! ```
//!
//! ## Disabling in production
//!
//! [`SwaggerHandler::disabling`] checks an environment variable once at
//! construction; when it holds a non-empty value the handler answers every
//! request with an empty `404`.

pub mod assets;
pub mod config;
mod error;
mod handler;
pub mod matcher;
pub mod recorder;
pub mod registry;
pub mod resolver;
mod service;
mod static_files;
pub mod template;

pub use assets::{detect_mime_type, AssetHandler, AssetRequest, MemoryAssets};
pub use config::{ConfigOption, DocExpansion, SwaggerConfig};
pub use error::{DocsError, DocsResult};
pub use handler::SwaggerHandler;
pub use matcher::{AssetName, PathMatch, PathMatcher, Rejection};
pub use recorder::{HttpResponse, ResolvedResponse, ResponseRecorder, ResponseWriter};
pub use registry::{DocRegistry, DocSource, MemoryRegistry, RegistryError};
pub use service::SwaggerService;
pub use static_files::{StaticAssets, StaticFileError};
