//! # docserve-config
//!
//! Typed, layered configuration for the docserve server: defaults, then a
//! TOML or JSON file, then `DOCSERVE__SECTION__KEY` environment variables.
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! mount_prefix = "/swagger/"
//!
//! [assets]
//! root = "./swagger-ui-dist"
//! cache_control = "public, max-age=3600"
//!
//! [docs]
//! document_path = "./openapi.json"
//! disable_env = "DISABLE_SWAGGER"
//!
//! [swagger]
//! title = "Pet Store"
//! doc_expansion = "none"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

mod config;
mod error;
mod loader;
mod schema;

pub use config::DocserveConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{AssetsConfig, DocsConfig, LogFormat, LoggingConfig, ServerConfig, SwaggerSection};
