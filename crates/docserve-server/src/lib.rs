//! # docserve-server
//!
//! A standalone server that mounts a [`docserve::SwaggerHandler`] under a
//! configurable prefix, serving the Swagger UI bundle from a directory and
//! the API description from a JSON file.

pub mod app;
mod error;
pub mod server;

pub use app::{build_handler, FileRegistry, Router};
pub use error::ServerError;
pub use server::{shutdown_signal, DocServer};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds the router for `config`.
///
/// # Errors
///
/// See [`build_handler`].
pub fn build_router(config: &docserve_config::DocserveConfig) -> Result<Router, ServerError> {
    let handler = build_handler(config)?;
    Ok(Router::new(config.server.mount_prefix.clone(), handler))
}
