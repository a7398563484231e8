//! Error types for the documentation adapter.
//!
//! Every variant here is an internal failure: it is logged in full and
//! reported to the client as a bare `500 Internal Server Error`.

use thiserror::Error;

use crate::registry::RegistryError;

/// Errors that can occur while resolving a documentation response.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Rendering the entry page template failed.
    #[error("Failed to render Swagger UI index page: {0}")]
    Template(#[from] std::fmt::Error),

    /// The description registry could not supply the document.
    #[error("Failed to read API description: {0}")]
    Registry(#[from] RegistryError),

    /// The description document is not a JSON object.
    #[error("Failed to decode API description '{instance}': {source}")]
    Decode {
        /// Registry key the document was read from.
        instance: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Re-encoding the description document failed.
    #[error("Failed to encode API description '{instance}': {source}")]
    Encode {
        /// Registry key the document was read from.
        instance: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;
