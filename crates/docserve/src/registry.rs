//! API description registry.
//!
//! The adapter never owns the description document; it asks a
//! [`DocRegistry`] for it by name on every `doc.json` request. Documents
//! can therefore be registered (or replaced) after the handler is built.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

/// Errors returned by a [`DocRegistry`].
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Nothing is registered under the requested name.
    #[error("no API description registered under '{0}'")]
    NotRegistered(String),

    /// The source failed to produce its document.
    #[error("API description source '{name}' failed: {reason}")]
    Source {
        /// Registry key.
        name: String,
        /// Failure description.
        reason: String,
    },
}

/// Looks up API description documents by name.
pub trait DocRegistry: Send + Sync {
    /// Returns the JSON text registered under `name`.
    fn read_doc(&self, name: &str) -> Result<String, RegistryError>;
}

impl<F> DocRegistry for F
where
    F: Fn(&str) -> Result<String, RegistryError> + Send + Sync,
{
    fn read_doc(&self, name: &str) -> Result<String, RegistryError> {
        self(name)
    }
}

/// Produces one API description document.
pub trait DocSource: Send + Sync {
    /// Returns the document as JSON text.
    fn read_doc(&self) -> String;
}

impl DocSource for String {
    fn read_doc(&self) -> String {
        self.clone()
    }
}

impl DocSource for &'static str {
    fn read_doc(&self) -> String {
        (*self).to_string()
    }
}

/// In-memory registry of named description sources.
///
/// # Example
///
/// ```rust
/// use docserve::registry::{DocRegistry, MemoryRegistry};
///
/// let registry = MemoryRegistry::new();
/// assert!(registry.read_doc("swagger").is_err());
///
/// registry.register("swagger", r#"{"openapi":"3.0.0"}"#);
/// assert_eq!(registry.read_doc("swagger").unwrap(), r#"{"openapi":"3.0.0"}"#);
/// ```
#[derive(Default, Clone)]
pub struct MemoryRegistry {
    sources: Arc<RwLock<HashMap<String, Arc<dyn DocSource>>>>,
}

impl MemoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `source` under `name`, replacing any previous entry.
    pub fn register<S>(&self, name: impl Into<String>, source: S)
    where
        S: DocSource + 'static,
    {
        let name = name.into();
        tracing::debug!(instance = %name, "Registering API description");
        self.sources.write().insert(name, Arc::new(source));
    }

    /// Removes the entry under `name`, returning whether one existed.
    pub fn unregister(&self, name: &str) -> bool {
        self.sources.write().remove(name).is_some()
    }

    /// Returns `true` if something is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.sources.read().contains_key(name)
    }

    /// Returns the number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.read().len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.sources.read().is_empty()
    }
}

impl DocRegistry for MemoryRegistry {
    fn read_doc(&self, name: &str) -> Result<String, RegistryError> {
        let source = self
            .sources
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotRegistered(name.to_string()))?;
        Ok(source.read_doc())
    }
}

impl fmt::Debug for MemoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources = self.sources.read();
        let mut names: Vec<&String> = sources.keys().collect();
        names.sort();
        f.debug_struct("MemoryRegistry").field("names", &names).finish()
    }
}
