//! Swagger UI configuration.
//!
//! A [`SwaggerConfig`] is built once per handler and never changes
//! afterwards. It can be assembled three ways:
//!
//! ```rust
//! use docserve::config::{self, DocExpansion, SwaggerConfig};
//!
//! // Builder methods over the defaults
//! let a = SwaggerConfig::default()
//!     .with_title("Pet Store")
//!     .with_doc_expansion(DocExpansion::Full);
//!
//! // Option functions applied over the defaults
//! let b = SwaggerConfig::with_options([
//!     config::title("Pet Store"),
//!     config::doc_expansion(DocExpansion::Full),
//! ]);
//!
//! assert_eq!(a, b);
//! ```

use std::fmt;
use std::str::FromStr;

/// Default registry key for the API description document.
pub const DEFAULT_INSTANCE_NAME: &str = "swagger";

/// Default entry-document URL written into the index page.
pub const DEFAULT_URL: &str = "doc.json";

/// Default page title.
pub const DEFAULT_TITLE: &str = "Swagger UI";

/// Document expansion mode for Swagger UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DocExpansion {
    /// Show only the list of operations.
    #[default]
    List,
    /// Expand all operations fully.
    Full,
    /// Show all operations collapsed.
    None,
}

impl DocExpansion {
    /// Returns the value Swagger UI expects for `docExpansion`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Full => "full",
            Self::None => "none",
        }
    }
}

impl fmt::Display for DocExpansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`DocExpansion`] value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown doc expansion '{0}', expected 'list', 'full' or 'none'")]
pub struct ParseDocExpansionError(String);

impl FromStr for DocExpansion {
    type Err = ParseDocExpansionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "list" => Ok(Self::List),
            "full" => Ok(Self::Full),
            "none" => Ok(Self::None),
            _ => Err(ParseDocExpansionError(s.to_string())),
        }
    }
}

/// Configuration captured by a [`SwaggerHandler`](crate::SwaggerHandler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwaggerConfig {
    /// URL of the API description, as seen from the index page.
    pub url: String,
    /// Key used to look the description up in the registry.
    pub instance_name: String,
    /// Page title.
    pub title: String,
    /// Whether Swagger UI updates the URL as operations are expanded.
    pub deep_linking: bool,
    /// Default expansion depth for models (`-1` hides models entirely).
    pub default_models_expand_depth: i32,
    /// Client id pre-filled in the OAuth2 authorization dialog.
    pub oauth2_default_client_id: String,
    /// Keep authorization data across browser close/refresh.
    pub persist_authorization: bool,
    /// Initial expansion of the operation list.
    pub doc_expansion: DocExpansion,
}

impl Default for SwaggerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            instance_name: DEFAULT_INSTANCE_NAME.to_string(),
            title: DEFAULT_TITLE.to_string(),
            deep_linking: true,
            default_models_expand_depth: 1,
            oauth2_default_client_id: String::new(),
            persist_authorization: false,
            doc_expansion: DocExpansion::List,
        }
    }
}

impl SwaggerConfig {
    /// Applies option functions, in order, over the defaults.
    pub fn with_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        let mut config = Self::default();
        for option in options {
            option(&mut config);
        }
        config
    }

    /// Sets the description URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the registry key.
    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = name.into();
        self
    }

    /// Sets the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Enables or disables deep linking.
    pub fn with_deep_linking(mut self, enabled: bool) -> Self {
        self.deep_linking = enabled;
        self
    }

    /// Sets the default models expand depth.
    pub fn with_default_models_expand_depth(mut self, depth: i32) -> Self {
        self.default_models_expand_depth = depth;
        self
    }

    /// Sets the default OAuth2 client id.
    pub fn with_oauth2_default_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.oauth2_default_client_id = client_id.into();
        self
    }

    /// Enables or disables persisting authorization.
    pub fn with_persist_authorization(mut self, enabled: bool) -> Self {
        self.persist_authorization = enabled;
        self
    }

    /// Sets the document expansion mode.
    pub fn with_doc_expansion(mut self, expansion: DocExpansion) -> Self {
        self.doc_expansion = expansion;
        self
    }

    /// Replaces an empty instance name or title with its default.
    pub(crate) fn normalized(mut self) -> Self {
        if self.instance_name.is_empty() {
            self.instance_name = DEFAULT_INSTANCE_NAME.to_string();
        }
        if self.title.is_empty() {
            self.title = DEFAULT_TITLE.to_string();
        }
        self
    }
}

/// A single configuration change, applied by [`SwaggerConfig::with_options`].
pub type ConfigOption = Box<dyn FnOnce(&mut SwaggerConfig) + Send>;

/// Sets the URL pointing to the API description (normally `doc.json`).
pub fn url(url: impl Into<String>) -> ConfigOption {
    let url = url.into();
    Box::new(move |c| c.url = url)
}

/// Sets the document expansion mode.
pub fn doc_expansion(expansion: DocExpansion) -> ConfigOption {
    Box::new(move |c| c.doc_expansion = expansion)
}

/// Sets the deep linking flag.
pub fn deep_linking(enabled: bool) -> ConfigOption {
    Box::new(move |c| c.deep_linking = enabled)
}

/// Sets the default expansion depth for models (`-1` hides them).
pub fn default_models_expand_depth(depth: i32) -> ConfigOption {
    Box::new(move |c| c.default_models_expand_depth = depth)
}

/// Sets the registry key the description is looked up under.
pub fn instance_name(name: impl Into<String>) -> ConfigOption {
    let name = name.into();
    Box::new(move |c| c.instance_name = name)
}

/// Sets the page title.
pub fn title(title: impl Into<String>) -> ConfigOption {
    let title = title.into();
    Box::new(move |c| c.title = title)
}

/// Persists authorization information over browser close/refresh.
pub fn persist_authorization(enabled: bool) -> ConfigOption {
    Box::new(move |c| c.persist_authorization = enabled)
}

/// Sets the default client id used for OAuth2.
pub fn oauth2_default_client_id(client_id: impl Into<String>) -> ConfigOption {
    let client_id = client_id.into();
    Box::new(move |c| c.oauth2_default_client_id = client_id)
}
