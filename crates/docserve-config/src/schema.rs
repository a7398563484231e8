//! Configuration schema types.
//!
//! One struct per section of the configuration file. Every field has a
//! default, so a file only needs to name what it changes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Server configuration section.
///
/// # Example
///
/// ```
/// use docserve_config::ServerConfig;
///
/// let config = ServerConfig::default();
/// assert_eq!(config.http_addr, "127.0.0.1:8080");
/// assert_eq!(config.mount_prefix, "/swagger/");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// HTTP server bind address.
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Path prefix Swagger UI is served under; starts and ends with `/`.
    #[serde(default = "default_mount_prefix")]
    pub mount_prefix: String,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            mount_prefix: default_mount_prefix(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

fn default_http_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_mount_prefix() -> String {
    "/swagger/".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

/// Location of the unpacked Swagger UI distribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AssetsConfig {
    /// Directory holding `swagger-ui.css`, `swagger-ui-bundle.js`, ...
    #[serde(default = "default_assets_root")]
    pub root: PathBuf,

    /// `Cache-Control` value for bundle files.
    #[serde(default)]
    pub cache_control: Option<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_assets_root(),
            cache_control: None,
        }
    }
}

fn default_assets_root() -> PathBuf {
    PathBuf::from("./swagger-ui-dist")
}

/// API description source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocsConfig {
    /// JSON file registered as the API description. Unset means `doc.json`
    /// answers `500` until something is registered.
    #[serde(default)]
    pub document_path: Option<PathBuf>,

    /// Registry key the document is stored and looked up under.
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// Environment variable that turns the handler off when non-empty.
    #[serde(default)]
    pub disable_env: Option<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            document_path: None,
            instance_name: default_instance_name(),
            disable_env: None,
        }
    }
}

fn default_instance_name() -> String {
    docserve::config::DEFAULT_INSTANCE_NAME.to_string()
}

/// Swagger UI page settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SwaggerSection {
    /// URL of the API description as seen from the page.
    #[serde(default = "default_url")]
    pub url: String,

    /// Page title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Update the browser URL as operations are expanded.
    #[serde(default = "default_true")]
    pub deep_linking: bool,

    /// Model expansion depth; `-1` hides models.
    #[serde(default = "default_models_expand_depth")]
    pub default_models_expand_depth: i32,

    /// Pre-filled OAuth2 client id.
    #[serde(default)]
    pub oauth2_default_client_id: String,

    /// Keep authorization across reloads.
    #[serde(default)]
    pub persist_authorization: bool,

    /// `list`, `full` or `none`.
    #[serde(default = "default_doc_expansion")]
    pub doc_expansion: String,
}

impl Default for SwaggerSection {
    fn default() -> Self {
        Self {
            url: default_url(),
            title: default_title(),
            deep_linking: true,
            default_models_expand_depth: default_models_expand_depth(),
            oauth2_default_client_id: String::new(),
            persist_authorization: false,
            doc_expansion: default_doc_expansion(),
        }
    }
}

fn default_url() -> String {
    docserve::config::DEFAULT_URL.to_string()
}

fn default_title() -> String {
    docserve::config::DEFAULT_TITLE.to_string()
}

fn default_models_expand_depth() -> i32 {
    1
}

fn default_doc_expansion() -> String {
    docserve::DocExpansion::default().as_str().to_string()
}

fn default_true() -> bool {
    true
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line, human-readable.
    Pretty,
    /// Single-line, human-readable.
    Compact,
}

impl From<LogFormat> for docserve_telemetry::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Install a log subscriber at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive, e.g. `info` or `docserve=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
