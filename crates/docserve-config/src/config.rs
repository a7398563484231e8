//! Root configuration type.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use docserve::{DocExpansion, SwaggerConfig};
use docserve_telemetry::LogConfig;

use crate::{AssetsConfig, ConfigError, DocsConfig, LogFormat, LoggingConfig, ServerConfig, SwaggerSection};

/// Complete docserve server configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use docserve_config::DocserveConfig;
///
/// let config = DocserveConfig::default();
/// assert_eq!(config.server.mount_prefix, "/swagger/");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct DocserveConfig {
    /// Listener and mount point.
    #[serde(default)]
    pub server: ServerConfig,

    /// Swagger UI bundle location.
    #[serde(default)]
    pub assets: AssetsConfig,

    /// API description source.
    #[serde(default)]
    pub docs: DocsConfig,

    /// Swagger UI page settings.
    #[serde(default)]
    pub swagger: SwaggerSection,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DocserveConfig {
    /// Local development preset: pretty `debug` logs.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LoggingConfig {
                enabled: true,
                level: "debug".to_string(),
                format: LogFormat::Pretty,
            },
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `server.http_addr` is not a socket address
    /// - `server.mount_prefix` does not start and end with `/`
    /// - `docs.instance_name` is empty
    /// - `swagger.doc_expansion` is not `list`, `full` or `none`
    /// - `logging.level` is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        let prefix = &self.server.mount_prefix;
        if !prefix.starts_with('/') || !prefix.ends_with('/') {
            return Err(ConfigError::invalid_value(
                "server.mount_prefix",
                format!("must start and end with '/': {prefix}"),
            ));
        }

        if self.docs.instance_name.is_empty() {
            return Err(ConfigError::invalid_value("docs.instance_name", "must not be empty"));
        }

        self.doc_expansion()?;

        if self.logging.enabled {
            docserve_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// The parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `server.http_addr` does not parse.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.http_addr.parse().map_err(|_| {
            ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            )
        })
    }

    fn doc_expansion(&self) -> Result<DocExpansion, ConfigError> {
        self.swagger
            .doc_expansion
            .parse()
            .map_err(|e: docserve::config::ParseDocExpansionError| {
                ConfigError::invalid_value("swagger.doc_expansion", e.to_string())
            })
    }

    /// Handler configuration built from the `swagger` and `docs` sections.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `swagger.doc_expansion` is unknown.
    pub fn swagger_config(&self) -> Result<SwaggerConfig, ConfigError> {
        Ok(SwaggerConfig::default()
            .with_url(self.swagger.url.clone())
            .with_instance_name(self.docs.instance_name.clone())
            .with_title(self.swagger.title.clone())
            .with_deep_linking(self.swagger.deep_linking)
            .with_default_models_expand_depth(self.swagger.default_models_expand_depth)
            .with_oauth2_default_client_id(self.swagger.oauth2_default_client_id.clone())
            .with_persist_authorization(self.swagger.persist_authorization)
            .with_doc_expansion(self.doc_expansion()?))
    }

    /// Logging setup built from the `logging` section.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let base = match self.logging.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty | LogFormat::Compact => LogConfig::development(),
        };
        LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            format: self.logging.format.into(),
            ..base
        }
    }
}
