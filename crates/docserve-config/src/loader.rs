//! Configuration loader with layered approach.
//!
//! Later layers override earlier ones:
//! 1. Default values
//! 2. Configuration file (TOML or JSON)
//! 3. Environment variables

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{ConfigError, DocserveConfig, LogFormat};

/// Prefix for environment overrides used by the server binary.
pub const DEFAULT_ENV_PREFIX: &str = "DOCSERVE";

/// Configuration loader with layered approach.
///
/// # Example
///
/// ```no_run
/// use docserve_config::ConfigLoader;
///
/// # fn main() -> Result<(), docserve_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_optional_file("docserve.toml")?
///     .with_env_prefix("DOCSERVE")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: DocserveConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader starting from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DocserveConfig::default(),
            env_prefix: None,
        }
    }

    /// Start from the development preset.
    ///
    /// ```
    /// use docserve_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = DocserveConfig::development();
        self
    }

    /// Load configuration from a file, by extension (`.toml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, has an
    /// unknown extension, or does not parse.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        self.config = parse(&content, format)?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format.
    ///
    /// ```
    /// use docserve_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [server]
    ///     mount_prefix = "/api/docs/"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.mount_prefix, "/api/docs/");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unknown.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, format)?;
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Variables use the format `PREFIX__SECTION__KEY`, for example
    /// `DOCSERVE__SERVER__MOUNT_PREFIX=/docs/`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Apply environment overrides, validate, and return the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override does not parse or validation
    /// fails.
    pub fn load(mut self) -> Result<DocserveConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars: Vec<(String, String)> = env::vars()
                .filter(|(k, _)| k.starts_with(&prefix))
                .collect();
            for (key, value) in vars {
                apply_env_var(&mut self.config, &key, &value, &prefix)?;
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Return the configuration without overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> DocserveConfig {
        self.config
    }
}

fn parse(content: &str, format: &str) -> Result<DocserveConfig, ConfigError> {
    match format.to_lowercase().as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

fn apply_env_var(
    config: &mut DocserveConfig,
    key: &str,
    value: &str,
    prefix: &str,
) -> Result<(), ConfigError> {
    let Some(rest) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
        // Shares the prefix but is not an override, e.g. DOCSERVE_DISABLED.
        return Ok(());
    };
    let parts: Vec<&str> = rest.split("__").collect();

    match parts.as_slice() {
        ["SERVER", "HTTP_ADDR"] => config.server.http_addr = value.to_string(),
        ["SERVER", "MOUNT_PREFIX"] => config.server.mount_prefix = value.to_string(),
        ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
            config.server.shutdown_timeout_secs = value
                .parse()
                .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
        }

        ["ASSETS", "ROOT"] => config.assets.root = PathBuf::from(value),
        ["ASSETS", "CACHE_CONTROL"] => config.assets.cache_control = non_empty(value),

        ["DOCS", "DOCUMENT_PATH"] => config.docs.document_path = non_empty(value).map(PathBuf::from),
        ["DOCS", "INSTANCE_NAME"] => config.docs.instance_name = value.to_string(),
        ["DOCS", "DISABLE_ENV"] => config.docs.disable_env = non_empty(value),

        ["SWAGGER", "URL"] => config.swagger.url = value.to_string(),
        ["SWAGGER", "TITLE"] => config.swagger.title = value.to_string(),
        ["SWAGGER", "DEEP_LINKING"] => config.swagger.deep_linking = bool_var(key, value)?,
        ["SWAGGER", "DEFAULT_MODELS_EXPAND_DEPTH"] => {
            config.swagger.default_models_expand_depth = value
                .parse()
                .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
        }
        ["SWAGGER", "OAUTH2_DEFAULT_CLIENT_ID"] => {
            config.swagger.oauth2_default_client_id = value.to_string();
        }
        ["SWAGGER", "PERSIST_AUTHORIZATION"] => {
            config.swagger.persist_authorization = bool_var(key, value)?;
        }
        ["SWAGGER", "DOC_EXPANSION"] => config.swagger.doc_expansion = value.to_lowercase(),

        ["LOGGING", "ENABLED"] => config.logging.enabled = bool_var(key, value)?,
        ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
        ["LOGGING", "FORMAT"] => {
            config.logging.format = match value.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                "compact" => LogFormat::Compact,
                _ => {
                    return Err(ConfigError::env_parse_error(
                        key,
                        "expected 'json', 'pretty' or 'compact'",
                    ))
                }
            };
        }

        _ => return Err(ConfigError::env_parse_error(key, "unknown configuration key")),
    }

    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn bool_var(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_loader_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, DocserveConfig::default());
    }

    #[test]
    fn test_loader_with_string_toml() {
        let toml = r#"
            [server]
            http_addr = "0.0.0.0:9000"

            [swagger]
            title = "Billing API"
            doc_expansion = "none"

            [logging]
            format = "compact"
        "#;

        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.server.http_addr, "0.0.0.0:9000");
        assert_eq!(config.server.mount_prefix, "/swagger/");
        assert_eq!(config.swagger.title, "Billing API");
        assert_eq!(config.swagger.doc_expansion, "none");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"docs": {"instance_name": "billing", "disable_env": "DISABLE_DOCS"}}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.docs.instance_name, "billing");
        assert_eq!(config.docs.disable_env.as_deref(), Some("DISABLE_DOCS"));
    }

    #[test]
    fn test_loader_unsupported_format() {
        let result = ConfigLoader::new().with_string("a: 1", "yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[assets]\nroot = \"/srv/swagger-ui\"\ncache_control = \"max-age=60\"").unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        assert_eq!(config.assets.root, PathBuf::from("/srv/swagger-ui"));
        assert_eq!(config.assets.cache_control.as_deref(), Some("max-age=60"));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/docserve.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/docserve.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.server.http_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_loader_invalid_file_value() {
        let result = ConfigLoader::new()
            .with_string("[server]\nmount_prefix = \"docs\"", "toml")
            .unwrap()
            .load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = DocserveConfig::default();
        let prefix = "DOCSERVE";
        apply_env_var(&mut config, "DOCSERVE__SERVER__MOUNT_PREFIX", "/api/docs/", prefix).unwrap();
        apply_env_var(&mut config, "DOCSERVE__SWAGGER__DEEP_LINKING", "off", prefix).unwrap();
        apply_env_var(&mut config, "DOCSERVE__SWAGGER__DEFAULT_MODELS_EXPAND_DEPTH", "-1", prefix)
            .unwrap();
        apply_env_var(&mut config, "DOCSERVE__DOCS__DOCUMENT_PATH", "/srv/openapi.json", prefix)
            .unwrap();
        apply_env_var(&mut config, "DOCSERVE__LOGGING__FORMAT", "Pretty", prefix).unwrap();

        assert_eq!(config.server.mount_prefix, "/api/docs/");
        assert!(!config.swagger.deep_linking);
        assert_eq!(config.swagger.default_models_expand_depth, -1);
        assert_eq!(config.docs.document_path, Some(PathBuf::from("/srv/openapi.json")));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_env_override_errors() {
        let mut config = DocserveConfig::default();
        let prefix = "DOCSERVE";
        assert!(apply_env_var(&mut config, "DOCSERVE__SWAGGER__DEEP_LINKING", "maybe", prefix).is_err());
        assert!(apply_env_var(&mut config, "DOCSERVE__SERVER__SHUTDOWN_TIMEOUT_SECS", "soon", prefix).is_err());
        assert!(apply_env_var(&mut config, "DOCSERVE__SERVER__PORT", "80", prefix).is_err());
        assert!(apply_env_var(&mut config, "DOCSERVE_DISABLED", "1", prefix).is_ok());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
