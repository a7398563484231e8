//! Server error types.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] docserve_config::ConfigError),

    /// Logging could not be initialized.
    #[error(transparent)]
    Telemetry(#[from] docserve_telemetry::TelemetryError),

    /// Failed to bind the listener.
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The configured asset directory does not exist.
    #[error("Asset directory not found: {}", .0.display())]
    MissingAssets(PathBuf),

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ServerError::MissingAssets(PathBuf::from("/srv/swagger-ui"));
        assert_eq!(err.to_string(), "Asset directory not found: /srv/swagger-ui");

        let err = ServerError::Bind {
            addr: "127.0.0.1:80".parse().unwrap(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to bind to 127.0.0.1:80: denied");
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: ServerError =
            docserve_config::ConfigError::invalid_value("server.http_addr", "bad").into();
        assert_eq!(err.to_string(), "invalid configuration value for server.http_addr: bad");
    }
}
