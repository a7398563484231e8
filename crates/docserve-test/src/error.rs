//! Test error types.

use std::fmt;

/// Errors that can occur during testing.
#[derive(Debug)]
pub enum TestError {
    /// Request building failed
    RequestBuild(String),
    /// Response body reading failed
    BodyRead(String),
    /// JSON deserialization failed
    Json(serde_json::Error),
    /// The service under test returned an error
    Service(String),
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestBuild(msg) => write!(f, "Request build error: {msg}"),
            Self::BodyRead(msg) => write!(f, "Body read error: {msg}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Service(msg) => write!(f, "Service error: {msg}"),
        }
    }
}

impl std::error::Error for TestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TestError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display() {
        assert_eq!(
            TestError::RequestBuild("bad uri".into()).to_string(),
            "Request build error: bad uri"
        );
        assert_eq!(
            TestError::Service("boom".into()).to_string(),
            "Service error: boom"
        );
    }

    #[test]
    fn test_json_source() {
        let err: TestError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(err.source().is_some());
        assert!(TestError::BodyRead("x".into()).source().is_none());
    }
}
