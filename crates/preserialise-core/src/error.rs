//! Error types for the Preserialise core library
//!
//! This module defines the error handling for pre-serialisation, using
//! thiserror for ergonomic error definitions and anyhow for the open-ended
//! payloads that capability implementations may need to carry.

use thiserror::Error;

/// Main error type for pre-serialisation operations
#[derive(Error, Debug)]
pub enum Error {
    /// The traversal needed to enter more nesting levels than allowed
    #[error("Preserialiser exceeded the maximum recursion depth of {max_depth}")]
    MaxDepthExceeded {
        max_depth: usize,
    },

    /// A `Preserialisable` implementation failed to produce its value.
    /// The engine never raises or catches this variant; it belongs to the
    /// object that failed and propagates unchanged to the caller.
    #[error("Capability failure: {message}")]
    Capability {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON conversion errors from the serde bridge
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The configured maximum carried by a depth-exceeded failure, if that
    /// is what this error is.
    pub fn max_depth(&self) -> Option<usize> {
        match self {
            Error::MaxDepthExceeded { max_depth } => Some(*max_depth),
            _ => None,
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Capability {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_depth_display() {
        let err = Error::MaxDepthExceeded { max_depth: 20 };
        assert_eq!(
            err.to_string(),
            "Preserialiser exceeded the maximum recursion depth of 20"
        );
    }

    #[test]
    fn test_max_depth_accessor() {
        let err = Error::MaxDepthExceeded { max_depth: 7 };
        assert_eq!(err.max_depth(), Some(7));

        let err = Error::Capability {
            message: "broken".to_string(),
            source: None,
        };
        assert_eq!(err.max_depth(), None);
    }

    #[test]
    fn test_capability_from_anyhow() {
        let err: Error = anyhow::anyhow!("lookup failed").into();
        assert!(matches!(err, Error::Capability { .. }));
        assert!(err.to_string().contains("lookup failed"));
    }
}
