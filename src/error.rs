//! Error types for advisor-core.

use thiserror::Error;

/// Result type alias using advisor-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing advice.
///
/// Reply parsing problems never surface here: the normalizer degrades
/// to a fallback response instead of failing.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration, raised before any I/O
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote backend answered with a non-success status
    #[error("{provider} API error{}: {message}", status_suffix(.status))]
    Backend {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    /// Request never completed at the transport level
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    /// Content store fetch failed
    #[error("Content store error: {0}")]
    Content(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a backend error for a non-success HTTP status.
    pub fn backend(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            provider: provider.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a transport error wrapping the underlying cause.
    pub fn transport(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            provider: provider.into(),
            source,
        }
    }

    /// Create a content store error.
    pub fn content(message: impl Into<String>) -> Self {
        Self::Content(message.into())
    }

    /// Whether this error came from talking to a remote backend.
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. } | Self::Transport { .. })
    }

    /// HTTP status carried by a backend error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => *status,
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display_includes_status() {
        let err = Error::backend("OpenRouter", 401, "No auth credentials found");
        assert_eq!(
            err.to_string(),
            "OpenRouter API error (401): No auth credentials found"
        );
        assert!(err.is_backend());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_config_error_is_not_backend() {
        let err = Error::config("OpenAI API key not configured");
        assert!(!err.is_backend());
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("API key"));
    }
}
