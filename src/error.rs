use thiserror::Error;

/// Errors that can occur when constructing or executing a completion provider.
#[derive(Error, Debug)]
pub enum Error {
    /// The provider could not be constructed from its configuration.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The backend call failed. The original failure is kept as the source.
    #[error("{provider} backend execution failed: {source}")]
    BackendExecution {
        provider: String,
        #[source]
        source: BackendError,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures raised by a backend client while issuing a completion call.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub fn backend(provider: impl Into<String>, source: BackendError) -> Self {
        Error::BackendExecution {
            provider: provider.into(),
            source,
        }
    }

    /// Whether this error was raised while constructing a provider.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// The backend failure behind this error, if any.
    pub fn backend_source(&self) -> Option<&BackendError> {
        match self {
            Error::BackendExecution { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl BackendError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        BackendError::InvalidRequest(message.into())
    }

    /// HTTP status returned by the backend, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            BackendError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
