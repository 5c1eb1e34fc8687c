use thiserror::Error;

/// Errors surfaced by the API client and the service wrappers.
///
/// Network failures keep their original `reqwest` error untouched; HTTP
/// failures carry the status plus whatever message the backend put in the
/// JSON body. Unexpected payload shapes are a `Decode` error, never a guess.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },

    #[error("failed to decode {context}: {source}")]
    Decode {
        context: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error("token store: {0}")]
    Store(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server rejected the credentials (401), after the one
    /// refresh attempt the client is allowed.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub(crate) fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        ApiError::Decode {
            context: context.into(),
            source,
        }
    }
}
