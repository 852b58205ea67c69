use thiserror::Error;

/// Errors raised while talking to the remote platform API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The platform answered with a non-2xx status.
    #[error("remote API error ({status}): {body}")]
    Remote { status: u16, body: String },

    /// The platform could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not the JSON shape we asked for.
    #[error("could not decode API response: {0}")]
    Decode(String),

    /// The configured API base URL is unusable.
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status of a remote error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<crate::http::HttpError> for ApiError {
    fn from(err: crate::http::HttpError) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
