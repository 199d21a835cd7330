//! Client error types.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors returned by [`crate::ApiClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or undecodable response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("API error {status} ({code}): {message}")]
    Api {
        /// Response status.
        status: StatusCode,
        /// Machine-readable `code` from the error body.
        code: String,
        /// Human-readable `error` from the error body.
        message: String,
    },

    /// The session store could not be read or written.
    #[error("Session storage error: {0}")]
    Session(String),

    /// A body could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL is not an absolute http(s) URL.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Error body rendered by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

impl ClientError {
    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server answered 401.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Build an API error from a non-success response.
    ///
    /// Bodies that are not the server's `{ error, code }` shape keep their raw
    /// text as the message.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => Self::Api {
                status,
                code: body.code,
                message: body.error,
            },
            Err(_) => Self::Api {
                status,
                code: status
                    .canonical_reason()
                    .unwrap_or("UNKNOWN")
                    .to_uppercase()
                    .replace(' ', "_"),
                message: text,
            },
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Session(err.to_string())
    }
}
