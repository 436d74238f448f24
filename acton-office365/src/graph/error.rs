//! Graph client error types

use http::StatusCode;
use thiserror::Error;

use super::GraphResponse;

/// Errors raised by a [`GraphClient`](super::GraphClient)
#[derive(Debug, Error)]
pub enum GraphClientError {
    /// The service answered with a 4xx status
    #[error("Graph API client error: HTTP {}", .response.status())]
    Status {
        /// The buffered error response
        response: GraphResponse,
    },

    /// The request could not be sent or the response could not be read
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The request body could not be encoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP client could not be built
    #[error("HTTP client configuration error: {0}")]
    Build(String),
}

impl GraphClientError {
    /// Create a client error from a 4xx response
    #[must_use]
    pub const fn status(response: GraphResponse) -> Self {
        Self::Status { response }
    }

    /// HTTP status, when the service answered
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Status { response } => Some(response.status()),
            Self::Request(e) => e.status(),
            Self::Serialization(_) | Self::Build(_) => None,
        }
    }

    /// The error response, when the service answered
    #[must_use]
    pub const fn response(&self) -> Option<&GraphResponse> {
        match self {
            Self::Status { response } => Some(response),
            _ => None,
        }
    }
}
