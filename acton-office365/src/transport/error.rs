//! Transport error types

use thiserror::Error;

use crate::graph::{GraphClientError, GraphResponse};

/// Code used when a 401 body carries no `error.code`
pub const INVALID_TOKEN_FALLBACK_CODE: &str = "Invalid Token";

/// Errors that can occur when sending through a transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// Message has no sender
    #[error("message must have a from address")]
    NoSender,

    /// The service rejected the access token (HTTP 401)
    #[error(transparent)]
    InvalidToken(#[from] InvalidToken),

    /// Any other client-side failure, passed through unchanged
    #[error(transparent)]
    Client(#[from] GraphClientError),

    /// The service answered with a status other than 202
    #[error(transparent)]
    Transport(#[from] Office365TransportException),
}

/// The access token was rejected
///
/// Not retried. Callers refresh the token, rebuild the transport and send
/// again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid token: {code}")]
pub struct InvalidToken {
    code: String,
}

impl InvalidToken {
    /// Create from an explicit error code
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// Read `error.code` from a 401 body, falling back to
    /// [`INVALID_TOKEN_FALLBACK_CODE`]
    #[must_use]
    pub fn from_response(response: &GraphResponse) -> Self {
        Self::new(
            response
                .error_code()
                .unwrap_or_else(|| INVALID_TOKEN_FALLBACK_CODE.to_string()),
        )
    }

    /// Graph error code, e.g. `InvalidAuthenticationToken`
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// The service answered with an unexpected status
///
/// Carries the raw response for inspection.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct Office365TransportException {
    message: String,
    response: GraphResponse,
}

impl Office365TransportException {
    /// Build from the offending response
    #[must_use]
    pub fn new(response: GraphResponse) -> Self {
        Self {
            message: format!("Response error: {}", response.status().as_u16()),
            response,
        }
    }

    /// Human-readable summary
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The raw response
    #[must_use]
    pub const fn response(&self) -> &GraphResponse {
        &self.response
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;

    #[test]
    fn test_invalid_token_from_body() {
        let response = GraphResponse::new(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"code":"TokenExpired"}}"#,
        );
        let err = InvalidToken::from_response(&response);

        assert_eq!(err.code(), "TokenExpired");
        assert_eq!(err.to_string(), "invalid token: TokenExpired");
    }

    #[test]
    fn test_invalid_token_fallback() {
        let response = GraphResponse::new(StatusCode::UNAUTHORIZED, r#"{"error":{"message":"x"}}"#);
        assert_eq!(InvalidToken::from_response(&response).code(), "Invalid Token");
    }

    #[test]
    fn test_transport_exception_message() {
        let exception = Office365TransportException::new(GraphResponse::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "busy",
        ));

        assert_eq!(exception.message(), "Response error: 503");
        assert_eq!(exception.response().status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(exception.response().text(), "busy");
    }

    #[test]
    fn test_transport_error_is_transparent() {
        let err: TransportError = InvalidToken::new("Expired").into();
        assert_eq!(err.to_string(), "invalid token: Expired");

        let err = TransportError::NoSender;
        assert_eq!(err.to_string(), "message must have a from address");
    }
}
