//! Buffered Graph API responses

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};

/// A fully buffered HTTP response from the Graph API
#[derive(Debug, Clone)]
pub struct GraphResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

/// Graph error envelope: `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

impl GraphResponse {
    /// Create a response with no headers
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Attach response headers
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// HTTP status
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8, lossily
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    fn error_detail(&self) -> Option<ErrorDetail> {
        self.json::<ErrorEnvelope>().ok().and_then(|e| e.error)
    }

    /// `error.code` from a Graph error body, if the body has one
    #[must_use]
    pub fn error_code(&self) -> Option<String> {
        self.error_detail().and_then(|e| e.code)
    }

    /// `error.message` from a Graph error body, if the body has one
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error_detail().and_then(|e| e.message)
    }

    /// Value of the `request-id` header Graph attaches to every response
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("request-id")
            .and_then(|v| v.to_str().ok())
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    #[test]
    fn test_error_code_extracted() {
        let response = GraphResponse::new(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"code":"TokenExpired","message":"Lifetime validation failed"}}"#,
        );

        assert_eq!(response.error_code().as_deref(), Some("TokenExpired"));
        assert_eq!(
            response.error_message().as_deref(),
            Some("Lifetime validation failed")
        );
    }

    #[test]
    fn test_error_code_missing() {
        let no_code = GraphResponse::new(StatusCode::UNAUTHORIZED, r#"{"error":{}}"#);
        let no_error = GraphResponse::new(StatusCode::UNAUTHORIZED, "{}");
        let not_json = GraphResponse::new(StatusCode::UNAUTHORIZED, "<html>nope</html>");
        let empty = GraphResponse::new(StatusCode::UNAUTHORIZED, Bytes::new());

        assert!(no_code.error_code().is_none());
        assert!(no_error.error_code().is_none());
        assert!(not_json.error_code().is_none());
        assert!(empty.error_code().is_none());
    }

    #[test]
    fn test_request_id_header() {
        let mut headers = HeaderMap::new();
        headers.insert("request-id", HeaderValue::from_static("abc-123"));
        let response = GraphResponse::new(StatusCode::ACCEPTED, "").with_headers(headers);

        assert_eq!(response.request_id(), Some("abc-123"));
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_text_is_lossy() {
        let response = GraphResponse::new(StatusCode::INTERNAL_SERVER_ERROR, vec![b'o', b'k', 0xff]);
        assert!(response.text().starts_with("ok"));
    }
}
