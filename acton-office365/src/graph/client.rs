//! HTTP client for the Graph `sendMail` endpoint
//!
//! [`GraphClient`] is the seam between the transport and the network. The
//! production implementation, [`ReqwestGraphClient`], binds a bearer token at
//! construction and performs exactly one request per call: no retries, no
//! token refresh.

use std::fmt;

use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use tracing::debug;

use super::{GraphClientError, GraphResponse, SendMailRequest};
use crate::config::Office365Config;

/// Path of the send mail action, relative to the Graph base URL
pub const SEND_MAIL_PATH: &str = "/me/sendMail";

/// Client capable of submitting a `sendMail` request
///
/// Implementations must return 4xx responses as
/// [`GraphClientError::Status`] and every other response as `Ok`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Submit one `POST /me/sendMail`
    ///
    /// # Errors
    ///
    /// Returns `GraphClientError` on a 4xx response or when the request fails
    async fn send_mail(&self, request: &SendMailRequest) -> Result<GraphResponse, GraphClientError>;
}

/// [`GraphClient`] backed by `reqwest`
#[derive(Clone)]
pub struct ReqwestGraphClient {
    inner: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl fmt::Debug for ReqwestGraphClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestGraphClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl ReqwestGraphClient {
    /// Create a client bound to `access_token`
    ///
    /// # Errors
    ///
    /// Returns `GraphClientError::Build` if the underlying HTTP client cannot
    /// be constructed
    pub fn new(access_token: &str, config: &Office365Config) -> Result<Self, GraphClientError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let inner = builder
            .build()
            .map_err(|e| GraphClientError::Build(format!("failed to create HTTP client: {e}")))?;

        Ok(Self::from_reqwest(inner, access_token, config))
    }

    /// Wrap an existing `reqwest::Client` (shared pools, custom TLS, proxies)
    #[must_use]
    pub fn from_reqwest(inner: reqwest::Client, access_token: &str, config: &Office365Config) -> Self {
        Self {
            inner,
            base_url: config.graph_base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Full URL for a Graph path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl GraphClient for ReqwestGraphClient {
    async fn send_mail(&self, request: &SendMailRequest) -> Result<GraphResponse, GraphClientError> {
        let url = self.url(SEND_MAIL_PATH);
        let body = serde_json::to_vec(request)?;
        debug!(%url, bytes = body.len(), "POST sendMail");

        let response = self
            .inner
            .post(&url)
            .bearer_auth(&self.access_token)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        let response = GraphResponse::new(status, body).with_headers(headers);

        debug!(
            status = status.as_u16(),
            request_id = response.request_id().unwrap_or_default(),
            "sendMail responded"
        );

        if status.is_client_error() {
            return Err(GraphClientError::status(response));
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let config = Office365Config::default().with_base_url("http://localhost:9000/v1.0/");
        let client = ReqwestGraphClient::new("token", &config).unwrap();

        assert_eq!(client.url(SEND_MAIL_PATH), "http://localhost:9000/v1.0/me/sendMail");
        assert_eq!(client.url("me/sendMail"), "http://localhost:9000/v1.0/me/sendMail");
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = ReqwestGraphClient::new("super-secret", &Office365Config::default()).unwrap();
        let debug = format!("{client:?}");

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
