//! Test doubles for code that sends through an Office 365 transport
//!
//! [`RecordingGraphClient`] stands in for Microsoft Graph and captures every
//! `sendMail` body; [`RecordingListener`] captures the hooks a transport
//! fires.
//!
//! # Examples
//!
//! ```rust
//! use acton_office365::events::SimpleEventDispatcher;
//! use acton_office365::message::OutgoingMessage;
//! use acton_office365::testing::RecordingGraphClient;
//! use acton_office365::transport::{Office365Transport, Transport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RecordingGraphClient::new();
//! let transport = Office365Transport::with_client(client.clone(), SimpleEventDispatcher::shared());
//!
//! let message = OutgoingMessage::new()
//!     .from("noreply@myapp.com")
//!     .to("user@example.com")
//!     .subject("Test")
//!     .text("Hello");
//!
//! let outcome = transport.send(&message).await?;
//!
//! assert!(outcome.is_sent());
//! assert_eq!(client.request_count(), 1);
//! assert!(client.was_sent_to("user@example.com"));
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use parking_lot::Mutex;

use crate::events::{EventListener, SendEvent, SendResult, TransportExceptionEvent};
use crate::graph::{GraphClient, GraphClientError, GraphResponse, SendMailRequest};

/// In-memory [`GraphClient`]
///
/// Records each request and answers with the next scripted response, or
/// `202 Accepted` once the script is exhausted. Scripted 4xx responses are
/// returned as [`GraphClientError::Status`], like the real client does.
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingGraphClient {
    requests: Arc<Mutex<Vec<SendMailRequest>>>,
    responses: Arc<Mutex<VecDeque<GraphResponse>>>,
}

impl RecordingGraphClient {
    /// Create a client that accepts everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unanswered request
    #[must_use]
    pub fn respond_with(self, status: StatusCode, body: &str) -> Self {
        self.push_response(GraphResponse::new(status, body.to_string()));
        self
    }

    /// Queue a prepared response
    pub fn push_response(&self, response: GraphResponse) {
        self.responses.lock().push_back(response);
    }

    /// Number of requests received
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// All requests received, oldest first
    #[must_use]
    pub fn requests(&self) -> Vec<SendMailRequest> {
        self.requests.lock().clone()
    }

    /// Most recent request
    #[must_use]
    pub fn last_request(&self) -> Option<SendMailRequest> {
        self.requests.lock().last().cloned()
    }

    /// Whether any request listed `address` as a To, CC or BCC recipient
    #[must_use]
    pub fn was_sent_to(&self, address: &str) -> bool {
        self.requests.lock().iter().any(|request| {
            let message = &request.message;
            message
                .to_recipients
                .iter()
                .chain(&message.cc_recipients)
                .chain(&message.bcc_recipients)
                .any(|r| r.email_address.address == address)
        })
    }

    /// Forget recorded requests and pending responses
    pub fn clear(&self) {
        self.requests.lock().clear();
        self.responses.lock().clear();
    }
}

#[async_trait]
impl GraphClient for RecordingGraphClient {
    async fn send_mail(&self, request: &SendMailRequest) -> Result<GraphResponse, GraphClientError> {
        self.requests.lock().push(request.clone());

        let response = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| GraphResponse::new(StatusCode::ACCEPTED, ""));

        if response.status().is_client_error() {
            return Err(GraphClientError::status(response));
        }
        Ok(response)
    }
}

/// Hook fired on a [`RecordingListener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// `before_send_performed`
    BeforeSendPerformed,
    /// `send_performed`
    SendPerformed,
    /// `exception_thrown`
    ExceptionThrown,
}

#[derive(Debug, Default)]
struct Recorded {
    hooks: Vec<Hook>,
    last_result: Option<SendResult>,
    exception_messages: Vec<String>,
}

/// [`EventListener`] that records what it observes
///
/// Optionally cancels `before_send_performed` or `exception_thrown`.
#[derive(Debug, Default)]
pub struct RecordingListener {
    recorded: Mutex<Recorded>,
    cancel_before_send: bool,
    cancel_exceptions: bool,
}

impl RecordingListener {
    /// Create a passive listener
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a listener that cancels every send before it happens
    #[must_use]
    pub fn cancelling_before_send() -> Arc<Self> {
        Arc::new(Self {
            cancel_before_send: true,
            ..Self::default()
        })
    }

    /// Create a listener that suppresses every transport exception
    #[must_use]
    pub fn cancelling_exceptions() -> Arc<Self> {
        Arc::new(Self {
            cancel_exceptions: true,
            ..Self::default()
        })
    }

    /// Hooks fired so far, in order
    #[must_use]
    pub fn hooks(&self) -> Vec<Hook> {
        self.recorded.lock().hooks.clone()
    }

    /// Number of times `hook` fired
    #[must_use]
    pub fn count(&self, hook: Hook) -> usize {
        self.recorded.lock().hooks.iter().filter(|h| **h == hook).count()
    }

    /// Result seen by the latest send hook
    #[must_use]
    pub fn last_result(&self) -> Option<SendResult> {
        self.recorded.lock().last_result
    }

    /// Messages of the exceptions observed
    #[must_use]
    pub fn exception_messages(&self) -> Vec<String> {
        self.recorded.lock().exception_messages.clone()
    }
}

impl EventListener for RecordingListener {
    fn before_send_performed(&self, event: &mut SendEvent<'_>) {
        let mut recorded = self.recorded.lock();
        recorded.hooks.push(Hook::BeforeSendPerformed);
        recorded.last_result = Some(event.result());
        if self.cancel_before_send {
            event.cancel_bubble();
        }
    }

    fn send_performed(&self, event: &mut SendEvent<'_>) {
        let mut recorded = self.recorded.lock();
        recorded.hooks.push(Hook::SendPerformed);
        recorded.last_result = Some(event.result());
    }

    fn exception_thrown(&self, event: &mut TransportExceptionEvent) {
        let mut recorded = self.recorded.lock();
        recorded.hooks.push(Hook::ExceptionThrown);
        recorded
            .exception_messages
            .push(event.exception().message().to_string());
        if self.cancel_exceptions {
            event.cancel_bubble();
        }
    }
}
