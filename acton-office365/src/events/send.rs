//! Events fired around a send

use crate::message::OutgoingMessage;

/// Hook a [`SendEvent`] is dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendEventName {
    /// Before the request is built; cancelling aborts the send
    BeforeSendPerformed,
    /// After the service accepted the message
    SendPerformed,
}

impl SendEventName {
    /// Hook name as it appears in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BeforeSendPerformed => "beforeSendPerformed",
            Self::SendPerformed => "sendPerformed",
        }
    }
}

/// Delivery result recorded on a [`SendEvent`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SendResult {
    /// Not yet submitted
    #[default]
    Pending,
    /// Accepted by the service
    Success,
}

/// Event observed by listeners before and after a send
#[derive(Debug)]
pub struct SendEvent<'m> {
    message: &'m OutgoingMessage,
    result: SendResult,
    failed_recipients: Vec<String>,
    bubble_cancelled: bool,
}

impl<'m> SendEvent<'m> {
    /// Create a pending event for `message`
    #[must_use]
    pub const fn new(message: &'m OutgoingMessage) -> Self {
        Self {
            message,
            result: SendResult::Pending,
            failed_recipients: Vec::new(),
            bubble_cancelled: false,
        }
    }

    /// The message being sent
    #[must_use]
    pub const fn message(&self) -> &'m OutgoingMessage {
        self.message
    }

    /// Current result
    #[must_use]
    pub const fn result(&self) -> SendResult {
        self.result
    }

    /// Record the result
    pub const fn set_result(&mut self, result: SendResult) {
        self.result = result;
    }

    /// Recipients the service reported as undeliverable
    #[must_use]
    pub fn failed_recipients(&self) -> &[String] {
        &self.failed_recipients
    }

    /// Record undeliverable recipients
    pub fn set_failed_recipients(&mut self, recipients: Vec<String>) {
        self.failed_recipients = recipients;
    }

    /// Stop propagation; on `beforeSendPerformed` this also cancels the send
    pub const fn cancel_bubble(&mut self) {
        self.bubble_cancelled = true;
    }

    /// Whether a listener cancelled propagation
    #[must_use]
    pub const fn bubble_cancelled(&self) -> bool {
        self.bubble_cancelled
    }
}
