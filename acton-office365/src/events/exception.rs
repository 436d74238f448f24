//! Event fired when the service answers with an unexpected status

use crate::transport::Office365TransportException;

/// Carries a transport exception to listeners before it is raised
///
/// A listener that calls [`cancel_bubble`](Self::cancel_bubble) suppresses
/// the error; the send then resolves to
/// [`SendOutcome::Suppressed`](crate::transport::SendOutcome::Suppressed).
#[derive(Debug)]
pub struct TransportExceptionEvent {
    exception: Office365TransportException,
    bubble_cancelled: bool,
}

impl TransportExceptionEvent {
    /// Wrap an exception
    #[must_use]
    pub const fn new(exception: Office365TransportException) -> Self {
        Self {
            exception,
            bubble_cancelled: false,
        }
    }

    /// The exception about to be raised
    #[must_use]
    pub const fn exception(&self) -> &Office365TransportException {
        &self.exception
    }

    /// Stop propagation and suppress the error
    pub const fn cancel_bubble(&mut self) {
        self.bubble_cancelled = true;
    }

    /// Whether a listener cancelled propagation
    #[must_use]
    pub const fn bubble_cancelled(&self) -> bool {
        self.bubble_cancelled
    }

    /// Take the exception back out of the event
    #[must_use]
    pub fn into_exception(self) -> Office365TransportException {
        self.exception
    }
}
