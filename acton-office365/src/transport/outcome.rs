//! Result of a completed send

use super::Office365TransportException;

/// What a send resolved to when it did not fail
#[derive(Debug)]
#[must_use]
pub enum SendOutcome {
    /// Accepted by the service
    Sent {
        /// To + CC + BCC entries placed on the request
        recipients: usize,
    },

    /// A `beforeSendPerformed` listener cancelled the send; nothing was submitted
    Cancelled,

    /// The service rejected the message, but an `exceptionThrown` listener
    /// suppressed the error
    Suppressed(Office365TransportException),
}

impl SendOutcome {
    /// Recipient count reported to the caller
    ///
    /// `Some(0)` when cancelled, `None` when suppressed.
    #[must_use]
    pub const fn recipient_count(&self) -> Option<usize> {
        match self {
            Self::Sent { recipients } => Some(*recipients),
            Self::Cancelled => Some(0),
            Self::Suppressed(_) => None,
        }
    }

    /// Whether the service accepted the message
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    /// The suppressed exception, if any
    #[must_use]
    pub const fn suppressed(&self) -> Option<&Office365TransportException> {
        match self {
            Self::Suppressed(exception) => Some(exception),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;
    use crate::graph::GraphResponse;

    #[test]
    fn test_recipient_counts() {
        assert_eq!(SendOutcome::Sent { recipients: 3 }.recipient_count(), Some(3));
        assert_eq!(SendOutcome::Cancelled.recipient_count(), Some(0));

        let suppressed = SendOutcome::Suppressed(Office365TransportException::new(
            GraphResponse::new(StatusCode::BAD_GATEWAY, ""),
        ));
        assert_eq!(suppressed.recipient_count(), None);
        assert!(!suppressed.is_sent());
        assert!(suppressed.suppressed().is_some());
    }
}
