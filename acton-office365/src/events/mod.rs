//! Event dispatching and transport plugins
//!
//! Transports report progress through an [`EventDispatcher`]. Plugins
//! implement [`EventListener`] and are attached with
//! [`Transport::register_plugin`](crate::transport::Transport::register_plugin).
//!
//! | Hook | Event | Cancelling it |
//! |------|-------|---------------|
//! | `before_send_performed` | [`SendEvent`] | aborts the send, no request is made |
//! | `send_performed` | [`SendEvent`] | stops later listeners only |
//! | `exception_thrown` | [`TransportExceptionEvent`] | suppresses the error |
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use acton_office365::events::{EventDispatcher, EventListener, SendEvent, SimpleEventDispatcher};
//!
//! struct NoTestDomains;
//!
//! impl EventListener for NoTestDomains {
//!     fn before_send_performed(&self, event: &mut SendEvent<'_>) {
//!         if event.message().to.iter().any(|m| m.address.ends_with("@example.test")) {
//!             event.cancel_bubble();
//!         }
//!     }
//! }
//!
//! let dispatcher = SimpleEventDispatcher::new();
//! dispatcher.bind_event_listener(Arc::new(NoTestDomains));
//! assert_eq!(dispatcher.listener_count(), 1);
//! ```

mod exception;
mod send;

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

pub use exception::TransportExceptionEvent;
pub use send::{SendEvent, SendEventName, SendResult};

use crate::message::OutgoingMessage;
use crate::transport::Office365TransportException;

/// A transport plugin
///
/// Every hook defaults to a no-op, so listeners implement only what they
/// observe.
pub trait EventListener: Send + Sync {
    /// Called before a message is translated and submitted
    fn before_send_performed(&self, _event: &mut SendEvent<'_>) {}

    /// Called after the service accepted a message
    fn send_performed(&self, _event: &mut SendEvent<'_>) {}

    /// Called before a transport exception is raised
    fn exception_thrown(&self, _event: &mut TransportExceptionEvent) {}
}

/// Creates events and routes them to bound listeners
pub trait EventDispatcher: Send + Sync {
    /// Create a pending send event for `message`
    fn create_send_event<'m>(&self, message: &'m OutgoingMessage) -> SendEvent<'m> {
        SendEvent::new(message)
    }

    /// Wrap `exception` in an event
    fn create_transport_exception_event(
        &self,
        exception: Office365TransportException,
    ) -> TransportExceptionEvent {
        TransportExceptionEvent::new(exception)
    }

    /// Dispatch a send event to the `name` hook of every listener
    fn dispatch_send_event(&self, event: &mut SendEvent<'_>, name: SendEventName);

    /// Dispatch a transport exception event to every listener
    fn dispatch_exception_event(&self, event: &mut TransportExceptionEvent);

    /// Attach a listener
    fn bind_event_listener(&self, listener: Arc<dyn EventListener>);
}

/// In-process dispatcher
///
/// Listeners run in registration order. Once a listener cancels an event,
/// the remaining listeners are skipped. Binding the same `Arc` twice is a
/// no-op.
#[derive(Default)]
pub struct SimpleEventDispatcher {
    listeners: RwLock<Vec<Arc<dyn EventListener>>>,
}

impl fmt::Debug for SimpleEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleEventDispatcher")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl SimpleEventDispatcher {
    /// Create a dispatcher with no listeners
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher ready to hand to a transport
    #[must_use]
    pub fn shared() -> Arc<dyn EventDispatcher> {
        Arc::new(Self::new())
    }

    /// Number of bound listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    // Listeners may bind further plugins while being dispatched to, so the
    // lock is released before any hook runs.
    fn snapshot(&self) -> Vec<Arc<dyn EventListener>> {
        self.listeners.read().clone()
    }
}

impl EventDispatcher for SimpleEventDispatcher {
    fn dispatch_send_event(&self, event: &mut SendEvent<'_>, name: SendEventName) {
        for listener in self.snapshot() {
            if event.bubble_cancelled() {
                trace!(hook = name.as_str(), "event cancelled, skipping remaining listeners");
                break;
            }
            match name {
                SendEventName::BeforeSendPerformed => listener.before_send_performed(event),
                SendEventName::SendPerformed => listener.send_performed(event),
            }
        }
    }

    fn dispatch_exception_event(&self, event: &mut TransportExceptionEvent) {
        for listener in self.snapshot() {
            if event.bubble_cancelled() {
                trace!(hook = "exceptionThrown", "event cancelled, skipping remaining listeners");
                break;
            }
            listener.exception_thrown(event);
        }
    }

    fn bind_event_listener(&self, listener: Arc<dyn EventListener>) {
        let mut listeners = self.listeners.write();
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return;
        }
        listeners.push(listener);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::StatusCode;

    use super::*;
    use crate::graph::GraphResponse;

    #[derive(Default)]
    struct Counter {
        before: AtomicUsize,
        after: AtomicUsize,
        exceptions: AtomicUsize,
        cancel: bool,
    }

    impl EventListener for Counter {
        fn before_send_performed(&self, event: &mut SendEvent<'_>) {
            self.before.fetch_add(1, Ordering::SeqCst);
            if self.cancel {
                event.cancel_bubble();
            }
        }

        fn send_performed(&self, _event: &mut SendEvent<'_>) {
            self.after.fetch_add(1, Ordering::SeqCst);
        }

        fn exception_thrown(&self, event: &mut TransportExceptionEvent) {
            self.exceptions.fetch_add(1, Ordering::SeqCst);
            if self.cancel {
                event.cancel_bubble();
            }
        }
    }

    fn exception() -> Office365TransportException {
        Office365TransportException::new(GraphResponse::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "",
        ))
    }

    #[test]
    fn test_dispatch_routes_by_name() {
        let dispatcher = SimpleEventDispatcher::new();
        let counter = Arc::new(Counter::default());
        dispatcher.bind_event_listener(counter.clone());

        let message = OutgoingMessage::new();
        let mut event = dispatcher.create_send_event(&message);
        dispatcher.dispatch_send_event(&mut event, SendEventName::BeforeSendPerformed);
        dispatcher.dispatch_send_event(&mut event, SendEventName::SendPerformed);
        dispatcher.dispatch_send_event(&mut event, SendEventName::SendPerformed);

        assert_eq!(counter.before.load(Ordering::SeqCst), 1);
        assert_eq!(counter.after.load(Ordering::SeqCst), 2);
        assert_eq!(counter.exceptions.load(Ordering::SeqCst), 0);
        assert!(!event.bubble_cancelled());
    }

    #[test]
    fn test_cancel_stops_bubbling() {
        let dispatcher = SimpleEventDispatcher::new();
        let canceller = Arc::new(Counter {
            cancel: true,
            ..Counter::default()
        });
        let later = Arc::new(Counter::default());
        dispatcher.bind_event_listener(canceller.clone());
        dispatcher.bind_event_listener(later.clone());

        let message = OutgoingMessage::new();
        let mut event = dispatcher.create_send_event(&message);
        dispatcher.dispatch_send_event(&mut event, SendEventName::BeforeSendPerformed);

        assert!(event.bubble_cancelled());
        assert_eq!(canceller.before.load(Ordering::SeqCst), 1);
        assert_eq!(later.before.load(Ordering::SeqCst), 0);

        let mut exception_event = dispatcher.create_transport_exception_event(exception());
        dispatcher.dispatch_exception_event(&mut exception_event);
        assert!(exception_event.bubble_cancelled());
        assert_eq!(later.exceptions.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_bind_same_listener_twice_is_noop() {
        let dispatcher = SimpleEventDispatcher::new();
        let counter = Arc::new(Counter::default());
        dispatcher.bind_event_listener(counter.clone());
        dispatcher.bind_event_listener(counter.clone());
        dispatcher.bind_event_listener(Arc::new(Counter::default()));

        assert_eq!(dispatcher.listener_count(), 2);
    }

    #[test]
    fn test_listener_can_bind_during_dispatch() {
        struct Binder(Arc<SimpleEventDispatcher>);

        impl EventListener for Binder {
            fn send_performed(&self, _event: &mut SendEvent<'_>) {
                self.0.bind_event_listener(Arc::new(Counter::default()));
            }
        }

        let dispatcher = Arc::new(SimpleEventDispatcher::new());
        dispatcher.bind_event_listener(Arc::new(Binder(dispatcher.clone())));

        let message = OutgoingMessage::new();
        let mut event = dispatcher.create_send_event(&message);
        dispatcher.dispatch_send_event(&mut event, SendEventName::SendPerformed);

        assert_eq!(dispatcher.listener_count(), 2);
    }

    #[test]
    fn test_send_event_records_result() {
        let message = OutgoingMessage::new().to("a@example.com");
        let mut event = SendEvent::new(&message);
        assert_eq!(event.result(), SendResult::Pending);

        event.set_result(SendResult::Success);
        event.set_failed_recipients(vec!["bad@example.com".into()]);

        assert_eq!(event.result(), SendResult::Success);
        assert_eq!(event.failed_recipients(), ["bad@example.com".to_string()]);
        assert!(event.message().to.contains("a@example.com"));
    }
}
