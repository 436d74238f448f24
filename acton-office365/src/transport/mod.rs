//! Transport trait abstraction
//!
//! This module defines the core `Transport` trait that mail backends
//! implement, and the Office 365 implementation backed by Microsoft Graph.

mod error;
mod office365;
mod outcome;

use std::sync::Arc;

use async_trait::async_trait;

pub use error::{InvalidToken, Office365TransportException, TransportError, INVALID_TOKEN_FALLBACK_CODE};
pub use office365::Office365Transport;
pub use outcome::SendOutcome;

use crate::events::EventListener;
use crate::message::OutgoingMessage;

/// A message-sending backend
///
/// # Examples
///
/// ```rust,no_run
/// use acton_office365::events::SimpleEventDispatcher;
/// use acton_office365::message::OutgoingMessage;
/// use acton_office365::transport::{Office365Transport, Transport};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = Office365Transport::new("eyJ0eXAi...", SimpleEventDispatcher::shared())?;
///
/// let message = OutgoingMessage::new()
///     .to("user@example.com")
///     .from("noreply@myapp.com")
///     .subject("Hello!")
///     .text("Hello, World!");
///
/// let outcome = transport.send(&message).await?;
/// println!("delivered to {:?} recipients", outcome.recipient_count());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Whether [`start`](Self::start) was called more recently than [`stop`](Self::stop)
    fn is_started(&self) -> bool;

    /// Mark the transport active
    fn start(&self);

    /// Mark the transport inactive
    fn stop(&self);

    /// Check the transport is usable
    fn ping(&self) -> bool;

    /// Send a message
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the message cannot be sent
    async fn send(&self, message: &OutgoingMessage) -> Result<SendOutcome, TransportError>;

    /// Attach a plugin to the transport's event dispatcher
    fn register_plugin(&self, listener: Arc<dyn EventListener>);
}
