//! acton-office365: Office 365 mail transport backed by Microsoft Graph
//!
//! Sends [`OutgoingMessage`](message::OutgoingMessage)s through the Graph
//! `POST /me/sendMail` action using a caller-supplied OAuth2 access token.
//! Plugins observe and steer each send through an
//! [`EventDispatcher`](events::EventDispatcher).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_office365::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     observability::init()?;
//!
//!     let config = Office365Config::load()?;
//!     let token = std::env::var("OFFICE365_ACCESS_TOKEN")?;
//!     let transport = Office365Transport::with_config(&token, SimpleEventDispatcher::shared(), &config)?;
//!
//!     let message = OutgoingMessage::new()
//!         .from("me@contoso.com")
//!         .to("user@example.com")
//!         .subject("Monthly report")
//!         .html("<p>Attached.</p>")
//!         .attach(MimePart::attachment("report.pdf", "application/pdf", std::fs::read("report.pdf")?));
//!
//!     match transport.send(&message).await {
//!         Ok(outcome) => tracing::info!(recipients = ?outcome.recipient_count(), "sent"),
//!         Err(TransportError::InvalidToken(err)) => tracing::error!(code = err.code(), "refresh the token"),
//!         Err(err) => return Err(err.into()),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`message`]: the outgoing message model
//! - [`graph`]: Graph wire types and the HTTP client seam
//! - [`events`]: plugin hooks and the dispatcher
//! - [`transport`]: the [`Transport`](transport::Transport) trait and the Office 365 implementation
//! - [`config`]: figment-based configuration
//! - [`observability`]: tracing subscriber setup
//! - [`testing`]: in-memory doubles for downstream tests

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod events;
pub mod graph;
pub mod message;
pub mod observability;
pub mod testing;
pub mod transport;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use acton_office365::prelude::*;
    //! ```

    pub use crate::config::Office365Config;
    pub use crate::events::{
        EventDispatcher, EventListener, SendEvent, SendResult, SimpleEventDispatcher,
        TransportExceptionEvent,
    };
    pub use crate::message::{Mailbox, MimePart, OutgoingMessage};
    pub use crate::observability;
    pub use crate::transport::{
        InvalidToken, Office365Transport, Office365TransportException, SendOutcome, Transport,
        TransportError,
    };
}
