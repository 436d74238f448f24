//! Outgoing message model
//!
//! An [`OutgoingMessage`] is the framework-side view of a mail about to be
//! handed to a [`Transport`](crate::transport::Transport). Address fields are
//! ordered lists keyed by address, the body carries its own content type, and
//! child MIME parts carry the attachments.
//!
//! # Examples
//!
//! ```rust
//! use acton_office365::message::{MimePart, OutgoingMessage};
//!
//! let message = OutgoingMessage::new()
//!     .from_named("noreply@myapp.com", "My App")
//!     .to("user@example.com")
//!     .cc_named("manager@example.com", "Manager")
//!     .subject("Quarterly report")
//!     .html("<h1>Attached</h1>")
//!     .attach(MimePart::attachment("report.pdf", "application/pdf", b"%PDF-1.7".to_vec()));
//!
//! assert_eq!(message.recipient_count(), 2);
//! ```

mod part;

pub use part::{Headers, MimePart};

use serde::{Deserialize, Serialize};

/// A single address with an optional display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    /// Email address
    pub address: String,

    /// Display name
    pub name: Option<String>,
}

impl Mailbox {
    /// Create a mailbox without a display name
    #[must_use]
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            name: None,
        }
    }

    /// Create a mailbox with a display name
    #[must_use]
    pub fn with_name(address: &str, name: &str) -> Self {
        Self {
            address: address.to_string(),
            name: Some(name.to_string()),
        }
    }
}

/// Ordered list of mailboxes, unique by address
///
/// Inserting an address that is already present replaces its display name
/// and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressList(Vec<Mailbox>);

impl AddressList {
    /// Create an empty list
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a mailbox, replacing the display name of an existing entry
    pub fn insert(&mut self, mailbox: Mailbox) {
        match self.0.iter_mut().find(|m| m.address == mailbox.address) {
            Some(existing) => existing.name = mailbox.name,
            None => self.0.push(mailbox),
        }
    }

    /// First mailbox in insertion order
    #[must_use]
    pub fn first(&self) -> Option<&Mailbox> {
        self.0.first()
    }

    /// Whether the list holds `address`
    #[must_use]
    pub fn contains(&self, address: &str) -> bool {
        self.0.iter().any(|m| m.address == address)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Mailbox> {
        self.0.iter()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a AddressList {
    type Item = &'a Mailbox;
    type IntoIter = std::slice::Iter<'a, Mailbox>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Mailbox> for AddressList {
    fn from_iter<I: IntoIterator<Item = Mailbox>>(iter: I) -> Self {
        let mut list = Self::new();
        for mailbox in iter {
            list.insert(mailbox);
        }
        list
    }
}

/// A message ready to be handed to a transport
///
/// Use the builder methods to construct messages:
///
/// ```rust
/// use acton_office365::message::OutgoingMessage;
///
/// let message = OutgoingMessage::new()
///     .to("user@example.com")
///     .from("noreply@myapp.com")
///     .subject("Welcome!")
///     .text("Welcome to our app!");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Senders (From); only the first entry is used for delivery
    pub from: AddressList,

    /// Recipients (To)
    pub to: AddressList,

    /// CC recipients
    pub cc: AddressList,

    /// BCC recipients
    pub bcc: AddressList,

    /// Subject line
    pub subject: String,

    /// Body content
    pub body: String,

    /// Body content type, e.g. `text/plain` or `text/html`
    pub content_type: String,

    /// Child MIME parts
    pub children: Vec<MimePart>,
}

impl Default for OutgoingMessage {
    fn default() -> Self {
        Self {
            from: AddressList::new(),
            to: AddressList::new(),
            cc: AddressList::new(),
            bcc: AddressList::new(),
            subject: String::new(),
            body: String::new(),
            content_type: mime::TEXT_PLAIN.to_string(),
            children: Vec::new(),
        }
    }
}

impl OutgoingMessage {
    /// Create a new empty message with a `text/plain` body
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sender (From)
    #[must_use]
    pub fn from(mut self, address: &str) -> Self {
        self.from.insert(Mailbox::new(address));
        self
    }

    /// Add a sender (From) with a display name
    #[must_use]
    pub fn from_named(mut self, address: &str, name: &str) -> Self {
        self.from.insert(Mailbox::with_name(address, name));
        self
    }

    /// Add a recipient (To)
    #[must_use]
    pub fn to(mut self, address: &str) -> Self {
        self.to.insert(Mailbox::new(address));
        self
    }

    /// Add a recipient (To) with a display name
    #[must_use]
    pub fn to_named(mut self, address: &str, name: &str) -> Self {
        self.to.insert(Mailbox::with_name(address, name));
        self
    }

    /// Add multiple recipients (To)
    #[must_use]
    pub fn to_multiple(mut self, addresses: &[&str]) -> Self {
        for address in addresses {
            self.to.insert(Mailbox::new(address));
        }
        self
    }

    /// Add a CC recipient
    #[must_use]
    pub fn cc(mut self, address: &str) -> Self {
        self.cc.insert(Mailbox::new(address));
        self
    }

    /// Add a CC recipient with a display name
    #[must_use]
    pub fn cc_named(mut self, address: &str, name: &str) -> Self {
        self.cc.insert(Mailbox::with_name(address, name));
        self
    }

    /// Add a BCC recipient
    #[must_use]
    pub fn bcc(mut self, address: &str) -> Self {
        self.bcc.insert(Mailbox::new(address));
        self
    }

    /// Add a BCC recipient with a display name
    #[must_use]
    pub fn bcc_named(mut self, address: &str, name: &str) -> Self {
        self.bcc.insert(Mailbox::with_name(address, name));
        self
    }

    /// Set the subject
    #[must_use]
    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    /// Set the body and its content type
    #[must_use]
    pub fn body(mut self, body: &str, content_type: &str) -> Self {
        self.body = body.to_string();
        self.content_type = content_type.to_string();
        self
    }

    /// Set a plain text body
    #[must_use]
    pub fn text(self, body: &str) -> Self {
        self.body(body, mime::TEXT_PLAIN.as_ref())
    }

    /// Set an HTML body
    #[must_use]
    pub fn html(self, body: &str) -> Self {
        self.body(body, mime::TEXT_HTML.as_ref())
    }

    /// Append a child MIME part
    #[must_use]
    pub fn attach(mut self, part: MimePart) -> Self {
        self.children.push(part);
        self
    }

    /// Total number of To, CC and BCC entries
    #[must_use]
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }
}
