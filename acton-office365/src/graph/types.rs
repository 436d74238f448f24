//! Microsoft Graph `sendMail` request types
//!
//! Mirrors the subset of the Graph `message` resource that the transport
//! populates. Empty recipient and attachment lists are omitted from the wire
//! payload.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// `@odata.type` discriminator for file attachments
pub const FILE_ATTACHMENT_ODATA_TYPE: &str = "#microsoft.graph.fileAttachment";

/// Body of `POST /me/sendMail`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMailRequest {
    /// The message to send
    pub message: GraphMessage,

    /// Whether Graph should keep a copy in Sent Items (service default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_to_sent_items: Option<bool>,
}

/// Graph `message` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMessage {
    /// Subject line
    pub subject: String,

    /// Message body
    pub body: ItemBody,

    /// Explicit sender (send-as); the signed-in user when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Recipient>,

    /// To recipients
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_recipients: Vec<Recipient>,

    /// CC recipients
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc_recipients: Vec<Recipient>,

    /// BCC recipients
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcc_recipients: Vec<Recipient>,

    /// File attachments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<FileAttachment>,
}

/// Graph `recipient` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// Address of the recipient
    pub email_address: EmailAddress,
}

impl Recipient {
    /// Wrap an address and optional display name
    #[must_use]
    pub fn new(address: &str, name: Option<&str>) -> Self {
        Self {
            email_address: EmailAddress {
                address: address.to_string(),
                name: name.map(ToString::to_string),
            },
        }
    }
}

/// Graph `emailAddress` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// SMTP address
    pub address: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Graph `itemBody` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    /// Body content, verbatim
    pub content: String,

    /// Content type of `content`
    pub content_type: BodyType,
}

/// Graph `bodyType` enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    /// Plain text
    Text,
    /// HTML
    Html,
}

impl BodyType {
    /// `Html` when `content_type` is `text/html` (ASCII case-insensitive), `Text` otherwise
    ///
    /// Parameters are not stripped: `text/html; charset=utf-8` is `Text`.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.eq_ignore_ascii_case(mime::TEXT_HTML.as_ref()) {
            Self::Html
        } else {
            Self::Text
        }
    }
}

/// Graph `fileAttachment` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    /// Always [`FILE_ATTACHMENT_ODATA_TYPE`]
    #[serde(rename = "@odata.type")]
    pub odata_type: String,

    /// File name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// MIME type of the content
    pub content_type: String,

    /// Base64-encoded content
    pub content_bytes: String,
}

impl FileAttachment {
    /// Build an attachment from raw bytes
    #[must_use]
    pub fn new(name: Option<String>, content_type: &str, content: &[u8]) -> Self {
        Self {
            odata_type: FILE_ATTACHMENT_ODATA_TYPE.to_string(),
            name,
            content_type: content_type.to_string(),
            content_bytes: STANDARD.encode(content),
        }
    }

    /// Decode `content_bytes` back into raw bytes
    ///
    /// # Errors
    ///
    /// Returns an error when `content_bytes` is not valid base64
    pub fn decoded_content(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.content_bytes)
    }
}
