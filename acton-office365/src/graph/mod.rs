//! Microsoft Graph wire types and HTTP client
//!
//! - [`types`]: the `sendMail` request body
//! - [`GraphResponse`]: buffered responses with Graph error-body helpers
//! - [`GraphClient`]: the network seam, with [`ReqwestGraphClient`] for production

mod client;
mod error;
mod response;
pub mod types;

#[cfg(test)]
pub use client::MockGraphClient;
pub use client::{GraphClient, ReqwestGraphClient, SEND_MAIL_PATH};
pub use error::GraphClientError;
pub use response::GraphResponse;
pub use types::{
    BodyType, EmailAddress, FileAttachment, GraphMessage, ItemBody, Recipient, SendMailRequest,
    FILE_ATTACHMENT_ODATA_TYPE,
};
