//! Office 365 transport for sending emails
//!
//! Translates an [`OutgoingMessage`] into a Microsoft Graph `sendMail`
//! request, submits it once and maps the response back:
//!
//! | Response | Result |
//! |----------|--------|
//! | 202 | `Ok(SendOutcome::Sent { recipients })` |
//! | 401 | `Err(TransportError::InvalidToken)` |
//! | other 4xx, network failure | `Err(TransportError::Client)`, unchanged |
//! | anything else | `Err(TransportError::Transport)`, or `Ok(SendOutcome::Suppressed)` when a listener cancels it |

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use tracing::{debug, info, warn};

use super::{InvalidToken, Office365TransportException, SendOutcome, Transport, TransportError};
use crate::config::Office365Config;
use crate::events::{EventDispatcher, EventListener, SendEventName, SendResult};
use crate::graph::{
    BodyType, FileAttachment, GraphClient, GraphClientError, GraphMessage, ItemBody, Recipient,
    ReqwestGraphClient, SendMailRequest,
};
use crate::message::{AddressList, OutgoingMessage};

/// Office 365 mail transport
///
/// Sends through `POST /me/sendMail` on behalf of the account the access
/// token belongs to. One request per [`send`](Transport::send); no retries,
/// no token refresh.
///
/// # Examples
///
/// ```rust,no_run
/// use acton_office365::config::Office365Config;
/// use acton_office365::events::SimpleEventDispatcher;
/// use acton_office365::message::OutgoingMessage;
/// use acton_office365::transport::{Office365Transport, Transport};
///
/// # async fn example(token: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let config = Office365Config::load()?;
/// let transport = Office365Transport::with_config(token, SimpleEventDispatcher::shared(), &config)?;
///
/// let message = OutgoingMessage::new()
///     .from("me@contoso.com")
///     .to("user@example.com")
///     .subject("Hello!")
///     .html("<p>Hello, World!</p>");
///
/// transport.send(&message).await?;
/// # Ok(())
/// # }
/// ```
pub struct Office365Transport<C = ReqwestGraphClient> {
    client: C,
    dispatcher: Arc<dyn EventDispatcher>,
    started: AtomicBool,
    save_to_sent_items: Option<bool>,
    send_as_sender: bool,
}

impl Office365Transport<ReqwestGraphClient> {
    /// Create a transport with the default configuration
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Client` if the HTTP client cannot be built
    pub fn new(
        access_token: &str,
        dispatcher: Arc<dyn EventDispatcher>,
    ) -> Result<Self, TransportError> {
        Self::with_config(access_token, dispatcher, &Office365Config::default())
    }

    /// Create a transport from explicit configuration
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Client` if the HTTP client cannot be built
    pub fn with_config(
        access_token: &str,
        dispatcher: Arc<dyn EventDispatcher>,
        config: &Office365Config,
    ) -> Result<Self, TransportError> {
        let client = ReqwestGraphClient::new(access_token, config)?;
        Ok(Self::with_client(client, dispatcher).configure(config))
    }
}

impl<C: GraphClient> Office365Transport<C> {
    /// Create a transport over any [`GraphClient`]
    #[must_use]
    pub const fn with_client(client: C, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self {
            client,
            dispatcher,
            started: AtomicBool::new(false),
            save_to_sent_items: None,
            send_as_sender: false,
        }
    }

    /// Apply the request options of `config`
    ///
    /// Only `save_to_sent_items` and `send_as_sender` are read; connection
    /// settings belong to the client.
    #[must_use]
    pub const fn configure(mut self, config: &Office365Config) -> Self {
        self.save_to_sent_items = config.save_to_sent_items;
        self.send_as_sender = config.send_as_sender;
        self
    }

    /// The underlying Graph client
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Build the `sendMail` body and count its recipients
    ///
    /// Recipient lists are filled To, BCC, then CC. Only children with a
    /// `Content-Disposition` header become attachments.
    fn build_request(&self, message: &OutgoingMessage) -> Result<(SendMailRequest, usize), TransportError> {
        let sender = message.from.first().ok_or(TransportError::NoSender)?;

        let mut recipients = 0;
        let to_recipients = translate_recipients(&message.to, &mut recipients);
        let bcc_recipients = translate_recipients(&message.bcc, &mut recipients);
        let cc_recipients = translate_recipients(&message.cc, &mut recipients);

        let body = ItemBody {
            content: message.body.clone(),
            content_type: BodyType::from_content_type(&message.content_type),
        };

        let attachments = message
            .children
            .iter()
            .filter_map(|part| {
                let disposition = part.headers.content_disposition()?;
                Some(FileAttachment::new(
                    disposition.params.get("filename").cloned(),
                    &part.content_type,
                    &part.body,
                ))
            })
            .collect();

        let from = self
            .send_as_sender
            .then(|| Recipient::new(&sender.address, sender.name.as_deref()));

        let request = SendMailRequest {
            message: GraphMessage {
                subject: message.subject.clone(),
                body,
                from,
                to_recipients,
                cc_recipients,
                bcc_recipients,
                attachments,
            },
            save_to_sent_items: self.save_to_sent_items,
        };

        Ok((request, recipients))
    }

    /// Route an exception through `exceptionThrown`, then raise it unless a
    /// listener cancelled it
    fn throw_exception(
        &self,
        exception: Office365TransportException,
    ) -> Result<SendOutcome, TransportError> {
        let mut event = self.dispatcher.create_transport_exception_event(exception);
        self.dispatcher.dispatch_exception_event(&mut event);

        if event.bubble_cancelled() {
            debug!(
                status = event.exception().response().status().as_u16(),
                "transport exception suppressed by listener"
            );
            return Ok(SendOutcome::Suppressed(event.into_exception()));
        }

        Err(event.into_exception().into())
    }
}

fn translate_recipients(list: &AddressList, count: &mut usize) -> Vec<Recipient> {
    list.iter()
        .map(|mailbox| {
            *count += 1;
            Recipient::new(&mailbox.address, mailbox.name.as_deref())
        })
        .collect()
}

#[async_trait]
impl<C: GraphClient> Transport for Office365Transport<C> {
    fn is_started(&self) -> bool {
        self.started.load(Ordering::Relaxed)
    }

    fn start(&self) {
        self.started.store(true, Ordering::Relaxed);
    }

    fn stop(&self) {
        self.started.store(false, Ordering::Relaxed);
    }

    // No connection is held between sends, so there is nothing to probe.
    fn ping(&self) -> bool {
        true
    }

    async fn send(&self, message: &OutgoingMessage) -> Result<SendOutcome, TransportError> {
        let mut event = self.dispatcher.create_send_event(message);
        self.dispatcher
            .dispatch_send_event(&mut event, SendEventName::BeforeSendPerformed);
        if event.bubble_cancelled() {
            debug!(subject = %message.subject, "send cancelled by listener");
            return Ok(SendOutcome::Cancelled);
        }

        let (request, recipients) = self.build_request(message)?;
        debug!(
            recipients,
            attachments = request.message.attachments.len(),
            body_type = ?request.message.body.content_type,
            "submitting sendMail request"
        );

        let response = match self.client.send_mail(&request).await {
            Ok(response) => response,
            Err(GraphClientError::Status { response })
                if response.status() == StatusCode::UNAUTHORIZED =>
            {
                let err = InvalidToken::from_response(&response);
                warn!(code = err.code(), "access token rejected");
                return Err(err.into());
            }
            Err(e) => return Err(e.into()),
        };

        if response.status() == StatusCode::ACCEPTED {
            event.set_result(SendResult::Success);
            event.set_failed_recipients(Vec::new());
            self.dispatcher
                .dispatch_send_event(&mut event, SendEventName::SendPerformed);

            info!(recipients, subject = %message.subject, "message accepted");
            return Ok(SendOutcome::Sent { recipients });
        }

        warn!(
            status = response.status().as_u16(),
            request_id = response.request_id().unwrap_or_default(),
            "unexpected sendMail response"
        );
        self.throw_exception(Office365TransportException::new(response))
    }

    fn register_plugin(&self, listener: Arc<dyn EventListener>) {
        self.dispatcher.bind_event_listener(listener);
    }
}
