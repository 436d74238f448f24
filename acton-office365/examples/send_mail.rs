//! Send one message through Office 365
//!
//! ```bash
//! export OFFICE365_ACCESS_TOKEN=eyJ0eXAi...
//! cargo run --example send_mail -- me@contoso.com user@example.com [attachment]
//! ```
//!
//! Settings come from `./office365.toml` and `OFFICE365_*` variables.

use std::path::Path;
use std::sync::Arc;

use acton_office365::prelude::*;
use anyhow::Context;

/// Logs every hook the transport fires
struct LoggingPlugin;

impl EventListener for LoggingPlugin {
    fn before_send_performed(&self, event: &mut SendEvent<'_>) {
        tracing::info!(
            subject = %event.message().subject,
            recipients = event.message().recipient_count(),
            "sending"
        );
    }

    fn send_performed(&self, event: &mut SendEvent<'_>) {
        tracing::info!(result = ?event.result(), "sent");
    }

    fn exception_thrown(&self, event: &mut TransportExceptionEvent) {
        tracing::error!(
            error = %event.exception(),
            body = %event.exception().response().text(),
            "Graph rejected the message"
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init()?;

    let mut args = std::env::args().skip(1);
    let from = args.next().context("usage: send_mail <from> <to> [attachment]")?;
    let to = args.next().context("usage: send_mail <from> <to> [attachment]")?;
    let attachment = args.next();

    let token = std::env::var("OFFICE365_ACCESS_TOKEN").context("OFFICE365_ACCESS_TOKEN is not set")?;
    let config = Office365Config::load()?;

    let transport = Office365Transport::with_config(&token, SimpleEventDispatcher::shared(), &config)?;
    transport.register_plugin(Arc::new(LoggingPlugin));
    transport.start();

    let mut message = OutgoingMessage::new()
        .from(&from)
        .to(&to)
        .subject("Hello from acton-office365")
        .html("<p>This message was sent through <b>Microsoft Graph</b>.</p>");

    if let Some(path) = attachment {
        let bytes = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
        let filename = Path::new(&path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("attachment");
        message = message.attach(MimePart::attachment(filename, "application/octet-stream", bytes));
    }

    match transport.send(&message).await {
        Ok(outcome) => println!("delivered to {:?} recipient(s)", outcome.recipient_count()),
        Err(TransportError::InvalidToken(err)) => {
            anyhow::bail!("access token rejected ({}); acquire a new one and retry", err.code())
        }
        Err(err) => return Err(err.into()),
    }

    transport.stop();
    Ok(())
}
