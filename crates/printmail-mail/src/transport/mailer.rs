// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lettre-backed transport: SMTP relay delivery, or an `.eml` spool directory
// for dry runs and local inspection.

use std::path::PathBuf;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{FileTransport, Message, SmtpTransport, Transport};
use tracing::{debug, info};

use printmail_core::config::{SmtpSettings, TlsMode};
use printmail_core::error::{PrintmailError, Result};

use super::{DeliveryReceipt, MailTransport, parse_mailbox};
use crate::message::OutgoingMessage;

/// Delivers messages through lettre.
pub enum LettreTransport {
    /// Send through an SMTP relay.
    Smtp(SmtpTransport),
    /// Write each message as `<id>.eml` into a directory.
    Spool { dir: PathBuf, transport: FileTransport },
}

impl LettreTransport {
    /// Build an SMTP transport from relay settings.
    pub fn smtp(settings: &SmtpSettings) -> Result<Self> {
        let builder = match settings.tls {
            TlsMode::Wrapper => SmtpTransport::relay(&settings.host)
                .map_err(|e| PrintmailError::Transport(format!("SMTP relay {}: {e}", settings.host)))?,
            TlsMode::StartTls => SmtpTransport::starttls_relay(&settings.host)
                .map_err(|e| PrintmailError::Transport(format!("SMTP relay {}: {e}", settings.host)))?,
            TlsMode::None => SmtpTransport::builder_dangerous(&settings.host),
        };

        let builder = builder.port(settings.port);
        let builder = if settings.has_credentials() {
            builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
        } else {
            builder
        };

        info!(host = %settings.host, port = settings.port, tls = ?settings.tls, "SMTP transport configured");
        Ok(Self::Smtp(builder.build()))
    }

    /// Build a spool transport writing into `dir`, creating it if needed.
    pub fn spool(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        info!(path = %dir.display(), "spool transport configured");
        Ok(Self::Spool {
            transport: FileTransport::new(&dir),
            dir,
        })
    }

    /// Convert an `OutgoingMessage` into a lettre `Message`.
    ///
    /// Attachment bytes are read here, so a missing source file fails the
    /// delivery rather than the message construction.
    fn compose(message: &OutgoingMessage) -> Result<Message> {
        let from = parse_mailbox(&message.from)?;
        let to = parse_mailbox(&message.to)?;

        let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(message.body.clone()));
        for attachment in &message.attachments {
            let bytes = std::fs::read(&attachment.path).map_err(|e| {
                PrintmailError::Transport(format!(
                    "cannot read attachment {}: {e}",
                    attachment.path.display()
                ))
            })?;
            let content_type = ContentType::parse(&attachment.mime_type).map_err(|e| {
                PrintmailError::Transport(format!("bad MIME type {}: {e}", attachment.mime_type))
            })?;
            debug!(
                path = %attachment.path.display(),
                bytes = bytes.len(),
                "attaching file"
            );
            parts = parts.singlepart(
                Attachment::new(attachment.display_name.clone()).body(bytes, content_type),
            );
        }

        Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .multipart(parts)
            .map_err(|e| PrintmailError::Transport(format!("cannot build message: {e}")))
    }
}

impl MailTransport for LettreTransport {
    fn send(&self, message: &OutgoingMessage) -> Result<DeliveryReceipt> {
        let email = Self::compose(message)?;
        let from = parse_mailbox(&message.from)?.email.to_string();
        let to = parse_mailbox(&message.to)?.email.to_string();

        let message_id = match self {
            Self::Smtp(transport) => {
                let response = transport
                    .send(&email)
                    .map_err(|e| PrintmailError::Transport(e.to_string()))?;
                response.message().next().map(str::to_owned)
            }
            Self::Spool { dir, transport } => {
                let id = transport
                    .send(&email)
                    .map_err(|e| PrintmailError::Transport(e.to_string()))?;
                debug!(path = %dir.join(format!("{id}.eml")).display(), "message spooled");
                Some(id)
            }
        };

        info!(transport = self.name(), %from, %to, "message accepted for delivery");
        Ok(DeliveryReceipt::new(from, to, message_id))
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Smtp(_) => "smtp",
            Self::Spool { .. } => "spool",
        }
    }
}
