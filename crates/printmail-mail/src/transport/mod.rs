// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mail transport seam.
//
// A transport makes exactly one delivery attempt per call. Timeouts, if any,
// are the transport's own business; the driver never retries.

pub mod mailer;
pub mod recording;

use lettre::message::Mailbox;

use printmail_core::error::{PrintmailError, Result};

use crate::message::OutgoingMessage;

/// Which side of a delivered message an address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRole {
    From,
    To,
}

/// What a transport reports back after accepting a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    from: String,
    to: String,
    /// Transport-specific identifier (SMTP reply text, spool file id).
    pub message_id: Option<String>,
}

impl DeliveryReceipt {
    pub fn new(from: impl Into<String>, to: impl Into<String>, message_id: Option<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            message_id,
        }
    }

    /// The validated (bare) address used for `role`.
    pub fn validated_address(&self, role: AddressRole) -> &str {
        match role {
            AddressRole::From => &self.from,
            AddressRole::To => &self.to,
        }
    }
}

/// Something that can deliver an `OutgoingMessage`.
///
/// Implementations report every delivery problem as
/// `PrintmailError::Transport` (or `InvalidAddress` for unparsable
/// addresses); the driver copies that text into its outcome log verbatim.
pub trait MailTransport: Send + Sync {
    /// Make one delivery attempt.
    fn send(&self, message: &OutgoingMessage) -> Result<DeliveryReceipt>;

    /// Short transport name for logs.
    fn name(&self) -> &'static str;
}

/// Parse `raw` as a mailbox (`addr` or `Name <addr>`).
pub fn parse_mailbox(raw: &str) -> Result<Mailbox> {
    raw.trim()
        .parse::<Mailbox>()
        .map_err(|e| PrintmailError::InvalidAddress(format!("{raw:?}: {e}")))
}

/// Validate `raw` and return the bare address without any display name.
pub fn validate_address(raw: &str) -> Result<String> {
    Ok(parse_mailbox(raw)?.email.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_strips_display_name() {
        let addr = validate_address("Front Desk <printer@shop.example>").expect("valid");
        assert_eq!(addr, "printer@shop.example");
    }

    #[test]
    fn validate_accepts_bare_address() {
        assert_eq!(
            validate_address(" erp@shop.example ").expect("valid"),
            "erp@shop.example"
        );
    }

    #[test]
    fn validate_rejects_garbage() {
        let err = validate_address("not an address").unwrap_err();
        assert!(matches!(err, PrintmailError::InvalidAddress(_)));
    }

    #[test]
    fn receipt_reports_by_role() {
        let receipt = DeliveryReceipt::new("erp@shop.example", "printer@shop.example", None);
        assert_eq!(receipt.validated_address(AddressRole::From), "erp@shop.example");
        assert_eq!(receipt.validated_address(AddressRole::To), "printer@shop.example");
    }
}
