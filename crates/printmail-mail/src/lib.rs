// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printmail Mail — assembles print messages and hands them to a transport.
// The transport trait is the only seam the driver sees; lettre sits behind it.

pub mod message;
pub mod transport;

pub use message::{MailAttachment, MessageBuilder, OutgoingMessage};
pub use transport::{AddressRole, DeliveryReceipt, MailTransport};
pub use transport::mailer::LettreTransport;
pub use transport::recording::RecordingTransport;
