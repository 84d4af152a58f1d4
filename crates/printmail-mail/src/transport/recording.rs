// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory transport that records what it is asked to send.

use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use printmail_core::error::{PrintmailError, Result};

use super::{DeliveryReceipt, MailTransport, validate_address};
use crate::message::OutgoingMessage;

/// Captures every message handed to it; optionally fails every send.
///
/// Addresses are validated the same way the lettre transport does, so
/// receipts and outcome strings match a real delivery.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutgoingMessage>>,
    attempts: Mutex<usize>,
    failure: Option<String>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every send fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<OutgoingMessage> {
        lock(&self.sent).clone()
    }

    pub fn sent_count(&self) -> usize {
        lock(&self.sent).len()
    }

    /// Number of `send` calls, successful or not.
    pub fn attempts(&self) -> usize {
        *lock(&self.attempts)
    }

    pub fn was_sent_to(&self, address: &str) -> bool {
        lock(&self.sent).iter().any(|m| m.to == address)
    }
}

impl MailTransport for RecordingTransport {
    fn send(&self, message: &OutgoingMessage) -> Result<DeliveryReceipt> {
        *lock(&self.attempts) += 1;

        if let Some(failure) = &self.failure {
            return Err(PrintmailError::Transport(failure.clone()));
        }

        let from = validate_address(&message.from)?;
        let to = validate_address(&message.to)?;

        let mut sent = lock(&self.sent);
        sent.push(message.clone());
        debug!(%to, recorded = sent.len(), "message recorded");

        Ok(DeliveryReceipt::new(from, to, Some(format!("recorded-{}", sent.len()))))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Lock, recovering the data if a panicking test poisoned the mutex.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
