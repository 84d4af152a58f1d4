// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Printmail.

use thiserror::Error;

/// Top-level error type for all Printmail operations.
#[derive(Debug, Error)]
pub enum PrintmailError {
    // -- Dispatch errors --
    /// Neither a per-user preference nor a global default address exists.
    /// The display text is the literal outcome-log marker.
    #[error("NoDefaultPrinterDefined")]
    NoDefaultPrinterDefined,

    /// The mail transport refused or failed to deliver. The text is passed
    /// through from the transport untouched.
    #[error("mail transport failed: {0}")]
    Transport(String),

    #[error("configuration incomplete: {0}")]
    ConfigurationIncomplete(String),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// A file name or subdirectory tried to leave the module's output
    /// directory.
    #[error("invalid document path: {0}")]
    InvalidPath(String),

    #[error("unknown printing driver: {0}")]
    UnknownDriver(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PrintmailError {
    /// Text appended to a driver's outcome log for this error.
    ///
    /// Transport failures contribute their raw detail so the transport's own
    /// wording reaches the operator unchanged.
    pub fn outcome_text(&self) -> String {
        match self {
            Self::Transport(detail) => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PrintmailError>;
