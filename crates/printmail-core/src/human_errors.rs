// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operator-facing error messages.
//
// Every technical error is mapped to plain English with a concrete next step
// for whoever administers the printing setup.

use crate::error::PrintmailError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Mail relay blip: sending again may work.
    Transient,
    /// A setting or preference must be filled in first.
    ActionRequired,
    /// Retrying will not help (bad address, unknown driver, broken storage).
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the operator should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `PrintmailError` into a `HumanError`.
pub fn humanize_error(err: &PrintmailError) -> HumanError {
    match err {
        PrintmailError::NoDefaultPrinterDefined => HumanError {
            message: "There is nowhere to send this document.".into(),
            suggestion: "Set a default printer address, or choose a printer for this user in the printing settings.".into(),
            severity: Severity::ActionRequired,
        },

        PrintmailError::Transport(detail) => HumanError {
            message: "The email could not be sent.".into(),
            suggestion: format!("Check the mail server settings and try again. ({detail})"),
            severity: Severity::Transient,
        },

        PrintmailError::ConfigurationIncomplete(detail) => HumanError {
            message: "Printing by email is not fully set up.".into(),
            suggestion: format!("Complete the missing setting: {detail}."),
            severity: Severity::ActionRequired,
        },

        PrintmailError::InvalidAddress(detail) => HumanError {
            message: "An email address is not valid.".into(),
            suggestion: format!("Correct the address in the settings. ({detail})"),
            severity: Severity::Permanent,
        },

        PrintmailError::InvalidPath(detail) => HumanError {
            message: "The document is not inside the module's output directory.".into(),
            suggestion: format!("Print a file from the output directory itself. ({detail})"),
            severity: Severity::Permanent,
        },

        PrintmailError::UnknownDriver(name) => HumanError {
            message: format!("There is no printing driver called \"{name}\"."),
            suggestion: "List the available drivers and pick one of those.".into(),
            severity: Severity::Permanent,
        },

        PrintmailError::Database(detail) => HumanError {
            message: "The printer preferences could not be read.".into(),
            suggestion: format!("Check that the preference database is reachable and not corrupted. ({detail})"),
            severity: Severity::Permanent,
        },

        PrintmailError::Io(e) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: format!("Check that the path exists and is accessible. ({e})"),
            severity: Severity::Permanent,
        },

        PrintmailError::Serialization(e) => HumanError {
            message: "The settings file is not valid.".into(),
            suggestion: format!("Fix or remove the settings file and try again. ({e})"),
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_default_is_action_required() {
        let human = humanize_error(&PrintmailError::NoDefaultPrinterDefined);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn transport_failure_is_transient_and_keeps_detail() {
        let err = PrintmailError::Transport("relay refused connection".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.suggestion.contains("relay refused connection"));
    }

    #[test]
    fn unknown_driver_names_the_driver() {
        let human = humanize_error(&PrintmailError::UnknownDriver("fax".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.message.contains("fax"));
    }

    #[test]
    fn escaping_path_is_permanent() {
        let human = humanize_error(&PrintmailError::InvalidPath("../secret.pdf".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.suggestion.contains("../secret.pdf"));
    }
}
