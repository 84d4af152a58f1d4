// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Printmail dispatch driver.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// MIME type declared for every dispatched attachment.
///
/// The printable artifact is assumed to be a PDF; the extension is never
/// checked against it.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A user's stored destination for one module's documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterPreference {
    /// Row identifier assigned by the store.
    pub id: i64,
    pub module: String,
    /// Driver the preference belongs to (e.g. `printemail`).
    pub driver: String,
    pub user_id: i64,
    /// Mailbox the module's documents are sent to.
    pub destination_address: String,
    pub copies: u32,
}

/// Input to a single dispatch: which file, for which module, on whose behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    /// File name inside the module's output directory.
    pub file: String,
    pub module: String,
    /// Optional subdirectory of the output directory (empty for none).
    pub subdirectory: String,
    /// The user the job is printed for; selects per-user preferences.
    pub user_id: i64,
}

impl JobRequest {
    pub fn new(file: impl Into<String>, module: impl Into<String>, user_id: i64) -> Self {
        Self {
            file: file.into(),
            module: module.into(),
            subdirectory: String::new(),
            user_id,
        }
    }

    /// Place the source file under `subdirectory` of the module output dir.
    pub fn in_subdirectory(mut self, subdirectory: impl Into<String>) -> Self {
        self.subdirectory = subdirectory.into();
        self
    }
}

/// Lifecycle of one dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchOutcome {
    /// Created, destination not yet resolved or message not yet sent.
    Pending,
    /// The transport accepted the message.
    Sent,
    /// Resolution, message construction, or delivery failed.
    Failed,
}

/// An in-memory record of one dispatch. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchJob {
    pub source_file: PathBuf,
    pub module: String,
    pub subdirectory: String,
    /// Empty until resolution succeeds.
    pub resolved_destination: String,
    pub outcome: DispatchOutcome,
}

impl DispatchJob {
    pub fn new(request: &JobRequest) -> Self {
        Self {
            source_file: PathBuf::from(&request.file),
            module: request.module.clone(),
            subdirectory: request.subdirectory.clone(),
            resolved_destination: String::new(),
            outcome: DispatchOutcome::Pending,
        }
    }

    /// Error count reported to the host: 0 for a sent job, 1 otherwise.
    pub fn error_count(&self) -> u32 {
        match self.outcome {
            DispatchOutcome::Sent => 0,
            DispatchOutcome::Pending | DispatchOutcome::Failed => 1,
        }
    }
}

/// How a settings UI should render a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Submit,
}

/// One configurable setting a driver exposes to the host settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigField {
    /// Settings key, empty for non-input fields such as the submit button.
    pub name: String,
    pub required: bool,
    pub example: String,
    pub field_type: FieldType,
    /// Extra attributes passed through to the renderer.
    pub rendering_hints: String,
}

impl ConfigField {
    pub fn text(name: impl Into<String>, required: bool, example: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required,
            example: example.into(),
            field_type: FieldType::Text,
            rendering_hints: String::new(),
        }
    }

    pub fn submit() -> Self {
        Self {
            name: String::new(),
            required: false,
            example: String::new(),
            field_type: FieldType::Submit,
            rendering_hints: String::new(),
        }
    }

    pub fn with_hints(mut self, hints: impl Into<String>) -> Self {
        self.rendering_hints = hints.into();
        self
    }
}

/// Static identity of a printing driver variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverDescriptor {
    /// Registry key, e.g. `printemail`.
    pub name: String,
    /// Human label shown to operators.
    pub description: String,
    pub icon: String,
    /// Settings key that must be `1` for the driver to be active.
    pub activation_flag: String,
    pub config_fields: Vec<ConfigField>,
}
