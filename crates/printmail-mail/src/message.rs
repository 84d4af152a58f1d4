// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Message builder: turns (destination, file, module, subdirectory) into a
// transport-neutral message with exactly one PDF attachment.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use printmail_core::config::{Configuration, output_dir_key};
use printmail_core::error::{PrintmailError, Result};
use printmail_core::types::PDF_MIME_TYPE;

/// Fixed body text of every print message.
pub const PRINT_BODY: &str = "Please find attached the file to print.";

/// Subject line for a print message carrying `file`.
pub fn print_subject(file: &str) -> String {
    format!("Print request {file}")
}

/// A file attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailAttachment {
    /// Location on disk. Read by the transport at send time.
    pub path: PathBuf,
    pub mime_type: String,
    /// File name shown to the recipient.
    pub display_name: String,
}

/// A message ready for a `MailTransport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub subject: String,
    pub to: String,
    pub from: String,
    pub body: String,
    pub attachments: Vec<MailAttachment>,
}

/// Append the normal components of `segment` to `path`.
fn push_relative(path: &mut PathBuf, segment: &str) -> Result<()> {
    for component in Path::new(segment).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(PrintmailError::InvalidPath(segment.to_owned()));
            }
        }
    }
    Ok(())
}

/// Builds print messages from the output directories and sender in a
/// `Configuration`.
#[derive(Debug, Clone)]
pub struct MessageBuilder<'a> {
    config: &'a Configuration,
}

impl<'a> MessageBuilder<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// Full source path: `{output dir}[/{subdirectory}]/{file}`.
    ///
    /// Leading separators in `subdirectory` and `file` are ignored, so the
    /// result always lies under the output directory; `..` is refused. The
    /// file is not checked for existence here.
    pub fn source_path(&self, module: &str, subdirectory: &str, file: &str) -> Result<PathBuf> {
        let mut path = self
            .config
            .output_dir(module)
            .ok_or_else(|| {
                PrintmailError::ConfigurationIncomplete(format!(
                    "no output directory for module {module} ({})",
                    output_dir_key(module)
                ))
            })?
            .to_path_buf();

        push_relative(&mut path, subdirectory)?;
        push_relative(&mut path, file)?;
        Ok(path)
    }

    /// Assemble the message for `file` addressed to `destination`.
    pub fn build(
        &self,
        destination: &str,
        file: &str,
        module: &str,
        subdirectory: &str,
    ) -> Result<OutgoingMessage> {
        let path = self.source_path(module, subdirectory, file)?;
        debug!(path = %path.display(), destination, "building print message");

        Ok(OutgoingMessage {
            subject: print_subject(file),
            to: destination.to_owned(),
            from: self.config.mail_from.clone(),
            body: PRINT_BODY.to_owned(),
            attachments: vec![MailAttachment {
                path,
                mime_type: PDF_MIME_TYPE.to_owned(),
                display_name: file.to_owned(),
            }],
        })
    }
}
