// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The printing-driver contract every delivery mechanism implements, and the
// shared outcome log drivers report into.

use std::sync::Mutex;

use printmail_core::types::{DriverDescriptor, JobRequest};

use crate::table::{PrinterListing, Table};

/// A pluggable document-delivery mechanism (email, IPP, ...).
///
/// Drivers are shared between concurrent callers: `submit_job` keeps no
/// job-scoped state on `self` apart from appending to the outcome log.
pub trait PrintingDriver: Send + Sync {
    /// Static identity and settings fields of this driver.
    fn descriptor(&self) -> &DriverDescriptor;

    /// Dispatch one document. Returns the error count: 0 on success.
    ///
    /// Failures are never raised; they are counted and described in the
    /// outcome log.
    fn submit_job(&self, request: &JobRequest) -> u32;

    /// The printers this driver can reach, with the default marked.
    fn list_available_printers(&self) -> PrinterListing;

    /// Plain identifiers of the reachable printers.
    fn printer_identifiers(&self) -> Vec<String>;

    /// Jobs known to the remote side for `module`.
    fn list_jobs(&self, module: &str) -> Table;

    /// Snapshot of the outcome log.
    fn outcomes(&self) -> Vec<String>;
}

/// Append-only, thread-safe list of human-readable dispatch results.
///
/// Never cleared; a fresh driver starts a fresh log.
#[derive(Debug, Default)]
pub struct OutcomeLog {
    entries: Mutex<Vec<String>>,
}

impl OutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. Each call lands as a whole entry even when several
    /// threads append at once.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry.into());
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
