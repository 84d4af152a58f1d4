// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printmail Driver — the printing-driver contract a host dispatches through,
// per-user destination resolution backed by a SQLite preference store, and
// the email driver that ties resolution, message building and delivery
// together.

pub mod driver;
pub mod email;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod table;

pub use driver::{OutcomeLog, PrintingDriver};
pub use email::EmailDriver;
pub use registry::{DriverContext, DriverRegistry};
pub use resolver::{DestinationResolver, Resolution};
pub use store::{NewPreference, PreferenceStore, SqlitePreferenceStore};
pub use table::{PrinterListing, PrinterRow, Table};
