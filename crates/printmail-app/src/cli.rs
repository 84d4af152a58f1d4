// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use printmail_driver::email::DRIVER_NAME;

#[derive(Debug, Parser)]
#[command(name = "printmail", version, about = "Print documents by sending them to a mailbox")]
pub struct Cli {
    /// Settings file (JSON key/value constants).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Printer preference database.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dispatch one document.
    Send {
        /// File name inside the module's output directory.
        #[arg(long)]
        file: String,
        #[arg(long)]
        module: String,
        /// User the document is printed for.
        #[arg(long)]
        user: i64,
        /// Subdirectory of the module's output directory.
        #[arg(long, default_value = "")]
        subdir: String,
        #[arg(long, default_value = DRIVER_NAME)]
        driver: String,
        /// Write `.eml` files here instead of sending over SMTP.
        #[arg(long)]
        spool: Option<PathBuf>,
    },
    /// Show the printers of one driver, or of every active driver.
    Printers {
        #[arg(long)]
        driver: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show the remote job listing of a driver.
    Jobs {
        #[arg(long)]
        module: String,
        #[arg(long, default_value = DRIVER_NAME)]
        driver: String,
    },
    /// Describe every registered driver and its settings fields.
    Drivers {
        #[arg(long)]
        json: bool,
    },
    /// Read or change settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Manage per-user printer preferences.
    Preference {
        #[command(subcommand)]
        command: PreferenceCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Set KEY to VALUE.
    Set { key: String, value: String },
    /// Print the value of KEY.
    Get { key: String },
    /// Print every setting.
    Show,
}

#[derive(Debug, Subcommand)]
pub enum PreferenceCommand {
    /// Route a user's documents of one module to an address.
    Set {
        #[arg(long)]
        module: String,
        #[arg(long)]
        user: i64,
        #[arg(long)]
        address: String,
        #[arg(long, default_value_t = 1)]
        copies: u32,
        #[arg(long, default_value = "")]
        printer_name: String,
        #[arg(long, default_value = DRIVER_NAME)]
        driver: String,
    },
    /// List a user's preferences.
    List {
        #[arg(long)]
        user: i64,
    },
    /// Delete a preference by id.
    Remove { id: i64 },
}
