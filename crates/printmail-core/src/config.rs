// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Configuration: the persisted key/value constant table, and the explicit
// values the resolver, builder and driver are constructed with.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Global sender address for outgoing mail.
pub const MAIL_FROM_KEY: &str = "MAIN_MAIL_EMAIL_FROM";

/// Suffix of the per-module output directory keys (`INVOICE_DIR_OUTPUT`).
pub const OUTPUT_DIR_SUFFIX: &str = "_DIR_OUTPUT";

const SMTP_SERVER_KEY: &str = "MAIN_MAIL_SMTP_SERVER";
const SMTP_PORT_KEY: &str = "MAIN_MAIL_SMTP_PORT";
const SMTP_USER_KEY: &str = "MAIN_MAIL_SMTPS_ID";
const SMTP_PASSWORD_KEY: &str = "MAIN_MAIL_SMTPS_PW";
const SMTP_TLS_KEY: &str = "MAIN_MAIL_EMAIL_TLS";
const SMTP_STARTTLS_KEY: &str = "MAIN_MAIL_EMAIL_STARTTLS";

/// Flat table of named constants, persisted as pretty JSON.
///
/// Empty values are treated as unset everywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Value for `key`, or `None` when absent or empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Value for `key`, or the empty string.
    pub fn get_or_empty(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_owned()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Whether an activation flag such as `PRINTING_PRINTEMAIL` is on.
    pub fn is_enabled(&self, flag: &str) -> bool {
        self.get(flag) == Some("1")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Settings key for a driver-scoped constant, e.g. `PRINTEMAIL_EMAIL`.
pub fn driver_key(driver: &str, suffix: &str) -> String {
    format!("{}_{}", driver.to_ascii_uppercase(), suffix)
}

/// Settings key holding a module's output directory.
pub fn output_dir_key(module: &str) -> String {
    format!("{}{}", module.to_ascii_uppercase(), OUTPUT_DIR_SUFFIX)
}

/// Everything a printing driver reads from settings, resolved once at
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// The one configured printer mailbox (`{DRIVER}_EMAIL`).
    pub printer_email: String,
    /// Human label of that printer (`{DRIVER}_PRINTERNAME`).
    pub printer_name: String,
    /// Fallback destination when a user has no preference (`{DRIVER}_URI_DEFAULT`).
    pub default_address: String,
    /// Sender of every dispatched message.
    pub mail_from: String,
    /// Output directory per lower-cased module name.
    pub output_dirs: BTreeMap<String, PathBuf>,
}

impl Configuration {
    pub fn from_settings(settings: &Settings, driver: &str) -> Self {
        let output_dirs = settings
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .filter_map(|(key, value)| {
                key.strip_suffix(OUTPUT_DIR_SUFFIX)
                    .filter(|module| !module.is_empty())
                    .map(|module| (module.to_ascii_lowercase(), PathBuf::from(value)))
            })
            .collect();

        Self {
            printer_email: settings.get_or_empty(&driver_key(driver, "EMAIL")),
            printer_name: settings.get_or_empty(&driver_key(driver, "PRINTERNAME")),
            default_address: settings.get_or_empty(&driver_key(driver, "URI_DEFAULT")),
            mail_from: settings.get_or_empty(MAIL_FROM_KEY),
            output_dirs,
        }
    }

    /// Output directory configured for `module`, if any.
    pub fn output_dir(&self, module: &str) -> Option<&Path> {
        self.output_dirs
            .get(&module.to_ascii_lowercase())
            .map(PathBuf::as_path)
    }

    /// Global default destination, `None` when unset.
    pub fn global_default(&self) -> Option<&str> {
        Some(self.default_address.trim()).filter(|a| !a.is_empty())
    }
}

/// Connection security for SMTP delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TlsMode {
    /// Plain SMTP (local relays, Mailpit).
    None,
    /// Upgrade with STARTTLS after connecting.
    StartTls,
    /// Implicit TLS from the first byte (SMTPS).
    Wrapper,
}

impl TlsMode {
    /// Port used when `MAIN_MAIL_SMTP_PORT` is not set.
    pub fn default_port(self) -> u16 {
        match self {
            Self::None => 25,
            Self::StartTls => 587,
            Self::Wrapper => 465,
        }
    }
}

/// SMTP relay settings for the mail transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub tls: TlsMode,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: TlsMode::None.default_port(),
            username: String::new(),
            password: String::new(),
            tls: TlsMode::None,
        }
    }
}

impl SmtpSettings {
    pub fn from_settings(settings: &Settings) -> Self {
        let defaults = Self::default();
        let tls = if settings.is_enabled(SMTP_TLS_KEY) {
            TlsMode::Wrapper
        } else if settings.is_enabled(SMTP_STARTTLS_KEY) {
            TlsMode::StartTls
        } else {
            TlsMode::None
        };

        Self {
            host: settings
                .get(SMTP_SERVER_KEY)
                .map(str::to_owned)
                .unwrap_or(defaults.host),
            port: settings
                .get(SMTP_PORT_KEY)
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| tls.default_port()),
            username: settings.get_or_empty(SMTP_USER_KEY),
            password: settings.get_or_empty(SMTP_PASSWORD_KEY),
            tls,
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }
}
