// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The host side of the driver contract: loads settings, opens the preference
// store, picks a transport, and instantiates drivers from the registry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use printmail_core::config::{Settings, SmtpSettings};
use printmail_core::error::Result;
use printmail_driver::{DriverContext, DriverRegistry, PrintingDriver, SqlitePreferenceStore};
use printmail_mail::{LettreTransport, MailTransport};

use super::data_dir;

/// Everything a command needs to talk to drivers.
pub struct Host {
    settings_path: PathBuf,
    settings: Settings,
    store: Arc<SqlitePreferenceStore>,
    registry: DriverRegistry,
}

impl Host {
    /// Load settings (empty if the file is missing) and open the store.
    pub fn open(settings_path: Option<&Path>, database_path: Option<&Path>) -> Result<Self> {
        let settings_path = data_dir::settings_path(settings_path)?;
        let database_path = data_dir::database_path(database_path)?;
        info!(
            settings = %settings_path.display(),
            database = %database_path.display(),
            "opening printmail host"
        );

        let settings = if settings_path.exists() {
            Settings::load(&settings_path)?
        } else {
            Settings::new()
        };
        let store = SqlitePreferenceStore::open(&database_path)?;

        Ok(Self {
            settings_path,
            settings,
            store: Arc::new(store),
            registry: DriverRegistry::with_builtin(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Change one setting and persist the file.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<()> {
        self.settings.set(key, value);
        self.settings.save(&self.settings_path)?;
        info!(key, "setting saved");
        Ok(())
    }

    pub fn store(&self) -> &SqlitePreferenceStore {
        &self.store
    }

    pub fn registry(&self) -> &DriverRegistry {
        &self.registry
    }

    /// SMTP from settings, or an `.eml` spool when `spool` is given.
    pub fn transport(&self, spool: Option<&Path>) -> Result<Arc<dyn MailTransport>> {
        let transport = match spool {
            Some(dir) => LettreTransport::spool(dir)?,
            None => LettreTransport::smtp(&SmtpSettings::from_settings(&self.settings))?,
        };
        Ok(Arc::new(transport))
    }

    fn context(&self, transport: Arc<dyn MailTransport>) -> DriverContext {
        DriverContext {
            settings: self.settings.clone(),
            store: self.store.clone(),
            transport,
        }
    }

    /// Instantiate driver `name` with the given transport. Refused unless the
    /// driver's activation flag is on.
    pub fn driver(
        &self,
        name: &str,
        transport: Arc<dyn MailTransport>,
    ) -> Result<Box<dyn PrintingDriver>> {
        self.registry.create_enabled(name, &self.context(transport))
    }

    /// Every driver whose activation flag is on.
    pub fn active_drivers(
        &self,
        transport: Arc<dyn MailTransport>,
    ) -> Result<Vec<Box<dyn PrintingDriver>>> {
        self.registry.create_active(&self.context(transport))
    }
}
