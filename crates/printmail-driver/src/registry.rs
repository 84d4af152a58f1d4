// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Driver registry: driver name -> factory. The host picks drivers by name
// (or takes every active one) and then talks to them only through
// `PrintingDriver`.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use printmail_core::config::Settings;
use printmail_core::error::{PrintmailError, Result};
use printmail_core::types::DriverDescriptor;
use printmail_mail::MailTransport;

use crate::driver::PrintingDriver;
use crate::email::{self, EmailDriver};
use crate::store::PreferenceStore;

/// Collaborators a factory may use to build a driver.
#[derive(Clone)]
pub struct DriverContext {
    pub settings: Settings,
    pub store: Arc<dyn PreferenceStore>,
    pub transport: Arc<dyn MailTransport>,
}

/// Builds a driver instance from the host context.
pub type DriverFactory = fn(&DriverContext) -> Result<Box<dyn PrintingDriver>>;

fn create_email(ctx: &DriverContext) -> Result<Box<dyn PrintingDriver>> {
    Ok(Box::new(EmailDriver::from_context(ctx)))
}

struct Registration {
    descriptor: fn() -> DriverDescriptor,
    factory: DriverFactory,
}

/// Name-keyed set of available driver variants.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: BTreeMap<String, Registration>,
}

impl DriverRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every driver this crate ships.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(email::DRIVER_NAME, email::email_descriptor, create_email);
        registry
    }

    /// Register (or replace) a driver variant under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        descriptor: fn() -> DriverDescriptor,
        factory: DriverFactory,
    ) {
        let name = name.into();
        debug!(driver = %name, "registering printing driver");
        self.drivers.insert(
            name,
            Registration {
                descriptor,
                factory,
            },
        );
    }

    /// Descriptors of every registered driver, sorted by name.
    pub fn descriptors(&self) -> Vec<DriverDescriptor> {
        self.drivers.values().map(|r| (r.descriptor)()).collect()
    }

    fn registration(&self, name: &str) -> Result<&Registration> {
        self.drivers
            .get(name)
            .ok_or_else(|| PrintmailError::UnknownDriver(name.to_owned()))
    }

    /// Instantiate the driver registered as `name`, active or not.
    pub fn create(&self, name: &str, ctx: &DriverContext) -> Result<Box<dyn PrintingDriver>> {
        let registration = self.registration(name)?;
        info!(driver = name, "creating printing driver");
        (registration.factory)(ctx)
    }

    /// Instantiate `name` only when its activation flag is on in
    /// `ctx.settings`.
    pub fn create_enabled(
        &self,
        name: &str,
        ctx: &DriverContext,
    ) -> Result<Box<dyn PrintingDriver>> {
        let flag = (self.registration(name)?.descriptor)().activation_flag;
        if !ctx.settings.is_enabled(&flag) {
            warn!(driver = name, %flag, "printing driver is not active");
            return Err(PrintmailError::ConfigurationIncomplete(format!(
                "driver {name} is not active ({flag}=1)"
            )));
        }
        self.create(name, ctx)
    }

    /// Instantiate every driver whose activation flag is on in `ctx.settings`.
    pub fn create_active(&self, ctx: &DriverContext) -> Result<Vec<Box<dyn PrintingDriver>>> {
        self.drivers
            .values()
            .filter(|r| ctx.settings.is_enabled(&(r.descriptor)().activation_flag))
            .map(|r| (r.factory)(ctx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqlitePreferenceStore;
    use crate::table::{PrinterListing, Table};
    use printmail_core::types::JobRequest;
    use printmail_mail::RecordingTransport;

    struct NullDriver {
        descriptor: DriverDescriptor,
    }

    fn null_descriptor() -> DriverDescriptor {
        DriverDescriptor {
            name: "null".into(),
            description: "Discards every job".into(),
            icon: "trash".into(),
            activation_flag: "PRINTING_NULL".into(),
            config_fields: Vec::new(),
        }
    }

    impl PrintingDriver for NullDriver {
        fn descriptor(&self) -> &DriverDescriptor {
            &self.descriptor
        }
        fn submit_job(&self, _: &JobRequest) -> u32 {
            0
        }
        fn list_available_printers(&self) -> PrinterListing {
            PrinterListing::default()
        }
        fn printer_identifiers(&self) -> Vec<String> {
            Vec::new()
        }
        fn list_jobs(&self, _: &str) -> Table {
            Table::new(&[])
        }
        fn outcomes(&self) -> Vec<String> {
            Vec::new()
        }
    }

    fn create_null(_: &DriverContext) -> Result<Box<dyn PrintingDriver>> {
        Ok(Box::new(NullDriver {
            descriptor: null_descriptor(),
        }))
    }

    fn context(settings: Settings) -> DriverContext {
        DriverContext {
            settings,
            store: Arc::new(SqlitePreferenceStore::open_in_memory().expect("open in-memory db")),
            transport: Arc::new(RecordingTransport::new()),
        }
    }

    fn registry() -> DriverRegistry {
        let mut registry = DriverRegistry::with_builtin();
        registry.register("null", null_descriptor, create_null);
        registry
    }

    #[test]
    fn builtin_registry_has_email_driver() {
        let registry = DriverRegistry::with_builtin();
        let names: Vec<_> = registry.descriptors().into_iter().map(|d| d.name).collect();
        assert_eq!(names, ["printemail"]);
        let driver = registry
            .create("printemail", &context(Settings::new()))
            .expect("create");
        assert_eq!(driver.descriptor().name, "printemail");
    }

    #[test]
    fn unknown_driver_is_an_error() {
        let err = DriverRegistry::with_builtin()
            .create("fax", &context(Settings::new()))
            .err()
            .expect("error");
        assert!(matches!(err, PrintmailError::UnknownDriver(name) if name == "fax"));
    }

    #[test]
    fn inactive_driver_is_refused_by_name() {
        let registry = registry();

        let err = registry
            .create_enabled("printemail", &context(Settings::new()))
            .err()
            .expect("error");
        match err {
            PrintmailError::ConfigurationIncomplete(detail) => {
                assert!(detail.contains("PRINTING_PRINTEMAIL"));
            }
            other => panic!("unexpected error variant: {other}"),
        }

        let settings = Settings::new().with("PRINTING_PRINTEMAIL", "1");
        let driver = registry
            .create_enabled("printemail", &context(settings))
            .expect("create");
        assert_eq!(driver.descriptor().name, "printemail");

        let err = registry
            .create_enabled("fax", &context(Settings::new()))
            .err()
            .expect("error");
        assert!(matches!(err, PrintmailError::UnknownDriver(_)));
    }

    #[test]
    fn descriptors_are_sorted_by_name() {
        let names: Vec<_> = registry().descriptors().into_iter().map(|d| d.name).collect();
        assert_eq!(names, ["null", "printemail"]);
    }

    #[test]
    fn only_active_drivers_are_created() {
        let registry = registry();

        let none = registry.create_active(&context(Settings::new())).expect("create");
        assert!(none.is_empty());

        let settings = Settings::new().with("PRINTING_PRINTEMAIL", "1");
        let active = registry.create_active(&context(settings)).expect("create");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].descriptor().name, "printemail");
    }

    #[test]
    fn drivers_are_used_polymorphically() {
        let settings = Settings::new()
            .with("PRINTING_PRINTEMAIL", "1")
            .with("PRINTING_NULL", "1")
            .with("PRINTEMAIL_EMAIL", "printer@shop.example");
        let drivers = registry().create_active(&context(settings)).expect("create");

        let identifiers: Vec<Vec<String>> =
            drivers.iter().map(|d| d.printer_identifiers()).collect();
        assert_eq!(identifiers, vec![Vec::<String>::new(), vec!["printer@shop.example".to_owned()]]);
        assert!(drivers.iter().all(|d| d.list_jobs("invoice").is_empty()));
    }
}
