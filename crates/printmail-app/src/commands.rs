// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand handlers. Each writes its report to `out` and returns the
// process exit code.

use std::io::Write;
use std::process::ExitCode;

use tracing::{info, warn};

use printmail_core::error::Result;
use printmail_core::types::JobRequest;
use printmail_driver::{NewPreference, PrinterListing};

use crate::cli::{Cli, Command, ConfigCommand, PreferenceCommand};
use crate::services::host::Host;

pub fn run(cli: Cli, out: &mut impl Write) -> Result<ExitCode> {
    let mut host = Host::open(cli.config.as_deref(), cli.db.as_deref())?;

    match cli.command {
        Command::Send {
            file,
            module,
            user,
            subdir,
            driver,
            spool,
        } => {
            let transport = host.transport(spool.as_deref())?;
            let driver = host.driver(&driver, transport)?;
            let request = JobRequest::new(file, module, user).in_subdirectory(subdir);

            let errors = driver.submit_job(&request);
            for outcome in driver.outcomes() {
                writeln!(out, "{outcome}")?;
            }

            if errors == 0 {
                info!(file = %request.file, "document dispatched");
                Ok(ExitCode::SUCCESS)
            } else {
                warn!(file = %request.file, errors, "document not dispatched");
                Ok(ExitCode::FAILURE)
            }
        }

        Command::Printers { driver, json } => {
            let transport = host.transport(None)?;
            let drivers = match driver {
                Some(name) => vec![host.driver(&name, transport)?],
                None => host.active_drivers(transport)?,
            };
            let listing = PrinterListing {
                printers: drivers
                    .iter()
                    .flat_map(|d| d.list_available_printers().printers)
                    .collect(),
            };
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
            } else if listing.is_empty() {
                writeln!(out, "no printer configured")?;
            } else {
                write!(out, "{listing}")?;
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Jobs { module, driver } => {
            let transport = host.transport(None)?;
            let table = host.driver(&driver, transport)?.list_jobs(&module);
            write!(out, "{table}")?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Drivers { json } => {
            let descriptors = host.registry().descriptors();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&descriptors)?)?;
            } else {
                for descriptor in &descriptors {
                    let active = host.settings().is_enabled(&descriptor.activation_flag);
                    writeln!(
                        out,
                        "{}  {}  [{}={}]",
                        descriptor.name,
                        descriptor.description,
                        descriptor.activation_flag,
                        if active { "on" } else { "off" }
                    )?;
                    for field in descriptor.config_fields.iter().filter(|f| !f.name.is_empty()) {
                        writeln!(
                            out,
                            "    {}{}  e.g. {}",
                            field.name,
                            if field.required { " (required)" } else { "" },
                            field.example
                        )?;
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Config {
            command: ConfigCommand::Set { key, value },
        } => {
            host.set_setting(&key, &value)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Config {
            command: ConfigCommand::Get { key },
        } => match host.settings().get(&key) {
            Some(value) => {
                writeln!(out, "{value}")?;
                Ok(ExitCode::SUCCESS)
            }
            None => Ok(ExitCode::FAILURE),
        },

        Command::Config {
            command: ConfigCommand::Show,
        } => {
            for (key, value) in host.settings().iter() {
                writeln!(out, "{key}={value}")?;
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Preference {
            command:
                PreferenceCommand::Set {
                    module,
                    user,
                    address,
                    copies,
                    printer_name,
                    driver,
                },
        } => {
            let mut pref = NewPreference::new(module, driver, user, address);
            pref.copies = copies;
            pref.printer_name = printer_name;
            let id = host.store().save_preference(&pref)?;
            writeln!(out, "{id}")?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Preference {
            command: PreferenceCommand::List { user },
        } => {
            for pref in host.store().preferences_for_user(user)? {
                writeln!(
                    out,
                    "{}  {}  {}  {}  copies={}",
                    pref.id, pref.module, pref.driver, pref.destination_address, pref.copies
                )?;
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Preference {
            command: PreferenceCommand::Remove { id },
        } => {
            if host.store().remove_preference(id)? {
                Ok(ExitCode::SUCCESS)
            } else {
                writeln!(out, "no preference with id {id}")?;
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
