// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Email printing driver.
//
// "Printing" a document means mailing it as a PDF attachment to a printer's
// mailbox (or anyone else's). One configured printer address, an optional
// global default, and per-user overrides from the preference store.
//
// Each submission: Pending -> resolve -> build -> send -> Sent | Failed.
// Single attempt, no retry.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn};

use printmail_core::config::{Configuration, driver_key};
use printmail_core::error::PrintmailError;
use printmail_core::types::{
    ConfigField, DispatchJob, DispatchOutcome, DriverDescriptor, JobRequest,
};
use printmail_mail::{AddressRole, MailTransport, MessageBuilder};

use crate::driver::{OutcomeLog, PrintingDriver};
use crate::registry::DriverContext;
use crate::resolver::DestinationResolver;
use crate::store::PreferenceStore;
use crate::table::{JOB_COLUMNS, PrinterListing, PrinterRow, Table};

/// Registry name of the email driver.
pub const DRIVER_NAME: &str = "printemail";

/// Activation flag the host checks before offering this driver.
pub const ACTIVATION_FLAG: &str = "PRINTING_PRINTEMAIL";

/// Marker appended after every successful submission.
pub const JOB_ADDED: &str = "PRINTEMAIL: Job added";

/// Outcome entry for an accepted message.
pub fn sent_outcome(from: &str, to: &str) -> String {
    format!("Email (from {from} to {to}) successfully accepted for delivery")
}

/// Static identity of the email driver.
pub fn email_descriptor() -> DriverDescriptor {
    DriverDescriptor {
        name: DRIVER_NAME.into(),
        description: "Print by sending the document as an email attachment".into(),
        icon: "printer".into(),
        activation_flag: ACTIVATION_FLAG.into(),
        config_fields: vec![
            ConfigField::text(driver_key(DRIVER_NAME, "EMAIL"), true, "someone@somedomain.com")
                .with_hints("autocomplete=\"off\""),
            ConfigField::text(driver_key(DRIVER_NAME, "PRINTERNAME"), true, "Printer Name"),
            ConfigField::submit(),
        ],
    }
}

/// Delivers print jobs by email.
pub struct EmailDriver {
    descriptor: DriverDescriptor,
    config: Configuration,
    resolver: DestinationResolver,
    transport: Arc<dyn MailTransport>,
    outcomes: OutcomeLog,
}

impl EmailDriver {
    pub fn new(
        config: Configuration,
        store: Arc<dyn PreferenceStore>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        let resolver = DestinationResolver::new(
            store,
            DRIVER_NAME,
            config.global_default().map(str::to_owned),
        );
        Self {
            descriptor: email_descriptor(),
            config,
            resolver,
            transport,
            outcomes: OutcomeLog::new(),
        }
    }

    /// Build the driver from host-supplied settings, store and transport.
    pub fn from_context(ctx: &DriverContext) -> Self {
        Self::new(
            Configuration::from_settings(&ctx.settings, DRIVER_NAME),
            Arc::clone(&ctx.store),
            Arc::clone(&ctx.transport),
        )
    }

    /// Dispatch one document and return the full job record.
    pub fn dispatch(&self, request: &JobRequest) -> DispatchJob {
        let _span = info_span!(
            "dispatch",
            module = %request.module,
            user_id = request.user_id,
            file = %request.file
        )
        .entered();
        let mut job = DispatchJob::new(request);

        let resolution = match self.resolver.resolve(&request.module, request.user_id) {
            Ok(resolution) => resolution,
            Err(err) => {
                self.fail(&mut job, &err);
                return job;
            }
        };
        job.resolved_destination = resolution.address().to_owned();

        let message = match MessageBuilder::new(&self.config).build(
            &job.resolved_destination,
            &request.file,
            &request.module,
            &request.subdirectory,
        ) {
            Ok(message) => message,
            Err(err) => {
                self.fail(&mut job, &err);
                return job;
            }
        };
        if let Some(attachment) = message.attachments.first() {
            job.source_file = attachment.path.clone();
        }

        match self.transport.send(&message) {
            Ok(receipt) => {
                job.outcome = DispatchOutcome::Sent;
                self.outcomes.push(sent_outcome(
                    receipt.validated_address(AddressRole::From),
                    receipt.validated_address(AddressRole::To),
                ));
                self.outcomes.push(JOB_ADDED);
                info!(
                    destination = %job.resolved_destination,
                    transport = self.transport.name(),
                    "print job sent"
                );
            }
            Err(err) => self.fail(&mut job, &err),
        }

        job
    }

    fn fail(&self, job: &mut DispatchJob, err: &PrintmailError) {
        job.outcome = DispatchOutcome::Failed;
        warn!(error = %err, destination = %job.resolved_destination, "print job failed");
        self.outcomes.push(err.outcome_text());
    }
}

impl PrintingDriver for EmailDriver {
    fn descriptor(&self) -> &DriverDescriptor {
        &self.descriptor
    }

    fn submit_job(&self, request: &JobRequest) -> u32 {
        self.dispatch(request).error_count()
    }

    fn list_available_printers(&self) -> PrinterListing {
        if self.config.printer_email.is_empty() || self.config.printer_name.is_empty() {
            debug!("email printer address or name not configured");
            return PrinterListing::default();
        }

        PrinterListing {
            printers: vec![PrinterRow {
                address: self.config.printer_email.clone(),
                name: self.config.printer_name.clone(),
                is_default: self.config.global_default() == Some(self.config.printer_email.as_str()),
            }],
        }
    }

    fn printer_identifiers(&self) -> Vec<String> {
        if self.config.printer_email.is_empty() {
            Vec::new()
        } else {
            vec![self.config.printer_email.clone()]
        }
    }

    /// Email has no remote job queue, so this is always an empty table.
    fn list_jobs(&self, module: &str) -> Table {
        debug!(module, "email driver has no remote jobs to list");
        Table::new(&JOB_COLUMNS)
    }

    fn outcomes(&self) -> Vec<String> {
        self.outcomes.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NewPreference, SqlitePreferenceStore};
    use printmail_core::Settings;
    use printmail_mail::{LettreTransport, RecordingTransport};
    use std::path::Path;

    const INVOICE_DIR: &str = "/srv/documents/invoices";

    fn settings(default: &str) -> Settings {
        Settings::new()
            .with("PRINTEMAIL_EMAIL", "printer@shop.example")
            .with("PRINTEMAIL_PRINTERNAME", "Front desk")
            .with("PRINTEMAIL_URI_DEFAULT", default)
            .with("MAIN_MAIL_EMAIL_FROM", "erp@shop.example")
            .with("INVOICE_DIR_OUTPUT", INVOICE_DIR)
    }

    fn driver(
        default: &str,
        store: Arc<SqlitePreferenceStore>,
        transport: Arc<RecordingTransport>,
    ) -> EmailDriver {
        EmailDriver::new(
            Configuration::from_settings(&settings(default), DRIVER_NAME),
            store,
            transport,
        )
    }

    fn empty_store() -> Arc<SqlitePreferenceStore> {
        Arc::new(SqlitePreferenceStore::open_in_memory().expect("open in-memory db"))
    }

    fn invoice_request() -> JobRequest {
        JobRequest::new("INV-001.pdf", "invoice", 42).in_subdirectory("sent")
    }

    #[test]
    fn sends_to_global_default_when_user_has_no_preference() {
        let transport = Arc::new(RecordingTransport::new());
        let driver = driver("printer@shop.example", empty_store(), Arc::clone(&transport));

        assert_eq!(driver.submit_job(&invoice_request()), 0);

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "printer@shop.example");
        assert_eq!(
            sent[0].attachments[0].path,
            Path::new(INVOICE_DIR).join("sent").join("INV-001.pdf")
        );

        let outcomes = driver.outcomes();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].contains("printer@shop.example"));
        assert!(outcomes[0].contains("erp@shop.example"));
        assert_eq!(outcomes[1], JOB_ADDED);
    }

    #[test]
    fn no_destination_fails_without_touching_transport() {
        let transport = Arc::new(RecordingTransport::new());
        let driver = driver("", empty_store(), Arc::clone(&transport));

        assert_eq!(driver.submit_job(&invoice_request()), 1);
        assert_eq!(transport.attempts(), 0);
        assert_eq!(driver.outcomes(), ["NoDefaultPrinterDefined"]);
    }

    #[test]
    fn user_preference_overrides_default() {
        let store = empty_store();
        store
            .save_preference(&NewPreference::new(
                "invoice",
                DRIVER_NAME,
                42,
                "accounts@shop.example",
            ))
            .expect("save");
        let transport = Arc::new(RecordingTransport::new());
        let driver = driver("printer@shop.example", store, Arc::clone(&transport));

        let job = driver.dispatch(&invoice_request());
        assert_eq!(job.outcome, DispatchOutcome::Sent);
        assert_eq!(job.resolved_destination, "accounts@shop.example");
        assert!(transport.was_sent_to("accounts@shop.example"));
        assert!(!transport.was_sent_to("printer@shop.example"));
    }

    #[test]
    fn preference_for_another_driver_is_ignored() {
        let store = empty_store();
        store
            .save_preference(&NewPreference::new("invoice", "printipp", 42, "ipp://printer"))
            .expect("save");
        let transport = Arc::new(RecordingTransport::new());
        let driver = driver("printer@shop.example", store, Arc::clone(&transport));

        assert_eq!(driver.submit_job(&invoice_request()), 0);
        assert!(transport.was_sent_to("printer@shop.example"));
    }

    #[test]
    fn transport_failure_is_reported_verbatim() {
        let transport = Arc::new(RecordingTransport::failing("421 service not available"));
        let driver = driver("printer@shop.example", empty_store(), Arc::clone(&transport));

        let job = driver.dispatch(&invoice_request());
        assert_eq!(job.outcome, DispatchOutcome::Failed);
        assert_eq!(job.error_count(), 1);
        assert_eq!(job.resolved_destination, "printer@shop.example");
        assert_eq!(transport.attempts(), 1);
        assert_eq!(driver.outcomes(), ["421 service not available"]);
    }

    #[test]
    fn module_without_output_dir_fails_before_sending() {
        let transport = Arc::new(RecordingTransport::new());
        let driver = driver("printer@shop.example", empty_store(), Arc::clone(&transport));

        assert_eq!(driver.submit_job(&JobRequest::new("PO-7.pdf", "order", 42)), 1);
        assert_eq!(transport.attempts(), 0);
        let outcomes = driver.outcomes();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].contains("ORDER_DIR_OUTPUT"));
    }

    #[test]
    fn outcome_log_accumulates_across_calls() {
        let transport = Arc::new(RecordingTransport::new());
        let driver = driver("printer@shop.example", empty_store(), Arc::clone(&transport));

        driver.submit_job(&invoice_request());
        driver.submit_job(&JobRequest::new("INV-002.pdf", "invoice", 42));
        assert_eq!(driver.outcomes().len(), 4);
    }

    #[test]
    fn concurrent_submissions_share_one_log() {
        let transport = Arc::new(RecordingTransport::new());
        let driver = Arc::new(driver(
            "printer@shop.example",
            empty_store(),
            Arc::clone(&transport),
        ));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let driver = Arc::clone(&driver);
                std::thread::spawn(move || {
                    driver.submit_job(&JobRequest::new(format!("INV-{i}.pdf"), "invoice", i))
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("join"), 0);
        }

        assert_eq!(transport.sent_count(), 4);
        let outcomes = driver.outcomes();
        assert_eq!(outcomes.len(), 8);
        assert_eq!(outcomes.iter().filter(|o| *o == JOB_ADDED).count(), 4);
    }

    #[test]
    fn lists_the_configured_printer_as_default() {
        let driver = driver(
            "printer@shop.example",
            empty_store(),
            Arc::new(RecordingTransport::new()),
        );
        let listing = driver.list_available_printers();
        assert_eq!(
            listing.printers,
            vec![PrinterRow {
                address: "printer@shop.example".into(),
                name: "Front desk".into(),
                is_default: true,
            }]
        );
    }

    #[test]
    fn printer_is_not_default_when_default_differs() {
        let driver = driver(
            "other@shop.example",
            empty_store(),
            Arc::new(RecordingTransport::new()),
        );
        assert!(!driver.list_available_printers().printers[0].is_default);
    }

    #[test]
    fn unconfigured_printer_lists_nothing() {
        let driver = EmailDriver::new(
            Configuration::default(),
            empty_store(),
            Arc::new(RecordingTransport::new()),
        );
        assert!(driver.list_available_printers().is_empty());
        assert!(driver.printer_identifiers().is_empty());
    }

    #[test]
    fn identifiers_are_the_configured_address() {
        let driver = driver("", empty_store(), Arc::new(RecordingTransport::new()));
        assert_eq!(driver.printer_identifiers(), ["printer@shop.example"]);
    }

    #[test]
    fn job_listing_is_an_empty_table_with_header() {
        let driver = driver("", empty_store(), Arc::new(RecordingTransport::new()));
        let table = driver.list_jobs("invoice");
        assert_eq!(table.header, JOB_COLUMNS);
        assert!(table.is_empty());
    }

    #[test]
    fn descriptor_exposes_settings_fields() {
        let descriptor = email_descriptor();
        assert_eq!(descriptor.name, "printemail");
        assert_eq!(descriptor.activation_flag, "PRINTING_PRINTEMAIL");
        let names: Vec<_> = descriptor.config_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["PRINTEMAIL_EMAIL", "PRINTEMAIL_PRINTERNAME", ""]);
        assert!(descriptor.config_fields[0].required);
    }

    #[test]
    fn spooled_delivery_end_to_end() {
        let docs = tempfile::tempdir().expect("docs dir");
        let spool = tempfile::tempdir().expect("spool dir");
        std::fs::create_dir_all(docs.path().join("sent")).expect("mkdir");
        std::fs::write(docs.path().join("sent").join("INV-001.pdf"), b"%PDF-1.4").expect("write");

        let settings = settings("printer@shop.example")
            .with("INVOICE_DIR_OUTPUT", docs.path().to_string_lossy());
        let driver = EmailDriver::new(
            Configuration::from_settings(&settings, DRIVER_NAME),
            empty_store(),
            Arc::new(LettreTransport::spool(spool.path()).expect("spool")),
        );

        assert_eq!(driver.submit_job(&invoice_request()), 0);
        let spooled = std::fs::read_dir(spool.path()).expect("read spool").count();
        assert_eq!(spooled, 1);
    }

    #[test]
    fn missing_source_file_surfaces_as_transport_failure() {
        let docs = tempfile::tempdir().expect("docs dir");
        let spool = tempfile::tempdir().expect("spool dir");
        let settings = settings("printer@shop.example")
            .with("INVOICE_DIR_OUTPUT", docs.path().to_string_lossy());
        let driver = EmailDriver::new(
            Configuration::from_settings(&settings, DRIVER_NAME),
            empty_store(),
            Arc::new(LettreTransport::spool(spool.path()).expect("spool")),
        );

        assert_eq!(driver.submit_job(&invoice_request()), 1);
        let outcomes = driver.outcomes();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].contains("INV-001.pdf"));
    }
}
