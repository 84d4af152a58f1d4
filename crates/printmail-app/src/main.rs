// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printmail — print documents by mailing them to a printer mailbox.
//
// Entry point. Initialises logging, parses the command line, and runs one
// command against the host services.

mod cli;
mod commands;
mod services;

use std::process::ExitCode;

use clap::Parser;

use printmail_core::human_errors::humanize_error;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?cli, "printmail starting");

    let mut stdout = std::io::stdout().lock();
    match commands::run(cli, &mut stdout) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            let human = humanize_error(&err);
            eprintln!("{}", human.message);
            eprintln!("{}", human.suggestion);
            ExitCode::from(2)
        }
    }
}
