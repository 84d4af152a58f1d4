// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory resolution for settings, the preference database and the
// mail spool.

use std::path::{Path, PathBuf};

use printmail_core::error::Result;

/// Settings file name inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Preference database file name inside the data directory.
pub const PREFERENCES_DB: &str = "printing.db";

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> Result<PathBuf> {
    let dir = base_dir().join("printmail");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Settings path given on the command line, else the default one. The data
/// directory is only touched for the default.
pub fn settings_path(overridden: Option<&Path>) -> Result<PathBuf> {
    match overridden {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(data_dir()?.join(SETTINGS_FILE)),
    }
}

/// Preference database path given on the command line, else the default one.
pub fn database_path(overridden: Option<&Path>) -> Result<PathBuf> {
    match overridden {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(data_dir()?.join(PREFERENCES_DB)),
    }
}

fn base_dir() -> PathBuf {
    // XDG data dir, then ~/.local/share
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    std::env::temp_dir()
}
