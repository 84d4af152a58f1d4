// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Destination resolution.
//
// Precedence, first hit wins:
//   1. the user's stored preference for (module, driver)
//   2. the configured global default address
//   3. NoDefaultPrinterDefined
//
// Each tier is its own method so it can be exercised on its own.

use std::sync::Arc;

use tracing::{info, warn};

use printmail_core::error::{PrintmailError, Result};

use crate::store::PreferenceStore;

/// Where a destination came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A stored per-user override.
    UserPreference { address: String },
    /// The global fallback.
    GlobalDefault { address: String },
}

impl Resolution {
    /// The resolved destination address. Never empty.
    pub fn address(&self) -> &str {
        match self {
            Self::UserPreference { address } | Self::GlobalDefault { address } => address,
        }
    }
}

/// Picks the destination address for a (module, user) pair.
pub struct DestinationResolver {
    store: Arc<dyn PreferenceStore>,
    driver: String,
    default_address: Option<String>,
}

impl DestinationResolver {
    /// `default_address` is the global fallback; `None` or blank disables it.
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        driver: impl Into<String>,
        default_address: Option<String>,
    ) -> Self {
        Self {
            store,
            driver: driver.into(),
            default_address: default_address
                .map(|a| a.trim().to_owned())
                .filter(|a| !a.is_empty()),
        }
    }

    /// Resolve the destination for `module` printed by `user_id`.
    ///
    /// A failing preference lookup is returned as-is; it never falls through
    /// to the global default.
    pub fn resolve(&self, module: &str, user_id: i64) -> Result<Resolution> {
        if let Some(resolution) = self.user_preference(module, user_id)? {
            return Ok(resolution);
        }

        if let Some(resolution) = self.global_default() {
            return Ok(resolution);
        }

        warn!(module, user_id, driver = %self.driver, "no printer preference and no default printer defined");
        Err(PrintmailError::NoDefaultPrinterDefined)
    }

    /// Tier 1: the first stored preference with a non-blank address.
    pub fn user_preference(&self, module: &str, user_id: i64) -> Result<Option<Resolution>> {
        let prefs = self.store.find_preferences(module, &self.driver, user_id)?;
        if prefs.len() > 1 {
            warn!(
                module,
                user_id,
                rows = prefs.len(),
                "several printer preferences match, using the first"
            );
        }

        let Some(pref) = prefs
            .into_iter()
            .find(|p| !p.destination_address.trim().is_empty())
        else {
            return Ok(None);
        };

        let address = pref.destination_address.trim().to_owned();
        info!(
            module,
            user_id,
            preference_id = pref.id,
            copies = pref.copies,
            destination = %address,
            "found a default printer for user"
        );
        Ok(Some(Resolution::UserPreference { address }))
    }

    /// Tier 2: the configured global default.
    pub fn global_default(&self) -> Option<Resolution> {
        let address = self.default_address.as_ref()?;
        info!(destination = %address, "using the global default printer");
        Some(Resolution::GlobalDefault {
            address: address.clone(),
        })
    }
}
