// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Renderable listings returned by drivers. The host decides how to present
// them; `Display` gives a plain-text rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Column headers of a job listing.
pub const JOB_COLUMNS: [&str; 6] = ["Id", "Owner", "Printer", "File", "Status", "Cancel"];

/// Column headers of a printer listing.
pub const PRINTER_COLUMNS: [&str; 3] = ["Email", "Printer name", "Default"];

/// A header row plus zero or more data rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|h| (*h).to_owned()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }

        write_row(f, &self.header, &widths)?;
        for row in &self.rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(f, "{}", line.trim_end())
}

/// One printer a driver can send to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterRow {
    pub address: String,
    pub name: String,
    /// Whether this printer is the configured global default.
    pub is_default: bool,
}

/// Result of a driver's printer listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterListing {
    pub printers: Vec<PrinterRow>,
}

impl PrinterListing {
    pub fn is_empty(&self) -> bool {
        self.printers.is_empty()
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new(&PRINTER_COLUMNS);
        for printer in &self.printers {
            table.push_row(vec![
                printer.address.clone(),
                printer.name.clone(),
                if printer.is_default { "yes" } else { "no" }.to_owned(),
            ]);
        }
        table
    }
}

impl fmt::Display for PrinterListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.table(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_job_table_renders_header_only() {
        let table = Table::new(&JOB_COLUMNS);
        let rendered = table.to_string();
        assert_eq!(rendered.lines().count(), 1);
        assert_eq!(rendered.trim_end(), "Id  Owner  Printer  File  Status  Cancel");
    }

    #[test]
    fn columns_are_padded_to_widest_cell() {
        let listing = PrinterListing {
            printers: vec![PrinterRow {
                address: "printer@shop.example".into(),
                name: "Front desk".into(),
                is_default: true,
            }],
        };
        let rendered = listing.to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Email                 Printer name  Default");
        assert_eq!(lines[1], "printer@shop.example  Front desk    yes");
    }
}
