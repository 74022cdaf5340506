//! Output formatting.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::cli::Verbosity;
use crate::matcher::Query;
use crate::port::Port;

/// Result of a lookup, as printed by `--json`.
#[derive(Debug, Serialize)]
pub struct PortReport<'a> {
    pub port: Port,
    pub address: Option<&'a str>,
    pub family: &'static str,
    pub listening: bool,
}

impl<'a> PortReport<'a> {
    pub fn new(query: &'a Query, family: &'static str, listening: bool) -> Self {
        Self {
            port: query.port,
            address: query.address.as_deref(),
            family,
            listening,
        }
    }

    /// The one-line sentence printed in normal mode.
    pub fn message(&self) -> String {
        let verdict = if self.listening {
            "is open and listening"
        } else {
            "is not open or not listening"
        };
        match self.address {
            Some(address) => format!("Port {} {verdict} on {address}", self.port),
            None => format!("Port {} {verdict}", self.port),
        }
    }
}

/// Prints the lookup result unless quiet.
pub fn display_report(report: &PortReport<'_>, verbosity: Verbosity) {
    if verbosity.is_quiet() {
        return;
    }
    println!("{}", report.message());
}

/// Prints the lookup result as JSON unless quiet.
pub fn display_report_json(report: &PortReport<'_>, verbosity: Verbosity) {
    if verbosity.is_quiet() {
        return;
    }
    let json = serde_json::to_string_pretty(report).expect("Failed to serialize to JSON");
    println!("{json}");
}

/// Echoes the raw socket table in debug mode.
pub fn dump_table(path: &Path, verbosity: Verbosity) {
    if !verbosity.is_debug() {
        return;
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            debug!("Failed to open {}: {e}", path.display());
            return;
        }
    };

    debug!("=== Contents of {} ===", path.display());
    for line in BufReader::new(file).split(b'\n') {
        match line {
            Ok(bytes) => debug!("{}", String::from_utf8_lossy(&bytes)),
            Err(e) => {
                debug!("Failed to read {}: {e}", path.display());
                break;
            }
        }
    }
    debug!("=== End of file contents ===");
}
