//! Listening-port lookup over the kernel socket table.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::family::AddressFamily;
use crate::hex::decode_hex;
use crate::port::Port;
use crate::record::{SocketRecord, TcpState, STATE_LISTEN};

/// What to look for: a port, optionally bound to a specific address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub port: Port,
    pub address: Option<String>,
}

impl Query {
    pub fn new(port: Port, address: Option<String>) -> Self {
        Self { port, address }
    }
}

/// Scans one socket table using one address family.
#[derive(Debug)]
pub struct PortMatcher {
    table_path: PathBuf,
    family: &'static dyn AddressFamily,
}

impl PortMatcher {
    pub fn new(table_path: impl Into<PathBuf>, family: &'static dyn AddressFamily) -> Self {
        Self {
            table_path: table_path.into(),
            family,
        }
    }

    pub fn table_path(&self) -> &Path {
        &self.table_path
    }

    pub fn family(&self) -> &'static dyn AddressFamily {
        self.family
    }

    /// Returns true if the table holds a listening socket matching `query`.
    ///
    /// The table is streamed and closed before returning, whatever the outcome.
    pub fn is_port_open(&self, query: &Query) -> Result<bool> {
        let file = File::open(&self.table_path).map_err(|source| Error::ResourceUnavailable {
            path: self.table_path.clone(),
            source,
        })?;

        self.scan(BufReader::new(file), query)
    }

    /// Runs the lookup over any line source laid out like the kernel table.
    ///
    /// The first line is always treated as the header and never matched.
    pub fn scan<R: BufRead>(&self, mut reader: R, query: &Query) -> Result<bool> {
        let target_address = match &query.address {
            Some(literal) => {
                let hex = self.family.encode(literal)?;
                debug!("Target IP hex: {hex}");
                Some(hex)
            }
            None => None,
        };

        let mut buf = Vec::new();
        let mut line_number = 0usize;
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| Error::TableRead {
                    path: self.table_path.clone(),
                    source,
                })?;
            if read == 0 {
                break;
            }

            line_number += 1;
            if line_number == 1 {
                continue;
            }

            let line = String::from_utf8_lossy(&buf);
            if self.row_matches(&line, query.port, target_address.as_deref()) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn row_matches(&self, line: &str, port: Port, target_address: Option<&str>) -> bool {
        let Some(record) = SocketRecord::parse(line) else {
            return false;
        };

        debug!("=== SL {} ===", record.slot);
        debug!("  Local address (hex): {}", record.local_address);
        debug!("  Local port (hex): {}", record.local_port);
        debug!(
            "  Remote address:port (hex): {}:{}",
            record.remote_address, record.remote_port
        );

        let state = match decode_hex(&record.state) {
            Ok(code) => code,
            Err(e) => {
                debug!("  Skipping row: state column {e}");
                return false;
            }
        };
        debug!("  State: {} ({})", record.state, TcpState::from_code(state));

        if state != STATE_LISTEN {
            debug!("  Not in LISTENING state");
            return false;
        }

        match decode_hex(&record.local_port) {
            Ok(decoded) if port.matches(decoded) => {}
            Ok(_) => {
                debug!("  Port does not match target");
                return false;
            }
            Err(e) => {
                debug!("  Skipping row: port column {e}");
                return false;
            }
        }
        debug!("  Port matches target port!");

        if record.local_address.chars().count() != self.family.address_width() {
            debug!(
                "  Local address is not an {} address, ignoring row",
                self.family.name()
            );
            return false;
        }

        match target_address {
            None => {
                debug!("  No specific IP requested - port found!");
                true
            }
            Some(target) if target == record.local_address => {
                debug!("  IP matches target address!");
                true
            }
            Some(_) => {
                debug!("  IP does not match target address");
                false
            }
        }
    }
}
