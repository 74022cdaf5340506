//! Address family strategies.
//!
//! The kernel keeps one socket table per family. `/proc/net/tcp` prints an
//! IPv4 address as the packed `in_addr` read as a host-order `u32`, and
//! `/proc/net/tcp6` prints an IPv6 address as four such words. Exactly one
//! family is in use per run; it is chosen from configuration at startup.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};

use crate::error::AddressError;

/// Encoding rules for one socket table flavor.
pub trait AddressFamily: fmt::Debug + Sync {
    /// Short name used in messages and JSON output.
    fn name(&self) -> &'static str;

    /// The kernel table that lists sockets of this family.
    fn default_table_path(&self) -> &'static str;

    /// Width of the local address column, in hex digits.
    fn address_width(&self) -> usize;

    /// Encodes an address literal the way the kernel prints it.
    fn encode(&self, literal: &str) -> Result<String, AddressError>;
}

/// IPv4 tables: 8 hex digits per address.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ipv4;

/// IPv6 tables: 32 hex digits per address.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ipv6;

impl AddressFamily for Ipv4 {
    fn name(&self) -> &'static str {
        "IPv4"
    }

    fn default_table_path(&self) -> &'static str {
        "/proc/net/tcp"
    }

    fn address_width(&self) -> usize {
        8
    }

    fn encode(&self, literal: &str) -> Result<String, AddressError> {
        let addr: Ipv4Addr = literal.parse().map_err(|_| unparseable(literal, self))?;
        Ok(format!("{:08X}", u32::from_ne_bytes(addr.octets())))
    }
}

impl AddressFamily for Ipv6 {
    fn name(&self) -> &'static str {
        "IPv6"
    }

    fn default_table_path(&self) -> &'static str {
        "/proc/net/tcp6"
    }

    fn address_width(&self) -> usize {
        32
    }

    fn encode(&self, literal: &str) -> Result<String, AddressError> {
        let addr: Ipv6Addr = literal.parse().map_err(|_| unparseable(literal, self))?;
        let octets = addr.octets();

        let mut hex = String::with_capacity(self.address_width());
        for word in octets.chunks_exact(4) {
            let word = u32::from_ne_bytes([word[0], word[1], word[2], word[3]]);
            hex.push_str(&format!("{word:08X}"));
        }
        Ok(hex)
    }
}

fn unparseable(literal: &str, family: &dyn AddressFamily) -> AddressError {
    AddressError::Unparseable {
        literal: literal.to_string(),
        family: family.name(),
    }
}

/// Configured address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Ipv4,
    Ipv6,
}

impl Family {
    /// The family compiled in as the default (`ipv6` cargo feature).
    pub const fn build_default() -> Self {
        if cfg!(feature = "ipv6") {
            Family::Ipv6
        } else {
            Family::Ipv4
        }
    }

    /// Returns the strategy implementing this family.
    pub fn strategy(self) -> &'static dyn AddressFamily {
        match self {
            Family::Ipv4 => &Ipv4,
            Family::Ipv6 => &Ipv6,
        }
    }
}

impl Default for Family {
    fn default() -> Self {
        Self::build_default()
    }
}
