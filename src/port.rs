//! Port newtype for the queried port number.
//!
//! A listening socket can never be bound to port 0, so the query port is
//! validated to 1-65535 when it is parsed from the command line.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// A validated TCP port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Port(u16);

/// Error returned when the port argument is not a usable port number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortParseError {
    /// The string is not an integer in the 16-bit range.
    #[error("'{0}' is not a valid port number")]
    InvalidFormat(String),

    /// The number was parsed but is not a valid port.
    #[error("{0} is out of range (must be 1-65535)")]
    InvalidValue(u16),
}

impl Port {
    /// Creates a new `Port`, rejecting the reserved port 0.
    pub fn new(value: u16) -> Result<Self, PortParseError> {
        if value == 0 {
            Err(PortParseError::InvalidValue(value))
        } else {
            Ok(Port(value))
        }
    }

    /// Returns true if a decoded port column holds this port.
    #[inline]
    pub fn matches(self, decoded: u32) -> bool {
        decoded == u32::from(self.0)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Port {
    type Err = PortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u16 = s
            .parse()
            .map_err(|_| PortParseError::InvalidFormat(s.to_string()))?;
        Port::new(value)
    }
}

impl Serialize for Port {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}
