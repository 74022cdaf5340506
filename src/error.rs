//! Error types for listen-check.

use std::path::PathBuf;
use thiserror::Error;

use crate::port::PortParseError;

/// Main error type for listen-check operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot open {}: {source}", path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    TableRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid IP address format - {0}")]
    InvalidAddressLiteral(#[from] AddressError),

    #[error("Invalid port number - {0}")]
    InvalidPortLiteral(#[from] PortParseError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to the address query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("'{literal}' is not a valid {family} address")]
    Unparseable {
        literal: String,
        family: &'static str,
    },
}

/// Errors related to the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {}: {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors from decoding a hexadecimal column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexDecodeError {
    #[error("empty hex field")]
    Empty,

    #[error("invalid hex digit {digit:?} in '{input}'")]
    InvalidDigit { input: String, digit: char },

    #[error("hex value '{0}' does not fit in 32 bits")]
    Overflow(String),
}

pub type Result<T> = std::result::Result<T, Error>;
