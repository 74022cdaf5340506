//! Socket table row parsing.
//!
//! A row of `/proc/net/tcp` looks like
//!
//! ```text
//!    1: 0100007F:1F90 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000 ...
//! ```
//!
//! Splitting on whitespace and `:` turns the address:port pairs into separate
//! tokens, so every field lands at a fixed column index.

use std::fmt;

/// Characters that separate tokens in a socket table row.
pub const DEFAULT_DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', ':'];

const COLUMN_SLOT: usize = 0;
const COLUMN_LOCAL_ADDRESS: usize = 1;
const COLUMN_LOCAL_PORT: usize = 2;
const COLUMN_REMOTE_ADDRESS: usize = 3;
const COLUMN_REMOTE_PORT: usize = 4;
const COLUMN_STATE: usize = 5;

/// Kernel state code for a listening socket.
pub const STATE_LISTEN: u32 = 0x0A;

/// Splits `line` on any of `delimiters`, uppercasing every token.
///
/// Runs of delimiters collapse, so no empty tokens are produced.
pub fn tokenize(line: &str, delimiters: &[char]) -> Vec<String> {
    line.split(|c| delimiters.contains(&c))
        .filter(|token| !token.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}

/// One parsed row of the socket table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketRecord {
    pub slot: String,
    pub local_address: String,
    pub local_port: String,
    pub remote_address: String,
    pub remote_port: String,
    pub state: String,
    /// Queue sizes, timers, uid, inode and the rest.
    #[allow(dead_code)] // Not consulted by the matcher
    pub remaining: Vec<String>,
}

impl SocketRecord {
    /// Parses a row, returning `None` if it is too short to reach the state
    /// column (header lines, truncated rows).
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = tokenize(line, DEFAULT_DELIMITERS);
        if tokens.len() <= COLUMN_STATE {
            return None;
        }

        let remaining = tokens.split_off(COLUMN_STATE + 1);
        let mut take = |column: usize| std::mem::take(&mut tokens[column]);

        Some(SocketRecord {
            slot: take(COLUMN_SLOT),
            local_address: take(COLUMN_LOCAL_ADDRESS),
            local_port: take(COLUMN_LOCAL_PORT),
            remote_address: take(COLUMN_REMOTE_ADDRESS),
            remote_port: take(COLUMN_REMOTE_PORT),
            state: take(COLUMN_STATE),
            remaining,
        })
    }
}

/// TCP connection states as numbered by the kernel (`include/net/tcp_states.h`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcpState {
    Established,
    SynSent,
    SynRecv,
    FinWait1,
    FinWait2,
    TimeWait,
    Close,
    CloseWait,
    LastAck,
    Listen,
    Closing,
    NewSynRecv,
    Unknown(u32),
}

impl TcpState {
    pub fn from_code(code: u32) -> Self {
        match code {
            0x01 => TcpState::Established,
            0x02 => TcpState::SynSent,
            0x03 => TcpState::SynRecv,
            0x04 => TcpState::FinWait1,
            0x05 => TcpState::FinWait2,
            0x06 => TcpState::TimeWait,
            0x07 => TcpState::Close,
            0x08 => TcpState::CloseWait,
            0x09 => TcpState::LastAck,
            STATE_LISTEN => TcpState::Listen,
            0x0B => TcpState::Closing,
            0x0C => TcpState::NewSynRecv,
            other => TcpState::Unknown(other),
        }
    }
}

impl fmt::Display for TcpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TcpState::Established => "ESTABLISHED",
            TcpState::SynSent => "SYN_SENT",
            TcpState::SynRecv => "SYN_RECV",
            TcpState::FinWait1 => "FIN_WAIT1",
            TcpState::FinWait2 => "FIN_WAIT2",
            TcpState::TimeWait => "TIME_WAIT",
            TcpState::Close => "CLOSE",
            TcpState::CloseWait => "CLOSE_WAIT",
            TcpState::LastAck => "LAST_ACK",
            TcpState::Listen => "LISTEN",
            TcpState::Closing => "CLOSING",
            TcpState::NewSynRecv => "NEW_SYN_RECV",
            TcpState::Unknown(code) => return write!(f, "UNKNOWN({code:#04X})"),
        };
        f.write_str(name)
    }
}
