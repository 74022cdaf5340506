//! CLI definition using clap.

use clap::Parser;

const EXAMPLES: &str = "\
Examples:
  listen-check 8080
  listen-check 80 0.0.0.0
  listen-check 8080 127.0.0.1 --debug
  listen-check 8080 127.0.0.1 --quiet
  listen-check 8080 ::1            (with family = \"ipv6\")

Exit status: 0 if listening, 1 if not (or on invalid input), 2 on usage errors.";

/// Check whether a TCP port is listening, using the kernel socket table.
#[derive(Parser, Debug)]
#[command(name = "listen-check")]
#[command(author, version, about, long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    /// Port number to look for
    #[arg(allow_negative_numbers = true)]
    pub port: String,

    /// Only match sockets bound to this address
    pub address: Option<String>,

    /// Print the raw socket table and a per-row trace
    #[arg(long)]
    pub debug: bool,

    /// Print nothing; the exit status is the only result
    #[arg(long)]
    pub quiet: bool,

    /// Output the result as JSON for scripting
    #[arg(long)]
    pub json: bool,
}

/// How much listen-check prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Debug,
}

impl Verbosity {
    pub fn is_quiet(self) -> bool {
        self == Verbosity::Quiet
    }

    pub fn is_debug(self) -> bool {
        self == Verbosity::Debug
    }
}

impl Cli {
    /// `--quiet` wins over `--debug`.
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}
