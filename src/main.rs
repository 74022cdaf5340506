//! listen-check - report whether a TCP port is listening.

mod cli;
mod config;
mod display;
mod error;
mod family;
mod hex;
mod matcher;
mod port;
mod record;

use std::io::IsTerminal;

use clap::Parser;
use tracing::{debug, error, Level};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Verbosity};
use config::load_settings;
use display::{display_report, display_report_json, dump_table, PortReport};
use error::Result;
use matcher::Query;
use port::Port;

const EXIT_LISTENING: i32 = 0;
const EXIT_NOT_LISTENING: i32 = 1;

fn main() {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();
    init_logging(verbosity);

    let code = match run(&cli, verbosity) {
        Ok(true) => EXIT_LISTENING,
        Ok(false) => EXIT_NOT_LISTENING,
        Err(e) => {
            error!("{e}");
            EXIT_NOT_LISTENING
        }
    };
    std::process::exit(code);
}

/// Routes WARN and above to stderr, everything else to stdout.
///
/// `RUST_LOG` directives only apply with `--debug`.
fn init_logging(verbosity: Verbosity) {
    let filter = match verbosity {
        Verbosity::Quiet => return,
        Verbosity::Normal => EnvFilter::new("warn"),
        Verbosity::Debug => EnvFilter::from_default_env().add_directive(Level::DEBUG.into()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr.with_max_level(Level::WARN).or_else(std::io::stdout))
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: &Cli, verbosity: Verbosity) -> Result<bool> {
    let settings = load_settings()?;
    let matcher = settings.matcher();

    dump_table(matcher.table_path(), verbosity);

    let port: Port = cli.port.parse()?;
    let query = Query::new(port, cli.address.clone());

    match &query.address {
        Some(address) => debug!("Starting search for port {port} on IP {address}"),
        None => debug!("Starting search for port {port}"),
    }

    // An unreadable table or a bad address is reported like a closed port.
    let listening = match matcher.is_port_open(&query) {
        Ok(listening) => listening,
        Err(e) => {
            error!("{e}");
            false
        }
    };

    let report = PortReport::new(&query, matcher.family().name(), listening);
    if cli.json {
        display_report_json(&report, verbosity);
    } else {
        display_report(&report, verbosity);
    }

    Ok(listening)
}
