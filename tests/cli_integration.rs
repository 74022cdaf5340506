//! Integration tests for the listen-check CLI.
//!
//! These tests run the binary against fixture socket tables written to a
//! temporary directory, selected through a temporary config file.

#![allow(deprecated)] // cargo_bin works fine for standard builds

use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const HEADER: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode";

const LOCALHOST_8080: &str = "   1: 0100007F:1F90 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 31337 1 0000000000000000 100 0 0 10 0";

const ESTABLISHED_22: &str = "   2: 0100007F:0016 0100007F:D431 01 00000000:00000000 02:000A7F2C 00000000     0        0 31338 4 0000000000000000 20 4 30 10 -1";

/// A fixture table plus the config file pointing at it.
struct Fixture {
    _dir: TempDir,
    config_path: String,
    table_path: String,
}

impl Fixture {
    fn new(family: &str, rows: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();

        let table_path = dir.path().join("tcp");
        let mut table = format!("{HEADER}\n");
        for row in rows {
            table.push_str(row);
            table.push('\n');
        }
        fs::write(&table_path, table).unwrap();

        Self::with_table_path(dir, family, table_path.to_string_lossy().to_string())
    }

    fn missing_table() -> Self {
        let dir = TempDir::new().unwrap();
        let table_path = dir.path().join("does-not-exist");
        Self::with_table_path(dir, "ipv4", table_path.to_string_lossy().to_string())
    }

    fn with_table_path(dir: TempDir, family: &str, table_path: String) -> Self {
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            format!("family = \"{family}\"\ntable_path = \"{table_path}\"\n"),
        )
        .unwrap();

        Self {
            _dir: dir,
            config_path: config_path.to_string_lossy().to_string(),
            table_path,
        }
    }

    fn cmd(&self) -> assert_cmd::Command {
        listen_check_cmd(&self.config_path)
    }
}

/// Creates a new command with the given config path.
fn listen_check_cmd(config_path: &str) -> assert_cmd::Command {
    let mut cmd = Command::cargo_bin("listen-check").unwrap();
    cmd.env("LISTEN_CHECK_CONFIG", config_path);
    cmd.env_remove("RUST_LOG");
    assert_cmd::Command::from_std(cmd)
}

// ============================================================================
// Lookup Tests
// ============================================================================

#[test]
fn test_port_listening() {
    let fixture = Fixture::new("ipv4", &[LOCALHOST_8080]);

    fixture
        .cmd()
        .arg("8080")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Port 8080 is open and listening"));
}

#[test]
fn test_port_not_listening() {
    let fixture = Fixture::new("ipv4", &[LOCALHOST_8080]);

    fixture
        .cmd()
        .arg("8081")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Port 8081 is not open or not listening",
        ));
}

#[test]
fn test_established_socket_is_not_listening() {
    let fixture = Fixture::new("ipv4", &[ESTABLISHED_22]);

    fixture.cmd().arg("22").assert().code(1);
}

#[cfg(target_endian = "little")]
#[test]
fn test_port_listening_on_address() {
    let fixture = Fixture::new("ipv4", &[LOCALHOST_8080]);

    fixture
        .cmd()
        .args(["8080", "127.0.0.1"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "Port 8080 is open and listening on 127.0.0.1",
        ));
}

#[test]
fn test_port_not_listening_on_other_address() {
    let fixture = Fixture::new("ipv4", &[LOCALHOST_8080]);

    fixture
        .cmd()
        .args(["8080", "10.0.0.1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Port 8080 is not open or not listening on 10.0.0.1",
        ));
}

#[cfg(target_endian = "little")]
#[test]
fn test_ipv6_table() {
    let row = "   0: 00000000000000000000000001000000:1F90 00000000000000000000000000000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 4242 1 0000000000000000 100 0 0 10 0";
    let fixture = Fixture::new("ipv6", &[row]);

    fixture.cmd().args(["8080", "::1"]).assert().code(0);
    fixture.cmd().args(["8080", "::"]).assert().code(1);
}

#[test]
fn test_repeated_runs_agree() {
    let fixture = Fixture::new("ipv4", &[LOCALHOST_8080]);

    fixture.cmd().arg("8080").assert().code(0);
    fixture.cmd().arg("8080").assert().code(0);
}

// ============================================================================
// Output Mode Tests
// ============================================================================

#[test]
fn test_quiet_prints_nothing() {
    let fixture = Fixture::new("ipv4", &[LOCALHOST_8080]);

    fixture
        .cmd()
        .args(["8080", "--quiet"])
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    fixture
        .cmd()
        .args(["--quiet", "abc"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_debug_dumps_table_and_trace() {
    let fixture = Fixture::new("ipv4", &[ESTABLISHED_22, LOCALHOST_8080]);

    fixture
        .cmd()
        .args(["--debug", "8080"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("=== Contents of"))
        .stdout(predicate::str::contains("local_address rem_address"))
        .stdout(predicate::str::contains("Local port (hex): 1F90"))
        .stdout(predicate::str::contains("Not in LISTENING state"))
        .stdout(predicate::str::contains("No specific IP requested - port found!"));
}

#[test]
fn test_rust_log_needs_debug_flag() {
    let fixture = Fixture::new("ipv4", &[LOCALHOST_8080]);

    fixture
        .cmd()
        .arg("8080")
        .env("RUST_LOG", "listen_check=debug")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("=== SL").not())
        .stdout(predicate::str::contains("Port 8080 is open and listening"));
}

#[test]
fn test_json_output() {
    let fixture = Fixture::new("ipv4", &[LOCALHOST_8080]);

    let output = fixture
        .cmd()
        .args(["8080", "--json"])
        .assert()
        .code(0)
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["port"], 8080);
    assert_eq!(value["family"], "IPv4");
    assert_eq!(value["listening"], true);
    assert!(value["address"].is_null());
}

// ============================================================================
// Error Case Tests
// ============================================================================

#[test]
fn test_no_arguments_is_usage_error() {
    let fixture = Fixture::new("ipv4", &[LOCALHOST_8080]);

    fixture
        .cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_too_many_arguments_is_usage_error() {
    let fixture = Fixture::new("ipv4", &[LOCALHOST_8080]);

    fixture
        .cmd()
        .args(["8080", "127.0.0.1", "extra"])
        .assert()
        .code(2);
}

#[test]
fn test_invalid_port_is_not_found() {
    let fixture = Fixture::new("ipv4", &[LOCALHOST_8080]);

    fixture
        .cmd()
        .arg("abc")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid port number"));

    fixture.cmd().arg("-1").assert().code(1);
    fixture.cmd().arg("70000").assert().code(1);
}

#[test]
fn test_invalid_address_is_not_found() {
    let fixture = Fixture::new("ipv4", &[LOCALHOST_8080]);

    fixture
        .cmd()
        .args(["8080", "not-an-ip"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid IP address format"));
}

#[test]
fn test_ipv6_address_with_ipv4_table_is_invalid() {
    let fixture = Fixture::new("ipv4", &[LOCALHOST_8080]);

    fixture
        .cmd()
        .args(["8080", "::1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a valid IPv4 address"));
}

#[test]
fn test_missing_table_is_not_found() {
    let fixture = Fixture::missing_table();

    fixture
        .cmd()
        .arg("8080")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot open"))
        .stderr(predicate::str::contains(&fixture.table_path));
}

#[test]
fn test_bad_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "family = \"ipx\"\n").unwrap();

    listen_check_cmd(&config_path.to_string_lossy())
        .arg("8080")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config file"));
}
