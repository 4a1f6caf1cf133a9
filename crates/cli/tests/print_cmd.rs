//! CLI tests for the device-writing subcommands (`print`, `cut`, `send`,
//! `display`).

use std::fs;
use std::io::Read;
use std::net::{SocketAddr, TcpListener};
use std::process::{Command, Output};
use std::thread;
use std::time::Duration;

use assert_cmd::cargo;

fn escpos_cmd() -> Command {
    Command::new(cargo::cargo_bin!("escpos"))
}

fn json_stdout(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("invalid json ({e}): {stdout}"))
}

/// Accept one connection and collect everything until the client hangs up.
fn spawn_sink() -> (SocketAddr, thread::JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let mut received = Vec::new();
        let _ = stream.read_to_end(&mut received);
        received
    });
    (addr, handle)
}

#[test]
fn print_help_shows_flags() {
    let output = escpos_cmd()
        .args(["print", "--help"])
        .output()
        .expect("failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--printer",
        "--dry-run",
        "--center",
        "--width",
        "--cut",
        "--timeout",
        "--config",
        "--serial",
        "--baud",
        "--serial-parity",
        "--serial-stop-bits",
        "--serial-data-bits",
        "--serial-flow-control",
    ] {
        assert!(stdout.contains(flag), "missing {flag} flag in help");
    }
}

#[test]
fn print_dry_run_emits_init_then_line() {
    let output = escpos_cmd()
        .args(["print", "--dry-run", "A", "--output", "json"])
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["success"], true);
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["hex"], "1b40410a0d");
    assert_eq!(json["bytes"], 5);
}

#[test]
fn print_centered_with_cut() {
    let output = escpos_cmd()
        .args([
            "print",
            "--dry-run",
            "--center",
            "--width",
            "10",
            "--cut",
            "partial",
            "hi",
            "--output",
            "json",
        ])
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    assert_eq!(json_stdout(&output)["hex"], "1b402020202068690a0d1d5601");
}

#[test]
fn print_bold_aligned() {
    let output = escpos_cmd()
        .args([
            "print", "--dry-run", "--bold", "--align", "center", "X", "--output", "json",
        ])
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    assert_eq!(
        json_stdout(&output)["hex"],
        "1b401b61011b4501580a0d1b4500"
    );
}

#[test]
fn print_reads_lines_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("receipt.txt");
    fs::write(&path, "one\ntwo\n").unwrap();

    let output = escpos_cmd()
        .args(["print", "--dry-run", "--file"])
        .arg(&path)
        .args(["--output", "json"])
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    assert_eq!(json_stdout(&output)["hex"], "1b406f6e650a0d74776f0a0d");
}

#[test]
fn print_pretty_dry_run_shows_spaced_hex() {
    let output = escpos_cmd()
        .args(["print", "--dry-run", "A", "--output", "pretty"])
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1b 40 41 0a 0d");
}

#[test]
fn print_over_tcp() {
    let (addr, sink) = spawn_sink();
    let output = escpos_cmd()
        .args([
            "--printer",
            &addr.to_string(),
            "print",
            "Hello",
            "--cut",
            "full",
            "--output",
            "json",
        ])
        .output()
        .expect("failed to run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(json_stdout(&output)["dry_run"], false);
    assert_eq!(sink.join().unwrap(), b"\x1b\x40Hello\n\r\x1d\x56\x00");
}

#[test]
fn print_over_tcp_from_profile() {
    let (addr, sink) = spawn_sink();
    let dir = tempfile::tempdir().unwrap();
    let profile = dir.path().join("device.json");
    fs::write(
        &profile,
        format!(
            r#"{{"target": {{"network": {{"host": "127.0.0.1", "port": {}}}}}, "timeouts": {{"connect_ms": 2000}}}}"#,
            addr.port()
        ),
    )
    .unwrap();

    let output = escpos_cmd()
        .arg("--config")
        .arg(&profile)
        .args(["cut", "--partial", "--output", "json"])
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    assert_eq!(sink.join().unwrap(), b"\x1b\x40\x1d\x56\x01");
}

#[test]
fn send_mixes_names_and_hex() {
    let output = escpos_cmd()
        .args([
            "send",
            "--dry-run",
            "txt-bold-on",
            "0x41",
            "paper-full-cut",
            "--output",
            "json",
        ])
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    assert_eq!(json_stdout(&output)["hex"], "1b401b4501411d5600");
}

#[test]
fn display_dry_run() {
    let output = escpos_cmd()
        .args([
            "display",
            "--dry-run",
            "--clear",
            "--cursor",
            "hide",
            "--top",
            "WELCOME",
            "--output",
            "json",
        ])
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    let mut expected = String::from("1b400c1f43000b18");
    expected.push_str(&"20".repeat(6));
    expected.push_str("57454c434f4d45");
    assert_eq!(json_stdout(&output)["hex"], expected);
}
