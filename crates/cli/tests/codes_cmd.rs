//! CLI tests for the informational subcommands (`codes`, `ports`, help).

use std::process::{Command, Output};

use assert_cmd::cargo;

fn escpos_cmd() -> Command {
    Command::new(cargo::cargo_bin!("escpos"))
}

fn json_stdout(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("invalid json ({e}): {stdout}"))
}

#[test]
fn help_lists_subcommands() {
    let output = escpos_cmd().arg("--help").output().expect("failed to run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for sub in ["print", "cut", "send", "status", "display", "codes", "ports"] {
        assert!(stdout.contains(sub), "missing {sub} subcommand in help");
    }
    assert!(stdout.contains("--output"));
}

#[test]
fn codes_json_lists_both_tables() {
    let output = escpos_cmd()
        .args(["codes", "--output", "json"])
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    let json = json_stdout(&output);

    let printer = json["printer"].as_array().expect("printer table");
    let init = printer
        .iter()
        .find(|c| c["name"] == "hw-init")
        .expect("hw-init listed");
    assert_eq!(init["hex"], "1b40");

    let display = json["display"].as_array().expect("display table");
    assert!(display.iter().any(|c| c["name"] == "clear-screen" && c["hex"] == "0c"));

    assert_eq!(json["paper_status"]["ok"], "12");
    assert_eq!(json["paper_status"]["no_paper"], "1e");
    assert_eq!(json["paper_status"]["error"], "0");
}

#[test]
fn codes_single_command_pretty() {
    let output = escpos_cmd()
        .args(["codes", "paper-full-cut", "--output", "pretty"])
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("paper-full-cut"));
    assert!(stdout.contains("1d 56 00"));
}

#[test]
fn codes_lookup_is_case_insensitive() {
    let output = escpos_cmd()
        .args(["codes", "TXT_BOLD_ON", "--output", "json"])
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    assert_eq!(json_stdout(&output)["hex"], "1b4501");
}

#[test]
fn ports_json_is_a_list() {
    let output = escpos_cmd()
        .args(["ports", "--output", "json"])
        .output()
        .expect("failed to run");

    assert!(output.status.success());
    assert!(json_stdout(&output)["ports"].is_array());
}
