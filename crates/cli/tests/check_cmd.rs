//! CLI tests for the `ducky check` subcommand.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

fn ducky_cmd() -> Command {
    Command::new(cargo::cargo_bin!("ducky"))
}

fn write_temp_script(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("script.txt");
    fs::write(&path, content).expect("write temp script");
    (dir, path.to_string_lossy().to_string())
}

#[test]
fn check_clean_script_pretty() {
    let (_dir, path) = write_temp_script("DEFAULTDELAY 100\nSTRING hello\nCTRL ALT DELETE\n");

    let output = ducky_cmd()
        .args(["check", &path, "--output", "pretty"])
        .output()
        .expect("run check");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("check ok"), "stderr={stderr}");
}

#[test]
fn check_json_lists_every_error_with_error_ok() {
    let (dir, path) = write_temp_script("DELAY 0\nREPEAT 0\nCONTROL CONTROL a\nstring x\n");

    let output = ducky_cmd()
        .current_dir(dir.path())
        .args(["check", &path, "-e", "--output", "json"])
        .output()
        .expect("run check");
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["ok"], false);
    assert_eq!(json["lines"], 4);
    let ids: Vec<_> = json["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| (d["id"].as_str().unwrap().to_string(), d["line"].as_u64().unwrap()))
        .collect();
    assert_eq!(
        ids,
        [
            ("DKY1001".to_string(), 1),
            ("DKY1001".to_string(), 2),
            ("DKY1001".to_string(), 3),
            ("DKY1003".to_string(), 4),
        ]
    );
    // check never writes a sketch
    assert!(!dir.path().join("sketch").exists());
}

#[test]
fn check_info_does_not_fail() {
    // The repeated STRING fails again, which only skips the REPEAT.
    let (_dir, path) = write_temp_script("STRING\nREPEAT 2\n");

    let output = ducky_cmd()
        .args(["check", &path, "-e", "--output", "json"])
        .output()
        .expect("run check");
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    let diags = json["diagnostics"].as_array().unwrap();
    assert_eq!(diags[1]["id"], "DKY2001");
    assert_eq!(diags[1]["severity"], "info");
    // Still fails because of the STRING error on line 1.
    assert_eq!(output.status.code(), Some(1));
}
