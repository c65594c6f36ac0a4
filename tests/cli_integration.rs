mod common;

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn tmp(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name)
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_loadshed"))
        .args(args)
        .output()
        .expect("loadshed process should run")
}

#[test]
fn cli_writes_assessments_and_summary() {
    let input = common::sample_path();
    let out = tmp("cli_assessments.csv");
    let summary = tmp("cli_summary.json");

    let output = run(&[
        "--input",
        input.to_str().expect("utf-8 path"),
        "--preset",
        "guarded",
        "--out",
        out.to_str().expect("utf-8 path"),
        "--summary-json",
        summary.to_str().expect("utf-8 path"),
    ]);
    assert!(
        output.status.success(),
        "loadshed failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--- Load Shedding Report ---"));

    let csv = fs::read_to_string(&out).expect("assessment CSV should exist");
    assert_eq!(csv.lines().count(), 25);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).expect("summary should exist"))
            .expect("summary should be JSON");
    assert_eq!(json["rows"].as_u64(), Some(24));
    assert_eq!(json["shedding_rows"].as_u64(), Some(13));
}

#[test]
fn mlr_rule_flag_overrides_preset() {
    let input = common::sample_path();
    let summary = tmp("cli_literal_summary.json");

    let output = run(&[
        "--input",
        input.to_str().expect("utf-8 path"),
        "--preset",
        "guarded",
        "--mlr-rule",
        "literal",
        "--summary-json",
        summary.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).expect("summary should exist"))
            .expect("summary should be JSON");
    assert_eq!(json["shedding_rows"].as_u64(), Some(16));
}

#[test]
fn missing_input_file_fails() {
    let output = run(&["--input", "no/such/file.csv"]);
    assert!(!output.status.success());
}

#[test]
fn unknown_preset_fails() {
    let input = common::sample_path();
    let output = run(&["--input", input.to_str().expect("utf-8 path"), "--preset", "bogus"]);
    assert!(!output.status.success());
}
