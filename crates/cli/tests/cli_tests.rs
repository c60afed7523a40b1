// End-to-end tests for the hgrid binary: outputs, the --json contract, exit codes.
//
// Run with: cargo test -p hotelgrid-cli --test cli_tests -- --nocapture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn hgrid() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hgrid"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("HGRID_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn bundled_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn run_enrich(input: &Path, out: &Path, extra: &[&str]) -> Output {
    hgrid()
        .arg("run")
        .arg(input)
        .arg("--output-dir")
        .arg(out)
        .arg("--reference-dir")
        .arg(bundled_data())
        .args(extra)
        .output()
        .expect("failed to run hgrid")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ===========================================================================
// run
// ===========================================================================

#[test]
fn run_writes_outputs_and_prints_summary() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_enrich(&fixture("hotels.csv"), dir.path(), &[]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));

    let text = stdout(&out);
    assert!(text.contains("ENRICHMENT SUMMARY"));
    assert!(text.contains("Total rows: 4\n"));
    assert!(text.contains("Valid postal codes: 4\n"));
    assert!(text.contains("Ambiguous Corsica codes: 1\n"));
    assert!(text.contains("  Corse: 2\n"));
    assert!(text.contains("  Groups: 1\n"));
    assert!(text.contains("WARNINGS (1):"));

    let csv_path = dir.path().join("enriched_hotels.csv");
    assert!(dir.path().join("enriched_hotels.xlsx").is_file());
    assert!(dir.path().join("enrich_hotels.log").is_file());

    let bytes = fs::read(&csv_path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"), "CSV output should carry a UTF-8 BOM");
    let content = String::from_utf8(bytes[3..].to_vec()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 5, "header plus one line per input row");
    assert!(lines[0].starts_with("DATE DE CLASSEMENT,"));
    assert!(lines[0].ends_with(",large_property_flag,boutique_flag,hotel_context"));
    assert!(lines[2].contains(",75,Île-de-France,"));
    assert!(lines[2].contains(",accor.com,group,Accor,"));
    assert!(lines[4].contains(",2A,Corse,"));
}

#[test]
fn run_log_records_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_enrich(&fixture("hotels.csv"), dir.path(), &["--no-xlsx"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));

    let log = fs::read_to_string(dir.path().join("enrich_hotels.log")).unwrap();
    assert!(log.contains("hotel enrichment started"));
    assert!(log.contains("hotel enrichment finished"));
    assert!(log.contains("20900"), "the Corsica warning should reach the log");
    assert!(!log.contains("\x1b["), "log file must not contain ANSI escapes");
}

#[test]
fn run_no_xlsx_skips_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_enrich(&fixture("hotels.csv"), dir.path(), &["--no-xlsx", "--basename", "trial"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));

    assert!(dir.path().join("trial.csv").is_file());
    assert!(!dir.path().join("trial.xlsx").exists());
    assert!(!stdout(&out).contains("XLSX:"));
}

#[test]
fn run_creates_missing_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a/b");
    let out = run_enrich(&fixture("hotels.csv"), &nested, &["--no-xlsx"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    assert!(nested.join("enriched_hotels.csv").is_file());
}

#[test]
fn run_parallel_output_matches_sequential() {
    let seq = tempfile::tempdir().unwrap();
    let par = tempfile::tempdir().unwrap();
    assert!(run_enrich(&fixture("hotels.csv"), seq.path(), &["--no-xlsx"]).status.success());
    assert!(run_enrich(&fixture("hotels.csv"), par.path(), &["--no-xlsx", "--jobs", "4"]).status.success());

    let a = fs::read(seq.path().join("enriched_hotels.csv")).unwrap();
    let b = fs::read(par.path().join("enriched_hotels.csv")).unwrap();
    assert_eq!(a, b);
}

// ===========================================================================
// --json contract
// ===========================================================================

#[test]
fn run_json_is_single_document() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_enrich(&fixture("hotels.csv"), dir.path(), &["--json", "--no-xlsx"]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));

    let text = stdout(&out);
    let val: serde_json::Value = serde_json::from_str(text.trim())
        .unwrap_or_else(|e| panic!("stdout must be one JSON value: {e}\n{text}"));

    assert_eq!(val["meta"]["rows"], 4);
    assert!(val["meta"]["engine_version"].is_string());
    assert!(val["meta"]["run_at"].is_string());
    assert_eq!(val["summary"]["total_rows"], 4);
    assert_eq!(val["summary"]["ownership"]["group"], 1);
    assert_eq!(val["summary"]["warnings"].as_array().unwrap().len(), 1);
    assert!(val["outputs"]["csv"].as_str().unwrap().ends_with("enriched_hotels.csv"));
    assert!(val["outputs"]["xlsx"].is_null());
    assert!(val["input"].as_str().unwrap().ends_with("hotels.csv"));
}

// ===========================================================================
// Exit codes
// ===========================================================================

#[test]
fn missing_column_exits_62_without_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_enrich(&fixture("missing_website.csv"), dir.path(), &[]);
    assert_eq!(out.status.code(), Some(62));

    let err = stderr(&out);
    assert!(err.contains("missing required columns: 'WEBSITE'"), "stderr:\n{err}");
    assert!(err.contains("hint:  available columns:"));
    assert!(!dir.path().join("enriched_hotels.csv").exists());
}

#[test]
fn missing_input_exits_63() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_enrich(&dir.path().join("nope.csv"), dir.path(), &[]);
    assert_eq!(out.status.code(), Some(63));
    assert!(stderr(&out).contains("nope.csv"));
}

#[test]
fn unsupported_extension_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("hotels.pdf");
    fs::write(&input, "not a table").unwrap();
    let out = run_enrich(&input, dir.path(), &[]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn strict_reference_without_tables_exits_61() {
    let dir = tempfile::tempdir().unwrap();
    let empty = tempfile::tempdir().unwrap();
    let out = hgrid()
        .arg("run")
        .arg(fixture("hotels.csv"))
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--reference-dir")
        .arg(empty.path())
        .arg("--strict-reference")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(61));
    assert!(stderr(&out).contains("--reference-dir"));
}

#[test]
fn lenient_reference_runs_with_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let empty = tempfile::tempdir().unwrap();
    let out = hgrid()
        .arg("run")
        .arg(fixture("hotels.csv"))
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--reference-dir")
        .arg(empty.path())
        .arg("--no-xlsx")
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    assert!(stdout(&out).contains("WARNINGS (4):"));
}

#[test]
fn malformed_config_exits_60() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    fs::write(&config, "threshold_small_max: [1, 2]\n").unwrap();
    let out = run_enrich(
        &fixture("hotels.csv"),
        dir.path(),
        &["--config", config.to_str().unwrap()],
    );
    assert_eq!(out.status.code(), Some(60));
}

#[test]
fn config_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    fs::write(&config, "threshold_small_max: 500\nthreshold_medium_max: 100\n").unwrap();
    let out = hgrid()
        .args(["validate", "--reference-dir"])
        .arg(bundled_data())
        .env("HGRID_CONFIG", &config)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(60), "inconsistent thresholds should be rejected");
}

// ===========================================================================
// validate / sample
// ===========================================================================

#[test]
fn validate_reports_setup_and_input() {
    let out = hgrid()
        .args(["validate", "--strict-reference", "--reference-dir"])
        .arg(bundled_data())
        .arg(fixture("hotels.csv"))
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));

    let text = stdout(&out);
    assert!(text.contains("config:    built-in defaults"));
    assert!(text.contains("keywords: restaurant 8, spa 7, urban 6, leisure 8, leisure_type 3"));
    assert!(text.contains("reference: 101 departments"));
    assert!(text.contains("(4 rows, 17 columns)"));
}

#[test]
fn validate_warns_on_empty_keyword_list() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    fs::write(&config, "spa_keywords: []\n").unwrap();
    let out = hgrid()
        .args(["validate", "--reference-dir"])
        .arg(bundled_data())
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("spa 0,"));
    assert!(text.contains("warning:   spa_keywords is empty"));
}

#[test]
fn validate_flags_missing_column() {
    let out = hgrid()
        .args(["validate", "--reference-dir"])
        .arg(bundled_data())
        .arg(fixture("missing_website.csv"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(62));
}

#[test]
fn sample_copies_first_rows() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("small.csv");
    let out = hgrid()
        .arg("sample")
        .arg(fixture("hotels.csv"))
        .args(["--rows", "2", "--output"])
        .arg(&output)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));

    let text = stdout(&out);
    assert!(text.contains("Total rows: 4"));
    assert!(text.contains("[OK] Contains 2 rows"));
    assert!(text.contains("hgrid run"));

    let bytes = fs::read(&output).unwrap();
    let content = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[2].contains("Ibis Paris Gare de Lyon"));
}

#[test]
fn sample_rejects_zero_rows() {
    let out = hgrid()
        .arg("sample")
        .arg(fixture("hotels.csv"))
        .args(["--rows", "0"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
}
