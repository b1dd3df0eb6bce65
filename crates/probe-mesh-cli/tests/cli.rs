use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use probe_mesh_io::SurfaceReport;
use tempfile::TempDir;

const SQUARE: &str = "2\n2\n\n1\n2\n\n3\n4\n";

fn probe_mesh() -> Command {
    Command::cargo_bin("probe-mesh").expect("binary")
}

fn write_input(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).expect("write input");
    path
}

fn load_report(path: &Path) -> SurfaceReport {
    SurfaceReport::load_json(path).expect("report")
}

#[test]
fn stats_prints_the_panel() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "square.txt", SQUARE);

    probe_mesh()
        .arg("stats")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("X size: 2 points"))
        .stdout(predicate::str::contains("Z max : 4.0000"))
        .stdout(predicate::str::contains("Z mean: 2.5000"))
        .stdout(predicate::str::contains("Z P-V : 3.0000"));
}

#[test]
fn stats_json_is_machine_readable() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "square.csv", "1,2\n3,4\n");

    let out = probe_mesh()
        .args(["-q", "stats", "--json"])
        .arg(&input)
        .output()
        .expect("run");
    assert!(out.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(stats["min"], 1.0);
    assert_eq!(stats["peak_to_valley"], 3.0);
}

#[test]
fn resample_writes_a_report() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "square.txt", SQUARE);
    let report_path = dir.path().join("report.json");

    probe_mesh()
        .args(["resample", "--method", "linear", "--density", "2", "-o"])
        .arg(&report_path)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Z P-V : 3.0000"));

    let report = load_report(&report_path);
    assert!(report.error.is_none());
    assert_eq!(report.source_shape, Some([2, 2]));
    assert_eq!(report.heights.len(), 4);
    assert!(report.heights.iter().all(|row| row.len() == 4));
    assert_eq!(report.heights[0][0], 1.0);
    assert_eq!(report.heights[3][3], 4.0);
}

#[test]
fn spline_on_tiny_grid_fails_unless_fallback() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "square.txt", SQUARE);
    let report_path = dir.path().join("report.json");

    probe_mesh()
        .args(["resample", "--method", "cubic", "-o"])
        .arg(&report_path)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs at least 4 points"));
    let failed = load_report(&report_path);
    assert!(failed.error.is_some());
    assert!(failed.heights.is_empty());

    probe_mesh()
        .args(["resample", "--method", "cubic", "--fallback", "-o"])
        .arg(&report_path)
        .arg(&input)
        .assert()
        .success();
    let report = load_report(&report_path);
    assert_eq!(report.method.map(|m| m.name()), Some("linear"));
}

#[test]
fn unreadable_file_lists_every_format() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "junk.txt", "hello\nworld\n");

    probe_mesh()
        .arg("stats")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unable to parse"))
        .stderr(predicate::str::contains("custom:"))
        .stderr(predicate::str::contains("csv:"))
        .stderr(predicate::str::contains("whitespace:"));
}

#[test]
fn convert_rewrites_as_csv() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_input(&dir, "square.txt", SQUARE);
    let output = dir.path().join("square.csv");

    probe_mesh()
        .arg("convert")
        .arg(&input)
        .arg(&output)
        .args(["--format", "csv"])
        .assert()
        .success();

    let text = fs::read_to_string(&output).expect("read output");
    assert_eq!(text, "1.000000,2.000000\n3.000000,4.000000\n");
}

#[test]
fn run_with_missing_input_reports_the_error() {
    let dir = TempDir::new().expect("tempdir");
    let report_path = dir.path().join("report.json");
    let config = dir.path().join("config.json");
    let json = serde_json::json!({
        "input_path": dir.path().join("missing.txt"),
        "method": "quintic",
        "output_path": &report_path,
    });
    fs::write(&config, json.to_string()).expect("write config");

    probe_mesh()
        .arg("run")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));

    let report = load_report(&report_path);
    assert_eq!(report.requested_method.name(), "quintic");
    assert!(report
        .error
        .as_deref()
        .is_some_and(|msg| msg.contains("missing.txt")));
}

#[test]
fn unknown_method_is_a_usage_error() {
    probe_mesh()
        .args(["resample", "--method", "spline", "whatever.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
