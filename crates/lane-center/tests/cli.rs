#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn lane_center() -> Command {
    Command::cargo_bin("lane-center").unwrap()
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn synthetic_prints_report() {
    let report = stdout_json(lane_center().arg("synthetic"));
    assert_eq!(report["detected"], true);
    assert_eq!(report["center_x"], 157);
    assert_eq!(report["center_y"], 120);
}

#[test]
fn detect_reads_text_and_image_frames() {
    let dir = tempdir().unwrap();
    for name in ["frame.txt", "frame.png"] {
        let path = dir.path().join(name);
        lane_center()
            .args(["synthetic", "--out"])
            .arg(&path)
            .assert()
            .success();
        assert!(path.exists());

        let report = stdout_json(lane_center().arg("detect").arg(&path));
        assert_eq!(report["center_x"], 157, "{name}");
        assert_eq!(report["left_bound"], 71, "{name}");
        assert_eq!(report["right_bound"], 243, "{name}");
    }
}

#[test]
fn params_file_selects_strategy() {
    let dir = tempdir().unwrap();
    let frame = dir.path().join("frame.txt");
    lane_center()
        .args(["synthetic", "--out"])
        .arg(&frame)
        .assert()
        .success();

    let params = dir.path().join("params.json");
    std::fs::write(&params, r#"{ "strategy": "fixed_split" }"#).unwrap();
    let report = stdout_json(
        lane_center()
            .arg("detect")
            .arg(&frame)
            .arg("--params")
            .arg(&params),
    );
    // Leftmost strongest column in each half.
    assert_eq!(report["left_bound"], 64);
    assert_eq!(report["right_bound"], 240);
    assert_eq!(report["center_x"], 152);

    let report = stdout_json(
        lane_center()
            .arg("detect")
            .arg(&frame)
            .args(["--params"])
            .arg(&params)
            .args(["--strategy", "regions"]),
    );
    assert_eq!(report["center_x"], 157);
}

#[test]
fn empty_frame_reports_sentinels() {
    let dir = tempdir().unwrap();
    let frame = dir.path().join("empty.txt");
    std::fs::write(&frame, "0 0 0 0\n0 0 0 0\n0 0 0 0\n0 0 0 0\n").unwrap();

    let report = stdout_json(lane_center().arg("detect").arg(&frame));
    assert_eq!(report["detected"], false);
    assert_eq!(report["center_x"], -1);
    assert_eq!(report["center_y"], -1);
}

#[test]
fn debug_prints_analysis() {
    let dir = tempdir().unwrap();
    let frame = dir.path().join("frame.txt");
    lane_center()
        .args(["synthetic", "--width", "160", "--height", "120", "--out"])
        .arg(&frame)
        .assert()
        .success();

    let analysis = stdout_json(lane_center().arg("detect").arg(&frame).arg("--debug"));
    assert_eq!(analysis["evidence"], "mask");
    assert!(analysis["valid_columns"].as_array().is_some_and(|c| !c.is_empty()));
    assert_eq!(analysis["regions"].as_array().map(Vec::len), Some(2));
    assert!(analysis["detection"].is_object());
}

#[test]
fn missing_file_fails() {
    lane_center()
        .args(["detect", "does-not-exist.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn malformed_text_grid_names_the_line() {
    let dir = tempdir().unwrap();
    let frame = dir.path().join("bad.txt");
    std::fs::write(&frame, "0 0\n0 oops\n").unwrap();
    lane_center()
        .arg("detect")
        .arg(&frame)
        .assert()
        .failure()
        .stderr(predicate::str::contains("oops"));
}
