use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn headless_run_keeps_idle_camera_at_its_start_state() {
    let mut cmd = Command::cargo_bin("cratewalk").expect("binary exists");
    cmd.arg("--headless").arg("--frames").arg("120");
    cmd.assert()
        .success()
        .stdout(contains("Simulated 120 frame(s) without a window"))
        .stdout(contains(" - mode 0"))
        .stdout(contains(
            " - primary eye=(0.00, 0.00, -10.00) target=(0.00, 0.00, 0.00)",
        ))
        .stdout(contains(
            " - secondary eye=(0.00, 0.00, -10.00) target=(0.00, 0.00, 0.00)",
        ));
}

#[test]
fn frames_flag_implies_headless() {
    let mut cmd = Command::cargo_bin("cratewalk").expect("binary exists");
    cmd.arg("--frames").arg("1");
    cmd.assert()
        .success()
        .stdout(contains("Simulated 1 frame(s) without a window"));
}

#[test]
fn unknown_arguments_are_rejected() {
    let mut cmd = Command::cargo_bin("cratewalk").expect("binary exists");
    cmd.arg("--bogus");
    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument"));
}
