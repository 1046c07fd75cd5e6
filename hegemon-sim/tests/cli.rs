use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_runs_demo_scenario() {
    let mut cmd = Command::cargo_bin("hegemon-sim").unwrap();
    cmd.args(["--ticks", "6", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("simulation finished: 6 ticks"));
}

#[test]
fn test_rejects_missing_scenario_file() {
    let mut cmd = Command::cargo_bin("hegemon-sim").unwrap();
    cmd.args(["--scenario", "does-not-exist.json", "--ticks", "1"])
        .assert()
        .failure();
}
