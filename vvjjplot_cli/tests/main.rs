use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;
use predicates::str;

mod common;

#[test]
fn help() {
    Command::cargo_bin("vvjjplot")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            str::contains("Usage: vvjjplot [OPTIONS] <COMMAND>")
                .and(str::contains("data-mc"))
                .and(str::contains("events-control"))
                .and(str::contains("events-efficiency"))
                .and(str::contains("jets-control"))
                .and(str::contains("jets-efficiency"))
                .and(str::contains("read"))
                .and(str::contains("--log-level <LEVEL>"))
                .and(str::contains("--format <FORMAT>"))
                .and(str::contains("--config <FILE>")),
        );
}

#[test]
fn no_arguments() {
    Command::cargo_bin("vvjjplot")
        .unwrap()
        .assert()
        .failure()
        .stderr(str::contains("Usage: vvjjplot [OPTIONS] <COMMAND>"));
}

#[test]
fn missing_input() {
    let output = TempDir::new().unwrap();

    Command::cargo_bin("vvjjplot")
        .unwrap()
        .args([
            "--format=svg",
            "jets-control",
            "does-not-exist.hist",
            output.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr("Failed to open raw control plot file: does-not-exist.hist\nexiting...\n");

    assert!(!output.path().join("quark_gluon_jets").exists());
}

#[test]
fn invalid_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("garbage.hist");
    std::fs::write(&input, "- not a histogram file").unwrap();

    Command::cargo_bin("vvjjplot")
        .unwrap()
        .args(["read", input.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(str::starts_with("Error: could not read"));
}

#[test]
fn invalid_config() {
    let dir = TempDir::new().unwrap();
    let input = common::write(&dir, "jets.hist", &common::jets());
    let config = dir.path().join("settings.yaml");
    std::fs::write(&config, "unknown_key: 1\n").unwrap();

    Command::cargo_bin("vvjjplot")
        .unwrap()
        .args([
            "--format=svg",
            &format!("--config={}", config.to_str().unwrap()),
            "jets-control",
            input.to_str().unwrap(),
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(str::contains("invalid settings in"));
}
