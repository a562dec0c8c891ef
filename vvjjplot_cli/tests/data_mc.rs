use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;
use predicates::str;
use std::fs;

mod common;

#[test]
fn help() {
    Command::cargo_bin("vvjjplot")
        .unwrap()
        .args(["data-mc", "--help"])
        .assert()
        .success()
        .stdout(
            str::starts_with("Data compared to simulation")
                .and(str::contains("--branch <BRANCH>"))
                .and(str::contains("[default: nominal]"))
                .and(str::contains("--generator <GENERATOR>"))
                .and(str::contains("[default: pythia]"))
                .and(str::contains("--normalize"))
                .and(str::contains("--log-scale")),
        );
}

#[test]
fn default() {
    let dir = TempDir::new().unwrap();
    let input = common::write(&dir, "data_mc.hist", &common::data_mc());

    Command::cargo_bin("vvjjplot")
        .unwrap()
        .args([
            "--format=svg",
            "data-mc",
            "--label=Pythia 8",
            input.to_str().unwrap(),
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout("");

    let plots = dir.path().join("data_mc");

    assert_eq!(common::files(&plots), ["rljet_m.svg"]);

    let svg = fs::read_to_string(plots.join("rljet_m.svg")).unwrap();

    assert!(svg.contains("Data / MC"));
    assert!(svg.contains("Pythia 8"));
    assert!(svg.contains("Syst. uncertainty"));
    assert!(svg.contains("Events / 10.0 GeV"));
}

#[test]
fn normalize_log_scale() {
    let dir = TempDir::new().unwrap();
    let input = common::write(&dir, "data_mc.hist", &common::data_mc());

    Command::cargo_bin("vvjjplot")
        .unwrap()
        .args([
            "--format=svg",
            "data-mc",
            "--normalize",
            "--log-scale",
            "--variables=rljet_m",
            input.to_str().unwrap(),
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(dir.path().join("data_mc/rljet_m.svg")).unwrap();

    assert!(svg.contains("pythia"));
}

#[test]
fn no_histograms() {
    let dir = TempDir::new().unwrap();
    let input = common::write(&dir, "data_mc.hist", &common::data_mc());

    Command::cargo_bin("vvjjplot")
        .unwrap()
        .args([
            "--format=svg",
            "data-mc",
            "--branch=JES__1up",
            input.to_str().unwrap(),
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(str::contains(
            "no histograms of `data` found in branch `JES__1up`",
        ));

    assert!(common::files(&dir.path().join("data_mc")).is_empty());
}

#[test]
fn unknown_variable() {
    let dir = TempDir::new().unwrap();
    let input = common::write(&dir, "data_mc.hist", &common::data_mc());

    Command::cargo_bin("vvjjplot")
        .unwrap()
        .args([
            "--format=svg",
            "data-mc",
            "--variables=rljet_pt",
            input.to_str().unwrap(),
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(str::contains(
            "histogram `nominal/data/rljet_pt_data` not found",
        ));
}
