use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::str;
use std::fs;

mod common;

#[test]
fn help() {
    Command::cargo_bin("vvjjplot")
        .unwrap()
        .args(["events-control", "--help"])
        .assert()
        .success()
        .stdout(str::starts_with(
            "Control plots of quark-quark, quark-gluon and gluon-gluon dijet events",
        ));
}

#[test]
fn default() {
    let dir = TempDir::new().unwrap();
    let input = common::write(&dir, "events.hist", &common::events());

    Command::cargo_bin("vvjjplot")
        .unwrap()
        .args([
            "--format=svg",
            "events-control",
            input.to_str().unwrap(),
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout("");

    let plots = dir.path().join("qq_qg_gg_events");
    let files = common::files(&plots);

    // one luminosity-normalized plot and one area-normalized plot per selection
    assert_eq!(files.len(), 2 + common::EVENT_SELECTIONS.len());
    assert!(files.contains(&"dijet_mass_lumi_normalized.svg".to_owned()));
    assert!(files.contains(&"dijet_mass_area_normalized.svg".to_owned()));

    for selection in common::EVENT_SELECTIONS {
        let name = format!("dijet_mass_{selection}_area_normalized.svg");
        assert!(files.contains(&name), "{name} is missing");
    }

    let svg = fs::read_to_string(plots.join("dijet_mass_lumi_normalized.svg")).unwrap();

    assert!(svg.contains("quark-gluon"));
    assert!(svg.contains("quark-quark"));
    assert!(svg.contains("gluon-gluon"));
    assert!(svg.contains("Arbitrary Units / 100 GeV"));
}
