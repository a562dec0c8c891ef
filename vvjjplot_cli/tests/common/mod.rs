#![allow(dead_code)]

use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use vvjjplot::axis::Axis;
use vvjjplot::file::HistFile;
use vvjjplot::hist::Histogram;

pub const JET_TAGS: [&str; 13] = [
    "partial_ntrk",
    "W_partial_mass",
    "W_partial_D2",
    "W_partial_massD2",
    "W_partial_massNtrk",
    "W_partial_ntrkD2",
    "W_full",
    "Z_partial_mass",
    "Z_partial_D2",
    "Z_partial_massD2",
    "Z_partial_massNtrk",
    "Z_partial_ntrkD2",
    "Z_full",
];

pub const EVENT_SELECTIONS: [&str; 19] = [
    "partial_ntrk",
    "WW_partial_mass",
    "WZ_partial_mass",
    "ZZ_partial_mass",
    "WW_partial_D2",
    "WZ_partial_D2",
    "ZZ_partial_D2",
    "WW_partial_massD2",
    "WZ_partial_massD2",
    "ZZ_partial_massD2",
    "WW_partial_massNtrk",
    "WZ_partial_massNtrk",
    "ZZ_partial_massNtrk",
    "WW_partial_ntrkD2",
    "WZ_partial_ntrkD2",
    "ZZ_partial_ntrkD2",
    "WW_full",
    "WZ_full",
    "ZZ_full",
];

/// Histogram whose bin centres are filled with `weight(x)`.
pub fn histogram(bins: usize, left: f64, right: f64, weight: impl Fn(f64) -> f64) -> Histogram {
    let mut histogram = Histogram::new("", Axis::uniform(bins, left, right).unwrap());
    let width = (right - left) / bins as f64;

    for bin in 0..bins {
        let x = left + (bin as f64 + 0.5) * width;
        histogram.fill_weighted(x, weight(x));
    }

    histogram
}

fn falling(scale: f64) -> impl Fn(f64) -> f64 {
    move |x| scale * 1e6 / (1.0 + x / 100.0).powi(4)
}

/// Quark and gluon jet histograms of both leading jets.
pub fn jets() -> HistFile {
    let mut file = HistFile::new();

    for (flavour, scale) in [("q", 1.0), ("g", 2.0)] {
        for jet in ["first", "second"] {
            file.insert(
                &format!("{jet}_jet_m_{flavour}"),
                histogram(40, 0.0, 400.0, |x| scale * (1.0 + (x - 90.0).abs()).recip()),
            );
            file.insert(
                &format!("{jet}_jet_ntrk_{flavour}"),
                histogram(100, 0.0, 100.0, |x| scale * (x + 1.0)),
            );
            file.insert(
                &format!("{jet}_jet_D2_{flavour}"),
                histogram(50, 0.0, 5.0, |x| scale * (5.0 - x)),
            );
            file.insert(
                &format!("{jet}_jet_pt_{flavour}"),
                histogram(40, 0.0, 2000.0, falling(scale)),
            );

            for tag in JET_TAGS {
                file.insert(
                    &format!("{jet}_jet_pt_{tag}_{flavour}"),
                    histogram(40, 0.0, 2000.0, falling(0.1 * scale)),
                );
            }
        }
    }

    file
}

/// Quark-quark, quark-gluon and gluon-gluon dijet histograms.
pub fn events() -> HistFile {
    let mut file = HistFile::new();

    for (pair, scale) in [("qq", 0.5), ("qg", 2.0), ("gg", 1.0)] {
        file.insert(
            &format!("dijet_mass_{pair}"),
            histogram(50, 0.0, 5000.0, falling(scale)),
        );

        for selection in EVENT_SELECTIONS {
            file.insert(
                &format!("dijet_mass_{selection}_{pair}"),
                histogram(50, 0.0, 5000.0, falling(0.01 * scale)),
            );
        }
    }

    file
}

/// Data, simulation and one systematic source of the large-R jet mass.
pub fn data_mc() -> HistFile {
    let mut file = HistFile::new();

    file.insert(
        "nominal/data/rljet_m_data",
        histogram(30, 0.0, 300.0, |x| 1000.0 * (-x / 100.0).exp()),
    );
    file.insert(
        "nominal/pythia/rljet_m_pythia",
        histogram(30, 0.0, 300.0, |x| 900.0 * (-x / 100.0).exp()),
    );
    file.insert(
        "JES__1up/pythia/rljet_m_pythia",
        histogram(30, 0.0, 300.0, |x| 990.0 * (-x / 100.0).exp()),
    );
    file.insert(
        "JES__1down/pythia/rljet_m_pythia",
        histogram(30, 0.0, 300.0, |x| 855.0 * (-x / 100.0).exp()),
    );
    file.set_key_value("generator", "Pythia 8");

    file
}

/// Writes `file` into `dir` and returns its path.
pub fn write(dir: &TempDir, name: &str, file: &HistFile) -> PathBuf {
    let child = dir.child(name);
    file.write_lz4(File::create(child.path()).unwrap()).unwrap();
    child.path().to_path_buf()
}

/// Sorted names of the files in `dir`.
pub fn files(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}
