use anyhow::Result;
use float_cmp::assert_approx_eq;
use rand::Rng;
use rand_pcg::Pcg64;
use std::io::Cursor;
use std::mem;
use vvjjplot::axis::Axis;
use vvjjplot::figures::{ControlPlot, DataMcPlot, EfficiencyPlot, EfficiencySample, Sample};
use vvjjplot::file::HistFile;
use vvjjplot::graph::AsymmErrorGraph;
use vvjjplot::hist::Histogram;
use vvjjplot::plot::{DrawMode, PlotConfig};
use vvjjplot::style::{Color, MarkerShape, SeriesStyle, Style};
use vvjjplot::systematics;

const EVENTS: usize = 20_000;

// falling jet-pt spectrum between 200 GeV and roughly 4 TeV
fn jet_pt(rng: &mut impl Rng) -> f64 {
    200.0 / (1.0 - 0.95 * rng.r#gen::<f64>())
}

// jet mass smeared around a peak, with a tail that reaches into the underflow
fn jet_mass(rng: &mut impl Rng, peak: f64) -> f64 {
    peak + 60.0 * (rng.r#gen::<f64>() + rng.r#gen::<f64>() - 1.0) * 2.0
}

fn fill_selection(rng: &mut impl Rng) -> Result<HistFile> {
    let mut file = HistFile::new();

    for (suffix, peak) in [("q", 60.0), ("g", 110.0)] {
        let mut pt = Histogram::new(
            &format!("first_jet_pt_{suffix}"),
            Axis::uniform(40, 0.0, 4000.0)?,
        );
        let mut tagged = Histogram::new(
            &format!("first_jet_pt_W_partial_mass_{suffix}"),
            Axis::uniform(40, 0.0, 4000.0)?,
        );
        let mut mass = Histogram::new(
            &format!("first_jet_m_{suffix}"),
            Axis::uniform(40, 0.0, 400.0)?,
        );

        for _ in 0..EVENTS {
            let pt_value = jet_pt(rng);
            let mass_value = jet_mass(rng, peak);

            pt.fill(pt_value);
            mass.fill(mass_value);

            if (65.0..95.0).contains(&mass_value) {
                tagged.fill(pt_value);
            }
        }

        for histogram in [pt, tagged, mass] {
            file.insert(&histogram.name().to_owned(), histogram);
        }
    }

    Ok(file)
}

#[test]
fn dijet_selection() -> Result<()> {
    let mut rng = Pcg64::new(0xcafef00dd15ea5e5, 0xa02bdbf7bb3c0a7ac28fa16a64abf96);
    let file = fill_selection(&mut rng)?;

    // TEST 1: `write` and `read`
    let mut buffer = Cursor::new(Vec::new());
    file.write_lz4(&mut buffer)?;
    buffer.set_position(0);
    mem::drop(file);
    let file = HistFile::read(&mut buffer)?;

    assert_eq!(file.len(), 6);

    // TEST 2: every event is somewhere, including under- and overflow
    let mass = file.get("first_jet_m_q")?;
    let all: f64 = mass.contents().iter().sum();
    assert_approx_eq!(f64, all, EVENTS as f64, ulps = 2);
    assert!(mass.content(0) > 0.0);

    // TEST 3: folding moves the content outside of the displayed range into it
    let mut folded = mass.clone();
    folded.set_range_user(50.0, 200.0);
    let inside = folded.integral();
    folded.fold_underflow();
    folded.fold_overflow();
    assert_approx_eq!(f64, folded.integral(), all, ulps = 4);
    assert!(folded.integral() > inside);

    // TEST 4: efficiencies are probabilities with errors inside `[0, 1]`
    let efficiency = AsymmErrorGraph::efficiency(
        file.get("first_jet_pt_W_partial_mass_q")?,
        file.get("first_jet_pt_q")?,
    )?;

    assert!(!efficiency.is_empty());
    for point in efficiency.points() {
        assert!((0.0..=1.0).contains(&point.y));
        assert!(point.y - point.eyl >= 0.0);
        assert!(point.y + point.eyh <= 1.0 + 1e-12);
    }

    // TEST 5: a histogram divided by itself is one, with the errors of both added
    let graph = AsymmErrorGraph::from_histogram(file.get("first_jet_pt_q")?);
    let ratio = graph.ratio(&graph)?;

    for (point, original) in ratio.points().iter().zip(graph.points()) {
        if original.y == 0.0 {
            assert_eq!(point.y, -1000.0);
        } else {
            assert_approx_eq!(f64, point.y, 1.0, ulps = 2);
            assert_approx_eq!(
                f64,
                point.eyh,
                2.0_f64.sqrt() * original.eyh / original.y,
                epsilon = 1e-12
            );
        }
    }

    // TEST 6: area-normalized control plot
    let quark = Sample::new(
        "quark jets",
        file.get("first_jet_m_q")?.clone(),
        SeriesStyle::mc_marker(Color::BLUE, MarkerShape::TriangleUp, 1.0),
    );
    let gluon = Sample::new(
        "gluon jets",
        file.get("first_jet_m_g")?.clone(),
        SeriesStyle::mc_marker(Color::RED, MarkerShape::TriangleDown, 1.0),
    );
    let config = PlotConfig {
        name: "first_jet_mass_normalized".to_owned(),
        x_min: Some(50.0),
        x_max: Some(200.0),
        empty_scale: 1.5,
        ..PlotConfig::default()
    };
    let plot = ControlPlot::new(config, vec![quark, gluon])
        .normalize_to(0)
        .draw_mode(DrawMode::Points)
        .build(Style::sane_defaults(true).with_max_digits(3))?;

    assert_eq!(plot.config().x_title, "Leading Large-R Jet Mass");
    assert_eq!(plot.config().y_title, "Arbitrary Units / 10.0 GeV");
    assert!(plot.render().to_svg().contains(">gluon jets</text>"));

    // TEST 7: efficiency plot
    let config = PlotConfig {
        name: "first_jet_pt_W_partial_mass_efficiency".to_owned(),
        x_min: Some(500.0),
        x_max: Some(1500.0),
        y_min: Some(1e-6),
        y_max: Some(0.2),
        ..PlotConfig::default()
    };
    let samples = ["q", "g"]
        .into_iter()
        .map(|suffix| -> Result<_> {
            Ok(EfficiencySample::new(
                suffix,
                file.get(&format!("first_jet_pt_W_partial_mass_{suffix}"))?.clone(),
                file.get(&format!("first_jet_pt_{suffix}"))?.clone(),
                SeriesStyle::data(),
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    let plot = EfficiencyPlot::new(config, samples).build(Style::default())?;

    assert_eq!(plot.config().y_title, "Selection Efficiency / 100 GeV");

    // TEST 8: data compared to a prediction with a flat systematic variation
    let data = file.get("first_jet_m_q")?.clone();
    let mut prediction = file.get("first_jet_m_g")?.clone();
    prediction.scale(data.integral() / prediction.integral());

    let mut up = prediction.clone();
    up.scale(1.1);
    let mut down = prediction.clone();
    down.scale(0.9);

    let mut variations = systematics::Systematics::new();
    variations.insert("flat".to_owned(), systematics::Variation { up, down });

    let band = systematics::asymmetric_band(&prediction, &variations)?;
    for (point, bin) in band.points().iter().zip(1..) {
        assert_approx_eq!(f64, point.eyh, 0.1 * prediction.content(bin), epsilon = 1e-9);
        assert_approx_eq!(f64, point.eyl, 0.1 * prediction.content(bin), epsilon = 1e-9);
    }

    let plot = DataMcPlot::new(PlotConfig::default(), data, prediction, variations, "Pythia 8")
        .build(Style::default())?;

    assert!(plot.render().to_svg().contains(">Data / MC</text>"));

    Ok(())
}
