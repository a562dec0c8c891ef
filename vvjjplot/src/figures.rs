//! Control, efficiency and data/simulation figures built from histograms.
//!
//! Every figure takes a [`PlotConfig`] and the histograms of its samples, applies normalization,
//! displayed range and folding to copies of them, and returns a [`Plot`] ready to be rendered.

use super::axis::Axis;
use super::error::Result;
use super::graph::AsymmErrorGraph;
use super::hist::Histogram;
use super::labels;
use super::plot::{DrawMode, Plot, PlotConfig};
use super::style::{Color, SeriesStyle, Style};
use super::systematics::{self, Systematics};

/// Smallest value shown on the y-axis of control plots.
pub const CONTROL_Y_MIN: f64 = 0.01;

/// A histogram together with its legend label and style.
#[derive(Clone, Debug)]
pub struct Sample {
    /// Label shown in the legend.
    pub label: String,
    /// Histogram of the sample.
    pub histogram: Histogram,
    /// How the histogram is drawn.
    pub style: SeriesStyle,
}

impl Sample {
    /// Constructor.
    #[must_use]
    pub fn new(label: &str, histogram: Histogram, style: SeriesStyle) -> Self {
        Self {
            label: label.to_owned(),
            histogram,
            style,
        }
    }
}

/// Scales all samples to the integral of the sample with index `reference`, if given, then
/// restricts them to the x-range of `config` and folds under- and overflow as requested.
///
/// Samples with a vanishing integral are left unscaled.
///
/// # Errors
///
/// Returns [`Error::BinCountMismatch`](super::error::Error::BinCountMismatch) if the samples
/// have different binnings.
pub fn prepare_samples(
    config: &PlotConfig,
    samples: &mut [Sample],
    reference: Option<usize>,
) -> Result<()> {
    let Some((first, rest)) = samples.split_first() else {
        return Ok(());
    };

    for sample in rest {
        first.histogram.check_size(&sample.histogram)?;
    }

    if let Some(target) = reference
        .and_then(|index| samples.get(index))
        .map(|sample| sample.histogram.integral())
    {
        for (_, sample) in samples
            .iter_mut()
            .enumerate()
            .filter(|&(index, _)| Some(index) != reference)
        {
            let integral = sample.histogram.integral();

            if integral == 0.0 {
                tracing::warn!(
                    "histogram `{}` is empty and can not be normalized",
                    sample.histogram.name()
                );
            } else {
                sample.histogram.scale(target / integral);
            }
        }
    }

    for sample in samples.iter_mut() {
        restrict(config, &mut sample.histogram);
    }

    Ok(())
}

fn restrict(config: &PlotConfig, histogram: &mut Histogram) {
    let axis = histogram.axis();
    let lo = config.x_min.unwrap_or_else(|| axis.left());
    let hi = config.x_max.unwrap_or_else(|| axis.right());

    histogram.set_range_user(lo, hi);

    if config.show_overflow {
        histogram.fold_overflow();
    }

    if config.show_underflow {
        histogram.fold_underflow();
    }
}

/// Returns the y-axis title `<quantity> / <bin width> <units>`.
#[must_use]
pub fn y_title(quantity: &str, axis: &Axis, units: &str) -> String {
    let width = if axis.bins() == 0 { 0.0 } else { axis.width(1) };

    format!("{quantity} / {} {units}", labels::format_bin_width(width))
        .trim_end()
        .to_owned()
}

fn head_room(config: &PlotConfig, maximum: f64) -> Option<f64> {
    if config.y_max.is_some() {
        config.y_max
    } else if config.empty_scale == 1.0 {
        None
    } else if config.log_scale {
        Some(maximum * 10.0 * config.empty_scale)
    } else {
        Some(maximum * config.empty_scale)
    }
}

fn with_default_x_title(mut config: PlotConfig) -> PlotConfig {
    if config.x_title.is_empty() {
        labels::axis_title(&config.name).clone_into(&mut config.x_title);
    }

    config
}

/// Graph of the points of `graph` whose x-coordinate lies in the displayed range of `axis`.
fn visible(graph: &AsymmErrorGraph, axis: &Axis) -> AsymmErrorGraph {
    let (lo, hi) = (axis.range_left(), axis.range_right());

    AsymmErrorGraph::new(
        graph.name(),
        graph
            .points()
            .iter()
            .filter(|point| point.x >= lo && point.x <= hi)
            .copied()
            .collect(),
    )
}

/// Distributions of several samples of the same quantity on top of each other.
#[derive(Clone, Debug)]
pub struct ControlPlot {
    config: PlotConfig,
    samples: Vec<Sample>,
    reference: Option<usize>,
    mode: DrawMode,
    draw_order: Vec<usize>,
    quantity: String,
}

impl ControlPlot {
    /// Constructs a control plot drawing `samples` as filled histograms, in the order given.
    #[must_use]
    pub fn new(config: PlotConfig, samples: Vec<Sample>) -> Self {
        let draw_order = (0..samples.len()).collect();

        Self {
            config: with_default_x_title(config),
            samples,
            reference: None,
            mode: DrawMode::Filled,
            draw_order,
            quantity: "Arbitrary Units".to_owned(),
        }
    }

    /// Normalizes every sample to the integral of the sample with index `reference`.
    #[must_use]
    pub const fn normalize_to(mut self, reference: usize) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Draws all samples with `mode`.
    #[must_use]
    pub const fn draw_mode(mut self, mode: DrawMode) -> Self {
        self.mode = mode;
        self
    }

    /// Draws the samples in the order of the indices in `order`. The legend keeps the order of
    /// the samples.
    #[must_use]
    pub fn draw_order(mut self, order: &[usize]) -> Self {
        self.draw_order = order.to_vec();
        self
    }

    /// Returns the settings of this plot.
    #[must_use]
    pub const fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Prepares the histograms and composes the plot.
    ///
    /// # Errors
    ///
    /// Returns an error if the samples have different binnings.
    pub fn build(mut self, style: Style) -> Result<Plot> {
        prepare_samples(&self.config, &mut self.samples, self.reference)?;

        let Some(first) = self.samples.first() else {
            return Ok(Plot::new(self.config, style));
        };

        let axis = first.histogram.axis().clone();
        let maximum = self
            .samples
            .iter()
            .map(|sample| sample.histogram.maximum())
            .fold(f64::NEG_INFINITY, f64::max);

        self.config.y_title = y_title(&self.quantity, &axis, &self.config.x_units);

        let y_min = self.config.y_min.unwrap_or(CONTROL_Y_MIN);
        let y_max = head_room(&self.config, maximum);

        let mut plot = Plot::new(self.config, style);
        plot.set_x_range(axis.range_left(), axis.range_right());
        plot.set_y_range(Some(y_min), y_max);

        for &index in &self.draw_order {
            if let Some(sample) = self.samples.get(index) {
                plot.add_histogram(&sample.histogram, sample.style.clone(), self.mode);
            }
        }

        for sample in &self.samples {
            plot.add_legend_entry(&sample.label, &sample.style, self.mode);
        }

        Ok(plot)
    }
}

/// Passing and total histograms of one sample.
#[derive(Clone, Debug)]
pub struct EfficiencySample {
    /// Label shown in the legend.
    pub label: String,
    /// Histogram of the events passing the selection.
    pub pass: Histogram,
    /// Histogram of all events.
    pub total: Histogram,
    /// How the efficiency is drawn.
    pub style: SeriesStyle,
}

impl EfficiencySample {
    /// Constructor.
    #[must_use]
    pub fn new(label: &str, pass: Histogram, total: Histogram, style: SeriesStyle) -> Self {
        Self {
            label: label.to_owned(),
            pass,
            total,
            style,
        }
    }
}

/// Selection efficiencies of several samples.
#[derive(Clone, Debug)]
pub struct EfficiencyPlot {
    config: PlotConfig,
    samples: Vec<EfficiencySample>,
    draw_order: Vec<usize>,
}

impl EfficiencyPlot {
    /// Constructs an efficiency plot drawing `samples` in the order given.
    #[must_use]
    pub fn new(config: PlotConfig, samples: Vec<EfficiencySample>) -> Self {
        let draw_order = (0..samples.len()).collect();

        Self {
            config: with_default_x_title(config),
            samples,
            draw_order,
        }
    }

    /// Draws the samples in the order of the indices in `order`. The legend keeps the order of
    /// the samples.
    #[must_use]
    pub fn draw_order(mut self, order: &[usize]) -> Self {
        self.draw_order = order.to_vec();
        self
    }

    /// Returns the settings of this plot.
    #[must_use]
    pub const fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Divides the histograms and composes the plot.
    ///
    /// # Errors
    ///
    /// Returns an error if the passing and total histograms of a sample can not be divided.
    pub fn build(mut self, style: Style) -> Result<Plot> {
        let graphs = self
            .samples
            .iter()
            .map(|sample| AsymmErrorGraph::efficiency(&sample.pass, &sample.total))
            .collect::<Result<Vec<_>>>()?;

        let Some(first) = self.samples.first() else {
            return Ok(Plot::new(self.config, style));
        };

        let axis = first.pass.axis();
        let x_min = self.config.x_min.unwrap_or_else(|| axis.left());
        let x_max = self.config.x_max.unwrap_or_else(|| axis.right());

        self.config.y_title = y_title("Selection Efficiency", axis, &self.config.x_units);

        let (y_min, y_max) = (self.config.y_min, self.config.y_max);
        let mut plot = Plot::new(self.config, style);
        plot.set_x_range(x_min, x_max);
        plot.set_y_range(y_min, y_max);

        for &index in &self.draw_order {
            if let (Some(graph), Some(sample)) = (graphs.get(index), self.samples.get(index)) {
                plot.add_graph(graph, sample.style.clone(), DrawMode::Points);
            }
        }

        for sample in &self.samples {
            plot.add_legend_entry(&sample.label, &sample.style, DrawMode::Points);
        }

        Ok(plot)
    }
}

/// Data compared to a simulated prediction with systematic uncertainties, with a ratio panel.
///
/// The main panel shows the asymmetric systematic band around the prediction; the ratio panel
/// shows data over prediction together with the symmetrized statistical and systematic
/// uncertainty of the prediction.
#[derive(Clone, Debug)]
pub struct DataMcPlot {
    config: PlotConfig,
    data: Histogram,
    prediction: Histogram,
    systematics: Systematics,
    label: String,
    normalize: bool,
    ratio_range: (f64, f64),
}

impl DataMcPlot {
    /// Constructs a comparison of `data` to `prediction`, labelled `label` in the legend.
    #[must_use]
    pub fn new(
        config: PlotConfig,
        data: Histogram,
        prediction: Histogram,
        systematics: Systematics,
        label: &str,
    ) -> Self {
        Self {
            config: with_default_x_title(config),
            data,
            prediction,
            systematics,
            label: label.to_owned(),
            normalize: false,
            ratio_range: (0.5, 1.5),
        }
    }

    /// Scales the prediction and its variations to the integral of the data.
    #[must_use]
    pub const fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Sets the y-range of the ratio panel.
    #[must_use]
    pub const fn ratio_range(mut self, min: f64, max: f64) -> Self {
        self.ratio_range = (min, max);
        self
    }

    /// Returns the settings of this plot.
    #[must_use]
    pub const fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Combines the uncertainties and composes the plot.
    ///
    /// # Errors
    ///
    /// Returns an error if the data, the prediction or any of its variations have different
    /// binnings.
    pub fn build(mut self, style: Style) -> Result<Plot> {
        self.data.check_size(&self.prediction)?;

        if self.normalize {
            let integral = self.prediction.integral();

            if integral == 0.0 {
                tracing::warn!(
                    "prediction `{}` is empty and can not be normalized to data",
                    self.prediction.name()
                );
            } else {
                let factor = self.data.integral() / integral;

                self.prediction.scale(factor);
                for variation in self.systematics.values_mut() {
                    variation.up.scale(factor);
                    variation.down.scale(factor);
                }
            }
        }

        restrict(&self.config, &mut self.data);
        restrict(&self.config, &mut self.prediction);
        for variation in self.systematics.values_mut() {
            restrict(&self.config, &mut variation.up);
            restrict(&self.config, &mut variation.down);
        }

        let axis = self.prediction.axis().clone();
        let band = systematics::asymmetric_band(&self.prediction, &self.systematics)?;
        let total = systematics::symmetric_errors(&self.prediction, &self.systematics)?;

        let mut reference = AsymmErrorGraph::from_histogram(&self.prediction);
        for point in reference.points_mut() {
            point.eyl = 0.0;
            point.eyh = 0.0;
        }

        let mut data_ratio = AsymmErrorGraph::from_histogram(&self.data).ratio(&reference)?;
        for point in data_ratio.points_mut() {
            point.exl = 0.0;
            point.exh = 0.0;
        }
        let total_ratio = AsymmErrorGraph::from_histogram(&total).ratio(&reference)?;

        let maximum = self.data.maximum().max(self.prediction.maximum());
        self.config.y_title = y_title("Events", &axis, &self.config.x_units);
        let y_min = self.config.y_min;
        let y_max = head_room(&self.config, maximum);

        let data_style = SeriesStyle::data();
        let prediction_style = SeriesStyle {
            line: Some(Color::RED),
            line_width: 2.0,
            ..SeriesStyle::mc_filled(Color::rgb(255, 204, 204))
        };
        let band_style = SeriesStyle::mc_sys_err();
        let (ratio_min, ratio_max) = self.ratio_range;

        let mut plot = Plot::new(self.config, style);
        plot.set_x_range(axis.range_left(), axis.range_right());
        plot.set_y_range(y_min, y_max);

        plot.add_histogram(&self.prediction, prediction_style.clone(), DrawMode::Filled);
        plot.add_graph(&visible(&band, &axis), band_style.clone(), DrawMode::Band);
        plot.add_histogram(&self.data, data_style.clone(), DrawMode::Points);

        plot.add_legend_entry("Data", &data_style, DrawMode::Points);
        plot.add_legend_entry(&self.label, &prediction_style, DrawMode::Filled);
        plot.add_legend_entry("Syst. uncertainty", &band_style, DrawMode::Band);

        plot.set_ratio_panel("Data / MC", ratio_min, ratio_max);
        plot.add_ratio_graph(&visible(&total_ratio, &axis), band_style, DrawMode::Band)?;
        plot.add_ratio_graph(&visible(&data_ratio, &axis), data_style, DrawMode::Points)?;

        Ok(plot)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::style::MarkerShape;
    use crate::systematics::Variation;
    use float_cmp::assert_approx_eq;

    fn histogram(name: &str, contents: &[f64]) -> Histogram {
        let axis = Axis::uniform(contents.len() - 2, 0.0, 10.0 * (contents.len() - 2) as f64)
            .unwrap();
        Histogram::with_contents(name, axis, contents.to_vec(), None).unwrap()
    }

    fn quark_gluon() -> Vec<Sample> {
        vec![
            Sample::new(
                "quark jets",
                histogram("q", &[1.0, 2.0, 4.0, 6.0, 8.0, 3.0]),
                SeriesStyle::mc_marker(Color::BLUE, MarkerShape::TriangleUp, 1.0),
            ),
            Sample::new(
                "gluon jets",
                histogram("g", &[0.0, 1.0, 1.0, 1.0, 2.0, 5.0]),
                SeriesStyle::mc_marker(Color::RED, MarkerShape::TriangleDown, 1.0),
            ),
        ]
    }

    #[test]
    fn normalization_to_reference() {
        let mut samples = quark_gluon();
        prepare_samples(&PlotConfig::default(), &mut samples, Some(0)).unwrap();

        assert_approx_eq!(f64, samples[0].histogram.integral(), 20.0, ulps = 4);
        assert_approx_eq!(f64, samples[1].histogram.integral(), 20.0, ulps = 4);
        assert_approx_eq!(f64, samples[1].histogram.content(4), 8.0, ulps = 4);
    }

    #[test]
    fn empty_samples_are_not_normalized() {
        let mut samples = quark_gluon();
        samples[1].histogram = histogram("g", &[0.0; 6]);
        prepare_samples(&PlotConfig::default(), &mut samples, Some(0)).unwrap();

        assert_eq!(samples[1].histogram.integral(), 0.0);
    }

    #[test]
    fn range_and_folding() {
        let config = PlotConfig {
            x_max: Some(30.0),
            show_overflow: true,
            show_underflow: true,
            ..PlotConfig::default()
        };
        let mut samples = quark_gluon();
        prepare_samples(&config, &mut samples, None).unwrap();

        let quark = &samples[0].histogram;
        assert_eq!(quark.axis().last(), 3);
        assert_eq!(quark.content(1), 3.0);
        assert_eq!(quark.content(3), 17.0);
        // folded bins keep their content
        assert_eq!(quark.content(4), 8.0);
    }

    #[test]
    fn mismatched_samples() {
        let mut samples = quark_gluon();
        samples[1].histogram = histogram("g", &[0.0; 5]);

        assert!(prepare_samples(&PlotConfig::default(), &mut samples, None).is_err());
    }

    #[test]
    fn control_plot_ranges_and_titles() {
        let config = PlotConfig {
            name: "both_jets_ntrk".to_owned(),
            x_title: "Large-R Jet #it{n}_{trk}".to_owned(),
            x_units: String::new(),
            empty_scale: 1.5,
            ..PlotConfig::default()
        };
        let plot = ControlPlot::new(config, quark_gluon())
            .normalize_to(0)
            .draw_mode(DrawMode::Points)
            .build(Style::default())
            .unwrap();

        assert_eq!(plot.config().y_title, "Arbitrary Units / 10.0");
        let (y_min, y_max) = plot.y_range();
        assert_eq!(y_min, Some(CONTROL_Y_MIN));
        assert_approx_eq!(f64, y_max.unwrap(), 12.0, ulps = 4);

        let svg = plot.render().to_svg();
        assert!(svg.contains(">quark jets</text>"));
        assert!(svg.contains(">gluon jets</text>"));
    }

    #[test]
    fn control_plot_log_head_room() {
        let config = PlotConfig {
            name: "dijet_mass_lumi_normalized".to_owned(),
            log_scale: true,
            empty_scale: 5.0,
            ..PlotConfig::default()
        };
        let plot = ControlPlot::new(config, quark_gluon()).build(Style::default()).unwrap();

        assert_eq!(plot.config().x_title, "m_{JJ}");
        assert_eq!(plot.config().y_title, "Arbitrary Units / 10.0 GeV");
        assert_approx_eq!(f64, plot.y_range().1.unwrap(), 400.0, ulps = 4);
    }

    #[test]
    fn efficiency_plot() {
        let total = histogram("first_jet_pt_q", &[0.0, 10.0, 10.0, 0.0, 4.0, 0.0]);
        let pass = histogram("first_jet_pt_W_full_q", &[0.0, 5.0, 1.0, 0.0, 4.0, 0.0]);
        let config = PlotConfig {
            name: "first_jet_pt_W_full_efficiency".to_owned(),
            y_min: Some(1e-6),
            y_max: Some(0.04),
            ..PlotConfig::default()
        };
        let style = SeriesStyle::mc_marker(Color::BLUE, MarkerShape::TriangleUp, 0.8);
        let plot = EfficiencyPlot::new(
            config,
            vec![EfficiencySample::new("quark jets", pass, total, style)],
        );

        assert_eq!(plot.config().x_title, "Leading Large-R Jet #it{p}_{T}");

        let plot = plot.build(Style::default()).unwrap();
        assert_eq!(plot.config().y_title, "Selection Efficiency / 10.0 GeV");
        assert_eq!(plot.y_range(), (Some(1e-6), Some(0.04)));
    }

    #[test]
    fn efficiency_above_unity() {
        let total = histogram("t", &[0.0, 1.0, 0.0]);
        let pass = histogram("p", &[0.0, 2.0, 0.0]);
        let plot = EfficiencyPlot::new(
            PlotConfig::default(),
            vec![EfficiencySample::new("p", pass, total, SeriesStyle::data())],
        );

        assert!(plot.build(Style::default()).is_err());
    }

    #[test]
    fn data_mc_plot() {
        let data = histogram("rljet_m_data", &[0.0, 12.0, 18.0, 9.0, 0.0]);
        let prediction = histogram("rljet_m_pythia", &[0.0, 10.0, 20.0, 10.0, 0.0]);
        let mut systematics = Systematics::new();
        systematics.insert(
            "JET_Rtrk".to_owned(),
            Variation {
                up: histogram("up", &[0.0, 11.0, 22.0, 11.0, 0.0]),
                down: histogram("down", &[0.0, 9.0, 18.0, 9.0, 0.0]),
            },
        );

        let plot = DataMcPlot::new(PlotConfig::default(), data, prediction, systematics, "Pythia 8")
            .normalize(true)
            .build(Style::default())
            .unwrap();

        assert_eq!(plot.config().x_title, "");
        assert_eq!(plot.config().y_title, "Events / 10.0 GeV");

        let svg = plot.render().to_svg();
        assert!(svg.contains(">Data / MC</text>"));
        assert!(svg.contains(">Pythia 8</text>"));
        assert!(svg.contains(">Syst. uncertainty</text>"));
    }

    #[test]
    fn data_mc_mismatch() {
        let data = histogram("data", &[0.0, 1.0, 0.0]);
        let prediction = histogram("mc", &[0.0, 1.0, 1.0, 0.0]);
        let plot = DataMcPlot::new(
            PlotConfig::default(),
            data,
            prediction,
            Systematics::new(),
            "MC",
        );

        assert!(plot.build(Style::default()).is_err());
    }

    #[test]
    fn y_titles() {
        let axis = Axis::uniform(40, 0.0, 100.0).unwrap();

        assert_eq!(y_title("Arbitrary Units", &axis, "GeV"), "Arbitrary Units / 2.5 GeV");
        assert_eq!(y_title("Arbitrary Units", &axis, ""), "Arbitrary Units / 2.5");
    }
}
