//! Figures composed of histograms, graphs, a legend and the experiment label.

use super::canvas::{Anchor, Canvas, TextStyle};
use super::convert::f64_from_usize;
use super::error::{Error, Result};
use super::frame::{Scale, Ticks};
use super::graph::{AsymmErrorGraph, Point};
use super::hist::Histogram;
use super::labels;
use super::style::{Color, SeriesStyle, Style};
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Per-plot settings. The defaults describe an 800×600 linear plot in `GeV`.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotConfig {
    /// Name of the plot, also used as the file name.
    pub name: String,
    /// Title of the x-axis, without units.
    pub x_title: String,
    /// Title of the y-axis.
    pub y_title: String,
    /// Units of the x-axis; an empty string for dimensionless quantities.
    pub x_units: String,
    /// Units of the y-axis.
    pub y_units: String,
    /// Lower end of the displayed x-range.
    pub x_min: Option<f64>,
    /// Upper end of the displayed x-range.
    pub x_max: Option<f64>,
    /// Lower end of the displayed y-range.
    pub y_min: Option<f64>,
    /// Upper end of the displayed y-range.
    pub y_max: Option<f64>,
    /// Add the content above the displayed range to the last displayed bin.
    pub show_overflow: bool,
    /// Add the content below the displayed range to the first displayed bin.
    pub show_underflow: bool,
    /// Width of the canvas in pixels.
    pub width: u32,
    /// Height of the canvas in pixels.
    pub height: u32,
    /// Logarithmic y-axis.
    pub log_scale: bool,
    /// Factor applied to the largest content to leave room for labels; `1` disables it.
    pub empty_scale: f64,
    /// Legend box `[x1, y1, x2, y2]` in fractions of the canvas.
    pub legend_loc: [f64; 4],
    /// Position of the experiment label in fractions of the canvas.
    pub atlas_loc: [f64; 2],
    /// Position of the first extra line in fractions of the canvas.
    pub extra_lines_loc: [f64; 2],
    /// Modifier printed after the experiment label, for example `Internal` or `Preliminary`.
    pub atlas_mod: String,
    /// Integrated luminosity; if `None` no luminosity line is printed.
    pub lumi_val: Option<String>,
    /// Units of the integrated luminosity.
    pub lumi_units: String,
    /// Centre-of-mass energy in TeV.
    pub com_energy: String,
    /// Additional lines printed below the experiment label.
    pub extra_legend_lines: Vec<String>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            name: "plot".to_owned(),
            x_title: String::new(),
            y_title: String::new(),
            x_units: "GeV".to_owned(),
            y_units: String::new(),
            x_min: None,
            x_max: None,
            y_min: None,
            y_max: None,
            show_overflow: false,
            show_underflow: false,
            width: 800,
            height: 600,
            log_scale: false,
            empty_scale: 1.0,
            legend_loc: [0.69, 0.92, 0.92, 0.82],
            atlas_loc: [0.2, 0.90],
            extra_lines_loc: [0.2, 0.80],
            atlas_mod: "Internal".to_owned(),
            lumi_val: None,
            lumi_units: "fb".to_owned(),
            com_energy: "13".to_owned(),
            extra_legend_lines: Vec::new(),
        }
    }
}

/// Settings shared by all plots of a run, usually read from a YAML file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Fonts and axis settings. If not given the defaults of the plot catalogue are used.
    pub style: Option<Style>,
    /// Overrides the modifier printed after the experiment label.
    pub atlas_mod: Option<String>,
    /// Integrated luminosity printed below the experiment label.
    pub lumi_val: Option<String>,
    /// Overrides the units of the integrated luminosity.
    pub lumi_units: Option<String>,
    /// Overrides the centre-of-mass energy in TeV.
    pub com_energy: Option<String>,
}

impl RenderSettings {
    /// Reads the settings from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if `reader` does not contain valid settings.
    pub fn from_yaml(reader: impl Read) -> Result<Self> {
        serde_yaml::from_reader(reader).map_err(|err| Error::Other(err.into()))
    }

    /// Returns the style to use, falling back to `default`.
    #[must_use]
    pub fn style_or(&self, default: Style) -> Style {
        self.style.clone().unwrap_or(default)
    }

    /// Overrides the label settings of `config` with the ones given here.
    pub fn apply(&self, config: &mut PlotConfig) {
        if let Some(atlas_mod) = &self.atlas_mod {
            atlas_mod.clone_into(&mut config.atlas_mod);
        }
        if let Some(lumi_val) = &self.lumi_val {
            config.lumi_val = Some(lumi_val.clone());
        }
        if let Some(lumi_units) = &self.lumi_units {
            lumi_units.clone_into(&mut config.lumi_units);
        }
        if let Some(com_energy) = &self.com_energy {
            com_energy.clone_into(&mut config.com_energy);
        }
    }
}

/// How the points of a series are drawn.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DrawMode {
    /// Area below the bin contents, like ROOT's `hist` option for filled histograms.
    Filled,
    /// Outline of the bin contents, like ROOT's `hist` option for hollow histograms.
    Outline,
    /// Markers with error bars, like ROOT's `PE` options.
    Points,
    /// Boxes spanning the errors of every point, like ROOT's `E2` option.
    Band,
}

#[derive(Clone, Debug)]
struct Series {
    points: Vec<Point>,
    style: SeriesStyle,
    mode: DrawMode,
}

impl Series {
    fn from_histogram(histogram: &Histogram, style: SeriesStyle, mode: DrawMode) -> Self {
        let axis = histogram.axis();
        let mut points: Vec<_> = AsymmErrorGraph::from_histogram(histogram)
            .points()
            .iter()
            .enumerate()
            .filter(|&(index, _)| (axis.first()..=axis.last()).contains(&(index + 1)))
            .map(|(_, point)| *point)
            .collect();

        // histograms are drawn without horizontal error bars
        if mode == DrawMode::Points {
            for point in &mut points {
                point.exl = 0.0;
                point.exh = 0.0;
            }
        }

        Self {
            points,
            style,
            mode,
        }
    }

    fn y_extent(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().flat_map(move |point| match self.mode {
            DrawMode::Filled | DrawMode::Outline => [point.y, point.y],
            DrawMode::Points | DrawMode::Band => [point.y - point.eyl, point.y + point.eyh],
        })
    }
}

#[derive(Clone, Debug)]
struct RatioPanel {
    title: String,
    min: f64,
    max: f64,
    series: Vec<Series>,
}

#[derive(Clone, Copy, Debug)]
struct Area {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Area {
    fn px(&self, scale: &Scale, x: f64) -> f64 {
        self.width.mul_add(scale.fraction(x), self.left)
    }

    fn py(&self, scale: &Scale, y: f64) -> f64 {
        self.height.mul_add(1.0 - scale.fraction(y), self.top)
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// A figure with a main panel, an optional ratio panel, a legend and labels.
#[derive(Clone, Debug)]
pub struct Plot {
    config: PlotConfig,
    style: Style,
    series: Vec<Series>,
    legend: Vec<(String, SeriesStyle, DrawMode)>,
    x_range: Option<(f64, f64)>,
    y_min: Option<f64>,
    y_max: Option<f64>,
    ratio: Option<RatioPanel>,
}

impl Plot {
    /// Constructs an empty plot.
    #[must_use]
    pub const fn new(config: PlotConfig, style: Style) -> Self {
        Self {
            config,
            style,
            series: Vec::new(),
            legend: Vec::new(),
            x_range: None,
            y_min: None,
            y_max: None,
            ratio: None,
        }
    }

    /// Returns the settings of this plot.
    #[must_use]
    pub const fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Draws the displayed range of `histogram`. Series are drawn in the order they are added.
    pub fn add_histogram(&mut self, histogram: &Histogram, style: SeriesStyle, mode: DrawMode) {
        self.series
            .push(Series::from_histogram(histogram, style, mode));
    }

    /// Draws all points of `graph`.
    pub fn add_graph(&mut self, graph: &AsymmErrorGraph, style: SeriesStyle, mode: DrawMode) {
        self.series.push(Series {
            points: graph.points().to_vec(),
            style,
            mode,
        });
    }

    /// Adds an entry to the legend, drawn with the symbol of `mode`.
    pub fn add_legend_entry(&mut self, label: &str, style: &SeriesStyle, mode: DrawMode) {
        self.legend.push((label.to_owned(), style.clone(), mode));
    }

    /// Sets the displayed x-range. If not set the range spans all points.
    pub fn set_x_range(&mut self, min: f64, max: f64) {
        self.x_range = Some((min, max));
    }

    /// Sets the displayed y-range. Limits that are `None` are determined from the points.
    pub fn set_y_range(&mut self, min: Option<f64>, max: Option<f64>) {
        self.y_min = min;
        self.y_max = max;
    }

    /// Returns the y-range set with [`Plot::set_y_range`].
    #[must_use]
    pub const fn y_range(&self) -> (Option<f64>, Option<f64>) {
        (self.y_min, self.y_max)
    }

    /// Adds a ratio panel below the main panel, showing the y-range `[min, max]`.
    pub fn set_ratio_panel(&mut self, title: &str, min: f64, max: f64) {
        self.ratio = Some(RatioPanel {
            title: title.to_owned(),
            min,
            max,
            series: Vec::new(),
        });
    }

    /// Draws `graph` in the ratio panel.
    ///
    /// # Errors
    ///
    /// Returns an error if no ratio panel was set with [`Plot::set_ratio_panel`].
    pub fn add_ratio_graph(
        &mut self,
        graph: &AsymmErrorGraph,
        style: SeriesStyle,
        mode: DrawMode,
    ) -> Result<()> {
        let ratio = self
            .ratio
            .as_mut()
            .ok_or_else(|| Error::General("plot has no ratio panel".to_owned()))?;

        ratio.series.push(Series {
            points: graph.points().to_vec(),
            style,
            mode,
        });

        Ok(())
    }

    fn x_scale(&self) -> Scale {
        let (min, max) = self.x_range.unwrap_or_else(|| {
            match self
                .series
                .iter()
                .flat_map(|series| &series.points)
                .flat_map(|point| [point.x - point.exl, point.x + point.exh])
                .minmax_by(f64::total_cmp)
            {
                MinMaxResult::MinMax(min, max) if min < max => (min, max),
                MinMaxResult::OneElement(x) | MinMaxResult::MinMax(x, _) => (x - 1.0, x + 1.0),
                MinMaxResult::NoElements => (0.0, 1.0),
            }
        });

        Scale::linear(min, max)
    }

    fn y_scale(&self) -> Scale {
        let values: Vec<f64> = self
            .series
            .iter()
            .flat_map(Series::y_extent)
            .filter(|y| y.is_finite() && (!self.config.log_scale || *y > 0.0))
            .collect();

        let data_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let data_min = values.iter().copied().fold(f64::INFINITY, f64::min);

        let max = self.y_max.unwrap_or(if data_max.is_finite() {
            if self.config.log_scale {
                2.0 * data_max
            } else {
                1.05 * data_max
            }
        } else {
            1.0
        });

        let min = self.y_min.unwrap_or(if self.config.log_scale {
            if data_min.is_finite() { 0.5 * data_min } else { 1e-3 * max }
        } else {
            data_min.min(0.0)
        });

        let max = if max > min { max } else { min + 1.0 };

        if self.config.log_scale {
            Scale::log(min, max)
        } else {
            Scale::linear(min, max)
        }
    }

    fn text_size(&self) -> f64 {
        let fraction = if self.config.width == 800 {
            self.style.text_size
        } else {
            0.875 * self.style.text_size
        };

        fraction * f64::from(self.config.height)
    }

    /// Renders the plot onto a new canvas.
    #[must_use]
    pub fn render(&self) -> Canvas {
        let width = f64::from(self.config.width);
        let height = f64::from(self.config.height);
        let mut canvas = Canvas::new(width, height, &self.style.font_family);

        let left = 0.16 * width;
        let frame_width = 0.79 * width;
        let x_scale = self.x_scale();
        let y_scale = self.y_scale();
        let x_title = labels::with_units(&self.config.x_title, &self.config.x_units);

        if let Some(ratio) = &self.ratio {
            let main = Area {
                left,
                top: 0.05 * height,
                width: frame_width,
                height: 0.62 * height,
            };
            let lower = Area {
                left,
                top: 0.69 * height,
                width: frame_width,
                height: 0.15 * height,
            };
            let ratio_scale = Scale::linear(ratio.min, ratio.max);

            Self::draw_series(&mut canvas, main, &x_scale, &y_scale, &self.series);
            self.draw_axes(
                &mut canvas,
                main,
                &x_scale,
                &y_scale,
                ("", self.config.y_title.as_str()),
                false,
            );

            canvas.line(
                (lower.left, lower.py(&ratio_scale, 1.0)),
                (lower.right(), lower.py(&ratio_scale, 1.0)),
                Color::GREY,
                1.0,
            );
            Self::draw_series(&mut canvas, lower, &x_scale, &ratio_scale, &ratio.series);
            self.draw_axes(
                &mut canvas,
                lower,
                &x_scale,
                &ratio_scale,
                (x_title.as_str(), ratio.title.as_str()),
                true,
            );
        } else {
            let main = Area {
                left,
                top: 0.05 * height,
                width: frame_width,
                height: 0.79 * height,
            };

            Self::draw_series(&mut canvas, main, &x_scale, &y_scale, &self.series);
            self.draw_axes(
                &mut canvas,
                main,
                &x_scale,
                &y_scale,
                (x_title.as_str(), self.config.y_title.as_str()),
                true,
            );
        }

        self.draw_decorations(&mut canvas);

        canvas
    }

    fn draw_series(canvas: &mut Canvas, area: Area, x: &Scale, y: &Scale, series: &[Series]) {
        let base = area.bottom();

        canvas.begin_clip(area.left, area.top, area.width, area.height);

        for Series {
            points,
            style,
            mode,
        } in series
        {
            match mode {
                DrawMode::Filled | DrawMode::Outline => {
                    let mut path = Vec::with_capacity(2 * points.len() + 2);

                    for (index, point) in points.iter().enumerate() {
                        let lo = area.px(x, point.x - point.exl);
                        let hi = area.px(x, point.x + point.exh);
                        let py = area.py(y, point.y).min(base);

                        if index == 0 {
                            path.push((lo, base));
                        }
                        path.push((lo, py));
                        path.push((hi, py));
                        if index == points.len() - 1 {
                            path.push((hi, base));
                        }
                    }

                    if *mode == DrawMode::Filled {
                        let outline = style.line.map(|c| (c, style.line_width));
                        canvas.polygon(&path, style.fill, outline);
                    } else if let Some(color) = style.line.or(style.fill) {
                        canvas.polyline(
                            &path,
                            color,
                            style.line_width.max(1.0),
                            style.dash.as_deref(),
                        );
                    }
                }
                DrawMode::Band => {
                    for point in points {
                        let x0 = area.px(x, point.x - point.exl);
                        let x1 = area.px(x, point.x + point.exh);
                        let y0 = area.py(y, point.y + point.eyh);
                        let y1 = area.py(y, point.y - point.eyl).min(base);

                        canvas.rect(x0, y0, x1 - x0, y1 - y0, style.fill, None);
                    }
                }
                DrawMode::Points => {
                    for point in points
                        .iter()
                        .filter(|point| point.y.is_finite() && (!y.log || point.y > 0.0))
                    {
                        let px = area.px(x, point.x);
                        let py = area.py(y, point.y);

                        if let Some(color) = style.line {
                            let width = style.line_width;

                            if point.eyl > 0.0 || point.eyh > 0.0 {
                                let lo = area.py(y, point.y - point.eyl).min(base);
                                let hi = area.py(y, point.y + point.eyh);
                                canvas.line((px, lo), (px, hi), color, width);
                            }

                            if point.exl > 0.0 || point.exh > 0.0 {
                                canvas.line(
                                    (area.px(x, point.x - point.exl), py),
                                    (area.px(x, point.x + point.exh), py),
                                    color,
                                    width,
                                );
                            }
                        }

                        if let Some(marker) = &style.marker {
                            canvas.marker(px, py, marker);
                        }
                    }
                }
            }
        }

        canvas.end_clip();
    }

    fn draw_axes(
        &self,
        canvas: &mut Canvas,
        area: Area,
        x: &Scale,
        y: &Scale,
        (x_title, y_title): (&str, &str),
        x_labels: bool,
    ) {
        let label = TextStyle::new(self.style.label_size);
        let title = TextStyle::new(self.style.title_size);
        let major = 0.03 * area.height.min(area.width).max(150.0);
        let minor = 0.5 * major;

        canvas.rect(area.left, area.top, area.width, area.height, None, Some((Color::BLACK, 1.0)));

        let x_ticks = x.ticks(self.style.max_digits);
        let y_ticks = y.ticks(self.style.max_digits);

        for (ticks, length) in [(&x_ticks.major, major), (&x_ticks.minor, minor)] {
            for &tick in ticks {
                let px = area.px(x, tick);
                canvas.line((px, area.bottom()), (px, area.bottom() - length), Color::BLACK, 1.0);
                canvas.line((px, area.top), (px, area.top + length), Color::BLACK, 1.0);
            }
        }

        for (ticks, length) in [(&y_ticks.major, major), (&y_ticks.minor, minor)] {
            for &tick in ticks {
                let py = area.py(y, tick);
                canvas.line((area.left, py), (area.left + length, py), Color::BLACK, 1.0);
                canvas.line((area.right(), py), (area.right() - length, py), Color::BLACK, 1.0);
            }
        }

        if x_labels {
            let style = label.clone().anchor(Anchor::Middle);
            let baseline = 1.3f64.mul_add(self.style.label_size, area.bottom());

            for (&tick, text) in x_ticks.major.iter().zip(&x_ticks.labels) {
                canvas.text(area.px(x, tick), baseline, text, &style);
            }

            if let Some(text) = exponent_label(&x_ticks) {
                canvas.text(
                    area.right(),
                    2.4f64.mul_add(self.style.label_size, area.bottom()),
                    &text,
                    &label.clone().anchor(Anchor::End),
                );
            }

            canvas.text(
                area.right(),
                2.6f64.mul_add(self.style.title_size, area.bottom()),
                x_title,
                &title.clone().anchor(Anchor::End),
            );
        }

        let style = label.clone().anchor(Anchor::End);
        let label_x = area.left - 0.4 * self.style.label_size;

        for (&tick, text) in y_ticks.major.iter().zip(&y_ticks.labels) {
            let baseline = 0.35f64.mul_add(self.style.label_size, area.py(y, tick));
            canvas.text(label_x, baseline, text, &style);
        }

        if let Some(text) = exponent_label(&y_ticks) {
            canvas.text(area.left, area.top - 0.4 * self.style.label_size, &text, &label);
        }

        canvas.text(
            (-self.style.y_title_offset * 1.6).mul_add(self.style.title_size, area.left),
            area.top,
            y_title,
            &title.anchor(Anchor::End).rotate(-90.0),
        );
    }

    fn draw_decorations(&self, canvas: &mut Canvas) {
        let width = canvas.width();
        let height = canvas.height();
        let size = self.text_size();
        let config = &self.config;

        let [x, y] = config.atlas_loc;
        let atlas = TextStyle::new(size).bold_italic();
        let atlas_x = x * width;
        let atlas_y = (1.0 - y) * height;

        canvas.text(atlas_x, atlas_y, "ATLAS", &atlas);
        canvas.text(
            canvas.text_width("ATLAS ", &atlas).mul_add(1.1, atlas_x),
            atlas_y,
            &config.atlas_mod,
            &TextStyle::new(size),
        );

        if let Some(lumi_val) = &config.lumi_val {
            canvas.text(
                atlas_x,
                (1.0 - y + 0.05) * height,
                &format!(
                    "#sqrt{{s}} = {} TeV, {lumi_val} {}^{{-1}}",
                    config.com_energy, config.lumi_units
                ),
                &TextStyle::new(size),
            );
        }

        let [x, mut y] = config.extra_lines_loc;
        for line in &config.extra_legend_lines {
            canvas.text(x * width, (1.0 - y) * height, line, &TextStyle::new(size));
            y -= 0.05;
        }

        self.draw_legend(canvas);
    }

    fn draw_legend(&self, canvas: &mut Canvas) {
        if self.legend.is_empty() {
            return;
        }

        let [x1, y1, x2, y2] = self.config.legend_loc;
        let width = canvas.width();
        let height = canvas.height();

        let left = x1.min(x2) * width;
        let box_width = (x2 - x1).abs() * width;
        let top = (1.0 - y1.max(y2)) * height;
        let row = (y1 - y2).abs() * height / f64_from_usize(self.legend.len());
        let symbol_width = 0.22 * box_width;
        let text = TextStyle::new(self.style.legend_size);

        for (index, (label, style, mode)) in self.legend.iter().enumerate() {
            let center = (f64_from_usize(index) + 0.5).mul_add(row, top);
            let sx0 = 0.02f64.mul_add(box_width, left);
            let sx1 = sx0 + symbol_width;
            let half = 0.3 * row;

            match mode {
                DrawMode::Filled | DrawMode::Band => {
                    canvas.rect(
                        sx0,
                        center - half,
                        symbol_width,
                        2.0 * half,
                        style.fill,
                        style.line.map(|c| (c, 1.0)),
                    );
                }
                DrawMode::Outline => {
                    if let Some(color) = style.line.or(style.fill) {
                        canvas.polyline(
                            &[(sx0, center), (sx1, center)],
                            color,
                            style.line_width.max(1.0),
                            style.dash.as_deref(),
                        );
                    }
                }
                DrawMode::Points => {
                    let mid = 0.5 * (sx0 + sx1);

                    if let Some(color) = style.line {
                        let (from, to) = ((mid, center - half), (mid, center + half));
                        canvas.line(from, to, color, style.line_width);
                    }
                    if let Some(marker) = &style.marker {
                        canvas.marker(mid, center, marker);
                    }
                }
            }

            canvas.text(
                0.06f64.mul_add(box_width, sx1),
                0.35f64.mul_add(self.style.legend_size, center),
                label,
                &text,
            );
        }
    }

    /// Renders the plot and writes it to `path`, as PDF or SVG depending on the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can not be written.
    pub fn print_to_file(&self, path: &Path) -> Result<()> {
        self.render().save(path)?;

        tracing::info!("wrote {}", path.display());

        Ok(())
    }
}

fn exponent_label(ticks: &Ticks) -> Option<String> {
    ticks.exponent.map(|exp| format!("#times10^{{{exp}}}"))
}
