//! Colours, markers and the global plot style.

use super::canvas::EMBEDDED_FONT_FAMILY;
use serde::{Deserialize, Serialize};

/// An RGB colour with an opacity.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Color {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
    /// Opacity between `0` (transparent) and `1` (opaque).
    #[serde(default = "opaque")]
    pub alpha: f64,
}

const fn opaque() -> f64 {
    1.0
}

impl Color {
    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Bright green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// The darker green used for systematic error bands.
    pub const DARK_GREEN: Self = Self::rgb(0, 153, 0);
    /// The soft green used for quark-quark events.
    pub const SOFT_GREEN: Self = Self::rgb(89, 212, 84);
    /// Grey used for reference lines.
    pub const GREY: Self = Self::rgb(128, 128, 128);

    /// Constructs an opaque colour.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// Returns this colour with opacity `alpha`.
    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// Returns the colour in hexadecimal SVG notation, without the opacity.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Returns `true` if this colour is not fully opaque.
    #[must_use]
    pub fn is_translucent(&self) -> bool {
        self.alpha < 1.0
    }
}

/// Shape of the markers drawn for data points.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum MarkerShape {
    /// Full circle.
    Circle,
    /// Full square.
    Square,
    /// Full triangle pointing upwards.
    TriangleUp,
    /// Full triangle pointing downwards.
    TriangleDown,
}

impl MarkerShape {
    /// Converts a ROOT marker-style number into a shape. Unknown numbers are drawn as circles.
    #[must_use]
    pub const fn from_root(code: u32) -> Self {
        match code {
            21 => Self::Square,
            22 => Self::TriangleUp,
            23 => Self::TriangleDown,
            _ => Self::Circle,
        }
    }
}

/// Markers drawn at every point of a series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    /// Shape.
    pub shape: MarkerShape,
    /// Colour.
    pub color: Color,
    /// Size relative to the default marker size.
    pub size: f64,
}

/// How a histogram or graph is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesStyle {
    /// Colour of lines and error bars; `None` draws no lines.
    pub line: Option<Color>,
    /// Width of lines and error bars.
    pub line_width: f64,
    /// Dash pattern of lines, `None` for solid lines.
    pub dash: Option<String>,
    /// Fill colour; `None` leaves the area below a histogram empty.
    pub fill: Option<Color>,
    /// Markers drawn at every point.
    pub marker: Option<Marker>,
}

impl SeriesStyle {
    /// Black markers with error bars, used for data.
    #[must_use]
    pub const fn data() -> Self {
        Self {
            line: Some(Color::BLACK),
            line_width: 2.0,
            dash: None,
            fill: None,
            marker: Some(Marker {
                shape: MarkerShape::Circle,
                color: Color::BLACK,
                size: 1.0,
            }),
        }
    }

    /// Coloured markers with error bars of the same colour. The opacity `alpha` applies to the
    /// markers only.
    #[must_use]
    pub const fn mc_marker(color: Color, shape: MarkerShape, alpha: f64) -> Self {
        Self {
            line: Some(color),
            line_width: 2.0,
            dash: None,
            fill: None,
            marker: Some(Marker {
                shape,
                color: color.with_alpha(alpha),
                size: 1.1,
            }),
        }
    }

    /// Solid area without outline.
    #[must_use]
    pub const fn mc_filled(color: Color) -> Self {
        Self {
            line: None,
            line_width: 0.0,
            dash: None,
            fill: Some(color),
            marker: None,
        }
    }

    /// Translucent green area used for systematic uncertainties.
    #[must_use]
    pub const fn mc_sys_err() -> Self {
        Self::mc_filled(Color::DARK_GREEN.with_alpha(0.5))
    }

    /// Returns this style with a dashed line.
    #[must_use]
    pub fn dashed(mut self) -> Self {
        self.dash = Some("6 4".to_owned());
        self
    }
}

/// Fonts sizes and axis settings shared by all plots of a run.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Style {
    /// Size of the axis tick labels in pixels.
    pub label_size: f64,
    /// Size of the axis titles in pixels.
    pub title_size: f64,
    /// Size of the legend entries in pixels.
    pub legend_size: f64,
    /// Size of the label text relative to the canvas height.
    pub text_size: f64,
    /// Font family used for all text.
    pub font_family: String,
    /// Distance of the y-axis title from the axis in units of the title size.
    pub y_title_offset: f64,
    /// Maximum number of digits of an axis label before a common power of ten is factored out.
    pub max_digits: usize,
}

impl Default for Style {
    fn default() -> Self {
        Self::sane_defaults(false)
    }
}

impl Style {
    /// Returns the default style. Wide plots use larger fonts.
    #[must_use]
    pub fn sane_defaults(wide_plot: bool) -> Self {
        let size = if wide_plot { 22.0 } else { 19.0 };

        Self {
            label_size: size,
            title_size: size,
            legend_size: size,
            text_size: 0.04,
            font_family: format!("{EMBEDDED_FONT_FAMILY}, sans-serif"),
            y_title_offset: 1.5,
            max_digits: 5,
        }
    }

    /// Returns this style with a different maximum number of label digits.
    #[must_use]
    pub const fn with_max_digits(mut self, max_digits: usize) -> Self {
        self.max_digits = max_digits;
        self
    }
}
