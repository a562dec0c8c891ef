//! Immediate-mode SVG canvas and its conversion to PDF.

use super::error::{Error, Result};
use super::labels;
use super::style::{Color, Marker, MarkerShape};
use anyhow::Context;
use std::fs;
use std::path::Path;
use svg2pdf::usvg;

/// Family name of the font shipped with this crate. It is always available when converting to
/// PDF and also serves as the generic `sans-serif` family.
pub const EMBEDDED_FONT_FAMILY: &str = "DejaVu Sans";

static EMBEDDED_FONTS: [&[u8]; 4] = [
    include_bytes!("../fonts/DejaVuSans.ttf"),
    include_bytes!("../fonts/DejaVuSans-Bold.ttf"),
    include_bytes!("../fonts/DejaVuSans-Oblique.ttf"),
    include_bytes!("../fonts/DejaVuSans-BoldOblique.ttf"),
];

/// Radius of a marker of size one in pixels.
const MARKER_RADIUS: f64 = 4.0;

/// Horizontal alignment of text relative to its anchor point.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Anchor {
    /// The text starts at the anchor point.
    #[default]
    Start,
    /// The text is centred on the anchor point.
    Middle,
    /// The text ends at the anchor point.
    End,
}

impl Anchor {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Properties of a piece of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size: f64,
    /// Colour.
    pub color: Color,
    /// Alignment.
    pub anchor: Anchor,
    /// Bold face.
    pub bold: bool,
    /// Italic face.
    pub italic: bool,
    /// Rotation around the anchor point in degrees, clockwise.
    pub rotate: f64,
}

impl TextStyle {
    /// Regular black text of the given size.
    #[must_use]
    pub const fn new(size: f64) -> Self {
        Self {
            size,
            color: Color::BLACK,
            anchor: Anchor::Start,
            bold: false,
            italic: false,
            rotate: 0.0,
        }
    }

    /// Returns this style with a different alignment.
    #[must_use]
    pub const fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Returns this style in bold italic face.
    #[must_use]
    pub const fn bold_italic(mut self) -> Self {
        self.bold = true;
        self.italic = true;
        self
    }

    /// Returns this style rotated by `degrees`.
    #[must_use]
    pub const fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }
}

fn points_attribute(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fill_attributes(fill: Option<Color>) -> String {
    fill.map_or_else(
        || r#" fill="none""#.to_owned(),
        |color| {
            if color.is_translucent() {
                format!(
                    r#" fill="{}" fill-opacity="{:.3}""#,
                    color.to_hex(),
                    color.alpha
                )
            } else {
                format!(r#" fill="{}""#, color.to_hex())
            }
        },
    )
}

fn stroke_attributes(stroke: Option<Color>, width: f64, dash: Option<&str>) -> String {
    let Some(color) = stroke else {
        return String::new();
    };

    let mut attributes = format!(r#" stroke="{}" stroke-width="{width:.2}""#, color.to_hex());

    if color.is_translucent() {
        attributes.push_str(&format!(r#" stroke-opacity="{:.3}""#, color.alpha));
    }

    if let Some(dash) = dash {
        attributes.push_str(&format!(r#" stroke-dasharray="{dash}""#));
    }

    attributes
}

fn outline_attributes(stroke: Option<(Color, f64)>) -> String {
    stroke.map_or_else(String::new, |(color, width)| {
        stroke_attributes(Some(color), width, None)
    })
}

/// Canvas collecting SVG elements. Coordinates are in pixels with the origin in the upper left
/// corner.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: f64,
    height: f64,
    font_family: String,
    defs: Vec<String>,
    elements: Vec<String>,
    next_clip_id: usize,
    open_groups: usize,
}

impl Canvas {
    /// Constructs an empty canvas with a white background. `font_family` is a CSS font-family
    /// list.
    #[must_use]
    pub fn new(width: f64, height: f64, font_family: &str) -> Self {
        Self {
            width,
            height,
            font_family: labels::escape_xml(font_family),
            defs: Vec::new(),
            elements: Vec::new(),
            next_clip_id: 0,
            open_groups: 0,
        }
    }

    /// Returns the width of the canvas.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Returns the height of the canvas.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Draws a rectangle with its upper left corner at `(x, y)`.
    pub fn rect(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: Option<Color>,
        stroke: Option<(Color, f64)>,
    ) {
        self.elements.push(format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{:.2}" height="{:.2}"{}{} />"#,
            w.max(0.0),
            h.max(0.0),
            fill_attributes(fill),
            outline_attributes(stroke),
        ));
    }

    /// Draws a straight line.
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64) {
        self.elements.push(format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"{} />"#,
            from.0,
            from.1,
            to.0,
            to.1,
            stroke_attributes(Some(color), width, None),
        ));
    }

    /// Draws an open polyline.
    pub fn polyline(
        &mut self,
        points: &[(f64, f64)],
        color: Color,
        width: f64,
        dash: Option<&str>,
    ) {
        if points.len() < 2 {
            return;
        }

        self.elements.push(format!(
            r#"<polyline points="{}" fill="none"{} />"#,
            points_attribute(points),
            stroke_attributes(Some(color), width, dash),
        ));
    }

    /// Draws a closed polygon.
    pub fn polygon(
        &mut self,
        points: &[(f64, f64)],
        fill: Option<Color>,
        stroke: Option<(Color, f64)>,
    ) {
        if points.len() < 3 {
            return;
        }

        self.elements.push(format!(
            r#"<polygon points="{}"{}{} />"#,
            points_attribute(points),
            fill_attributes(fill),
            outline_attributes(stroke),
        ));
    }

    /// Draws `marker` centred on `(x, y)`.
    pub fn marker(&mut self, x: f64, y: f64, marker: &Marker) {
        let r = MARKER_RADIUS * marker.size;
        let fill = Some(marker.color);

        match marker.shape {
            MarkerShape::Circle => self.elements.push(format!(
                r#"<circle cx="{x:.2}" cy="{y:.2}" r="{r:.2}"{} />"#,
                fill_attributes(fill)
            )),
            MarkerShape::Square => {
                let a = 0.9 * r;
                self.rect(x - a, y - a, 2.0 * a, 2.0 * a, fill, None);
            }
            MarkerShape::TriangleUp => self.polygon(
                &[(x - r, y + 0.8 * r), (x + r, y + 0.8 * r), (x, y - 1.1 * r)],
                fill,
                None,
            ),
            MarkerShape::TriangleDown => self.polygon(
                &[(x - r, y - 0.8 * r), (x + r, y - 0.8 * r), (x, y + 1.1 * r)],
                fill,
                None,
            ),
        }
    }

    /// Draws `text`, which may contain `TLatex`-style markup, with its baseline at `y`.
    pub fn text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        let mut attributes = format!(
            r#"x="{x:.2}" y="{y:.2}" font-family="{}" font-size="{:.1}" fill="{}" text-anchor="{}""#,
            self.font_family,
            style.size,
            style.color.to_hex(),
            style.anchor.as_str()
        );

        if style.bold {
            attributes.push_str(r#" font-weight="bold""#);
        }

        if style.italic {
            attributes.push_str(r#" font-style="italic""#);
        }

        if style.rotate != 0.0 {
            attributes.push_str(&format!(
                r#" transform="rotate({:.1},{x:.2},{y:.2})""#,
                style.rotate
            ));
        }

        self.elements.push(format!(
            "<text {attributes}>{}</text>",
            labels::latex_to_svg(text)
        ));
    }

    /// Estimates the width of `text` in pixels.
    #[must_use]
    pub fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        labels::text_width_em(text) * style.size
    }

    /// Clips everything drawn until the matching [`Canvas::end_clip`] to the given rectangle.
    pub fn begin_clip(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let id = format!("clip{}", self.next_clip_id);
        self.next_clip_id += 1;

        self.defs.push(format!(
            r#"<clipPath id="{id}"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" /></clipPath>"#
        ));
        self.elements.push(format!(r#"<g clip-path="url(#{id})">"#));
        self.open_groups += 1;
    }

    /// Ends the innermost clipping region.
    pub fn end_clip(&mut self) {
        if self.open_groups > 0 {
            self.elements.push("</g>".to_owned());
            self.open_groups -= 1;
        }
    }

    /// Returns the SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        svg.push('\n');

        if !self.defs.is_empty() {
            svg.push_str("<defs>\n");
            for def in &self.defs {
                svg.push_str(def);
                svg.push('\n');
            }
            svg.push_str("</defs>\n");
        }

        svg.push_str(&format!(
            r#"<rect width="{}" height="{}" fill="white" />"#,
            self.width, self.height
        ));
        svg.push('\n');

        for element in &self.elements {
            svg.push_str(element);
            svg.push('\n');
        }

        for _ in 0..self.open_groups {
            svg.push_str("</g>\n");
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Writes the canvas to `path`. The format is chosen by the extension, which must be either
    /// `pdf` or `svg`.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not supported, if the conversion to PDF fails or if
    /// the file can not be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = match path.extension().and_then(|ext| ext.to_str()) {
            Some("pdf") => svg_to_pdf(&self.to_svg())?,
            Some("svg") => self.to_svg().into_bytes(),
            _ => {
                return Err(Error::General(format!(
                    "can not determine output format of `{}`",
                    path.display()
                )));
            }
        };

        fs::write(path, bytes)
            .with_context(|| format!("failed to write `{}`", path.display()))
            .map_err(Error::Other)
    }
}

/// Converts an SVG document to a single-page PDF document. Text is rendered with the fonts
/// installed on the system and the embedded [`EMBEDDED_FONT_FAMILY`], which also replaces the
/// generic `sans-serif` family.
///
/// # Errors
///
/// Returns an error if `svg` can not be parsed or converted.
pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut options = usvg::Options::default();
    let fontdb = options.fontdb_mut();
    fontdb.load_system_fonts();

    for font in EMBEDDED_FONTS {
        fontdb.load_font_data(font.to_vec());
    }

    fontdb.set_sans_serif_family(EMBEDDED_FONT_FAMILY);

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|err| Error::General(format!("failed to parse SVG: {err}")))?;

    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|err| Error::General(format!("failed to convert SVG to PDF: {err}")))
}
