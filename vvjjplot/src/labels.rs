//! Axis titles, selection descriptions and `TLatex`-style label markup.

use std::fmt::Write;

/// Axis titles and units keyed by the histogram-name prefix they apply to.
pub const AXIS_TITLES: &[(&str, &str, &str)] = &[
    ("both_jet_D2", "Large-R Jet #it{D}_{2}^{#beta=1}", ""),
    ("both_jet_eta", "Large-R Jet #it{#eta}", ""),
    ("both_jet_m", "Large-R Jet Mass", "GeV"),
    ("both_jet_ntrk", "Large-R Jet #it{n}_{trk}", ""),
    ("both_jet_phi", "Large-R Jet #it{#phi}", ""),
    ("both_jet_pt", "Large-R Jet #it{p}_{T}", "GeV"),
    ("dijet_mass", "m_{JJ}", "GeV"),
    ("first_jet_D2", "Leading Large-R Jet #it{D}_{2}^{#beta=1}", ""),
    ("first_jet_eta", "Leading Large-R Jet #it{#eta}", ""),
    ("first_jet_m", "Leading Large-R Jet Mass", "GeV"),
    ("first_jet_ntrk", "Leading Large-R Jet #it{n}_{trk}", ""),
    ("first_jet_phi", "Leading Large-R Jet #it{#phi}", ""),
    ("first_jet_pt", "Leading Large-R Jet #it{p}_{T}", "GeV"),
    ("rljet_D2", "Large-R Jet #it{D}_{2}^{#beta=1}", ""),
    ("rljet_eta", "Large-R Jet #it{#eta}", ""),
    ("rljet_m", "Large-R Jet Mass", "GeV"),
    ("rljet_ntrk", "Large-R Jet #it{n}_{trk}", ""),
    ("rljet_phi", "Large-R Jet #it{#phi}", ""),
    ("rljet_pt", "Large-R Jet #it{p}_{T}", "GeV"),
    ("second_jet_D2", "Subleading Large-R Jet #it{D}_{2}^{#beta=1}", ""),
    ("second_jet_eta", "Subleading Large-R Jet #it{#eta}", ""),
    ("second_jet_m", "Subleading Large-R Jet Mass", "GeV"),
    ("second_jet_ntrk", "Subleading Large-R Jet #it{n}_{trk}", ""),
    ("second_jet_phi", "Subleading Large-R Jet #it{#phi}", ""),
    ("second_jet_pt", "Subleading Large-R Jet #it{p}_{T}", "GeV"),
];

/// Descriptions of the tagger selections keyed by the substring identifying them in a
/// histogram name.
pub const SELECTION_TEX: &[(&str, &str)] = &[
    ("W_full", "W Selection"),
    ("W_partial_D2", "W Partial Selection: #it{D}_{2}"),
    ("W_partial_mass", "W Partial Selection: mass"),
    ("W_partial_massD2", "W Partial Selection: mass + #it{D}_{2}"),
    ("W_partial_massNtrk", "W Partial Selection: mass + #it{n}_{trk}"),
    ("W_partial_ntrkD2", "W Partial Selection: #it{D}_{2} + #it{n}_{trk}"),
    ("WW_full", "WW Selection"),
    ("WW_partial_D2", "WW Partial Selection: #it{D}_{2}"),
    ("WW_partial_mass", "WW Partial Selection: mass"),
    ("WW_partial_massD2", "WW Partial Selection: mass + #it{D}_{2}"),
    ("WW_partial_massNtrk", "WW Partial Selection: mass + #it{n}_{trk}"),
    ("WW_partial_ntrkD2", "WW Partial Selection: #it{D}_{2} + #it{n}_{trk}"),
    ("WZ_full", "WZ Selection"),
    ("WZ_partial_D2", "WZ Partial Selection: #it{D}_{2}"),
    ("WZ_partial_mass", "WZ Partial Selection: mass"),
    ("WZ_partial_massD2", "WZ Partial Selection: mass + #it{D}_{2}"),
    ("WZ_partial_massNtrk", "WZ Partial Selection: mass + #it{n}_{trk}"),
    ("WZ_partial_ntrkD2", "WZ Partial Selection: #it{D}_{2} + #it{n}_{trk}"),
    ("Z_full", "Z Selection"),
    ("Z_partial_D2", "Z Partial Selection: #it{D}_{2}"),
    ("Z_partial_mass", "Z Partial Selection: mass"),
    ("Z_partial_massD2", "Z Partial Selection: mass + #it{D}_{2}"),
    ("Z_partial_massNtrk", "Z Partial Selection: mass + #it{n}_{trk}"),
    ("Z_partial_ntrkD2", "Z Partial Selection: #it{D}_{2} + #it{n}_{trk}"),
    ("ZZ_full", "ZZ Selection"),
    ("ZZ_partial_D2", "ZZ Partial Selection: #it{D}_{2}"),
    ("ZZ_partial_mass", "ZZ Partial Selection: mass"),
    ("ZZ_partial_massD2", "ZZ Partial Selection: mass + #it{D}_{2}"),
    ("ZZ_partial_massNtrk", "ZZ Partial Selection: mass + #it{n}_{trk}"),
    ("ZZ_partial_ntrkD2", "ZZ Partial Selection: #it{D}_{2} + #it{n}_{trk}"),
    ("partial_ntrk", "Partial #it{n}_{trk} Selection"),
];

fn axis_entry(name: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    AXIS_TITLES
        .iter()
        .filter(|(prefix, _, _)| name.starts_with(prefix))
        .max_by_key(|(prefix, _, _)| prefix.len())
}

/// Returns the axis title for the histogram or plot called `name`. If several prefixes match
/// the longest one is used; if none matches the title is empty.
#[must_use]
pub fn axis_title(name: &str) -> &'static str {
    axis_entry(name).map_or("", |&(_, title, _)| title)
}

/// Returns the units of the quantity histogrammed in `name`, or an empty string for
/// dimensionless quantities and unknown names.
#[must_use]
pub fn axis_units(name: &str) -> &'static str {
    axis_entry(name).map_or("", |&(_, _, units)| units)
}

/// Returns the description of the selection applied to the histogram `name`. If several
/// selections appear in `name` the longest description is used.
#[must_use]
pub fn selection_tex(name: &str) -> &'static str {
    let mut result = "";

    for &(substr, tex) in SELECTION_TEX {
        if name.contains(substr) && tex.len() > result.len() {
            result = tex;
        }
    }

    result
}

/// Formats a bin width for the title of a y-axis, rounding it to a precision that depends on its
/// magnitude.
///
/// # Examples
///
/// ```rust
/// use vvjjplot::labels::format_bin_width;
///
/// assert_eq!(format_bin_width(0.2), "0.2");
/// assert_eq!(format_bin_width(2.0), "2");
/// assert_eq!(format_bin_width(2.3), "2.25");
/// assert_eq!(format_bin_width(25.0), "25.0");
/// assert_eq!(format_bin_width(100.0), "100");
/// ```
#[must_use]
pub fn format_bin_width(width: f64) -> String {
    if width < 0.5 {
        format!("{:?}", (width * 20.0).round() / 20.0)
    } else if width < 1.0 {
        format!("{:?}", (width * 10.0).round() / 10.0)
    } else if width < 10.0 {
        let rounded = (width * 4.0).round() / 4.0;

        if width.fract() == 0.0 {
            format!("{rounded:.0}")
        } else {
            format!("{rounded:?}")
        }
    } else if width < 100.0 {
        format!("{:?}", (width * 2.0).round() / 2.0)
    } else {
        format!("{:.0}", width.round())
    }
}

/// Returns the title of an axis showing a quantity measured in `units`, for example
/// `m_{JJ} [GeV]`.
#[must_use]
pub fn with_units(title: &str, units: &str) -> String {
    if units.is_empty() {
        title.to_owned()
    } else {
        format!("{title} [{units}]")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Markup {
    Italic,
    Bold,
    Subscript,
    Superscript,
    Sqrt,
    Group,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Node {
    Text(String),
    Styled(Markup, Vec<Node>),
}

fn symbol(name: &str) -> Option<char> {
    Some(match name {
        "alpha" => 'α',
        "beta" => 'β',
        "gamma" => 'γ',
        "delta" => 'δ',
        "Delta" => 'Δ',
        "epsilon" => 'ε',
        "eta" => 'η',
        "theta" => 'θ',
        "lambda" => 'λ',
        "mu" => 'μ',
        "nu" => 'ν',
        "pi" => 'π',
        "rho" => 'ρ',
        "sigma" => 'σ',
        "Sigma" => 'Σ',
        "tau" => 'τ',
        "phi" => 'φ',
        "chi" => 'χ',
        "omega" => 'ω',
        "pm" => '±',
        "times" => '×',
        "rightarrow" => '→',
        "leq" => '≤',
        "geq" => '≥',
        "infty" => '∞',
        _ => return None,
    })
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl Parser<'_> {
    fn push_char(nodes: &mut Vec<Node>, ch: char) {
        if let Some(Node::Text(text)) = nodes.last_mut() {
            text.push(ch);
        } else {
            nodes.push(Node::Text(ch.to_string()));
        }
    }

    fn push_str(nodes: &mut Vec<Node>, s: &str) {
        for ch in s.chars() {
            Self::push_char(nodes, ch);
        }
    }

    // parses a `{...}` group or, if there is no brace, a single character
    fn argument(&mut self) -> Vec<Node> {
        if self.chars.next_if_eq(&'{').is_some() {
            self.sequence(true)
        } else {
            let mut nodes = Vec::new();
            if let Some(ch) = self.chars.next() {
                Self::push_char(&mut nodes, ch);
            }
            nodes
        }
    }

    fn sequence(&mut self, in_group: bool) -> Vec<Node> {
        let mut nodes = Vec::new();

        while let Some(ch) = self.chars.next() {
            match ch {
                '}' if in_group => return nodes,
                '{' => nodes.push(Node::Styled(Markup::Group, self.sequence(true))),
                '_' => nodes.push(Node::Styled(Markup::Subscript, self.argument())),
                '^' => nodes.push(Node::Styled(Markup::Superscript, self.argument())),
                '#' => {
                    let mut name = String::new();
                    while let Some(ch) = self.chars.next_if(char::is_ascii_alphabetic) {
                        name.push(ch);
                    }

                    let markup = match name.as_str() {
                        "it" => Some(Markup::Italic),
                        "bf" => Some(Markup::Bold),
                        "sqrt" => Some(Markup::Sqrt),
                        _ => None,
                    };

                    if let Some(markup) = markup {
                        nodes.push(Node::Styled(markup, self.argument()));
                    } else if let Some(symbol) = symbol(&name) {
                        Self::push_char(&mut nodes, symbol);
                    } else {
                        Self::push_char(&mut nodes, '#');
                        Self::push_str(&mut nodes, &name);
                    }
                }
                _ => Self::push_char(&mut nodes, ch),
            }
        }

        nodes
    }
}

fn parse(text: &str) -> Vec<Node> {
    Parser {
        chars: text.chars().peekable(),
    }
    .sequence(false)
}

/// Escapes the characters of `text` that have a special meaning in XML.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape(&mut out, text);
    out
}

fn escape(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn render_svg(out: &mut String, nodes: &[Node]) {
    for node in nodes {
        match node {
            Node::Text(text) => escape(out, text),
            Node::Styled(markup, children) => {
                let attributes = match markup {
                    Markup::Italic => r#"font-style="italic""#,
                    Markup::Bold => r#"font-weight="bold""#,
                    Markup::Subscript => r#"baseline-shift="sub" font-size="70%""#,
                    Markup::Superscript => r#"baseline-shift="super" font-size="70%""#,
                    Markup::Sqrt => {
                        out.push('√');
                        render_svg(out, children);
                        continue;
                    }
                    Markup::Group => {
                        render_svg(out, children);
                        continue;
                    }
                };

                // infallible for `String`
                let _ = write!(out, "<tspan {attributes}>");
                render_svg(out, children);
                out.push_str("</tspan>");
            }
        }
    }
}

fn render_plain(out: &mut String, nodes: &[Node]) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Styled(Markup::Sqrt, children) => {
                out.push('√');
                render_plain(out, children);
            }
            Node::Styled(_, children) => render_plain(out, children),
        }
    }
}

fn width_in_em(nodes: &[Node], scale: f64) -> f64 {
    nodes
        .iter()
        .map(|node| match node {
            Node::Text(text) => text.chars().map(|ch| scale * char_width(ch)).sum(),
            Node::Styled(Markup::Subscript | Markup::Superscript, children) => {
                width_in_em(children, 0.7 * scale)
            }
            Node::Styled(Markup::Sqrt, children) => {
                scale * char_width('√') + width_in_em(children, scale)
            }
            Node::Styled(_, children) => width_in_em(children, scale),
        })
        .sum()
}

// approximate advance widths of Helvetica, in units of the font size
const fn char_width(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.25,
        'f' | 't' | 'r' | 'I' | ' ' | '(' | ')' | '[' | ']' | '/' | '-' => 0.32,
        'm' | 'M' | 'W' | 'w' => 0.85,
        'A'..='Z' | '0'..='9' | '+' | '=' | '×' | '±' | '→' => 0.65,
        _ => 0.55,
    }
}

/// Converts `TLatex`-style markup, for example `#it{p}_{T}` or `#sqrt{s}`, into SVG text
/// content using `tspan` elements. Characters with a special meaning in XML are escaped.
#[must_use]
pub fn latex_to_svg(text: &str) -> String {
    let mut out = String::new();
    render_svg(&mut out, &parse(text));
    out
}

/// Removes all `TLatex`-style markup from `text`, replacing symbols by their Unicode
/// characters.
#[must_use]
pub fn latex_to_plain(text: &str) -> String {
    let mut out = String::new();
    render_plain(&mut out, &parse(text));
    out
}

/// Estimates the width of `text`, rendered with `TLatex`-style markup, in units of the font size.
#[must_use]
pub fn text_width_em(text: &str) -> f64 {
    width_in_em(&parse(text), 1.0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn axis_titles() {
        assert_eq!(axis_title("dijet_mass_WW_full_efficiency"), "m_{JJ}");
        assert_eq!(
            axis_title("first_jet_pt_W_partial_mass_efficiency"),
            "Leading Large-R Jet #it{p}_{T}"
        );
        assert_eq!(axis_title("both_jet_ntrk"), "Large-R Jet #it{n}_{trk}");
        assert_eq!(axis_title("unknown"), "");

        assert_eq!(axis_units("first_jet_m_q"), "GeV");
        assert_eq!(axis_units("first_jet_D2_q"), "");
        assert_eq!(axis_units("unknown"), "");
    }

    #[test]
    fn selection_descriptions() {
        assert_eq!(
            selection_tex("dijet_mass_WW_partial_massD2"),
            "WW Partial Selection: mass + #it{D}_{2}"
        );
        assert_eq!(selection_tex("dijet_mass_WZ_partial_mass"), "WZ Partial Selection: mass");
        assert_eq!(
            selection_tex("dijet_mass_Z_partial_ntrkD2"),
            "Z Partial Selection: #it{D}_{2} + #it{n}_{trk}"
        );
        assert_eq!(selection_tex("partial_ntrk"), "Partial #it{n}_{trk} Selection");
        assert_eq!(selection_tex("dijet_mass"), "");
    }

    #[test]
    fn bin_widths() {
        assert_eq!(format_bin_width(0.01), "0.0");
        assert_eq!(format_bin_width(0.2), "0.2");
        assert_eq!(format_bin_width(0.33), "0.35");
        assert_eq!(format_bin_width(0.66), "0.7");
        assert_eq!(format_bin_width(2.0), "2");
        assert_eq!(format_bin_width(2.6), "2.5");
        assert_eq!(format_bin_width(10.0), "10.0");
        assert_eq!(format_bin_width(12.3), "12.5");
        assert_eq!(format_bin_width(100.0), "100");
        assert_eq!(format_bin_width(249.7), "250");
    }

    #[test]
    fn latex_markup() {
        assert_eq!(
            latex_to_svg("#it{p}_{T}"),
            r#"<tspan font-style="italic">p</tspan><tspan baseline-shift="sub" font-size="70%">T</tspan>"#
        );
        assert_eq!(latex_to_svg("#sqrt{s} = 13 TeV"), "√s = 13 TeV");
        assert_eq!(latex_to_svg("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_xml(r#"Font "A" & B"#), "Font &quot;A&quot; &amp; B");
        assert_eq!(latex_to_plain("#it{D}_{2}^{#beta=1}"), "D2β=1");
        assert_eq!(latex_to_plain("fb^{-1}"), "fb-1");
        assert_eq!(latex_to_plain("#unknown"), "#unknown");
    }

    #[test]
    fn widths() {
        assert!(text_width_em("m_{JJ}") < text_width_em("mJJ"));
        assert!(text_width_em("ATLAS") > 3.0);
    }
}
