//! Axis scales and tick marks of a plot frame.

use super::convert::{f64_from_usize, usize_from_f64};

/// Mapping of data values onto the unit interval, linear or logarithmic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    /// Lower end of the displayed range.
    pub min: f64,
    /// Upper end of the displayed range.
    pub max: f64,
    /// Logarithmic scale.
    pub log: bool,
}

impl Scale {
    /// Constructs a linear scale.
    #[must_use]
    pub const fn linear(min: f64, max: f64) -> Self {
        Self { min, max, log: false }
    }

    /// Constructs a logarithmic scale. Non-positive limits are raised to a small positive value.
    #[must_use]
    pub fn log(min: f64, max: f64) -> Self {
        let max = if max > 0.0 { max } else { 1.0 };
        let min = if min > 0.0 { min } else { max * 1e-4 };

        Self { min, max, log: true }
    }

    /// Returns the position of `value` relative to the range: `0` at `min` and `1` at `max`.
    #[must_use]
    pub fn fraction(&self, value: f64) -> f64 {
        if self.log {
            let value = value.max(self.min * 1e-3);
            (value.log10() - self.min.log10()) / (self.max.log10() - self.min.log10())
        } else {
            (value - self.min) / (self.max - self.min)
        }
    }

    /// Returns the tick marks for this scale.
    #[must_use]
    pub fn ticks(&self, max_digits: usize) -> Ticks {
        if self.log {
            log_ticks(self.min, self.max)
        } else {
            linear_ticks(self.min, self.max, 10, max_digits)
        }
    }
}

/// Tick marks and their labels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ticks {
    /// Positions of the labelled tick marks.
    pub major: Vec<f64>,
    /// Labels of the major tick marks, possibly with `TLatex`-style markup.
    pub labels: Vec<String>,
    /// Positions of the unlabelled tick marks.
    pub minor: Vec<f64>,
    /// Power of ten that was factored out of the labels, shown as `×10^{exponent}` next to the
    /// axis.
    pub exponent: Option<i32>,
}

// dividing by an exact power of ten keeps steps like `0.1` exact
fn scaled(value: f64, exp: i32) -> f64 {
    if exp >= 0 {
        value * 10.0_f64.powi(exp)
    } else {
        value / 10.0_f64.powi(-exp)
    }
}

fn pow10(exp: i32) -> f64 {
    scaled(1.0, exp)
}

#[allow(clippy::cast_possible_truncation)]
fn floor_log10(value: f64) -> i32 {
    value.abs().log10().floor() as i32
}

// smallest multiple of one, two or five times a power of ten not below `rough`
fn nice_step(rough: f64) -> f64 {
    let exp = floor_log10(rough);
    let frac = rough / pow10(exp);
    let nice = if frac <= 1.0 + 1e-9 {
        1.0
    } else if frac <= 2.0 + 1e-9 {
        2.0
    } else if frac <= 5.0 + 1e-9 {
        5.0
    } else {
        10.0
    };

    scaled(nice, exp)
}

fn decimals(step: f64) -> usize {
    if step >= 1.0 {
        0
    } else {
        usize_from_f64((-step.log10() - 1e-9).ceil())
    }
}

fn multiples(min: f64, max: f64, step: f64) -> Vec<f64> {
    let mut values = Vec::new();
    let mut k = (min / step - 1e-9).ceil();
    let last = (max / step + 1e-9).floor();

    while k <= last {
        // avoid labels like `-0`
        values.push(if k == 0.0 { 0.0 } else { k * step });
        k += 1.0;
    }

    values
}

/// Returns tick marks in `[min, max]` with at most about `target` labelled marks at multiples
/// of one, two or five times a power of ten. If a label would need more than `max_digits`
/// digits a common power of ten is factored out.
#[must_use]
pub fn linear_ticks(min: f64, max: f64, target: usize, max_digits: usize) -> Ticks {
    if max <= min || !min.is_finite() || !max.is_finite() {
        return Ticks::default();
    }

    let step = nice_step((max - min) / f64_from_usize(target.max(2)));
    let major = multiples(min, max, step);
    let minor = multiples(min, max, step / 5.0)
        .into_iter()
        .filter(|value| !major.iter().any(|tick| (tick - value).abs() < 1e-6 * step))
        .collect();

    let largest = major.iter().fold(0.0_f64, |acc, tick| acc.max(tick.abs()));
    let int_digits = if largest >= 1.0 {
        usize::try_from(floor_log10(largest) + 1).unwrap_or(1)
    } else {
        1
    };
    let mut precision = decimals(step);

    let exponent = if largest > 0.0 && int_digits + precision > max_digits {
        let exponent = floor_log10(largest);
        precision = decimals(step / pow10(exponent));
        Some(exponent)
    } else {
        None
    };

    let factor = exponent.map_or(1.0, pow10);
    let labels = major
        .iter()
        .map(|tick| format!("{:.precision$}", tick / factor))
        .collect();

    Ticks {
        major,
        labels,
        minor,
        exponent,
    }
}

/// Returns tick marks at the powers of ten in `[min, max]`, with unlabelled marks at their
/// integer multiples.
#[must_use]
pub fn log_ticks(min: f64, max: f64) -> Ticks {
    if min <= 0.0 || max <= min {
        return Ticks::default();
    }

    let tolerance = 1e-9;
    let mut major = Vec::new();
    let mut labels = Vec::new();
    let mut minor = Vec::new();

    for exp in floor_log10(min)..=floor_log10(max) {
        let decade = pow10(exp);

        if decade >= min * (1.0 - tolerance) && decade <= max * (1.0 + tolerance) {
            major.push(decade);
            labels.push(match exp {
                0 => "1".to_owned(),
                1 => "10".to_owned(),
                _ => format!("10^{{{exp}}}"),
            });
        }

        for multiple in 2..=9 {
            let value = f64::from(multiple) * decade;
            if value >= min && value <= max {
                minor.push(value);
            }
        }
    }

    Ticks {
        major,
        labels,
        minor,
        exponent: None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn linear() {
        let ticks = linear_ticks(0.0, 100.0, 10, 5);

        assert_eq!(ticks.major.len(), 11);
        assert_eq!(ticks.labels[0], "0");
        assert_eq!(ticks.labels[10], "100");
        assert_eq!(ticks.exponent, None);
        assert_eq!(ticks.minor.len(), 40);
    }

    #[test]
    fn linear_fractional() {
        let ticks = linear_ticks(0.000001, 0.7, 10, 4);

        assert_eq!(ticks.major[0], 0.1);
        assert_eq!(ticks.labels, ["0.1", "0.2", "0.3", "0.4", "0.5", "0.6", "0.7"]);
    }

    #[test]
    fn linear_factors_out_powers_of_ten() {
        let ticks = linear_ticks(0.0, 40000.0, 10, 3);

        assert_eq!(ticks.exponent, Some(4));
        assert_eq!(ticks.labels[1], "0.5");

        let ticks = linear_ticks(0.0, 0.002, 10, 4);

        assert_eq!(ticks.exponent, Some(-3));
        assert_eq!(ticks.labels.last().unwrap(), "2.0");
    }

    #[test]
    fn logarithmic() {
        let ticks = log_ticks(0.01, 5000.0);

        assert_eq!(ticks.labels, ["10^{-2}", "10^{-1}", "1", "10", "10^{2}", "10^{3}"]);
        assert!(ticks.minor.contains(&5000.0));
        assert!(!ticks.minor.contains(&6000.0));
    }

    #[test]
    fn scales() {
        let linear = Scale::linear(0.0, 10.0);
        assert_approx_eq!(f64, linear.fraction(2.5), 0.25, ulps = 2);

        let log = Scale::log(1.0, 100.0);
        assert_approx_eq!(f64, log.fraction(10.0), 0.5, ulps = 2);

        let log = Scale::log(0.0, 100.0);
        assert_approx_eq!(f64, log.min, 0.01, ulps = 2);
    }
}
