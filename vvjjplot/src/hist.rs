//! One-dimensional histograms with per-bin statistical errors.

use super::axis::Axis;
use super::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
struct HistogramRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    title: String,
    axis: Axis,
    contents: Vec<f64>,
    #[serde(default)]
    sumw2: Option<Vec<f64>>,
}

/// A one-dimensional histogram. Contents and sums of squared weights are stored for all bins,
/// including the underflow bin `0` and the overflow bin `bins() + 1`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(into = "HistogramRecord", try_from = "HistogramRecord")]
pub struct Histogram {
    name: String,
    title: String,
    axis: Axis,
    contents: Vec<f64>,
    sumw2: Vec<f64>,
}

impl TryFrom<HistogramRecord> for Histogram {
    type Error = Error;

    fn try_from(record: HistogramRecord) -> Result<Self> {
        let mut histogram = Self::with_contents(
            &record.name,
            record.axis,
            record.contents,
            record.sumw2,
        )?;
        histogram.title = record.title;

        Ok(histogram)
    }
}

impl From<Histogram> for HistogramRecord {
    fn from(histogram: Histogram) -> Self {
        Self {
            name: histogram.name,
            title: histogram.title,
            axis: histogram.axis,
            contents: histogram.contents,
            sumw2: Some(histogram.sumw2),
        }
    }
}

impl Histogram {
    /// Constructs an empty histogram with the given `name` and binning.
    #[must_use]
    pub fn new(name: &str, axis: Axis) -> Self {
        let size = axis.bins() + 2;

        Self {
            name: name.to_owned(),
            title: String::new(),
            axis,
            contents: vec![0.0; size],
            sumw2: vec![0.0; size],
        }
    }

    /// Constructs a histogram from its contents, which must include the under- and overflow
    /// bins. If `sumw2` is `None` the errors are Poissonian, `sqrt(|content|)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BinCountMismatch`] if `contents` or `sumw2` do not have `bins() + 2`
    /// entries.
    pub fn with_contents(
        name: &str,
        axis: Axis,
        contents: Vec<f64>,
        sumw2: Option<Vec<f64>>,
    ) -> Result<Self> {
        let size = axis.bins() + 2;
        let sumw2 = sumw2.unwrap_or_else(|| contents.iter().map(|c| c.abs()).collect());

        for len in [contents.len(), sumw2.len()] {
            if len != size {
                return Err(Error::BinCountMismatch {
                    name: name.to_owned(),
                    expected: size,
                    found: len,
                });
            }
        }

        Ok(Self {
            name: name.to_owned(),
            title: String::new(),
            axis,
            contents,
            sumw2,
        })
    }

    /// Returns the name of this histogram.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the name of this histogram.
    pub fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    /// Returns a copy of this histogram with a different name.
    #[must_use]
    pub fn clone_named(&self, name: &str) -> Self {
        let mut clone = self.clone();
        clone.set_name(name);
        clone
    }

    /// Returns the title of this histogram.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Sets the title of this histogram.
    pub fn set_title(&mut self, title: &str) {
        title.clone_into(&mut self.title);
    }

    /// Returns the binning.
    #[must_use]
    pub const fn axis(&self) -> &Axis {
        &self.axis
    }

    /// Returns the number of regular bins.
    #[must_use]
    pub fn bins(&self) -> usize {
        self.axis.bins()
    }

    /// Returns the number of bins including the under- and overflow bins.
    #[must_use]
    pub fn size(&self) -> usize {
        self.contents.len()
    }

    /// Returns the contents of all bins, including under- and overflow.
    #[must_use]
    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    /// Returns the content of `bin`.
    #[must_use]
    pub fn content(&self, bin: usize) -> f64 {
        self.contents[bin]
    }

    /// Sets the content of `bin`. The error of the bin is not changed.
    pub fn set_content(&mut self, bin: usize, content: f64) {
        self.contents[bin] = content;
    }

    /// Returns the statistical error of `bin`.
    #[must_use]
    pub fn error(&self, bin: usize) -> f64 {
        self.sumw2[bin].sqrt()
    }

    /// Sets the statistical error of `bin`.
    pub fn set_error(&mut self, bin: usize, error: f64) {
        self.sumw2[bin] = error * error;
    }

    /// Returns the errors of all bins, including under- and overflow.
    #[must_use]
    pub fn errors(&self) -> Vec<f64> {
        self.sumw2.iter().map(|w2| w2.sqrt()).collect()
    }

    /// Adds `value` with unit weight.
    pub fn fill(&mut self, value: f64) {
        self.fill_weighted(value, 1.0);
    }

    /// Adds `value` with weight `weight`.
    pub fn fill_weighted(&mut self, value: f64, weight: f64) {
        let bin = self.axis.find_bin(value);
        self.contents[bin] += weight;
        self.sumw2[bin] += weight * weight;
    }

    /// Returns the sum of the contents in the displayed range.
    #[must_use]
    pub fn integral(&self) -> f64 {
        self.contents[self.axis.first()..=self.axis.last()]
            .iter()
            .sum()
    }

    /// Returns the largest content in the displayed range.
    #[must_use]
    pub fn maximum(&self) -> f64 {
        self.contents[self.axis.first()..=self.axis.last()]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Returns the smallest content in the displayed range.
    #[must_use]
    pub fn minimum(&self) -> f64 {
        self.contents[self.axis.first()..=self.axis.last()]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// Multiplies all contents with `factor` and all errors with `|factor|`.
    pub fn scale(&mut self, factor: f64) {
        self.contents.iter_mut().for_each(|c| *c *= factor);
        self.sumw2.iter_mut().for_each(|w2| *w2 *= factor * factor);
    }

    /// Adds the contents of `other` bin by bin; errors are added in quadrature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BinCountMismatch`] if both histograms have a different number of bins.
    pub fn add(&mut self, other: &Self) -> Result<()> {
        self.check_size(other)?;

        for (lhs, rhs) in self.contents.iter_mut().zip(&other.contents) {
            *lhs += rhs;
        }
        for (lhs, rhs) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *lhs += rhs;
        }

        Ok(())
    }

    /// Returns [`Error::BinCountMismatch`] unless `other` has as many bins as `self`.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn check_size(&self, other: &Self) -> Result<()> {
        if other.size() == self.size() {
            Ok(())
        } else {
            Err(Error::BinCountMismatch {
                name: other.name.clone(),
                expected: self.size(),
                found: other.size(),
            })
        }
    }

    /// Restricts the displayed range to the bins overlapping with `[lo, hi]`.
    pub fn set_range_user(&mut self, lo: f64, hi: f64) {
        self.axis.set_range_user(lo, hi);
    }

    /// Adds the content of all bins below the displayed range to the first displayed bin. The
    /// folded bins keep their content, calling this method twice counts them twice.
    pub fn fold_underflow(&mut self) {
        let first = self.axis.first();
        let underflow: f64 = self.contents[..first].iter().sum();
        self.contents[first] += underflow;
    }

    /// Adds the content of all bins above the displayed range, including the overflow bin, to
    /// the last displayed bin. The folded bins keep their content, calling this method twice
    /// counts them twice.
    pub fn fold_overflow(&mut self) {
        let last = self.axis.last();
        let overflow: f64 = self.contents[last + 1..].iter().sum();
        self.contents[last] += overflow;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn histogram(contents: &[f64]) -> Histogram {
        let axis = Axis::uniform(contents.len() - 2, 0.0, 10.0 * (contents.len() - 2) as f64)
            .unwrap();
        Histogram::with_contents("h", axis, contents.to_vec(), None).unwrap()
    }

    #[test]
    fn fill() {
        let mut hist = Histogram::new("h", Axis::uniform(4, 0.0, 4.0).unwrap());

        hist.fill(-1.0);
        hist.fill(0.5);
        hist.fill_weighted(0.5, 2.0);
        hist.fill(3.999);
        hist.fill(4.0);

        assert_eq!(hist.contents(), [1.0, 3.0, 0.0, 0.0, 1.0, 1.0]);
        assert_approx_eq!(f64, hist.error(1), 5.0_f64.sqrt(), ulps = 4);
        assert_eq!(hist.integral(), 4.0);
        assert_eq!(hist.maximum(), 3.0);
    }

    #[test]
    fn with_contents_checks_size() {
        let axis = Axis::uniform(3, 0.0, 3.0).unwrap();

        assert!(Histogram::with_contents("h", axis.clone(), vec![0.0; 5], None).is_ok());
        assert!(matches!(
            Histogram::with_contents("h", axis, vec![0.0; 4], None),
            Err(Error::BinCountMismatch { expected: 5, found: 4, .. })
        ));
    }

    #[test]
    fn poisson_errors_by_default() {
        let hist = histogram(&[0.0, 4.0, 9.0, 0.0]);

        assert_eq!(hist.errors(), [0.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn scale_and_add() {
        let mut hist = histogram(&[1.0, 4.0, 9.0, 1.0]);
        hist.scale(2.0);

        assert_eq!(hist.contents(), [2.0, 8.0, 18.0, 2.0]);
        assert_eq!(hist.errors(), [2.0, 4.0, 6.0, 2.0]);

        let other = histogram(&[0.0, 1.0, 1.0, 0.0]);
        hist.add(&other).unwrap();

        assert_eq!(hist.contents(), [2.0, 9.0, 19.0, 2.0]);
        assert_approx_eq!(f64, hist.error(1), 17.0_f64.sqrt(), ulps = 4);

        assert!(hist.add(&histogram(&[0.0, 1.0, 0.0])).is_err());
    }

    #[test]
    fn integral_respects_range() {
        let mut hist = histogram(&[5.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(hist.integral(), 10.0);

        hist.set_range_user(10.0, 30.0);
        assert_eq!(hist.integral(), 5.0);
        assert_eq!(hist.maximum(), 3.0);
        assert_eq!(hist.minimum(), 2.0);
    }

    #[test]
    fn fold_flows_full_range() {
        let mut hist = histogram(&[1.0, 10.0, 20.0, 30.0, 2.0]);

        hist.fold_underflow();
        hist.fold_overflow();

        assert_eq!(hist.contents(), [1.0, 11.0, 20.0, 32.0, 2.0]);
    }

    #[test]
    fn fold_overflow_restricted_range() {
        let mut hist = histogram(&[1.0, 10.0, 20.0, 30.0, 40.0, 2.0]);
        hist.set_range_user(0.0, 20.0);

        hist.fold_overflow();

        // 30 + 40 + 2 from the bins above the range
        assert_eq!(hist.content(2), 92.0);
        assert_eq!(hist.content(3), 30.0);
    }

    #[test]
    fn fold_underflow_restricted_range() {
        let mut hist = histogram(&[1.0, 10.0, 20.0, 30.0, 40.0, 2.0]);
        hist.set_range_user(20.0, 40.0);

        hist.fold_underflow();

        // 1 + 10 + 20 from the underflow and the two bins below the range
        assert_eq!(hist.content(3), 61.0);
        assert_eq!(hist.content(2), 20.0);
    }

    #[test]
    fn fold_underflow_empty_underflow_bin() {
        let mut hist = histogram(&[0.0, 10.0, 20.0, 30.0, 40.0, 2.0]);
        hist.set_range_user(30.0, 40.0);

        hist.fold_underflow();

        assert_eq!(hist.content(4), 100.0);
        assert_eq!(hist.contents(), [0.0, 10.0, 20.0, 30.0, 100.0, 2.0]);
    }

    #[test]
    fn folding_twice_double_counts() {
        let mut once = histogram(&[1.0, 10.0, 20.0, 30.0, 2.0]);
        once.fold_overflow();

        let mut twice = once.clone();
        twice.fold_overflow();

        assert_eq!(once.content(3), 32.0);
        assert!(twice.content(3) > once.content(3));
        assert_eq!(twice.content(3), 34.0);
    }
}
