//! Module containing the binning of histograms.
//!
//! Bins are numbered like in ROOT: bin `0` is the underflow bin, bins `1..=n` are the regular
//! bins and bin `n + 1` is the overflow bin.

use super::convert::{f64_from_usize, usize_from_f64};
use super::error::{Error, Result};
use float_cmp::approx_eq;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
enum Limits {
    Equal { left: f64, right: f64, bins: usize },
    Unequal { limits: Vec<f64> },
}

#[derive(Deserialize, Serialize)]
struct AxisRecord {
    edges: Vec<f64>,
}

/// Bin edges of a histogram together with the range that is displayed.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(into = "AxisRecord", try_from = "AxisRecord")]
pub struct Axis {
    limits: Limits,
    first: usize,
    last: usize,
}

impl TryFrom<AxisRecord> for Axis {
    type Error = Error;

    fn try_from(record: AxisRecord) -> Result<Self> {
        Self::new(record.edges)
    }
}

impl From<Axis> for AxisRecord {
    fn from(axis: Axis) -> Self {
        Self {
            edges: axis.limits(),
        }
    }
}

impl Axis {
    /// Constructor for `Axis`. The edges are sorted; if all bins have the same width the axis
    /// is stored in a compact form.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two edges are given, if an edge is not finite or if two
    /// edges coincide.
    pub fn new(mut limits: Vec<f64>) -> Result<Self> {
        if limits.len() < 2 {
            return Err(Error::InvalidAxis(format!(
                "at least two bin edges are required, got {}",
                limits.len()
            )));
        }

        if let Some(edge) = limits.iter().find(|edge| !edge.is_finite()) {
            return Err(Error::InvalidAxis(format!("bin edge {edge} is not finite")));
        }

        limits.sort_by(f64::total_cmp);

        if let Some(pair) = limits.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(Error::InvalidAxis(format!(
                "bin edge {} appears more than once",
                pair[0]
            )));
        }

        let bins = limits.len() - 1;

        let limits = if limits
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect::<Vec<f64>>()
            .windows(2)
            .all(|val| approx_eq!(f64, val[0], val[1], ulps = 8))
        {
            Limits::Equal {
                left: limits[0],
                right: limits[bins],
                bins,
            }
        } else {
            Limits::Unequal { limits }
        };

        Ok(Self {
            limits,
            first: 1,
            last: bins,
        })
    }

    /// Constructs an axis with `bins` bins of equal width between `left` and `right`.
    ///
    /// # Errors
    ///
    /// Returns an error if `bins` is zero or if `left` is not smaller than `right`.
    pub fn uniform(bins: usize, left: f64, right: f64) -> Result<Self> {
        if bins == 0 {
            return Err(Error::InvalidAxis("an axis needs at least one bin".to_owned()));
        }

        if left >= right || !left.is_finite() || !right.is_finite() {
            return Err(Error::InvalidAxis(format!(
                "left limit {left} must be smaller than right limit {right}"
            )));
        }

        Ok(Self {
            limits: Limits::Equal { left, right, bins },
            first: 1,
            last: bins,
        })
    }

    /// Returns the number of regular bins.
    #[must_use]
    pub fn bins(&self) -> usize {
        match &self.limits {
            Limits::Equal { bins, .. } => *bins,
            Limits::Unequal { limits } => limits.len() - 1,
        }
    }

    /// Returns the left-most bin limit.
    #[must_use]
    pub fn left(&self) -> f64 {
        match &self.limits {
            Limits::Equal { left, .. } => *left,
            Limits::Unequal { limits } => limits[0],
        }
    }

    /// Returns the right-most bin limit.
    #[must_use]
    pub fn right(&self) -> f64 {
        match &self.limits {
            Limits::Equal { right, .. } => *right,
            Limits::Unequal { limits } => limits[limits.len() - 1],
        }
    }

    /// Returns the limits in a `Vec`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vvjjplot::axis::Axis;
    ///
    /// // example with equally sized bins
    /// let equal_bins = Axis::new(vec![0.25, 0.5, 0.75, 1.0]).unwrap();
    /// assert_eq!(equal_bins.limits(), vec![0.25, 0.5, 0.75, 1.0]);
    ///
    /// // example with unequally sized bins
    /// let unequal_bins = Axis::new(vec![0.125, 0.25, 1.0, 1.5]).unwrap();
    /// assert_eq!(unequal_bins.limits(), vec![0.125, 0.25, 1.0, 1.5]);
    /// ```
    #[must_use]
    pub fn limits(&self) -> Vec<f64> {
        match &self.limits {
            Limits::Equal { left, right, bins } => (0..=*bins)
                .map(|b| (*right - *left).mul_add(f64_from_usize(b) / f64_from_usize(*bins), *left))
                .collect(),
            Limits::Unequal { limits } => limits.clone(),
        }
    }

    /// Returns the size for each regular bin.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vvjjplot::axis::Axis;
    ///
    /// let unequal_bins = Axis::new(vec![0.125, 0.25, 1.0, 1.5]).unwrap();
    /// assert_eq!(unequal_bins.bin_sizes(), vec![0.125, 0.75, 0.5]);
    /// ```
    #[must_use]
    pub fn bin_sizes(&self) -> Vec<f64> {
        match &self.limits {
            Limits::Equal { left, right, bins } => {
                vec![(*right - *left) / f64_from_usize(*bins); *bins]
            }
            Limits::Unequal { limits } => limits.windows(2).map(|x| x[1] - x[0]).collect(),
        }
    }

    /// Returns the lower edge of `bin`. The lower edge of the overflow bin is the right-most
    /// limit.
    ///
    /// # Panics
    ///
    /// Panics if `bin` is the underflow bin or larger than the overflow bin.
    #[must_use]
    pub fn low_edge(&self, bin: usize) -> f64 {
        assert!(bin >= 1 && bin <= self.bins() + 1, "bin {bin} has no lower edge");

        match &self.limits {
            Limits::Equal { left, right, bins } => {
                (*right - *left).mul_add(f64_from_usize(bin - 1) / f64_from_usize(*bins), *left)
            }
            Limits::Unequal { limits } => limits[bin - 1],
        }
    }

    /// Returns the upper edge of `bin`. The upper edge of the underflow bin is the left-most
    /// limit.
    ///
    /// # Panics
    ///
    /// Panics if `bin` is the overflow bin or larger.
    #[must_use]
    pub fn up_edge(&self, bin: usize) -> f64 {
        assert!(bin <= self.bins(), "bin {bin} has no upper edge");

        match &self.limits {
            Limits::Equal { left, right, bins } => {
                (*right - *left).mul_add(f64_from_usize(bin) / f64_from_usize(*bins), *left)
            }
            Limits::Unequal { limits } => limits[bin],
        }
    }

    /// Returns the width of the regular bin `bin`.
    #[must_use]
    pub fn width(&self, bin: usize) -> f64 {
        self.up_edge(bin) - self.low_edge(bin)
    }

    /// Returns the centre of the regular bin `bin`.
    #[must_use]
    pub fn center(&self, bin: usize) -> f64 {
        0.5 * (self.low_edge(bin) + self.up_edge(bin))
    }

    /// Returns the bin that `value` falls into: `0` for underflow and `bins() + 1` for overflow
    /// (and NaN).
    #[must_use]
    pub fn find_bin(&self, value: f64) -> usize {
        if value.is_nan() {
            return self.bins() + 1;
        }

        match &self.limits {
            Limits::Equal { left, right, bins } => {
                if value < *left {
                    0
                } else if value >= *right {
                    bins + 1
                } else {
                    (usize_from_f64((value - left) / (right - left) * f64_from_usize(*bins)) + 1)
                        .min(*bins)
                }
            }
            Limits::Unequal { limits } => {
                match limits.binary_search_by(|left| left.total_cmp(&value)) {
                    Err(0) => 0,
                    Err(index) if index == limits.len() => limits.len(),
                    Ok(index) => index + 1,
                    Err(index) => index,
                }
            }
        }
    }

    /// Returns the first bin of the displayed range.
    #[must_use]
    pub const fn first(&self) -> usize {
        self.first
    }

    /// Returns the last bin of the displayed range.
    #[must_use]
    pub const fn last(&self) -> usize {
        self.last
    }

    /// Returns the lower edge of the displayed range.
    #[must_use]
    pub fn range_left(&self) -> f64 {
        self.low_edge(self.first)
    }

    /// Returns the upper edge of the displayed range.
    #[must_use]
    pub fn range_right(&self) -> f64 {
        self.up_edge(self.last)
    }

    /// Restricts the displayed range to the bins `first..=last`. A `last` of zero or beyond the
    /// last regular bin selects the last regular bin, a `first` of zero or after `last` selects
    /// the first regular bin.
    pub fn set_range(&mut self, first: usize, last: usize) {
        let bins = self.bins();
        let last = if last == 0 || last > bins { bins } else { last };
        let first = if first == 0 || first > last { 1 } else { first };

        self.first = first;
        self.last = last;
    }

    /// Restricts the displayed range to the bins overlapping with `[lo, hi]`. A bin whose upper
    /// edge is `lo` or whose lower edge is `hi` is not part of the range.
    pub fn set_range_user(&mut self, lo: f64, hi: f64) {
        let bins = self.bins();
        let mut first = self.find_bin(lo);
        let mut last = self.find_bin(hi);

        if first <= bins && self.up_edge(first) <= lo {
            first += 1;
        }

        if last >= 1 && self.low_edge(last) >= hi {
            last -= 1;
        }

        self.set_range(first, last);
    }

    /// Resets the displayed range to all regular bins.
    pub fn reset_range(&mut self) {
        self.first = 1;
        self.last = self.bins();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn equal_and_unequal_limits() {
        let equal = Axis::new(vec![0.0, 0.25, 0.5, 0.75, 1.0]).unwrap();
        assert_eq!(equal.limits, Limits::Equal { left: 0.0, right: 1.0, bins: 4 });
        assert_eq!(equal.bins(), 4);
        assert_eq!(equal.left(), 0.0);
        assert_eq!(equal.right(), 1.0);

        let unequal = Axis::new(vec![1.0, 0.0, 0.5, 4.0]).unwrap();
        assert_eq!(unequal.limits(), vec![0.0, 0.5, 1.0, 4.0]);
        assert_eq!(unequal.bins(), 3);
        assert_eq!(unequal.width(3), 3.0);
        assert_eq!(unequal.center(3), 2.5);
    }

    #[test]
    fn invalid_axes() {
        assert!(Axis::new(vec![1.0]).is_err());
        assert!(Axis::new(vec![0.0, f64::NAN]).is_err());
        assert!(Axis::new(vec![0.0, 1.0, 1.0]).is_err());
        assert!(Axis::uniform(0, 0.0, 1.0).is_err());
        assert!(Axis::uniform(5, 1.0, 1.0).is_err());
    }

    #[test]
    fn find_bin() {
        let equal = Axis::uniform(10, 0.0, 100.0).unwrap();

        assert_eq!(equal.find_bin(-0.1), 0);
        assert_eq!(equal.find_bin(0.0), 1);
        assert_eq!(equal.find_bin(9.999), 1);
        assert_eq!(equal.find_bin(10.0), 2);
        assert_eq!(equal.find_bin(99.9), 10);
        assert_eq!(equal.find_bin(100.0), 11);
        assert_eq!(equal.find_bin(f64::NAN), 11);

        let unequal = Axis::new(vec![0.0, 1.0, 3.0, 10.0]).unwrap();

        assert_eq!(unequal.find_bin(-1.0), 0);
        assert_eq!(unequal.find_bin(0.0), 1);
        assert_eq!(unequal.find_bin(1.0), 2);
        assert_eq!(unequal.find_bin(2.0), 2);
        assert_eq!(unequal.find_bin(3.0), 3);
        assert_eq!(unequal.find_bin(9.0), 3);
        assert_eq!(unequal.find_bin(10.0), 4);
        assert_eq!(unequal.find_bin(11.0), 4);
    }

    #[test]
    fn set_range_user() {
        let mut axis = Axis::uniform(10, 0.0, 100.0).unwrap();

        axis.set_range_user(20.0, 50.0);
        assert_eq!((axis.first(), axis.last()), (3, 5));
        assert_eq!(axis.range_left(), 20.0);
        assert_eq!(axis.range_right(), 50.0);

        axis.set_range_user(55.0, 200.0);
        assert_eq!((axis.first(), axis.last()), (6, 10));

        axis.set_range_user(-50.0, 100.0);
        assert_eq!((axis.first(), axis.last()), (1, 10));

        axis.set_range_user(25.0, 25.5);
        assert_eq!((axis.first(), axis.last()), (3, 3));

        axis.reset_range();
        assert_eq!((axis.first(), axis.last()), (1, 10));
    }

    #[test]
    fn serde_uses_edges() {
        let axis: Axis = serde_yaml::from_str("edges: [0.0, 1.0, 3.0]").unwrap();

        assert_eq!(axis.limits(), vec![0.0, 1.0, 3.0]);
        assert!(serde_yaml::from_str::<Axis>("edges: [2.0]").is_err());
    }
}
