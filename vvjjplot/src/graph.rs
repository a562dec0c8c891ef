//! Graphs with asymmetric errors in both directions.

use super::error::{Error, Result};
use super::hist::Histogram;

/// Value of a ratio point whose numerator and denominator are both zero.
pub const EMPTY_RATIO: f64 = -1000.0;

/// Error assigned to a ratio point if either the numerator or the denominator is zero.
pub const UNDEFINED_RATIO_ERROR: f64 = 99.0;

/// A single point of an [`AsymmErrorGraph`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// x-coordinate.
    pub x: f64,
    /// y-coordinate.
    pub y: f64,
    /// Error in negative x-direction.
    pub exl: f64,
    /// Error in positive x-direction.
    pub exh: f64,
    /// Error in negative y-direction.
    pub eyl: f64,
    /// Error in positive y-direction.
    pub eyh: f64,
}

/// Ordered sequence of points with asymmetric errors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AsymmErrorGraph {
    name: String,
    points: Vec<Point>,
}

impl AsymmErrorGraph {
    /// Constructor.
    #[must_use]
    pub fn new(name: &str, points: Vec<Point>) -> Self {
        Self {
            name: name.to_owned(),
            points,
        }
    }

    /// Converts the regular bins of `histogram` into points. The x-errors are half of the bin
    /// width and the y-errors are the statistical errors of the bins.
    #[must_use]
    pub fn from_histogram(histogram: &Histogram) -> Self {
        let axis = histogram.axis();
        let points = (1..=histogram.bins())
            .map(|bin| {
                let half_width = 0.5 * axis.width(bin);
                let error = histogram.error(bin);

                Point {
                    x: axis.center(bin),
                    y: histogram.content(bin),
                    exl: half_width,
                    exh: half_width,
                    eyl: error,
                    eyh: error,
                }
            })
            .collect();

        Self::new(histogram.name(), points)
    }

    /// Computes the efficiency `pass / total` for every regular bin. Bins without entries in
    /// `total` are skipped. The errors are the normal-approximation binomial interval, truncated
    /// to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BinCountMismatch`] if the histograms have different binnings and
    /// [`Error::EfficiencyAboveUnity`] if a bin of `pass` is larger than the same bin of
    /// `total`.
    pub fn efficiency(pass: &Histogram, total: &Histogram) -> Result<Self> {
        total.check_size(pass)?;

        let axis = total.axis();
        let mut points = Vec::with_capacity(total.bins());

        for bin in 1..=total.bins() {
            let n = total.content(bin);
            let k = pass.content(bin);

            if n == 0.0 {
                continue;
            }

            if k > n {
                return Err(Error::EfficiencyAboveUnity {
                    name: pass.name().to_owned(),
                    bin,
                    pass: k,
                    total: n,
                });
            }

            let eff = k / n;
            let delta = (eff * (1.0 - eff) / n).sqrt();
            let half_width = 0.5 * axis.width(bin);

            points.push(Point {
                x: axis.center(bin),
                y: eff,
                exl: half_width,
                exh: half_width,
                eyl: delta.min(eff),
                eyh: delta.min(1.0 - eff),
            });
        }

        Ok(Self::new(&format!("{}_eff", pass.name()), points))
    }

    /// Divides this graph by `den` point by point.
    ///
    /// Both graphs must have the same points on the x-axis, with identical and symmetric
    /// x-errors. The relative y-errors are added in quadrature, separately for the lower and
    /// upper errors, and the result is symmetrized by taking the larger one. If both `y` are
    /// zero the ratio is [`EMPTY_RATIO`]; if either one is zero the error is
    /// [`UNDEFINED_RATIO_ERROR`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::PointCountMismatch`], [`Error::XCoordinateMismatch`] or
    /// [`Error::XErrorMismatch`] if the graphs are not compatible.
    pub fn ratio(&self, den: &Self) -> Result<Self> {
        if self.len() != den.len() {
            return Err(Error::PointCountMismatch {
                name: den.name.clone(),
                expected: self.len(),
                found: den.len(),
            });
        }

        let points = self
            .points
            .iter()
            .zip(&den.points)
            .enumerate()
            .map(|(point, (n, d))| {
                if n.x != d.x {
                    return Err(Error::XCoordinateMismatch {
                        point,
                        num: n.x,
                        den: d.x,
                    });
                }

                if n.exl != n.exh || n.exh != d.exl || d.exl != d.exh {
                    return Err(Error::XErrorMismatch { point });
                }

                let y = if n.y == 0.0 && d.y == 0.0 {
                    EMPTY_RATIO
                } else {
                    n.y / d.y
                };

                let (eyl, eyh) = if n.y != 0.0 && d.y != 0.0 {
                    (
                        y.abs() * (n.eyl / n.y).hypot(d.eyl / d.y),
                        y.abs() * (n.eyh / n.y).hypot(d.eyh / d.y),
                    )
                } else {
                    (UNDEFINED_RATIO_ERROR, UNDEFINED_RATIO_ERROR)
                };

                let ey = eyl.max(eyh);

                Ok(Point {
                    x: n.x,
                    y,
                    exl: n.exl,
                    exh: n.exh,
                    eyl: ey,
                    eyh: ey,
                })
            })
            .collect::<Result<_>>()?;

        Ok(Self::new(&format!("{}_ratio", self.name), points))
    }

    /// Returns the name of this graph.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the name of this graph.
    pub fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    /// Returns the points of this graph.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns a mutable reference to the points of this graph.
    pub fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if this graph has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
