//! Error types returned by this crate.

use std::path::PathBuf;
use thiserror::Error;

/// Catch-all error for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The input file could not be opened or read.
    #[error("failed to open `{}`", path.display())]
    FileOpen {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A histogram with the given path does not exist in the file.
    #[error("histogram `{name}` not found")]
    HistogramNotFound {
        /// Path of the missing histogram.
        name: String,
    },
    /// Two histograms that are combined have a different number of bins.
    #[error("histogram `{name}` has {found} bins, expected {expected}")]
    BinCountMismatch {
        /// Name of the offending histogram.
        name: String,
        /// Number of bins of the reference histogram, including under- and overflow.
        expected: usize,
        /// Number of bins of the offending histogram, including under- and overflow.
        found: usize,
    },
    /// Two graphs that are divided have a different number of points.
    #[error("graph `{name}` has {found} points, expected {expected}")]
    PointCountMismatch {
        /// Name of the offending graph.
        name: String,
        /// Number of points of the numerator.
        expected: usize,
        /// Number of points of the denominator.
        found: usize,
    },
    /// The x-coordinates of two graphs differ at the given point.
    #[error("x-coordinates of point {point} differ: {num} != {den}")]
    XCoordinateMismatch {
        /// Index of the point.
        point: usize,
        /// x-coordinate of the numerator.
        num: f64,
        /// x-coordinate of the denominator.
        den: f64,
    },
    /// The x-errors of two graphs differ, or are asymmetric, at the given point.
    #[error("x-errors of point {point} are not identical and symmetric")]
    XErrorMismatch {
        /// Index of the point.
        point: usize,
    },
    /// The numerator of an efficiency is larger than its denominator.
    #[error("efficiency in bin {bin} of `{name}` is larger than one: {pass} > {total}")]
    EfficiencyAboveUnity {
        /// Name of the numerator histogram.
        name: String,
        /// Bin number.
        bin: usize,
        /// Numerator content.
        pass: f64,
        /// Denominator content.
        total: f64,
    },
    /// An axis was constructed from invalid bin edges.
    #[error("invalid axis: {0}")]
    InvalidAxis(String),
    /// An error that originates in this crate.
    #[error("{0}")]
    General(String),
    /// Error that does not originate from this crate.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
