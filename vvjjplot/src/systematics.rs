//! Combination of statistical and systematic uncertainties.
//!
//! A systematic source is described by a pair of histograms, the nominal prediction shifted up
//! and down by one standard deviation of the source. The sources are kept in a [`BTreeMap`] so
//! that the combination is independent of the order in which the sources were found.

use super::error::Result;
use super::file::HistFile;
use super::graph::{AsymmErrorGraph, Point};
use super::hist::Histogram;
use std::collections::BTreeMap;

/// Suffix of branches holding the upward variations.
pub const UP_SUFFIX: &str = "__1up";

/// Suffix of branches holding the downward variations.
pub const DOWN_SUFFIX: &str = "__1down";

/// Up- and downward variation of a single systematic source.
#[derive(Clone, Debug, PartialEq)]
pub struct Variation {
    /// Nominal prediction shifted upwards.
    pub up: Histogram,
    /// Nominal prediction shifted downwards.
    pub down: Histogram,
}

/// Systematic sources, ordered by name.
pub type Systematics = BTreeMap<String, Variation>;

/// Reads the variations of `variable` for `generator` from all pairs of branches named
/// `<source>__1up` and `<source>__1down`. Sources without a matching downward branch are
/// skipped.
///
/// # Errors
///
/// Returns [`Error::HistogramNotFound`](super::error::Error::HistogramNotFound) if a branch of a
/// source does not contain the requested histogram.
pub fn from_file(file: &HistFile, generator: &str, variable: &str) -> Result<Systematics> {
    let branches = file.branches();
    let mut systematics = Systematics::new();

    for source in branches
        .iter()
        .filter_map(|branch| branch.strip_suffix(UP_SUFFIX))
    {
        let down_branch = format!("{source}{DOWN_SUFFIX}");

        if !branches.contains(down_branch.as_str()) {
            tracing::warn!("systematic `{source}` has no downward variation, skipping it");
            continue;
        }

        let up = file.branch_hist(&format!("{source}{UP_SUFFIX}"), generator, variable)?;
        let down = file.branch_hist(&down_branch, generator, variable)?;

        systematics.insert(
            source.to_owned(),
            Variation {
                up: up.clone(),
                down: down.clone(),
            },
        );
    }

    tracing::debug!(
        "found {} systematic sources for `{variable}` of `{generator}`",
        systematics.len()
    );

    Ok(systematics)
}

/// Returns a copy of `nominal`, named `<name>_sys`, whose errors are the statistical errors and
/// the symmetrized systematic shifts added in quadrature. Every source contributes the larger of
/// its absolute up- and downward shifts. All bins, including under- and overflow, are combined.
///
/// # Errors
///
/// Returns [`Error::BinCountMismatch`](super::error::Error::BinCountMismatch) if a variation
/// has a different number of bins than `nominal`.
pub fn symmetric_errors(nominal: &Histogram, systematics: &Systematics) -> Result<Histogram> {
    let mut total: Vec<f64> = nominal.errors().iter().map(|err| err * err).collect();

    for Variation { up, down } in systematics.values() {
        nominal.check_size(up)?;
        nominal.check_size(down)?;

        for (bin, sum) in total.iter_mut().enumerate() {
            let nom = nominal.content(bin);
            let shift = (up.content(bin) - nom).abs().max((down.content(bin) - nom).abs());

            *sum += shift * shift;
        }
    }

    let mut result = nominal.clone_named(&format!("{}_sys", nominal.name()));

    for (bin, total) in total.into_iter().enumerate() {
        result.set_error(bin, total.sqrt());
    }

    Ok(result)
}

/// Returns a graph, named `<name>_graph_errs`, with one point per regular bin of `nominal`
/// whose y-errors are the systematic shifts added in quadrature, separately for the up- and
/// downward direction. A source that shifts both directions to the same side contributes the
/// larger absolute shift to both errors. Statistical errors are not included.
///
/// # Errors
///
/// Returns [`Error::BinCountMismatch`](super::error::Error::BinCountMismatch) if a variation
/// has a different number of bins than `nominal`.
pub fn asymmetric_band(nominal: &Histogram, systematics: &Systematics) -> Result<AsymmErrorGraph> {
    let bins = nominal.bins();
    let mut total_up = vec![0.0; bins];
    let mut total_down = vec![0.0; bins];

    for Variation { up, down } in systematics.values() {
        nominal.check_size(up)?;
        nominal.check_size(down)?;

        for bin in 1..=bins {
            let nom = nominal.content(bin);
            let mut shift_up = up.content(bin) - nom;
            let mut shift_down = down.content(bin) - nom;

            if shift_up * shift_down > 0.0 {
                let shift = shift_up.abs().max(shift_down.abs());
                shift_up = shift;
                shift_down = shift;
            }

            total_up[bin - 1] += shift_up * shift_up;
            total_down[bin - 1] += shift_down * shift_down;
        }
    }

    let axis = nominal.axis();
    let points = (1..=bins)
        .map(|bin| {
            let half_width = 0.5 * axis.width(bin);

            Point {
                x: axis.center(bin),
                y: nominal.content(bin),
                exl: half_width,
                exh: half_width,
                eyl: total_down[bin - 1].sqrt(),
                eyh: total_up[bin - 1].sqrt(),
            }
        })
        .collect();

    Ok(AsymmErrorGraph::new(
        &format!("{}_graph_errs", nominal.name()),
        points,
    ))
}
