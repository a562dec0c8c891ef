//! `vvjjplot` reads the histograms produced by the VV→JJ selection, combines their statistical
//! and systematic uncertainties and renders control and efficiency plots to PDF.
//!
//! The numerical core lives in [`hist`], [`graph`] and [`systematics`]; [`file`] provides the
//! persisted histogram container and [`plot`] together with [`figures`] turns histograms and
//! graphs into styled figures.

mod convert;

pub mod axis;
pub mod canvas;
pub mod error;
pub mod figures;
pub mod file;
pub mod frame;
pub mod graph;
pub mod hist;
pub mod labels;
pub mod plot;
pub mod style;
pub mod systematics;
