//! Module containing the persisted histogram container.
//!
//! A [`HistFile`] maps `/`-separated paths, for example `nominal/pythia/rljet_m_pythia`, to
//! histograms. Files are stored either as YAML text or as a binary `bincode` stream preceded by
//! a 16-byte header; both can additionally be compressed with LZ4 or gzip.

use super::error::{Error, Result};
use super::hist::Histogram;
use flate2::read::GzDecoder;
use lz4_flex::frame::{FrameDecoder, FrameEncoder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

const LZ4_MAGIC: u32 = 0x18_4D_22_04;
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const FILE_MAGIC: &[u8; 8] = b"VVJJHIST";
const FILE_VERSION: u64 = 1;

/// Collection of histograms addressed by path, together with free-form metadata.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct HistFile {
    #[serde(default)]
    metadata: BTreeMap<String, String>,
    #[serde(default)]
    histograms: BTreeMap<String, Histogram>,
}

impl HistFile {
    /// Constructs an empty file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens and reads the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileOpen`] if the file can not be opened, and an error from
    /// [`HistFile::read`] if its contents can not be parsed.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("reading histograms from {}", path.display());

        Self::read(file)
    }

    /// Construct a `HistFile` by deserializing it from `reader`. Reading is buffered.
    ///
    /// # Errors
    ///
    /// If reading from the compressed or uncompressed stream fails an error is returned.
    pub fn read(reader: impl Read) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let buffer = reader.fill_buf().map_err(|err| Error::Other(err.into()))?;

        let mut file = if buffer.starts_with(&LZ4_MAGIC.to_le_bytes()) {
            Self::read_uncompressed(BufReader::new(FrameDecoder::new(reader)))?
        } else if buffer.starts_with(&GZIP_MAGIC) {
            Self::read_uncompressed(BufReader::new(GzDecoder::new(reader)))?
        } else {
            Self::read_uncompressed(reader)?
        };

        for (path, histogram) in &mut file.histograms {
            if histogram.name().is_empty() {
                histogram.set_name(path.rsplit('/').next().unwrap_or(path));
            }
        }

        Ok(file)
    }

    fn read_uncompressed(mut reader: impl BufRead) -> Result<Self> {
        let buffer = reader.fill_buf().map_err(|err| Error::Other(err.into()))?;

        if !buffer.starts_with(FILE_MAGIC) {
            return serde_yaml::from_reader(reader).map_err(|err| Error::Other(err.into()));
        }

        let version_bytes: [u8; 8] = buffer
            .get(8..16)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| Error::General("file header is truncated".to_owned()))?;
        reader.consume(16);

        match u64::from_le_bytes(version_bytes) {
            FILE_VERSION => {
                bincode::deserialize_from(reader).map_err(|err| Error::Other(err.into()))
            }
            file_version => Err(Error::General(format!(
                "file version {file_version} is not supported"
            ))),
        }
    }

    /// Serializes `self` into `writer`. Writing is buffered.
    ///
    /// # Errors
    ///
    /// If writing fails an error is returned.
    pub fn write(&self, writer: impl Write) -> Result<()> {
        let mut writer = BufWriter::new(writer);

        writer
            .write_all(FILE_MAGIC)
            .and_then(|()| writer.write_all(&FILE_VERSION.to_le_bytes()))
            .map_err(|err| Error::Other(err.into()))?;

        bincode::serialize_into(&mut writer, self).map_err(|err| Error::Other(err.into()))?;

        writer.flush().map_err(|err| Error::Other(err.into()))
    }

    /// Serializes `self` into `writer`, using LZ4 compression. Writing is buffered.
    ///
    /// # Errors
    ///
    /// If writing or compression fails an error is returned.
    pub fn write_lz4(&self, writer: impl Write) -> Result<()> {
        let mut encoder = FrameEncoder::new(writer);
        self.write(&mut encoder)?;
        encoder.finish().map_err(|err| Error::Other(err.into()))?;

        Ok(())
    }

    /// Serializes `self` as YAML into `writer`.
    ///
    /// # Errors
    ///
    /// If writing fails an error is returned.
    pub fn write_yaml(&self, writer: impl Write) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        serde_yaml::to_writer(&mut writer, self).map_err(|err| Error::Other(err.into()))?;

        writer.flush().map_err(|err| Error::Other(err.into()))
    }

    /// Returns the histogram stored under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HistogramNotFound`] if there is no such histogram.
    pub fn get(&self, path: &str) -> Result<&Histogram> {
        self.histograms
            .get(path)
            .ok_or_else(|| Error::HistogramNotFound {
                name: path.to_owned(),
            })
    }

    /// Returns the histogram of `variable` for the sample `generator` in the systematic
    /// `branch`, which is stored under `<branch>/<generator>/<variable>_<generator>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HistogramNotFound`] if there is no such histogram.
    pub fn branch_hist(&self, branch: &str, generator: &str, variable: &str) -> Result<&Histogram> {
        self.get(&format!("{branch}/{generator}/{variable}_{generator}"))
    }

    /// Stores `histogram` under `path`, replacing any previous histogram with the same path. An
    /// unnamed histogram is named after the last component of `path`.
    pub fn insert(&mut self, path: &str, mut histogram: Histogram) {
        if histogram.name().is_empty() {
            histogram.set_name(path.rsplit('/').next().unwrap_or(path));
        }

        self.histograms.insert(path.to_owned(), histogram);
    }

    /// Returns an iterator over all paths and histograms, ordered by path.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Histogram)> {
        self.histograms.iter().map(|(path, hist)| (path.as_str(), hist))
    }

    /// Returns the number of stored histograms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    /// Returns `true` if no histograms are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    /// Returns the names of all top-level directories.
    #[must_use]
    pub fn branches(&self) -> BTreeSet<&str> {
        self.histograms
            .keys()
            .filter_map(|path| path.split_once('/').map(|(branch, _)| branch))
            .collect()
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Sets the metadata entry `key` to `value`.
    pub fn set_key_value(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_owned(), value.to_owned());
    }
}
