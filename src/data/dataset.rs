//! Loader for labelled pixel datasets.
//!
//! Format (one sample per line, no header):
//!
//! ```text
//! label,p0,p1,...,pn
//! ```
//!
//! `label` is a non-negative class index and every `p` a raw intensity in
//! `0..=255`. Intensities are divided by 255 on load so the network only ever
//! sees values in `[0, 1]`; large raw values saturate the sigmoid. Blank lines
//! are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{error, info, warn};

use crate::error::{NetworkError, Result};
use crate::network::structure::NetworkStructure;

pub const PIXEL_SCALE: f64 = 255.0;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    pub label: usize,
    /// Normalized features in `[0, 1]`.
    pub features: Vec<f64>,
}

impl LabeledSample {
    /// Builds a sample from raw 0–255 intensities.
    pub fn from_raw(label: usize, raw: &[f64]) -> LabeledSample {
        LabeledSample {
            label,
            features: normalize(raw),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<LabeledSample>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl Dataset {
    pub fn new(samples: Vec<LabeledSample>) -> Dataset {
        Dataset { samples }
    }

    /// Reads a dataset file. A missing or unreadable file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| NetworkError::io(path, e))?;
        let dataset = Dataset::from_reader(BufReader::new(file))?;
        info!("loaded {} samples from {:?}", dataset.len(), path);
        Ok(dataset)
    }

    /// Like [`Dataset::load`], but a file that cannot be opened is logged and
    /// yields an empty dataset. Malformed content is still an error.
    pub fn read_lenient(path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => Dataset::from_reader(BufReader::new(file)),
            Err(e) => {
                error!("could not open {:?}: {}; continuing with no samples", path, e);
                Ok(Dataset::default())
            }
        }
    }

    pub fn from_reader<R: BufRead>(input: R) -> Result<Dataset> {
        let mut samples = Vec::new();
        for (idx, line) in input.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| NetworkError::Dataset {
                line: line_no,
                message: e.to_string(),
            })?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            samples.push(parse_line(line, line_no)?);
        }
        Ok(Dataset { samples })
    }

    /// Checks every sample against the network shape: labels must be valid
    /// class indices and feature vectors must match the input width.
    pub fn check_against(&self, structure: &NetworkStructure) -> Result<()> {
        let classes = structure.output_size();
        for (idx, sample) in self.samples.iter().enumerate() {
            if sample.label >= classes {
                return Err(NetworkError::LabelOutOfRange { label: sample.label, classes });
            }
            if sample.features.len() != structure.input_size() {
                return Err(NetworkError::Sample {
                    index: idx,
                    message: format!(
                        "{} features, network expects {}",
                        sample.features.len(),
                        structure.input_size()
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn samples(&self) -> &[LabeledSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledSample> {
        self.samples.iter()
    }
}

impl FromIterator<LabeledSample> for Dataset {
    fn from_iter<I: IntoIterator<Item = LabeledSample>>(iter: I) -> Self {
        Dataset { samples: iter.into_iter().collect() }
    }
}

/// Divides raw intensities by 255.
pub fn normalize(raw: &[f64]) -> Vec<f64> {
    raw.iter().map(|p| p / PIXEL_SCALE).collect()
}

/// Parses comma-separated raw intensities (no label) into normalized features.
pub fn parse_pixels(line: &str) -> Result<Vec<f64>> {
    let raw = line
        .split(',')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(|cell| parse_intensity(cell, 1))
        .collect::<Result<Vec<f64>>>()?;
    Ok(normalize(&raw))
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn parse_line(line: &str, line_no: usize) -> Result<LabeledSample> {
    let mut cells = line.split(',').map(str::trim);

    let label_cell = cells.next().unwrap_or_default();
    let label = label_cell.parse::<usize>().map_err(|_| NetworkError::Dataset {
        line: line_no,
        message: format!("label {:?} is not a non-negative integer", label_cell),
    })?;

    let raw = cells
        .map(|cell| parse_intensity(cell, line_no))
        .collect::<Result<Vec<f64>>>()?;
    if raw.is_empty() {
        return Err(NetworkError::Dataset {
            line: line_no,
            message: "sample has a label but no pixel values".into(),
        });
    }

    Ok(LabeledSample::from_raw(label, &raw))
}

fn parse_intensity(cell: &str, line_no: usize) -> Result<f64> {
    let value = cell.parse::<f64>().map_err(|_| NetworkError::Dataset {
        line: line_no,
        message: format!("{:?} is not a valid pixel value", cell),
    })?;
    if !(0.0..=PIXEL_SCALE).contains(&value) {
        warn!("line {}: pixel value {} is outside 0..=255", line_no, value);
    }
    Ok(value)
}
