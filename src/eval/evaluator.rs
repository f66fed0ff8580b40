use std::fmt;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::data::dataset::Dataset;
use crate::error::Result;
use crate::network::network::Network;

/// Count of correctly classified samples out of a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    /// Fraction correct in `[0, 1]`; zero for an empty evaluation.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }

    pub fn percentage(&self) -> f64 {
        self.accuracy() * 100.0
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:.2}%)", self.correct, self.total, self.percentage())
    }
}

/// Classifies every sample and counts matches with its label.
pub fn evaluate(network: &Network, dataset: &Dataset) -> Result<Evaluation> {
    if dataset.is_empty() {
        warn!("evaluating on an empty dataset");
    }
    let mut eval = Evaluation { correct: 0, total: dataset.len() };
    for sample in dataset.iter() {
        if network.classify(&sample.features)? == sample.label {
            eval.correct += 1;
        }
    }
    Ok(eval)
}

/// Loads a dataset file and evaluates on it. A missing file is an error.
pub fn evaluate_path(network: &Network, path: impl AsRef<Path>) -> Result<Evaluation> {
    let dataset = Dataset::load(path)?;
    let eval = evaluate(network, &dataset)?;
    info!("final accuracy: {}", eval);
    Ok(eval)
}
