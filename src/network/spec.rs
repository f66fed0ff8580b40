use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::network::structure::NetworkStructure;

/// Everything needed to reproduce a training run, stored as JSON.
///
/// Fields:
/// - `structure`: layer widths, input first; the last entry is the class count
/// - `epochs`: full passes over the training set
/// - `batch_size`: samples per parameter update
/// - `eta`: learning rate
/// - `seed`: seed for initialization and shuffling; `None` draws one from the
///   OS at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    pub structure: NetworkStructure,
    pub epochs: usize,
    pub batch_size: usize,
    pub eta: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RunSpec {
    /// Rejects settings the training loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(NetworkError::InvalidConfig("batch size must be at least 1".into()));
        }
        if !self.eta.is_finite() || self.eta <= 0.0 {
            return Err(NetworkError::InvalidConfig(format!(
                "learning rate must be a positive number, got {}",
                self.eta
            )));
        }
        Ok(())
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path).map_err(|e| NetworkError::io(path, e))?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a `RunSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<RunSpec> {
        let file = std::fs::File::open(path).map_err(|e| NetworkError::io(path, e))?;
        let reader = std::io::BufReader::new(file);
        let spec: RunSpec = serde_json::from_reader(reader)?;
        spec.validate()?;
        Ok(spec)
    }
}

impl Default for RunSpec {
    /// 784 → 30 → 10, 30 epochs, batches of 20, eta 3.0.
    fn default() -> Self {
        RunSpec {
            structure: NetworkStructure::default(),
            epochs: 30,
            batch_size: 20,
            eta: 3.0,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_without_seed() {
        let spec: RunSpec = serde_json::from_str(
            r#"{ "structure": [4, 3, 2], "epochs": 5, "batch_size": 2, "eta": 0.5 }"#,
        )
        .unwrap();
        assert_eq!(spec.structure.sizes(), &[4, 3, 2]);
        assert_eq!(spec.seed, None);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn rejects_invalid_structure_in_json() {
        let parsed = serde_json::from_str::<RunSpec>(
            r#"{ "structure": [4], "epochs": 5, "batch_size": 2, "eta": 0.5 }"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn validate_catches_zero_batch_and_bad_eta() {
        let mut spec = RunSpec::default();
        spec.batch_size = 0;
        assert!(matches!(spec.validate(), Err(NetworkError::InvalidConfig(_))));

        let mut spec = RunSpec::default();
        spec.eta = f64::NAN;
        assert!(spec.validate().is_err());
    }

    #[test]
    fn json_round_trip_through_file() {
        let spec = RunSpec { seed: Some(99), ..RunSpec::default() };
        let path = std::env::temp_dir().join(format!("sigmoid-digits-spec-{}.json", std::process::id()));
        let path = path.to_str().unwrap().to_string();

        spec.save_json(&path).unwrap();
        let loaded = RunSpec::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, spec);
    }
}
