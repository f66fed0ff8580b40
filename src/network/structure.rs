use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// Layer widths of a fully-connected network, input layer first.
///
/// Always holds at least two entries (input and output) and no zero widths.
/// The last entry is the number of classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct NetworkStructure(Vec<usize>);

impl NetworkStructure {
    pub fn new(sizes: Vec<usize>) -> Result<NetworkStructure> {
        if sizes.len() < 2 {
            return Err(NetworkError::InvalidStructure(format!(
                "need at least an input and an output layer, got {} layer(s)",
                sizes.len()
            )));
        }
        if let Some(idx) = sizes.iter().position(|&s| s == 0) {
            return Err(NetworkError::InvalidStructure(format!(
                "layer {} has zero neurons",
                idx
            )));
        }
        Ok(NetworkStructure(sizes))
    }

    pub fn sizes(&self) -> &[usize] {
        &self.0
    }

    pub fn input_size(&self) -> usize {
        self.0[0]
    }

    /// Number of classes the network distinguishes.
    pub fn output_size(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// Number of layers including the input layer.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of weight matrices (and bias vectors), i.e. `len() - 1`.
    pub fn weight_layers(&self) -> usize {
        self.0.len() - 1
    }

    /// `(rows, cols)` of the weight matrix feeding layer `layer` (1-based).
    pub fn weight_shape(&self, layer: usize) -> (usize, usize) {
        (self.0[layer], self.0[layer - 1])
    }
}

impl Default for NetworkStructure {
    /// 28×28 pixel inputs, one hidden layer of 30, ten digit classes.
    fn default() -> Self {
        NetworkStructure(vec![784, 30, 10])
    }
}

impl TryFrom<Vec<usize>> for NetworkStructure {
    type Error = NetworkError;

    fn try_from(sizes: Vec<usize>) -> Result<Self> {
        NetworkStructure::new(sizes)
    }
}

impl From<NetworkStructure> for Vec<usize> {
    fn from(structure: NetworkStructure) -> Self {
        structure.0
    }
}

impl std::fmt::Display for NetworkStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join(" → "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_layer() {
        assert!(matches!(
            NetworkStructure::new(vec![784]),
            Err(NetworkError::InvalidStructure(_))
        ));
    }

    #[test]
    fn rejects_zero_width_layer() {
        assert!(NetworkStructure::new(vec![4, 0, 2]).is_err());
    }

    #[test]
    fn exposes_input_output_and_shapes() {
        let s = NetworkStructure::new(vec![784, 30, 10]).unwrap();
        assert_eq!(s.input_size(), 784);
        assert_eq!(s.output_size(), 10);
        assert_eq!(s.weight_layers(), 2);
        assert_eq!(s.weight_shape(1), (30, 784));
        assert_eq!(s.weight_shape(2), (10, 30));
    }

    #[test]
    fn deserializing_validates() {
        let ok: NetworkStructure = serde_json::from_str("[2, 3, 2]").unwrap();
        assert_eq!(ok.sizes(), &[2, 3, 2]);
        assert!(serde_json::from_str::<NetworkStructure>("[2]").is_err());
    }
}
