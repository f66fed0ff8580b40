use crate::error::{NetworkError, Result};
use crate::math::matrix::Matrix;
use crate::network::structure::NetworkStructure;

/// Weights and biases of a network, owned together with the structure they
/// were shaped from.
///
/// `weights[l]` connects layer `l` to layer `l + 1` and has
/// `structure[l + 1]` rows and `structure[l]` columns; `biases[l]` has
/// `structure[l + 1]` entries. Construction checks these shapes, and the only
/// mutation path is the crate-private update used by the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkParameters {
    structure: NetworkStructure,
    weights: Vec<Matrix>,
    biases: Vec<Vec<f64>>,
}

impl NetworkParameters {
    pub fn from_parts(
        structure: NetworkStructure,
        weights: Vec<Matrix>,
        biases: Vec<Vec<f64>>,
    ) -> Result<NetworkParameters> {
        let layers = structure.weight_layers();
        if weights.len() != layers || biases.len() != layers {
            return Err(NetworkError::InvalidStructure(format!(
                "expected {} weight matrices and bias vectors, got {} and {}",
                layers,
                weights.len(),
                biases.len()
            )));
        }
        for (idx, (w, b)) in weights.iter().zip(biases.iter()).enumerate() {
            let expected = structure.weight_shape(idx + 1);
            if !w.is_well_formed() {
                return Err(NetworkError::InvalidStructure(format!(
                    "weight matrix {} claims {}x{} but its rows disagree",
                    idx, w.rows, w.cols
                )));
            }
            if w.shape() != expected {
                return Err(NetworkError::InvalidStructure(format!(
                    "weight matrix {} is {}x{}, expected {}x{}",
                    idx, w.rows, w.cols, expected.0, expected.1
                )));
            }
            if b.len() != expected.0 {
                return Err(NetworkError::InvalidStructure(format!(
                    "bias vector {} has {} entries, expected {}",
                    idx,
                    b.len(),
                    expected.0
                )));
            }
        }
        Ok(NetworkParameters { structure, weights, biases })
    }

    /// Skips validation for parts shaped directly from `structure`.
    pub(crate) fn from_shaped_parts(
        structure: NetworkStructure,
        weights: Vec<Matrix>,
        biases: Vec<Vec<f64>>,
    ) -> NetworkParameters {
        debug_assert_eq!(weights.len(), structure.weight_layers());
        debug_assert_eq!(biases.len(), structure.weight_layers());
        NetworkParameters { structure, weights, biases }
    }

    pub fn structure(&self) -> &NetworkStructure {
        &self.structure
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Vec<f64>] {
        &self.biases
    }

    /// `W -= scale · ΣweightGrad` and `b -= scale · ΣbiasGrad` for every layer.
    ///
    /// Shapes are checked for all layers before anything is written, so a
    /// failed update leaves the parameters untouched.
    pub(crate) fn apply_update(
        &mut self,
        weight_grads: &[Matrix],
        bias_grads: &[Vec<f64>],
        scale: f64,
    ) -> Result<()> {
        if weight_grads.len() != self.weights.len() || bias_grads.len() != self.biases.len() {
            return Err(NetworkError::InvalidStructure(format!(
                "gradient covers {} layers, network has {}",
                weight_grads.len(),
                self.weights.len()
            )));
        }
        for (idx, (w, g)) in self.weights.iter().zip(weight_grads.iter()).enumerate() {
            if w.shape() != g.shape() || self.biases[idx].len() != bias_grads[idx].len() {
                return Err(NetworkError::DimensionMismatch {
                    op: "apply_update",
                    left: w.shape(),
                    right: g.shape(),
                });
            }
        }

        for (w, g) in self.weights.iter_mut().zip(weight_grads.iter()) {
            w.sub_scaled(g, scale)?;
        }
        for (b, g) in self.biases.iter_mut().zip(bias_grads.iter()) {
            for (x, d) in b.iter_mut().zip(g.iter()) {
                *x -= scale * d;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure() -> NetworkStructure {
        NetworkStructure::new(vec![3, 2, 1]).unwrap()
    }

    #[test]
    fn accepts_matching_shapes() {
        let params = NetworkParameters::from_parts(
            structure(),
            vec![Matrix::zeros(2, 3), Matrix::zeros(1, 2)],
            vec![vec![0.0; 2], vec![0.0; 1]],
        );
        assert!(params.is_ok());
    }

    #[test]
    fn rejects_transposed_weights() {
        let params = NetworkParameters::from_parts(
            structure(),
            vec![Matrix::zeros(3, 2), Matrix::zeros(1, 2)],
            vec![vec![0.0; 2], vec![0.0; 1]],
        );
        assert!(matches!(params, Err(NetworkError::InvalidStructure(_))));
    }

    #[test]
    fn rejects_matrix_whose_rows_disagree_with_its_shape() {
        let hollow = Matrix { rows: 2, cols: 3, data: vec![] };
        let params = NetworkParameters::from_parts(
            structure(),
            vec![hollow, Matrix::zeros(1, 2)],
            vec![vec![0.0; 2], vec![0.0; 1]],
        );
        assert!(matches!(params, Err(NetworkError::InvalidStructure(_))));

        let short_row = Matrix { rows: 2, cols: 3, data: vec![vec![0.0; 3], vec![0.0; 2]] };
        let params = NetworkParameters::from_parts(
            structure(),
            vec![short_row, Matrix::zeros(1, 2)],
            vec![vec![0.0; 2], vec![0.0; 1]],
        );
        assert!(params.is_err());
    }

    #[test]
    fn rejects_short_bias() {
        let params = NetworkParameters::from_parts(
            structure(),
            vec![Matrix::zeros(2, 3), Matrix::zeros(1, 2)],
            vec![vec![0.0; 1], vec![0.0; 1]],
        );
        assert!(params.is_err());
    }

    #[test]
    fn update_subtracts_scaled_gradients() {
        let mut params = NetworkParameters::from_parts(
            structure(),
            vec![Matrix::zeros(2, 3), Matrix::zeros(1, 2)],
            vec![vec![1.0; 2], vec![1.0; 1]],
        )
        .unwrap();
        let wg = vec![
            Matrix::from_data(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap(),
            Matrix::from_data(vec![vec![2.0, 2.0]]).unwrap(),
        ];
        let bg = vec![vec![2.0, 4.0], vec![-2.0]];
        params.apply_update(&wg, &bg, 0.5).unwrap();

        assert_eq!(params.weights()[0].data, vec![vec![-0.5, -1.0, -1.5], vec![-2.0, -2.5, -3.0]]);
        assert_eq!(params.biases()[0], vec![0.0, -1.0]);
        assert_eq!(params.biases()[1], vec![2.0]);
    }

    #[test]
    fn failed_update_leaves_parameters_untouched() {
        let mut params = NetworkParameters::from_parts(
            structure(),
            vec![Matrix::zeros(2, 3), Matrix::zeros(1, 2)],
            vec![vec![0.0; 2], vec![0.0; 1]],
        )
        .unwrap();
        let before = params.clone();
        let wg = vec![Matrix::zeros(2, 3), Matrix::zeros(2, 2)];
        let bg = vec![vec![1.0; 2], vec![1.0; 1]];
        assert!(params.apply_update(&wg, &bg, 1.0).is_err());
        assert_eq!(params, before);
    }
}
