use crate::activation::sigmoid::{activations, sigmoid_prime_vec};
use crate::error::{NetworkError, Result};
use crate::math::matrix::{hadamard, Matrix};
use crate::network::forward::{forward, ForwardPass};
use crate::network::params::NetworkParameters;

/// Per-layer error vectors (δ) of one sample, stored last layer first.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerErrors(Vec<Vec<f64>>);

impl LayerErrors {
    /// Errors in the order they were computed: output layer at index 0.
    pub fn last_first(&self) -> &[Vec<f64>] {
        &self.0
    }

    /// Error of the layer fed by weight matrix `weight_layer` (0-based).
    pub fn for_weight_layer(&self, weight_layer: usize) -> &[f64] {
        &self.0[self.0.len() - 1 - weight_layer]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Vector of `classes` zeros with a one at `label`.
pub fn one_hot(label: usize, classes: usize) -> Result<Vec<f64>> {
    if label >= classes {
        return Err(NetworkError::LabelOutOfRange { label, classes });
    }
    let mut y = vec![0.0; classes];
    y[label] = 1.0;
    Ok(y)
}

/// `(σ(z_L) - y) ⊙ σ'(z_L)`: output error under the quadratic cost.
pub fn last_layer_error(z_last: &[f64], y: &[f64]) -> Result<Vec<f64>> {
    if z_last.len() != y.len() {
        return Err(NetworkError::DimensionMismatch {
            op: "last_layer_error",
            left: (1, z_last.len()),
            right: (1, y.len()),
        });
    }
    let grad_wrt_act: Vec<f64> = activations(z_last)
        .iter()
        .zip(y.iter())
        .map(|(a, t)| a - t)
        .collect();
    hadamard(&grad_wrt_act, &sigmoid_prime_vec(z_last))
}

/// `(Wᵗ_next · δ_next) ⊙ σ'(z)`: one step of the backward pass.
pub fn propagate(next_weights: &Matrix, next_error: &[f64], z: &[f64]) -> Result<Vec<f64>> {
    let carried = next_weights
        .transpose()
        .multiply(&Matrix::column(next_error))?
        .into_column()?;
    hadamard(&carried, &sigmoid_prime_vec(z))
}

/// Errors for every layer, starting from `output_error` and walking down to
/// the first hidden layer.
pub fn backpropagate(
    params: &NetworkParameters,
    pass: &ForwardPass,
    output_error: Vec<f64>,
) -> Result<LayerErrors> {
    let weights = params.weights();
    if pass.zs.len() != weights.len() {
        return Err(NetworkError::InvalidStructure(format!(
            "forward pass holds {} layers, network has {}",
            pass.zs.len(),
            weights.len()
        )));
    }

    let mut errors = Vec::with_capacity(weights.len());
    errors.push(output_error);

    // zs[i] belongs to the layer fed by weights[i]; the error of that layer
    // comes from weights[i + 1] and the error just computed above it.
    for i in (0..weights.len() - 1).rev() {
        let next_error = &errors[errors.len() - 1];
        let error = propagate(&weights[i + 1], next_error, &pass.zs[i])?;
        errors.push(error);
    }

    Ok(LayerErrors(errors))
}

/// Forward pass, output error and backward pass for one labelled sample.
pub fn sample_errors(
    params: &NetworkParameters,
    input: &[f64],
    label: usize,
) -> Result<(ForwardPass, LayerErrors)> {
    let pass = forward(params, input)?;
    let y = one_hot(label, params.structure().output_size())?;
    let z_last = pass.zs.last().map(Vec::as_slice).unwrap_or(&[]);
    let output_error = last_layer_error(z_last, &y)?;
    let errors = backpropagate(params, &pass, output_error)?;
    Ok((pass, errors))
}
