use crate::activation::sigmoid::activations;
use crate::error::{NetworkError, Result};
use crate::math::matrix::Matrix;
use crate::network::params::NetworkParameters;

/// Everything one forward pass produced, kept for the backward pass.
///
/// `zs[l]` and `activations[l + 1]` belong to layer `l + 1` of the structure;
/// `activations[0]` is the input itself.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    pub zs: Vec<Vec<f64>>,
    pub activations: Vec<Vec<f64>>,
}

impl ForwardPass {
    pub fn output(&self) -> &[f64] {
        self.activations.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// `W[layer-1] · inputs + b[layer-1]` for `layer` in `1..structure.len()`.
pub fn pre_activate(params: &NetworkParameters, inputs: &[f64], layer: usize) -> Result<Vec<f64>> {
    if layer == 0 || layer > params.weights().len() {
        return Err(NetworkError::InvalidStructure(format!(
            "layer {} has no incoming weights",
            layer
        )));
    }
    let weighted = params.weights()[layer - 1]
        .multiply(&Matrix::column(inputs))?
        .into_column()?;
    Ok(weighted
        .iter()
        .zip(params.biases()[layer - 1].iter())
        .map(|(wx, b)| wx + b)
        .collect())
}

/// Runs every layer, caching pre-activations and activations.
pub fn forward(params: &NetworkParameters, input: &[f64]) -> Result<ForwardPass> {
    let layers = params.weights().len();
    let mut zs = Vec::with_capacity(layers);
    let mut acts = Vec::with_capacity(layers + 1);
    acts.push(input.to_vec());

    for layer in 1..=layers {
        let z = pre_activate(params, &acts[layer - 1], layer)?;
        acts.push(activations(&z));
        zs.push(z);
    }

    Ok(ForwardPass { zs, activations: acts })
}

/// Output-layer activations only; nothing is cached.
pub fn feed_forward(params: &NetworkParameters, input: &[f64]) -> Result<Vec<f64>> {
    let mut current = input.to_vec();
    for layer in 1..=params.weights().len() {
        current = activations(&pre_activate(params, &current, layer)?);
    }
    Ok(current)
}

/// Index of the largest value; ties go to the lowest index.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
