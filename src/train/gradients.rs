use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::backprop::{sample_errors, LayerErrors};
use crate::network::forward::ForwardPass;
use crate::network::params::NetworkParameters;

/// Summed weight and bias gradients of one mini-batch.
///
/// Shaped like the parameters it was created from and zeroed on creation;
/// consumed by the optimizer once the batch is done.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientAccumulator {
    weight_grads: Vec<Matrix>,
    bias_grads: Vec<Vec<f64>>,
    samples: usize,
}

impl GradientAccumulator {
    pub fn zeros_like(params: &NetworkParameters) -> GradientAccumulator {
        GradientAccumulator {
            weight_grads: params
                .weights()
                .iter()
                .map(|w| Matrix::zeros(w.rows, w.cols))
                .collect(),
            bias_grads: params.biases().iter().map(|b| vec![0.0; b.len()]).collect(),
            samples: 0,
        }
    }

    /// Adds one sample's contribution:
    /// `weightGrad[l][n][p] += δ[l][n] · a_prev[p]` and `biasGrad[l][n] += δ[l][n]`,
    /// where `a_prev` is the raw input for the first layer.
    pub fn accumulate(&mut self, pass: &ForwardPass, errors: &LayerErrors) {
        for (layer, (w_grad, b_grad)) in self
            .weight_grads
            .iter_mut()
            .zip(self.bias_grads.iter_mut())
            .enumerate()
        {
            let error = errors.for_weight_layer(layer);
            let prev = &pass.activations[layer];
            for (neuron, row) in w_grad.data.iter_mut().enumerate() {
                let delta = error[neuron];
                for (g, a) in row.iter_mut().zip(prev.iter()) {
                    *g += delta * a;
                }
                b_grad[neuron] += delta;
            }
        }
        self.samples += 1;
    }

    /// Forward pass, backward pass and accumulation for one labelled input.
    pub fn accumulate_sample(
        &mut self,
        params: &NetworkParameters,
        input: &[f64],
        label: usize,
    ) -> Result<()> {
        let (pass, errors) = sample_errors(params, input, label)?;
        self.accumulate(&pass, &errors);
        Ok(())
    }

    pub fn weight_grads(&self) -> &[Matrix] {
        &self.weight_grads
    }

    pub fn bias_grads(&self) -> &[Vec<f64>] {
        &self.bias_grads
    }

    /// Number of samples accumulated so far.
    pub fn samples(&self) -> usize {
        self.samples
    }
}
