use log::trace;

use crate::error::{NetworkError, Result};
use crate::network::network::Network;
use crate::train::gradients::GradientAccumulator;

pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one averaged update from a finished mini-batch:
    /// `W -= (eta / n) · ΣweightGrad`, `b -= (eta / n) · ΣbiasGrad`.
    ///
    /// This is the only place network parameters change. The accumulator is
    /// consumed; an empty one is a no-op.
    pub fn step(&self, network: &mut Network, gradients: GradientAccumulator) -> Result<()> {
        let n = gradients.samples();
        if n == 0 {
            return Ok(());
        }
        if !self.learning_rate.is_finite() {
            return Err(NetworkError::InvalidConfig(format!(
                "learning rate {} is not finite",
                self.learning_rate
            )));
        }
        let scale = self.learning_rate / n as f64;
        trace!("applying update from {} samples (scale {})", n, scale);
        network
            .parameters_mut()
            .apply_update(gradients.weight_grads(), gradients.bias_grads(), scale)
    }
}
