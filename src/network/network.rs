use std::path::Path;

use log::warn;
use rand::Rng;

use crate::error::Result;
use crate::network::forward::{argmax, feed_forward};
use crate::network::init::fill_random;
use crate::network::params::NetworkParameters;
use crate::network::persist::{load_text, save_text};
use crate::network::structure::NetworkStructure;

/// A ready-to-use sigmoid network.
///
/// The only ways to get one are random initialization, loading a parameter
/// file, or wrapping already-validated parameters, so there is no
/// "uninitialized" state to guard against. Classification borrows the
/// network immutably; only the training loop takes `&mut`.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    params: NetworkParameters,
}

impl Network {
    /// Fresh network with random weights and zero biases.
    pub fn random<R: Rng + ?Sized>(structure: NetworkStructure, rng: &mut R) -> Network {
        Network { params: fill_random(&structure, rng) }
    }

    pub fn from_parameters(params: NetworkParameters) -> Network {
        Network { params }
    }

    /// Loads a parameter file written by [`Network::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Network> {
        load_text(path).map(Network::from_parameters)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_text(&self.params, path)
    }

    pub fn structure(&self) -> &NetworkStructure {
        self.params.structure()
    }

    pub fn parameters(&self) -> &NetworkParameters {
        &self.params
    }

    pub(crate) fn parameters_mut(&mut self) -> &mut NetworkParameters {
        &mut self.params
    }

    /// Output-layer activations for `inputs`.
    pub fn feed_forward(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        feed_forward(&self.params, inputs)
    }

    /// Predicted class: index of the strongest output, lowest index on ties.
    ///
    /// An input of the wrong width is not fatal: a warning is logged and the
    /// input is zero-padded or truncated to the network's input width.
    pub fn classify(&self, inputs: &[f64]) -> Result<usize> {
        let expected = self.structure().input_size();
        let output = if inputs.len() == expected {
            self.feed_forward(inputs)?
        } else {
            warn!(
                "input has {} values but the network was trained on {}; continuing with a resized copy",
                inputs.len(),
                expected
            );
            let mut resized = inputs.to_vec();
            resized.resize(expected, 0.0);
            self.feed_forward(&resized)?
        };
        Ok(argmax(&output))
    }
}
