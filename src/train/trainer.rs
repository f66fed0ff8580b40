use std::path::Path;

use rand::Rng;

use crate::data::dataset::Dataset;
use crate::error::Result;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::TrainOutcome;
use crate::train::loop_fn::train_loop;
use crate::train::train_config::TrainConfig;

/// Plain SGD run: `epochs` passes, batches of `batch_size`, learning rate `eta`.
pub fn train_epochs<R: Rng + ?Sized>(
    network: &mut Network,
    dataset: &Dataset,
    epochs: usize,
    batch_size: usize,
    eta: f64,
    rng: &mut R,
) -> Result<TrainOutcome> {
    train_loop(
        network,
        dataset,
        &Sgd::new(eta),
        &TrainConfig::new(epochs, batch_size),
        rng,
    )
}

/// Loads the training set from `path` and trains on it. A missing or
/// malformed file aborts before any update.
pub fn train_from_path<R: Rng + ?Sized>(
    network: &mut Network,
    path: impl AsRef<Path>,
    optimizer: &Sgd,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainOutcome> {
    let dataset = Dataset::load(path)?;
    train_loop(network, &dataset, optimizer, config, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use crate::network::structure::NetworkStructure;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn missing_training_file_leaves_network_untouched() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut net = Network::random(NetworkStructure::new(vec![3, 2]).unwrap(), &mut rng);
        let before = net.clone();

        let result = train_from_path(
            &mut net,
            "/definitely/not/here/train.csv",
            &Sgd::new(1.0),
            &TrainConfig::new(1, 1),
            &mut rng,
        );

        assert!(matches!(result, Err(NetworkError::Io { .. })));
        assert_eq!(net, before);
    }

    #[test]
    fn train_epochs_changes_parameters() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut net = Network::random(NetworkStructure::new(vec![3, 2]).unwrap(), &mut rng);
        let before = net.clone();
        let data = Dataset::from_reader("0,255,0,0\n1,0,0,255\n".as_bytes()).unwrap();

        let outcome = train_epochs(&mut net, &data, 2, 1, 0.5, &mut rng).unwrap();

        assert_eq!(outcome.batches_applied, 4);
        assert_ne!(net, before);
    }
}
