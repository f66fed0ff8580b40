use std::sync::atomic::Ordering;
use std::time::Instant;

use log::{debug, info, warn};
use rand::Rng;

use crate::data::dataset::Dataset;
use crate::error::{NetworkError, Result};
use crate::eval::evaluator::evaluate;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::batching::{mini_batches, shuffled_indices};
use crate::train::epoch_stats::{EpochStats, TrainOutcome};
use crate::train::gradients::GradientAccumulator;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` on `dataset` with mini-batch SGD.
///
/// Every epoch reshuffles the sample order with `rng`, cuts it into
/// contiguous batches of `config.batch_size` (the last one may be shorter)
/// and applies one averaged update per batch.
///
/// # Early termination
/// The loop stops before the next mini-batch if `config.stop_flag` is set,
/// and after the current epoch if the `progress_tx` receiver has been
/// dropped. A batch is never interrupted halfway, so the parameters always
/// reflect a whole number of updates.
///
/// # Errors
/// Fails before touching the network if `batch_size == 0`, or if any sample
/// has an out-of-range label or the wrong feature width.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    dataset: &Dataset,
    optimizer: &Sgd,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainOutcome> {
    if config.batch_size == 0 {
        return Err(NetworkError::InvalidConfig("batch size must be at least 1".into()));
    }
    dataset.check_against(network.structure())?;

    let mut outcome = TrainOutcome {
        epochs_completed: 0,
        batches_applied: 0,
        stopped_early: false,
    };
    if dataset.is_empty() {
        warn!("training set is empty; nothing to do");
        return Ok(outcome);
    }

    for epoch in 1..=config.epochs {
        info!("starting epoch {}/{}", epoch, config.epochs);
        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        let (batches, finished) = run_one_epoch(network, dataset, optimizer, config, rng)?;
        outcome.batches_applied += batches;
        if !finished {
            info!("stop requested during epoch {}; {} batches applied", epoch, batches);
            outcome.stopped_early = true;
            break;
        }
        outcome.epochs_completed = epoch;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        let train_accuracy = if config.track_accuracy {
            let eval = evaluate(network, dataset)?;
            info!("epoch {} training accuracy {}", epoch, eval);
            Some(eval.accuracy())
        } else {
            None
        };

        // ── Emit progress ─────────────────────────────────────────────────
        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            batches,
            train_accuracy,
            elapsed_ms,
        };
        debug!("epoch {} done in {} ms", epoch, elapsed_ms);

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                outcome.stopped_early = epoch < config.epochs;
                break;
            }
        }
    }

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs one epoch of mini-batch SGD. Returns the number of updates applied
/// and whether the epoch ran to the end.
fn run_one_epoch<R: Rng + ?Sized>(
    network: &mut Network,
    dataset: &Dataset,
    optimizer: &Sgd,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<(usize, bool)> {
    let samples = dataset.samples();
    let order = shuffled_indices(samples.len(), rng);
    let mut applied = 0;

    for batch in mini_batches(&order, config.batch_size)? {
        if stop_requested(config) {
            return Ok((applied, false));
        }

        // Every sample in the batch reads the same parameters; the update
        // lands only after the whole batch has been accumulated.
        let mut gradients = GradientAccumulator::zeros_like(network.parameters());
        for &idx in batch {
            let sample = &samples[idx];
            gradients.accumulate_sample(network.parameters(), &sample.features, sample.label)?;
        }
        optimizer.step(network, gradients)?;
        applied += 1;
    }

    Ok((applied, true))
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map_or(false, |flag| flag.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::LabeledSample;
    use crate::network::structure::NetworkStructure;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};

    fn separable(n: usize) -> Dataset {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    LabeledSample { label: 0, features: vec![1.0; 4] }
                } else {
                    LabeledSample { label: 1, features: vec![0.0; 4] }
                }
            })
            .collect()
    }

    fn network(seed: u64) -> Network {
        Network::random(
            NetworkStructure::new(vec![4, 3, 2]).unwrap(),
            &mut StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn counts_one_update_per_batch() {
        let mut net = network(1);
        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(2, 4);
        config.progress_tx = Some(tx);

        let outcome = train_loop(&mut net, &separable(15), &Sgd::new(1.0), &config, &mut StdRng::seed_from_u64(2)).unwrap();
        drop(config);

        assert_eq!(outcome, TrainOutcome { epochs_completed: 2, batches_applied: 8, stopped_early: false });
        let stats: Vec<EpochStats> = rx.iter().collect();
        assert_eq!(stats.len(), 2);
        assert!(stats.iter().all(|s| s.batches == 4 && s.total_epochs == 2));
        assert_eq!(stats[1].epoch, 2);
    }

    #[test]
    fn same_seeds_train_identically() {
        let data = separable(10);
        let config = TrainConfig::new(3, 3);

        let mut a = network(5);
        train_loop(&mut a, &data, &Sgd::new(0.5), &config, &mut StdRng::seed_from_u64(6)).unwrap();
        let mut b = network(5);
        train_loop(&mut b, &data, &Sgd::new(0.5), &config, &mut StdRng::seed_from_u64(6)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn stop_flag_halts_before_any_update() {
        let mut net = network(3);
        let before = net.clone();
        let mut config = TrainConfig::new(5, 2);
        config.stop_flag = Some(Arc::new(AtomicBool::new(true)));

        let outcome = train_loop(&mut net, &separable(6), &Sgd::new(1.0), &config, &mut StdRng::seed_from_u64(0)).unwrap();

        assert!(outcome.stopped_early);
        assert_eq!(outcome.batches_applied, 0);
        assert_eq!(net, before);
    }

    #[test]
    fn dropped_receiver_stops_after_first_epoch() {
        let mut net = network(3);
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut config = TrainConfig::new(5, 2);
        config.progress_tx = Some(tx);

        let outcome = train_loop(&mut net, &separable(6), &Sgd::new(1.0), &config, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(outcome.epochs_completed, 1);
        assert!(outcome.stopped_early);
    }

    #[test]
    fn rejects_bad_labels_and_zero_batch() {
        let mut net = network(4);
        let bad = Dataset::new(vec![LabeledSample { label: 7, features: vec![0.0; 4] }]);
        assert!(matches!(
            train_loop(&mut net, &bad, &Sgd::new(1.0), &TrainConfig::new(1, 1), &mut StdRng::seed_from_u64(0)),
            Err(NetworkError::LabelOutOfRange { .. })
        ));
        assert!(matches!(
            train_loop(&mut net, &separable(4), &Sgd::new(1.0), &TrainConfig::new(1, 0), &mut StdRng::seed_from_u64(0)),
            Err(NetworkError::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_dataset_is_a_no_op() {
        let mut net = network(4);
        let before = net.clone();
        let outcome = train_loop(&mut net, &Dataset::default(), &Sgd::new(1.0), &TrainConfig::new(3, 2), &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(outcome.batches_applied, 0);
        assert_eq!(net, before);
    }

    #[test]
    fn learns_a_separable_problem() {
        let data = separable(40);
        let mut net = network(9);
        let mut config = TrainConfig::new(200, 4);
        config.track_accuracy = true;

        train_loop(&mut net, &data, &Sgd::new(3.0), &config, &mut StdRng::seed_from_u64(10)).unwrap();

        assert_eq!(evaluate(&net, &data).unwrap().correct, 40);
    }
}
