use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`: total number of full passes over the training data
/// - `batch_size`: samples per mini-batch; use `1` for online SGD
/// - `track_accuracy`: measure training-set accuracy after every epoch
///   (one extra forward pass per sample)
/// - `progress_tx`: optional channel sender; one `EpochStats` is sent per
///   completed epoch. If the receiver is dropped the loop terminates early.
/// - `stop_flag`: optional atomic flag; when set to `true` from another
///   thread the loop stops before the next mini-batch.
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub track_accuracy: bool,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no progress channel and no stop flag.
    pub fn new(epochs: usize, batch_size: usize) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            track_accuracy: false,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
