use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Parameter updates applied during this epoch.
    pub batches: usize,
    /// Training accuracy as a fraction in [0, 1]; only set when
    /// `TrainConfig::track_accuracy` is on.
    pub train_accuracy: Option<f64>,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// How a `train_loop` run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainOutcome {
    pub epochs_completed: usize,
    pub batches_applied: usize,
    /// `true` if the stop flag or a dropped progress receiver ended the run.
    pub stopped_early: bool,
}
