pub mod batching;
pub mod epoch_stats;
pub mod gradients;
pub mod loop_fn;
pub mod train_config;
pub mod trainer;

pub use epoch_stats::{EpochStats, TrainOutcome};
pub use gradients::GradientAccumulator;
pub use loop_fn::train_loop;
pub use train_config::TrainConfig;
pub use trainer::{train_epochs, train_from_path};
