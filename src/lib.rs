pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod data;
pub mod optim;
pub mod train;
pub mod eval;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use math::matrix::Matrix;
pub use network::{Network, NetworkParameters, NetworkStructure, RunSpec};
pub use data::dataset::{Dataset, LabeledSample};
pub use optim::sgd::Sgd;
pub use train::{train_epochs, train_loop, TrainConfig};
pub use eval::{evaluate, Evaluation};
