pub mod sigmoid;

pub use sigmoid::{activations, sigmoid, sigmoid_prime, sigmoid_prime_vec};
