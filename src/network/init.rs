use rand::Rng;

use crate::math::matrix::Matrix;
use crate::network::params::NetworkParameters;
use crate::network::structure::NetworkStructure;

/// Half-width of the uniform range weights are drawn from:
/// `4 · sqrt(6 / (inputs + outputs))`.
///
/// Note this uses the network's overall input and output widths for every
/// layer, not each layer's own fan-in/fan-out as Xavier/Glorot would. Saved
/// models were trained with this range, so it is kept as is.
pub fn init_range(structure: &NetworkStructure) -> f64 {
    4.0 * (6.0 / (structure.input_size() + structure.output_size()) as f64).sqrt()
}

/// Random weights in `[-r, r]` (see [`init_range`]) and zero biases.
///
/// The caller owns the generator; seed it once per process and pass the same
/// one to the shuffler so runs are reproducible from a single seed.
pub fn fill_random<R: Rng + ?Sized>(structure: &NetworkStructure, rng: &mut R) -> NetworkParameters {
    let range = init_range(structure);
    let mut weights = Vec::with_capacity(structure.weight_layers());
    let mut biases = Vec::with_capacity(structure.weight_layers());

    for layer in 1..structure.len() {
        let (rows, cols) = structure.weight_shape(layer);
        weights.push(Matrix::uniform(rows, cols, range, rng));
        biases.push(vec![0.0; rows]);
    }

    NetworkParameters::from_shaped_parts(structure.clone(), weights, biases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn range_uses_global_widths() {
        let s = NetworkStructure::new(vec![4, 6, 2]).unwrap();
        assert!((init_range(&s) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn shapes_follow_structure_and_biases_start_at_zero() {
        let s = NetworkStructure::new(vec![4, 6, 2]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let params = fill_random(&s, &mut rng);

        assert_eq!(params.weights()[0].shape(), (6, 4));
        assert_eq!(params.weights()[1].shape(), (2, 6));
        assert!(params.biases().iter().flatten().all(|&b| b == 0.0));

        let r = init_range(&s);
        assert!(params.weights().iter().flat_map(|w| w.data.iter().flatten()).all(|w| w.abs() <= r));
    }

    #[test]
    fn same_seed_same_weights_and_successive_calls_differ() {
        let s = NetworkStructure::new(vec![5, 3, 2]).unwrap();

        let a = fill_random(&s, &mut StdRng::seed_from_u64(42));
        let b = fill_random(&s, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);

        let mut rng = StdRng::seed_from_u64(42);
        let first = fill_random(&s, &mut rng);
        let second = fill_random(&s, &mut rng);
        assert_ne!(first, second);
    }
}
