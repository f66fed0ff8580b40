use std::slice::Chunks;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{NetworkError, Result};

/// Uniformly random permutation of `0..n` (Fisher–Yates).
pub fn shuffled_indices<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices
}

/// Contiguous mini-batches of `order`; every batch holds `batch_size`
/// indices except possibly the last.
pub fn mini_batches(order: &[usize], batch_size: usize) -> Result<Chunks<'_, usize>> {
    if batch_size == 0 {
        return Err(NetworkError::InvalidConfig("batch size must be at least 1".into()));
    }
    Ok(order.chunks(batch_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sizes(n: usize, batch_size: usize) -> Vec<usize> {
        let order: Vec<usize> = (0..n).collect();
        mini_batches(&order, batch_size).unwrap().map(<[usize]>::len).collect()
    }

    #[test]
    fn fifteen_by_four_leaves_a_batch_of_three() {
        assert_eq!(sizes(15, 4), vec![4, 4, 4, 3]);
    }

    #[test]
    fn exact_and_oversized_batches() {
        assert_eq!(sizes(12, 4), vec![4, 4, 4]);
        assert_eq!(sizes(3, 10), vec![3]);
        assert!(sizes(0, 4).is_empty());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(matches!(mini_batches(&[0, 1, 2], 0), Err(NetworkError::InvalidConfig(_))));
    }

    #[test]
    fn batches_keep_the_shuffled_order() {
        let order = shuffled_indices(10, &mut StdRng::seed_from_u64(0));
        let joined: Vec<usize> = mini_batches(&order, 3).unwrap().flatten().copied().collect();
        assert_eq!(joined, order);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut indices = shuffled_indices(100, &mut StdRng::seed_from_u64(4));
        indices.sort_unstable();
        assert_eq!(indices, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_is_roughly_uniform() {
        // Position of element 0 over many shuffles of 4 items.
        let mut rng = StdRng::seed_from_u64(12);
        let mut counts = [0usize; 4];
        let trials = 20_000;
        for _ in 0..trials {
            let perm = shuffled_indices(4, &mut rng);
            let pos = perm.iter().position(|&i| i == 0).unwrap();
            counts[pos] += 1;
        }
        for &c in &counts {
            let share = c as f64 / trials as f64;
            assert!((share - 0.25).abs() < 0.02, "skewed position counts {:?}", counts);
        }
    }
}
