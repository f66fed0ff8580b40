/// Logistic sigmoid: `1 / (1 + e^-z)`.
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Derivative of the sigmoid, `e^z / (e^z + 1)^2`.
///
/// Evaluated as `σ(z)·(1 - σ(z))`, which is the same function but stays finite
/// for large `|z|` where `e^z` overflows.
pub fn sigmoid_prime(z: f64) -> f64 {
    let s = sigmoid(z);
    s * (1.0 - s)
}

/// Applies the sigmoid to every pre-activation value.
pub fn activations(zs: &[f64]) -> Vec<f64> {
    zs.iter().map(|&z| sigmoid(z)).collect()
}

pub fn sigmoid_prime_vec(zs: &[f64]) -> Vec<f64> {
    zs.iter().map(|&z| sigmoid_prime(z)).collect()
}
