//! The cubic Hermite basis.

/// Maps the powers of the segment parameter `[s³, s², s, 1]` to the weights
/// applied to the start value, end value, start tangent and end tangent.
pub const HERMITE_BASIS: [[f64; 4]; 4] = [
    [2.0, -2.0, 1.0, 1.0],
    [-3.0, 3.0, -2.0, -1.0],
    [0.0, 0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0, 0.0],
];

/// Computes the blend weights at the normalised segment parameter `s`.
///
/// # Returns
/// A tuple containing the value weights and the weights of the derivative with respect to `s`.
pub fn blend_weights(s: f64) -> ([f64; 4], [f64; 4]) {
    let powers = [s * s * s, s * s, s, 1.0];
    let d_powers = [3.0 * s * s, 2.0 * s, 1.0, 0.0];

    let mut weights = [0.0; 4];
    let mut d_weights = [0.0; 4];
    for i in 0..4 {
        for j in 0..4 {
            weights[i] += powers[j] * HERMITE_BASIS[j][i];
            d_weights[i] += d_powers[j] * HERMITE_BASIS[j][i];
        }
    }
    (weights, d_weights)
}
