//! Polynomial evaluation.

/// Evaluate a polynomial with Horner's scheme.
///
/// Coefficients are in ascending order of power, so `coefficients[0]` is the
/// constant term:
///
/// $$p(x) = c_0 + x (c_1 + x (c_2 + \dots))$$
///
/// # Example
/// ```
/// use rsmars_core::utils::polynomial::horner;
///
/// // 1 + 2x + 3x^2 at x = 2
/// assert_eq!(horner(&[1.0, 2.0, 3.0], 2.0), 17.0);
/// ```
pub fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
