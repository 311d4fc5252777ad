//! Chebyshev series evaluation for DE coefficient blocks.
//!
//! DE records store each quantity as a Chebyshev expansion over a
//! sub-interval, with time normalised to `s` in `[-1, 1]`. Positions come
//! from the series itself, velocities from its derivative.

/// Evaluate a Chebyshev expansion using the Clenshaw recurrence.
///
/// Given coefficients `[c_0, c_1, ..., c_{n-1}]` and normalised time
/// `s` in `[-1, 1]`, computes `sum(c_k * T_k(s))`.
pub fn clenshaw(coeffs: &[f64], s: f64) -> f64 {
    match coeffs.len() {
        0 => return 0.0,
        1 => return coeffs[0],
        _ => {}
    }

    let mut b_k1 = 0.0; // b_{k+1}
    let mut b_k2 = 0.0; // b_{k+2}
    let two_s = 2.0 * s;

    for &c_k in coeffs[1..].iter().rev() {
        let b_k = two_s * b_k1 - b_k2 + c_k;
        b_k2 = b_k1;
        b_k1 = b_k;
    }

    s * b_k1 - b_k2 + coeffs[0]
}

/// Evaluate a Chebyshev expansion and its derivative with respect to `s`
/// in a single forward pass.
///
/// Returns `(value, d_value/ds)`. Uses
/// ```text
/// T_0 = 1, T_1 = s, T_k = 2s T_{k-1} - T_{k-2}
/// T_0' = 0, T_1' = 1, T_k' = 2 T_{k-1} + 2s T_{k-1}' - T_{k-2}'
/// ```
pub fn clenshaw_with_derivative(coeffs: &[f64], s: f64) -> (f64, f64) {
    let n = coeffs.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    if n == 1 {
        return (coeffs[0], 0.0);
    }

    let two_s = 2.0 * s;

    let mut t_prev2 = 1.0;
    let mut t_prev1 = s;
    let mut dt_prev2 = 0.0;
    let mut dt_prev1 = 1.0;

    let mut value = coeffs[0] + coeffs[1] * s;
    let mut derivative = coeffs[1];

    for &c_k in &coeffs[2..] {
        let t_k = two_s * t_prev1 - t_prev2;
        let dt_k = 2.0 * t_prev1 + two_s * dt_prev1 - dt_prev2;

        value += c_k * t_k;
        derivative += c_k * dt_k;

        t_prev2 = t_prev1;
        t_prev1 = t_k;
        dt_prev2 = dt_prev1;
        dt_prev1 = dt_k;
    }

    (value, derivative)
}
