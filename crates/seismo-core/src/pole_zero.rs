//! Pole/zero sets and the polynomial arithmetic behind them.
//!
//! A [`PoleZero`] describes the rational transfer function
//!
//! ```text
//! H(x) = gain · Π(x - zero_i) / Π(x - pole_k)
//! ```
//!
//! where `x` is `s` for analog designs and `z` for digital ones. Polynomials
//! are stored with ascending powers: `coeffs[i]` multiplies `x^i`.

use crate::complex::Complex64;

/// Magnitude returned in place of a division by a vanishing denominator.
pub const SENTINEL_MAGNITUDE: f64 = 1e30;

/// Poles, zeros and gain of a rational transfer function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoleZero {
    /// Roots of the numerator
    pub zeros: Vec<Complex64>,
    /// Roots of the denominator
    pub poles: Vec<Complex64>,
    /// Constant multiplier
    pub gain: f64,
}

impl PoleZero {
    /// Empty set with unit gain.
    pub fn new() -> Self {
        Self {
            zeros: Vec::new(),
            poles: Vec::new(),
            gain: 1.0,
        }
    }

    /// Build from explicit roots with unit gain.
    pub fn from_roots(zeros: Vec<Complex64>, poles: Vec<Complex64>) -> Self {
        Self {
            zeros,
            poles,
            gain: 1.0,
        }
    }

    /// Number of poles.
    pub fn num_poles(&self) -> usize {
        self.poles.len()
    }

    /// Number of zeros.
    pub fn num_zeros(&self) -> usize {
        self.zeros.len()
    }

    /// Evaluate `H(x)` by direct products of root distances.
    ///
    /// A vanishing denominator yields [`SENTINEL_MAGNITUDE`] instead of an
    /// infinity.
    pub fn evaluate(&self, x: Complex64) -> Complex64 {
        let num = self
            .zeros
            .iter()
            .fold(Complex64::new(self.gain, 0.0), |acc, &z| acc * (x - z));
        let den = self
            .poles
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (x - p));
        safe_divide(num, den)
    }

    /// Numerator polynomial coefficients (ascending powers, gain excluded).
    pub fn numerator(&self) -> Vec<Complex64> {
        expand_polynomial(&self.zeros)
    }

    /// Denominator polynomial coefficients (ascending powers).
    pub fn denominator(&self) -> Vec<Complex64> {
        expand_polynomial(&self.poles)
    }
}

/// Expand `Π(x - root)` into coefficients by repeated synthetic multiplication.
///
/// The result has `roots.len() + 1` entries and a leading coefficient of one.
pub fn expand_polynomial(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(0.0, 0.0); roots.len() + 1];
    coeffs[0] = Complex64::new(1.0, 0.0);
    for (n, &root) in roots.iter().enumerate() {
        let w = -root;
        // multiply the degree-n polynomial in place by (x + w)
        for i in (1..=n + 1).rev() {
            coeffs[i] = w * coeffs[i] + coeffs[i - 1];
        }
        coeffs[0] = w * coeffs[0];
    }
    coeffs
}

/// Horner evaluation of an ascending-power polynomial.
pub fn evaluate_polynomial(coeffs: &[Complex64], x: Complex64) -> Complex64 {
    coeffs
        .iter()
        .rev()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * x + c)
}

/// Evaluate `top(x) / bottom(x)` with sentinel clamping.
pub fn evaluate_rational(top: &[Complex64], bottom: &[Complex64], x: Complex64) -> Complex64 {
    safe_divide(evaluate_polynomial(top, x), evaluate_polynomial(bottom, x))
}

fn safe_divide(num: Complex64, den: Complex64) -> Complex64 {
    if den.norm() <= f64::MIN_POSITIVE {
        return Complex64::new(SENTINEL_MAGNITUDE, 0.0);
    }
    let q = num / den;
    if q.re.is_finite() && q.im.is_finite() {
        q
    } else {
        Complex64::new(SENTINEL_MAGNITUDE, 0.0)
    }
}
