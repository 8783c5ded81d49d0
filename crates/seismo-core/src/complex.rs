//! Complex value helpers.
//!
//! The complex type itself is `num_complex::Complex<f64>` (re-exported through
//! `rustfft`), which already provides the arithmetic operators, conjugate,
//! exponential, magnitude (`norm`) and phase (`arg`). This module adds the
//! few operations the filter code needs with a specific numerical behavior.

pub use rustfft::num_complex::Complex;

/// Double-precision complex value used throughout seismo.
pub type Complex64 = Complex<f64>;

/// Unit phasor `e^{jθ}`.
#[inline]
pub fn expj(theta: f64) -> Complex64 {
    Complex64::new(theta.cos(), theta.sin())
}

/// Extra operations on [`Complex64`].
pub trait ComplexExt {
    /// Principal square root computed without cancellation.
    ///
    /// The branch is chosen by the sign of the real part; when the real part
    /// is negative the imaginary part of the result carries the sign of the
    /// input's imaginary part.
    fn stable_sqrt(self) -> Self;

    /// Reflection through the unit circle, `z / |z|²`.
    fn reflect(self) -> Self;

    /// `self / |self|`, or `1 + 0j` for a zero value.
    fn unit_or_one(self) -> Self;
}

impl ComplexExt for Complex64 {
    fn stable_sqrt(self) -> Self {
        if self.re == 0.0 && self.im == 0.0 {
            return Complex64::new(0.0, 0.0);
        }

        let x = self.re.abs();
        let y = self.im.abs();
        let w = if x >= y {
            let r = y / x;
            x.sqrt() * (0.5 * (1.0 + (1.0 + r * r).sqrt())).sqrt()
        } else {
            let r = x / y;
            y.sqrt() * (0.5 * (r + (1.0 + r * r).sqrt())).sqrt()
        };

        if self.re >= 0.0 {
            Complex64::new(w, self.im / (2.0 * w))
        } else {
            let im = if self.im >= 0.0 { w } else { -w };
            Complex64::new(y / (2.0 * w), im)
        }
    }

    fn reflect(self) -> Self {
        self / self.norm_sqr()
    }

    fn unit_or_one(self) -> Self {
        let mag = self.norm();
        if mag > 0.0 {
            self / mag
        } else {
            Complex64::new(1.0, 0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn close(a: Complex64, b: Complex64, tol: f64) -> bool {
        (a - b).norm() < tol
    }

    #[test]
    fn sqrt_of_positive_real() {
        let r = Complex64::new(4.0, 0.0).stable_sqrt();
        assert!(close(r, Complex64::new(2.0, 0.0), 1e-12));
    }

    #[test]
    fn sqrt_of_negative_real_is_positive_imaginary() {
        let r = Complex64::new(-9.0, 0.0).stable_sqrt();
        assert!(close(r, Complex64::new(0.0, 3.0), 1e-12), "got {r}");
    }

    #[test]
    fn sqrt_follows_imaginary_sign_for_negative_real() {
        let r = Complex64::new(-3.0, -4.0).stable_sqrt();
        assert!(close(r, Complex64::new(1.0, -2.0), 1e-12), "got {r}");
        let r = Complex64::new(-3.0, 4.0).stable_sqrt();
        assert!(close(r, Complex64::new(1.0, 2.0), 1e-12), "got {r}");
    }

    #[test]
    fn sqrt_squares_back() {
        for &(re, im) in &[(1.0, 1.0), (-2.5, 0.1), (1e-12, -3.0), (7.0, -1e-9), (-1e8, 1e-8)] {
            let z = Complex64::new(re, im);
            let s = z.stable_sqrt();
            assert!(s.re >= 0.0, "principal branch has non-negative real part");
            assert!(close(s * s, z, 1e-9 * z.norm().max(1.0)), "{z} -> {s}");
        }
    }

    #[test]
    fn sqrt_of_zero() {
        assert_eq!(Complex64::new(0.0, 0.0).stable_sqrt(), Complex64::new(0.0, 0.0));
    }

    #[test]
    fn expj_is_on_unit_circle() {
        let z = expj(PI / 3.0);
        assert!((z.norm() - 1.0).abs() < 1e-15);
        assert!((z.arg() - PI / 3.0).abs() < 1e-15);
    }

    #[test]
    fn reflect_inverts_radius() {
        let z = Complex64::from_polar(0.5, 0.7);
        let r = z.reflect();
        assert!((r.norm() - 2.0).abs() < 1e-12);
        assert!((r.arg() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn unit_or_one_handles_zero() {
        assert_eq!(Complex64::new(0.0, 0.0).unit_or_one(), Complex64::new(1.0, 0.0));
        let u = Complex64::new(0.0, -5.0).unit_or_one();
        assert!(close(u, Complex64::new(0.0, -1.0), 1e-15));
    }
}
