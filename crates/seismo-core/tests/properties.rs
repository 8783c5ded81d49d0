//! Property-based tests for seismo-core primitives.
//!
//! Uses proptest to check the FFT round trip, conjugate symmetry of real
//! spectra, and the square-root branch over randomized inputs.

use proptest::prelude::*;
use seismo_core::{Complex64, ComplexExt, expand_polynomial, evaluate_polynomial, fft, fft_inverse};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// `fft_inverse(fft(x), len(x))` reproduces `x` for any length,
    /// including lengths that need zero-padding.
    #[test]
    fn fft_roundtrip(input in prop::collection::vec(-1000.0f32..1000.0f32, 1..700)) {
        let spectrum = fft(&input);
        prop_assert!(spectrum.len().is_power_of_two());
        prop_assert!(spectrum.len() >= input.len());

        let restored = fft_inverse(&spectrum, input.len());
        prop_assert_eq!(restored.len(), input.len());
        for (i, (a, b)) in input.iter().zip(restored.iter()).enumerate() {
            prop_assert!((a - b).abs() <= 1e-3 + 1e-5 * a.abs(), "sample {}: {} vs {}", i, a, b);
        }
    }

    /// Spectra of real input satisfy `X[N-i] = conj(X[i])`.
    #[test]
    fn real_spectrum_symmetry(input in prop::collection::vec(-1.0f32..1.0f32, 2..300)) {
        let s = fft(&input);
        let n = s.len();
        for i in 1..n / 2 {
            prop_assert!((s[n - i] - s[i].conj()).norm() < 1e-6);
        }
    }

    /// The stable square root squares back to its argument and stays on
    /// the principal branch.
    #[test]
    fn sqrt_principal_branch(re in -1e6f64..1e6f64, im in -1e6f64..1e6f64) {
        let z = Complex64::new(re, im);
        let s = z.stable_sqrt();
        prop_assert!(s.re >= 0.0);
        prop_assert!((s * s - z).norm() <= 1e-9 * z.norm().max(1.0));
    }

    /// Expanded polynomials vanish at every root.
    #[test]
    fn expanded_polynomial_vanishes_at_roots(
        roots in prop::collection::vec((-2.0f64..2.0, -2.0f64..2.0), 1..8)
    ) {
        let roots: Vec<Complex64> = roots.into_iter().map(|(r, i)| Complex64::new(r, i)).collect();
        let poly = expand_polynomial(&roots);
        for &r in &roots {
            prop_assert!(evaluate_polynomial(&poly, r).norm() < 1e-7);
        }
    }
}
