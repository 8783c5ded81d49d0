//! Differentiation, integration, Hilbert transform, envelope and
//! attenuation removal.

use super::{EdgeBin, apply_symmetric};
use seismo_core::Complex64;
use std::f64::consts::TAU;

pub(crate) fn differentiate(sample_interval: f64, spectrum: &mut [Complex64]) {
    apply_symmetric(spectrum, sample_interval, EdgeBin::Zero, EdgeBin::Zero, |f| {
        Complex64::new(0.0, -TAU * f)
    });
}

pub(crate) fn integrate(sample_interval: f64, spectrum: &mut [Complex64]) {
    // -1/(jω) = j/ω
    apply_symmetric(spectrum, sample_interval, EdgeBin::Zero, EdgeBin::Zero, |f| {
        Complex64::new(0.0, 1.0 / (TAU * f))
    });
}

/// Rotates every component by 90°; a cosine comes back as a negated sine.
pub(crate) fn hilbert(sample_interval: f64, spectrum: &mut [Complex64]) {
    apply_symmetric(spectrum, sample_interval, EdgeBin::Zero, EdgeBin::Zero, |_| {
        Complex64::new(0.0, -1.0)
    });
}

pub(crate) fn remove_attenuation(t_star: f64, f_max: f64, sample_interval: f64, spectrum: &mut [Complex64]) {
    let w_max = TAU * f_max;
    apply_symmetric(spectrum, sample_interval, EdgeBin::Real, EdgeBin::Real, |f| {
        let w = TAU * f;
        let gain = if w < w_max { (w * t_star / 2.0).exp() } else { 1.0 };
        Complex64::new(gain, 0.0)
    });
}

/// Instantaneous amplitude: `quadrature[i] = sqrt(original[i]² + quadrature[i]²)`.
///
/// Extra samples in either slice are left alone.
pub fn envelope(original: &[f32], quadrature: &mut [f32]) {
    for (h, &x) in quadrature.iter_mut().zip(original) {
        *h = x.hypot(*h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seismo_core::{fft, fft_inverse};

    const DT: f64 = 0.01;
    const N: usize = 1024;

    /// Cosine with an exact number of cycles in N samples.
    fn cosine(cycles: usize) -> Vec<f32> {
        (0..N)
            .map(|i| (TAU * cycles as f64 * i as f64 / N as f64).cos() as f32)
            .collect()
    }

    fn run(f: impl Fn(&mut [Complex64]), input: &[f32]) -> Vec<f32> {
        let mut s = fft(input);
        f(&mut s);
        fft_inverse(&s, input.len())
    }

    #[test]
    fn differentiate_cosine() {
        let cycles = 20;
        let w = TAU * cycles as f64 / (N as f64 * DT);
        let out = run(|s| differentiate(DT, s), &cosine(cycles));
        for (i, y) in out.iter().enumerate() {
            let expected = -w * (TAU * cycles as f64 * i as f64 / N as f64).sin();
            assert!((f64::from(*y) - expected).abs() < 1e-3 * w, "sample {i}");
        }
    }

    #[test]
    fn integrate_cosine() {
        let cycles = 20;
        let w = TAU * cycles as f64 / (N as f64 * DT);
        let out = run(|s| integrate(DT, s), &cosine(cycles));
        for (i, y) in out.iter().enumerate() {
            let expected = (TAU * cycles as f64 * i as f64 / N as f64).sin() / w;
            assert!((f64::from(*y) - expected).abs() < 1e-4, "sample {i}");
        }
    }

    #[test]
    fn hilbert_rotates_cosine() {
        let out = run(|s| hilbert(DT, s), &cosine(10));
        for (i, y) in out.iter().enumerate() {
            let expected = -(TAU * 10.0 * i as f64 / N as f64).sin();
            assert!((f64::from(*y) - expected).abs() < 1e-4, "sample {i}");
        }
    }

    #[test]
    fn envelope_of_cosine_is_flat() {
        let x = cosine(30);
        let mut h = run(|s| hilbert(DT, s), &x);
        envelope(&x, &mut h);
        for v in &h {
            assert!((v - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn attenuation_boost_below_cutoff_only() {
        let mut s = vec![Complex64::new(1.0, 0.0); 64];
        remove_attenuation(0.1, 10.0, 0.01, &mut s);
        // df = 1/0.64 = 1.5625 Hz; bin 2 is 3.125 Hz
        let expected = (TAU * 3.125 * 0.05).exp();
        assert!((s[2].re - expected).abs() < 1e-12);
        assert_eq!(s[20], Complex64::new(1.0, 0.0));
        assert_eq!(s[0], Complex64::new(1.0, 0.0));
    }
}
