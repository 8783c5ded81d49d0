//! Band-pass parameters and the two Butterworth-shaped band-pass filters.

use super::{EdgeBin, apply_symmetric};
use crate::error::{FilterError, Result};
use seismo_core::Complex64;
use std::f64::consts::{PI, TAU};

/// Ybp used once `|fnorm|` passes [`crash_threshold`].
const CRASHED_RESPONSE: f64 = 1e-29;

/// Spectral components smaller than this become exactly zero.
const DENORMAL_FLOOR: f64 = 1e-35;

/// Corner frequencies and pole count of a band-pass filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPass {
    /// Low corner in Hz.
    pub low_hz: f64,
    /// High corner in Hz.
    pub high_hz: f64,
    /// Poles per side.
    pub num_poles: usize,
}

impl BandPass {
    /// Lowest accepted corner (Hz).
    pub const MIN_CORNER_HZ: f64 = 1e-8;
    /// Highest accepted corner (Hz).
    pub const MAX_CORNER_HZ: f64 = 1e8;
    /// Highest accepted pole count.
    pub const MAX_POLES: usize = 20;

    /// Create band-pass parameters.
    pub fn new(low_hz: f64, high_hz: f64, num_poles: usize) -> Self {
        Self {
            low_hz,
            high_hz,
            num_poles,
        }
    }

    /// Validate for the Butterworth filter (pole count must be even).
    pub fn validate(&self) -> Result<()> {
        FilterError::from_problems(self.problems(true))
    }

    pub(crate) fn problems(&self, require_even: bool) -> Vec<String> {
        let mut problems = Vec::new();
        for (name, value) in [("low", self.low_hz), ("high", self.high_hz)] {
            if !(Self::MIN_CORNER_HZ..=Self::MAX_CORNER_HZ).contains(&value) {
                problems.push(format!(
                    "{name} corner {value} Hz outside [{:e}, {:e}] Hz",
                    Self::MIN_CORNER_HZ,
                    Self::MAX_CORNER_HZ
                ));
            }
        }
        let min_poles = if require_even { 2 } else { 1 };
        if !(min_poles..=Self::MAX_POLES).contains(&self.num_poles) {
            problems.push(format!(
                "pole count {} outside [{min_poles}, {}]",
                self.num_poles,
                Self::MAX_POLES
            ));
        } else if require_even && self.num_poles % 2 == 1 {
            problems.push(format!("pole count {} must be even", self.num_poles));
        }
        if self.low_hz >= self.high_hz {
            problems.push(format!(
                "low corner {} Hz must be below high corner {} Hz",
                self.low_hz, self.high_hz
            ));
        }
        problems
    }

    /// Analog Butterworth poles for a side with corner `corner_hz`, negated
    /// so their real parts are positive: `ωc·(sin θ ± j cos θ)`.
    fn side_poles(&self, corner_hz: f64) -> Vec<Complex64> {
        let wc = TAU * corner_hz;
        let n = self.num_poles;
        (0..n / 2)
            .flat_map(|i| {
                let theta = (2 * i + 1) as f64 * PI / (2 * n) as f64;
                // ak = 2·sin(theta) is the damping of this second-order section
                let ak = 2.0 * theta.sin();
                let pole = Complex64::new(0.5 * ak * wc, theta.cos() * wc);
                [pole, pole.conj()]
            })
            .collect()
    }
}

/// Physical analog band-pass response `H(j2πf)` of the Butterworth cascade.
pub fn butterworth_response(bp: &BandPass, freq_hz: f64) -> Complex64 {
    let high = bp.side_poles(bp.high_hz);
    let low = bp.side_poles(bp.low_hz);
    cascade(&high, &low, freq_hz)
}

fn cascade(high: &[Complex64], low: &[Complex64], freq_hz: f64) -> Complex64 {
    let jw = Complex64::new(0.0, TAU * freq_hz);
    let lowpass = high.iter().fold(Complex64::new(1.0, 0.0), |acc, &p| acc * p / (p + jw));
    let highpass = low.iter().fold(Complex64::new(1.0, 0.0), |acc, &p| acc * jw / (p + jw));
    lowpass * highpass
}

pub(crate) fn butterworth(bp: &BandPass, sample_interval: f64, spectrum: &mut [Complex64]) {
    let high = bp.side_poles(bp.high_hz);
    let low = bp.side_poles(bp.low_hz);
    apply_symmetric(spectrum, sample_interval, EdgeBin::Real, EdgeBin::Real, |f| {
        cascade(&high, &low, f).conj()
    });
}

/// `|fnorm|` beyond which the power response is pinned to a tiny constant.
pub fn crash_threshold(num_poles: usize) -> f64 {
    10f64.powf(35.0 / (2.0 * num_poles as f64) + 0.5)
}

/// Real power response `1 / (1 + fnorm^(2n))` with the overflow guard.
pub fn amplitude_response(bp: &BandPass, freq_hz: f64) -> f64 {
    if freq_hz <= 0.0 {
        return 0.0;
    }
    let fnorm = (freq_hz * freq_hz - bp.high_hz * bp.low_hz) / (freq_hz * (bp.high_hz - bp.low_hz));
    if fnorm.abs() > crash_threshold(bp.num_poles) {
        CRASHED_RESPONSE
    } else {
        1.0 / (1.0 + fnorm.powi(2 * bp.num_poles as i32))
    }
}

pub(crate) fn amplitude(bp: &BandPass, sample_interval: f64, spectrum: &mut [Complex64]) {
    apply_symmetric(spectrum, sample_interval, EdgeBin::Zero, EdgeBin::Real, |f| {
        Complex64::new(amplitude_response(bp, f), 0.0)
    });
    for bin in spectrum.iter_mut() {
        if bin.re.abs() < DENORMAL_FLOOR {
            bin.re = 0.0;
        }
        if bin.im.abs() < DENORMAL_FLOOR {
            bin.im = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seismo_core::fft;

    #[test]
    fn validation_rules() {
        assert!(BandPass::new(0.1, 25.0, 4).validate().is_ok());
        assert_eq!(BandPass::new(0.1, 25.0, 3).problems(true).len(), 1);
        assert!(BandPass::new(0.1, 25.0, 3).problems(false).is_empty());
        assert_eq!(BandPass::new(0.1, 25.0, 22).problems(true).len(), 1);
        assert_eq!(BandPass::new(0.0, 2e8, 0).problems(true).len(), 3);
        assert_eq!(BandPass::new(5.0, 5.0, 2).problems(true).len(), 1);
    }

    #[test]
    fn centre_gain_near_unity() {
        for &(low, high, n) in &[(0.1, 10.0, 4), (0.5, 25.0, 8), (1.0, 20.0, 2), (0.05, 40.0, 20)] {
            let bp = BandPass::new(low, high, n);
            let centre = (low * high).sqrt();
            let g = butterworth_response(&bp, centre).norm();
            assert!((g - 1.0).abs() < 0.01, "{low}-{high} n={n}: {g}");
        }
    }

    #[test]
    fn corners_are_half_power_for_wide_band() {
        let bp = BandPass::new(0.1, 20.0, 4);
        let g = butterworth_response(&bp, 20.0).norm();
        assert!((g - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-3, "{g}");
    }

    #[test]
    fn applied_butterworth_attenuates_out_of_band() {
        let dt = 0.01;
        let mut s = vec![Complex64::new(1.0, 0.0); 1024];
        butterworth(&BandPass::new(2.0, 5.0, 8), dt, &mut s);
        assert_eq!(s[0], Complex64::new(0.0, 0.0));
        // bin 400 is ~39 Hz
        assert!(s[400].norm() < 1e-6);
        // bin 32 is 3.125 Hz
        assert!((s[32].norm() - 1.0).abs() < 0.05);
    }

    #[test]
    fn crash_guard_threshold() {
        let bp = BandPass::new(1.0, 2.0, 4);
        let crash = crash_threshold(4);
        assert!((crash - 10f64.powf(35.0 / 8.0 + 0.5)).abs() < 1e-6 * crash);

        // fnorm ≈ f / (fh - fl) for large f
        let below = 0.9 * crash;
        let r = amplitude_response(&bp, below);
        assert!(r != CRASHED_RESPONSE && r < 1e-30, "{r}");
        let above = 1.5 * crash;
        assert_eq!(amplitude_response(&bp, above), CRASHED_RESPONSE);
    }

    #[test]
    fn amplitude_filter_zeroes_dc_and_tiny_components() {
        let input: Vec<f32> = (0..256).map(|i| 1.0 + (i as f32 * 0.7).sin()).collect();
        let mut s = fft(&input);
        amplitude(&BandPass::new(1.0, 2.0, 10), 0.01, &mut s);
        assert_eq!(s[0], Complex64::new(0.0, 0.0));
        for bin in &s {
            assert!(bin.re == 0.0 || bin.re.abs() >= DENORMAL_FLOOR);
            assert!(bin.im == 0.0 || bin.im.abs() >= DENORMAL_FLOOR);
        }
    }

    #[test]
    fn amplitude_response_peaks_at_geometric_centre() {
        let bp = BandPass::new(2.0, 8.0, 4);
        assert!((amplitude_response(&bp, 4.0) - 1.0).abs() < 1e-12);
        assert!((amplitude_response(&bp, 2.0) - 0.5).abs() < 1e-12);
        assert_eq!(amplitude_response(&bp, 0.0), 0.0);
    }
}
