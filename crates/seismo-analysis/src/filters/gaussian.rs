//! Gaussian band-pass window.

use super::{EdgeBin, apply_symmetric};
use crate::error::{FilterError, Result};
use seismo_core::Complex64;

/// Gaussian filter parameters.
///
/// The weight at frequency `f` is `exp(-alpha·((f - fc)/fc)²)`; larger
/// `alpha` narrows the band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    /// Centre frequency in Hz.
    pub center_hz: f64,
    /// Bandwidth control.
    pub alpha: f64,
}

impl Gaussian {
    /// Accepted centre frequencies (Hz).
    pub const CENTER_RANGE: (f64, f64) = (1e-8, 1e8);
    /// Accepted alpha values.
    pub const ALPHA_RANGE: (f64, f64) = (1e-3, 1e6);

    /// Create Gaussian parameters.
    pub fn new(center_hz: f64, alpha: f64) -> Self {
        Self { center_hz, alpha }
    }

    /// Validate both parameters.
    pub fn validate(&self) -> Result<()> {
        FilterError::from_problems(self.problems())
    }

    pub(crate) fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let (lo, hi) = Self::CENTER_RANGE;
        if !(lo..=hi).contains(&self.center_hz) {
            problems.push(format!("centre frequency {} Hz outside [{lo:e}, {hi:e}] Hz", self.center_hz));
        }
        let (lo, hi) = Self::ALPHA_RANGE;
        if !(lo..=hi).contains(&self.alpha) {
            problems.push(format!("alpha {} outside [{lo:e}, {hi:e}]", self.alpha));
        }
        problems
    }

    /// Weight at `freq_hz`.
    pub fn weight(&self, freq_hz: f64) -> f64 {
        let x = (freq_hz - self.center_hz) / self.center_hz;
        (-self.alpha * x * x).exp()
    }

    /// Apply without validation; used for spectrogram rows whose scaled
    /// alpha may leave the validated range.
    pub(crate) fn apply_unchecked(&self, sample_interval: f64, spectrum: &mut [Complex64]) {
        apply_symmetric(spectrum, sample_interval, EdgeBin::Zero, EdgeBin::Half, |f| {
            Complex64::new(self.weight(f), 0.0)
        });
    }
}
