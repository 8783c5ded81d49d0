//! Spectral convolution and water-level deconvolution against a master
//! spectrum.

use crate::error::{FilterError, Result};
use seismo_core::{Complex64, ComplexExt, fft};

/// Spectrum of a master channel, computed once and shared by every
/// channel it is applied to.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterSpectrum {
    spectrum: Vec<Complex64>,
    sample_interval: f64,
    max_amplitude: f64,
}

impl MasterSpectrum {
    /// Transform `samples` (zero-padded to a power of two).
    pub fn from_samples(samples: &[f32], sample_interval: f64) -> Self {
        Self::from_spectrum(fft(samples), sample_interval)
    }

    /// Wrap an existing spectrum.
    pub fn from_spectrum(spectrum: Vec<Complex64>, sample_interval: f64) -> Self {
        let max_amplitude = spectrum.iter().map(|c| c.norm()).fold(0.0, f64::max);
        Self {
            spectrum,
            sample_interval,
            max_amplitude,
        }
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.spectrum.len()
    }

    /// True when the master has no bins.
    pub fn is_empty(&self) -> bool {
        self.spectrum.is_empty()
    }

    /// Sample interval of the master channel in seconds.
    pub fn sample_interval(&self) -> f64 {
        self.sample_interval
    }

    /// Largest bin magnitude.
    pub fn max_amplitude(&self) -> f64 {
        self.max_amplitude
    }

    /// Bins of the master spectrum.
    pub fn bins(&self) -> &[Complex64] {
        &self.spectrum
    }

    /// Lengths must match and the Nyquist frequencies may differ by less
    /// than one frequency bin of the target.
    pub(crate) fn check_compatible(&self, len: usize, sample_interval: f64) -> Result<()> {
        let mismatch = || FilterError::SpectrumMismatch {
            target_len: len,
            master_len: self.len(),
            target_dt: sample_interval,
            master_dt: self.sample_interval,
        };
        if len != self.len() || len == 0 {
            return Err(mismatch());
        }
        let bin = 1.0 / (len as f64 * sample_interval);
        let nyquist_gap = (0.5 / sample_interval - 0.5 / self.sample_interval).abs();
        if nyquist_gap < bin { Ok(()) } else { Err(mismatch()) }
    }

    pub(crate) fn convolve(&self, spectrum: &mut [Complex64]) {
        for (bin, m) in spectrum.iter_mut().zip(&self.spectrum) {
            *bin *= m;
        }
    }

    /// Divide by the master. With a water level of `L` dB no divisor is
    /// smaller than `max_amplitude / 10^(L/20)`.
    pub(crate) fn deconvolve(&self, spectrum: &mut [Complex64], water_level_db: Option<f64>) {
        let floor = water_level_db.map(|level| self.max_amplitude / 10f64.powf(level / 20.0));
        for (bin, &m) in spectrum.iter_mut().zip(&self.spectrum) {
            let divisor = match floor {
                Some(floor) if m.norm() < floor => m.unit_or_one() * floor,
                _ => m,
            };
            *bin = if divisor.norm() > 0.0 {
                *bin / divisor
            } else {
                Complex64::new(0.0, 0.0)
            };
        }
    }
}
