//! Frequency-domain filter family.
//!
//! Every filter works on the full-length spectrum of a real signal (as
//! produced by [`seismo_core::fft`]) and keeps it conjugate-symmetric: bin
//! `k` is multiplied by the filter factor and bin `N-k` by its conjugate.
//!
//! Because the forward transform uses the `e^{+j}` kernel, factors are the
//! conjugates of the physical transfer functions. Differentiation is `-jω`,
//! integration `-1/(jω)`.
//!
//! ```rust
//! use seismo_analysis::filters::{BandPass, FreqFilter};
//! use seismo_core::fft;
//!
//! let samples: Vec<f32> = (0..512).map(|i| (i as f32 * 0.3).sin()).collect();
//! let mut spectrum = fft(&samples);
//! FreqFilter::Butterworth(BandPass::new(0.5, 10.0, 4))
//!     .apply(0.01, &mut spectrum)
//!     .unwrap();
//! ```

mod bandpass;
mod convolve;
mod gaussian;
mod generic;

pub use bandpass::{BandPass, amplitude_response, butterworth_response, crash_threshold};
pub use convolve::MasterSpectrum;
pub use gaussian::Gaussian;
pub use generic::envelope;

use crate::error::{FilterError, Result};
use seismo_core::Complex64;
use std::sync::Arc;

/// How a filter changes the amplitude unit tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitChange {
    /// Units unchanged.
    None,
    /// Units gain a factor of time (integration).
    TimesTime,
    /// Units lose a factor of time (differentiation).
    PerTime,
}

/// A transformation applied to a complex spectrum.
#[derive(Debug, Clone, PartialEq)]
pub enum FreqFilter {
    /// Cascaded analog Butterworth low-pass and high-pass sections.
    Butterworth(BandPass),
    /// Gaussian window around a centre frequency.
    Gaussian(Gaussian),
    /// Real-valued Butterworth power response `1 / (1 + fnorm^(2n))`.
    Amplitude(BandPass),
    /// Time derivative.
    Differentiate,
    /// Time integral.
    Integrate,
    /// Quadrature (90°) phase shift.
    Hilbert,
    /// Instantaneous amplitude `sqrt(x² + H{x}²)`.
    Envelope,
    /// Undo anelastic attenuation `exp(ω·t*/2)` below `f_max`.
    RemoveAttenuation {
        /// Attenuation time `t*` in seconds.
        t_star: f64,
        /// Frequency (Hz) above which the spectrum is left unchanged.
        f_max: f64,
    },
    /// Multiply by a master spectrum.
    Convolve(Arc<MasterSpectrum>),
    /// Divide by a master spectrum, optionally water-level stabilized.
    Deconvolve {
        /// Spectrum to divide by.
        master: Arc<MasterSpectrum>,
        /// Water level in dB below the master's peak amplitude.
        water_level_db: Option<f64>,
    },
}

impl FreqFilter {
    /// Short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            FreqFilter::Butterworth(_) => "butterworth",
            FreqFilter::Gaussian(_) => "gaussian",
            FreqFilter::Amplitude(_) => "amplitude",
            FreqFilter::Differentiate => "differentiate",
            FreqFilter::Integrate => "integrate",
            FreqFilter::Hilbert => "hilbert",
            FreqFilter::Envelope => "envelope",
            FreqFilter::RemoveAttenuation { .. } => "remove_attenuation",
            FreqFilter::Convolve(_) => "convolve",
            FreqFilter::Deconvolve { .. } => "deconvolve",
        }
    }

    /// Validate parameters, listing every problem.
    pub fn check_settings(&self) -> Result<()> {
        let problems = match self {
            FreqFilter::Butterworth(bp) => bp.problems(true),
            FreqFilter::Amplitude(bp) => bp.problems(false),
            FreqFilter::Gaussian(g) => g.problems(),
            FreqFilter::RemoveAttenuation { t_star, f_max } => {
                let mut p = Vec::new();
                if !(t_star.is_finite() && *t_star >= 0.0) {
                    p.push(format!("t* {t_star} s must be non-negative"));
                }
                if !(f_max.is_finite() && *f_max > 0.0) {
                    p.push(format!("attenuation cutoff {f_max} Hz must be positive"));
                }
                p
            }
            FreqFilter::Deconvolve {
                water_level_db: Some(level),
                ..
            } if !level.is_finite() => vec![format!("water level {level} dB must be finite")],
            _ => Vec::new(),
        };
        FilterError::from_problems(problems)
    }

    /// Non-fatal remarks about the parameters.
    pub fn warnings(&self) -> Vec<String> {
        match self {
            FreqFilter::Amplitude(bp) if bp.num_poles % 2 == 1 => vec![format!(
                "amplitude filter uses an odd number of poles ({})",
                bp.num_poles
            )],
            _ => Vec::new(),
        }
    }

    /// Check that a spectrum of `len` bins at `sample_interval` can be
    /// combined with this filter's master spectrum, if any.
    pub fn check_spectrum(&self, len: usize, sample_interval: f64) -> Result<()> {
        match self {
            FreqFilter::Convolve(master) | FreqFilter::Deconvolve { master, .. } => {
                master.check_compatible(len, sample_interval)
            }
            _ => Ok(()),
        }
    }

    /// Apply to `spectrum` in place.
    ///
    /// On error the spectrum is untouched.
    pub fn apply(&self, sample_interval: f64, spectrum: &mut [Complex64]) -> Result<()> {
        self.check_settings()?;
        if !(sample_interval.is_finite() && sample_interval > 0.0) {
            return Err(FilterError::invalid(format!(
                "sample interval {sample_interval} s must be positive"
            )));
        }
        if let Err(err) = self.check_spectrum(spectrum.len(), sample_interval) {
            tracing::warn!(filter = self.name(), %err, "spectrum rejected");
            return Err(err);
        }
        for warning in self.warnings() {
            tracing::warn!(filter = self.name(), "{warning}");
        }
        self.apply_checked(sample_interval, spectrum);
        Ok(())
    }

    /// Apply after the caller has run every check.
    pub(crate) fn apply_checked(&self, sample_interval: f64, spectrum: &mut [Complex64]) {
        if spectrum.is_empty() {
            return;
        }
        match self {
            FreqFilter::Butterworth(bp) => bandpass::butterworth(bp, sample_interval, spectrum),
            FreqFilter::Amplitude(bp) => bandpass::amplitude(bp, sample_interval, spectrum),
            FreqFilter::Gaussian(g) => g.apply_unchecked(sample_interval, spectrum),
            FreqFilter::Differentiate => generic::differentiate(sample_interval, spectrum),
            FreqFilter::Integrate => generic::integrate(sample_interval, spectrum),
            FreqFilter::Hilbert | FreqFilter::Envelope => generic::hilbert(sample_interval, spectrum),
            FreqFilter::RemoveAttenuation { t_star, f_max } => {
                generic::remove_attenuation(*t_star, *f_max, sample_interval, spectrum);
            }
            FreqFilter::Convolve(master) => master.convolve(spectrum),
            FreqFilter::Deconvolve {
                master,
                water_level_db,
            } => master.deconvolve(spectrum, *water_level_db),
        }
    }

    /// Whether the spectrum must be rebuilt from fresh time samples before
    /// this filter runs, even when a cached spectrum is available.
    pub fn needs_pre_process(&self) -> bool {
        matches!(self, FreqFilter::Envelope)
    }

    /// Whether the post-processing step rewrites the time samples, which
    /// forces an inverse transform.
    pub fn post_process_changes_samples(&self) -> bool {
        matches!(self, FreqFilter::Envelope)
    }

    /// Time-domain post-processing after the inverse transform.
    ///
    /// `original` holds the samples the spectrum was computed from and
    /// `filtered` the inverse transform of the filtered spectrum.
    pub fn post_process(&self, original: &[f32], filtered: &mut [f32]) {
        if let FreqFilter::Envelope = self {
            envelope(original, filtered);
        }
    }

    /// Effect on the amplitude unit tag.
    pub fn unit_change(&self) -> UnitChange {
        match self {
            FreqFilter::Differentiate => UnitChange::PerTime,
            FreqFilter::Integrate => UnitChange::TimesTime,
            _ => UnitChange::None,
        }
    }
}

/// Treatment of the DC and Nyquist bins, which have no mirror.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum EdgeBin {
    /// Force to zero.
    Zero,
    /// Multiply by the real part of the factor.
    Real,
    /// Multiply by half the real part of the factor.
    Half,
}

/// Multiply bin `k` by `factor(f_k)` and bin `N-k` by its conjugate.
///
/// `factor` receives the bin frequency in Hz.
pub(crate) fn apply_symmetric<F>(
    spectrum: &mut [Complex64],
    sample_interval: f64,
    dc: EdgeBin,
    nyquist: EdgeBin,
    mut factor: F,
) where
    F: FnMut(f64) -> Complex64,
{
    let n = spectrum.len();
    if n == 0 {
        return;
    }
    let df = 1.0 / (n as f64 * sample_interval);

    scale_edge(&mut spectrum[0], dc, || factor(0.0));
    if n == 1 {
        return;
    }

    for k in 1..=(n - 1) / 2 {
        let h = factor(k as f64 * df);
        spectrum[k] *= h;
        spectrum[n - k] *= h.conj();
    }
    if n % 2 == 0 {
        let half = n / 2;
        scale_edge(&mut spectrum[half], nyquist, || factor(half as f64 * df));
    }
}

fn scale_edge(bin: &mut Complex64, mode: EdgeBin, factor: impl FnOnce() -> Complex64) {
    match mode {
        EdgeBin::Zero => *bin = Complex64::new(0.0, 0.0),
        EdgeBin::Real => *bin *= factor().re,
        EdgeBin::Half => *bin *= 0.5 * factor().re,
    }
}
