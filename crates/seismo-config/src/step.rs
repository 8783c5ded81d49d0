//! Serializable processing steps.
//!
//! Each table in a pipeline file's `steps` array carries an `op` key naming
//! the operation; the remaining keys are its parameters.
//!
//! ```toml
//! [[steps]]
//! op = "butterworth"
//! low_hz = 0.1
//! high_hz = 25.0
//! poles = 4
//! taper = 5.0
//! ```

use seismo_analysis::{BandPass, FilterError, FreqFilter, FreqOptions, Gaussian, ProcessingStep};
use serde::{Deserialize, Serialize};

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn default_poles() -> usize {
    4
}

/// One processing step as written in a pipeline file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepConfig {
    /// Remove the mean over a time window; open ends extend to the record ends.
    RemoveMean {
        /// Window start in seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<f64>,
        /// Window end in seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<f64>,
    },
    /// Cosine taper of both ends.
    Taper {
        /// Ramp length as a percentage of the record.
        percent: f64,
    },
    /// Butterworth band-pass.
    Butterworth {
        /// Low corner in Hz.
        low_hz: f64,
        /// High corner in Hz.
        high_hz: f64,
        /// Total pole count.
        #[serde(default = "default_poles")]
        poles: usize,
        /// Taper percentage applied before transforming.
        #[serde(default, skip_serializing_if = "is_zero")]
        taper: f64,
        /// Transform back to samples afterwards.
        #[serde(default, skip_serializing_if = "is_false")]
        inverse: bool,
    },
    /// Power Butterworth band-pass.
    Amplitude {
        /// Low corner in Hz.
        low_hz: f64,
        /// High corner in Hz.
        high_hz: f64,
        /// Pole count.
        #[serde(default = "default_poles")]
        poles: usize,
        /// Taper percentage applied before transforming.
        #[serde(default, skip_serializing_if = "is_zero")]
        taper: f64,
        /// Transform back to samples afterwards.
        #[serde(default, skip_serializing_if = "is_false")]
        inverse: bool,
    },
    /// Gaussian band-pass.
    Gaussian {
        /// Centre frequency in Hz.
        center_hz: f64,
        /// Bandwidth control; larger is narrower.
        alpha: f64,
        /// Taper percentage applied before transforming.
        #[serde(default, skip_serializing_if = "is_zero")]
        taper: f64,
        /// Transform back to samples afterwards.
        #[serde(default, skip_serializing_if = "is_false")]
        inverse: bool,
    },
    /// Differentiate, spectrally unless `time_domain` is set.
    Differentiate {
        /// Use the first difference instead of `jω`.
        #[serde(default, skip_serializing_if = "is_false")]
        time_domain: bool,
        /// Taper percentage applied before transforming.
        #[serde(default, skip_serializing_if = "is_zero")]
        taper: f64,
        /// Transform back to samples afterwards.
        #[serde(default, skip_serializing_if = "is_false")]
        inverse: bool,
    },
    /// Integrate, spectrally unless `time_domain` is set.
    Integrate {
        /// Use the running sum instead of `1/jω`.
        #[serde(default, skip_serializing_if = "is_false")]
        time_domain: bool,
        /// Taper percentage applied before transforming.
        #[serde(default, skip_serializing_if = "is_zero")]
        taper: f64,
        /// Transform back to samples afterwards.
        #[serde(default, skip_serializing_if = "is_false")]
        inverse: bool,
    },
    /// Quadrature phase shift.
    Hilbert {
        /// Taper percentage applied before transforming.
        #[serde(default, skip_serializing_if = "is_zero")]
        taper: f64,
        /// Transform back to samples afterwards.
        #[serde(default, skip_serializing_if = "is_false")]
        inverse: bool,
    },
    /// Instantaneous amplitude; always returns samples.
    Envelope {
        /// Taper percentage applied before transforming.
        #[serde(default, skip_serializing_if = "is_zero")]
        taper: f64,
    },
    /// Undo anelastic attenuation.
    RemoveAttenuation {
        /// Attenuation time `t*` in seconds.
        t_star: f64,
        /// Frequency above which the spectrum is left alone.
        f_max: f64,
        /// Taper percentage applied before transforming.
        #[serde(default, skip_serializing_if = "is_zero")]
        taper: f64,
        /// Transform back to samples afterwards.
        #[serde(default, skip_serializing_if = "is_false")]
        inverse: bool,
    },
    /// Negate every sample.
    InvertPolarity,
    /// Transform pending spectral data back to samples.
    InverseFft,
    /// One-sided integration of the dominant polarity.
    IntegrateMaxOfPosNeg {
        /// Restrict to the single largest lobe.
        #[serde(default, skip_serializing_if = "is_false")]
        peak_only: bool,
    },
    /// Zero every gap sample.
    ZeroGaps,
}

impl StepConfig {
    /// The `op` key of this step.
    pub fn op(&self) -> &'static str {
        match self {
            StepConfig::RemoveMean { .. } => "remove_mean",
            StepConfig::Taper { .. } => "taper",
            StepConfig::Butterworth { .. } => "butterworth",
            StepConfig::Amplitude { .. } => "amplitude",
            StepConfig::Gaussian { .. } => "gaussian",
            StepConfig::Differentiate { .. } => "differentiate",
            StepConfig::Integrate { .. } => "integrate",
            StepConfig::Hilbert { .. } => "hilbert",
            StepConfig::Envelope { .. } => "envelope",
            StepConfig::RemoveAttenuation { .. } => "remove_attenuation",
            StepConfig::InvertPolarity => "invert_polarity",
            StepConfig::InverseFft => "inverse_fft",
            StepConfig::IntegrateMaxOfPosNeg { .. } => "integrate_max_of_pos_neg",
            StepConfig::ZeroGaps => "zero_gaps",
        }
    }

    /// The spectral filter and options this step runs, if it is spectral.
    fn spectral(&self) -> Option<(FreqFilter, FreqOptions)> {
        let options = |taper: f64, inverse: bool| FreqOptions::new().with_taper(taper).with_inverse(inverse);
        match *self {
            StepConfig::Butterworth {
                low_hz,
                high_hz,
                poles,
                taper,
                inverse,
            } => Some((
                FreqFilter::Butterworth(BandPass::new(low_hz, high_hz, poles)),
                options(taper, inverse),
            )),
            StepConfig::Amplitude {
                low_hz,
                high_hz,
                poles,
                taper,
                inverse,
            } => Some((
                FreqFilter::Amplitude(BandPass::new(low_hz, high_hz, poles)),
                options(taper, inverse),
            )),
            StepConfig::Gaussian {
                center_hz,
                alpha,
                taper,
                inverse,
            } => Some((
                FreqFilter::Gaussian(Gaussian::new(center_hz, alpha)),
                options(taper, inverse),
            )),
            StepConfig::Differentiate {
                time_domain: false,
                taper,
                inverse,
            } => Some((FreqFilter::Differentiate, options(taper, inverse))),
            StepConfig::Integrate {
                time_domain: false,
                taper,
                inverse,
            } => Some((FreqFilter::Integrate, options(taper, inverse))),
            StepConfig::Hilbert { taper, inverse } => Some((FreqFilter::Hilbert, options(taper, inverse))),
            StepConfig::Envelope { taper } => Some((FreqFilter::Envelope, options(taper, true))),
            StepConfig::RemoveAttenuation {
                t_star,
                f_max,
                taper,
                inverse,
            } => Some((
                FreqFilter::RemoveAttenuation { t_star, f_max },
                options(taper, inverse),
            )),
            _ => None,
        }
    }

    /// Every problem with this step's parameters.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let taper = match *self {
            StepConfig::Taper { percent } => Some(percent),
            StepConfig::Differentiate { time_domain: true, .. } | StepConfig::Integrate { time_domain: true, .. } => {
                None
            }
            _ => self.spectral().map(|(_, options)| options.taper_percent),
        };
        if let Some(percent) = taper
            && !(0.0..=50.0).contains(&percent)
        {
            problems.push(format!("taper {percent}% must be within 0..=50"));
        }
        if let StepConfig::RemoveMean {
            start: Some(start),
            end: Some(end),
        } = *self
            && !(start <= end)
        {
            problems.push(format!("mean window [{start}, {end}] is reversed"));
        }
        if let Some((filter, _)) = self.spectral() {
            match filter.check_settings() {
                Ok(()) => {}
                Err(FilterError::InvalidSettings(found)) => problems.extend(found),
                Err(other) => problems.push(other.to_string()),
            }
        }
        problems
    }

    /// Convert to the step the analysis crate runs.
    ///
    /// Parameters are not checked here; see [`StepConfig::problems`].
    pub fn to_step(&self) -> ProcessingStep {
        if let Some((filter, options)) = self.spectral() {
            return ProcessingStep::Filter { filter, options };
        }
        match *self {
            StepConfig::RemoveMean { start, end } => ProcessingStep::RemoveMean { start, end },
            StepConfig::Taper { percent } => ProcessingStep::Taper { percent },
            StepConfig::Differentiate { .. } => ProcessingStep::Differentiate,
            StepConfig::Integrate { .. } => ProcessingStep::Integrate,
            StepConfig::InvertPolarity => ProcessingStep::InvertPolarity,
            StepConfig::IntegrateMaxOfPosNeg { peak_only } => ProcessingStep::IntegrateMaxOfPosNeg { peak_only },
            StepConfig::ZeroGaps => ProcessingStep::ZeroGaps,
            _ => ProcessingStep::InverseFft,
        }
    }
}
