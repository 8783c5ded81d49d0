//! Ordered processing steps executed against a [`Waveform`].

use crate::error::Result;
use crate::filters::FreqFilter;
use crate::waveform::{FreqOptions, Waveform};
use tracing::{debug, warn};

/// One stage of a processing pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingStep {
    /// Remove the mean of the samples timed within `[start, end]`; open
    /// ends extend to the record ends.
    RemoveMean {
        /// Window start in seconds.
        start: Option<f64>,
        /// Window end in seconds.
        end: Option<f64>,
    },
    /// Cosine taper of `percent`% at both ends.
    Taper {
        /// Ramp length as a percentage of the record.
        percent: f64,
    },
    /// Frequency-domain filter.
    Filter {
        /// Filter to apply.
        filter: FreqFilter,
        /// Taper and inverse-transform options.
        options: FreqOptions,
    },
    /// Time-domain first difference.
    Differentiate,
    /// Time-domain running sum from zero.
    Integrate,
    /// Negate every sample.
    InvertPolarity,
    /// Transform pending spectral data back to samples.
    InverseFft,
    /// One-sided integration of the dominant polarity.
    IntegrateMaxOfPosNeg {
        /// Restrict to the single largest lobe.
        peak_only: bool,
    },
    /// Zero every gap sample.
    ZeroGaps,
}

impl ProcessingStep {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ProcessingStep::RemoveMean { .. } => "remove_mean",
            ProcessingStep::Taper { .. } => "taper",
            ProcessingStep::Filter { filter, .. } => filter.name(),
            ProcessingStep::Differentiate => "differentiate",
            ProcessingStep::Integrate => "integrate",
            ProcessingStep::InvertPolarity => "invert_polarity",
            ProcessingStep::InverseFft => "inverse_fft",
            ProcessingStep::IntegrateMaxOfPosNeg { .. } => "integrate_max_of_pos_neg",
            ProcessingStep::ZeroGaps => "zero_gaps",
        }
    }
}

impl Waveform {
    /// Apply a single step.
    pub fn apply_step(&mut self, step: &ProcessingStep) -> Result<()> {
        match step {
            ProcessingStep::RemoveMean { start, end } => {
                self.remove_mean(start.unwrap_or(f64::NEG_INFINITY), end.unwrap_or(f64::INFINITY))?;
            }
            ProcessingStep::Taper { percent } => {
                self.cosine_taper(*percent);
            }
            ProcessingStep::Filter { filter, options } => self.apply_freq_process(filter, options)?,
            ProcessingStep::Differentiate => self.differentiate(None),
            ProcessingStep::Integrate => self.integrate(0.0),
            ProcessingStep::InvertPolarity => self.invert_polarity(),
            ProcessingStep::InverseFft => {
                self.inverse_fft();
            }
            ProcessingStep::IntegrateMaxOfPosNeg { peak_only } => {
                self.integrate_max_of_pos_neg(*peak_only);
            }
            ProcessingStep::ZeroGaps => {
                self.zero_gaps();
            }
        }
        Ok(())
    }

    /// Run `steps` in order, stopping at the first failure.
    ///
    /// Pending spectral data is transformed back at the end, so the samples
    /// always reflect every step that succeeded.
    pub fn run(&mut self, steps: &[ProcessingStep]) -> Result<()> {
        for (index, step) in steps.iter().enumerate() {
            debug!(index, step = step.name(), "processing step");
            if let Err(err) = self.apply_step(step) {
                warn!(index, step = step.name(), %err, "processing step failed");
                self.inverse_fft();
                return Err(err);
            }
        }
        self.inverse_fft();
        Ok(())
    }
}
