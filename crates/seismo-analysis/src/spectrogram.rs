//! Narrow-band envelope spectrogram
//!
//! The record is cut into overlapping segments whose spectra are computed
//! once. Every output frequency row filters each segment spectrum with a
//! narrow band-pass centred on the row frequency, transforms back and takes
//! the envelope `sqrt(y² + H{y}²)`. Each segment writes only the samples it
//! owns, so adjacent segments never overwrite each other.

use crate::error::{FilterError, Result};
use crate::filters::{BandPass, FreqFilter, Gaussian, envelope};
use crate::waveform::Waveform;
use seismo_core::{fft_inverse, fft_padded, next_power_of_two};
use std::cell::OnceCell;
use std::ops::Range;
use tracing::debug;

/// Taper applied to every segment before its transform.
const SEGMENT_TAPER_PERCENT: f64 = 5.0;

/// Log amplitudes are floored this far below the matrix maximum.
const LOG_DYNAMIC_RANGE: f64 = 1e6;

/// Narrow-band filter used for each frequency row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowFilter {
    /// Gaussian window with `alpha·(freq/reference_hz)` as bandwidth control.
    Gaussian {
        /// Bandwidth control at the reference frequency.
        alpha: f64,
        /// Frequency at which `alpha` applies unscaled.
        reference_hz: f64,
    },
    /// Butterworth band-pass with corners `freq/1.3` and `freq·1.3`.
    Butterworth,
    /// Power Butterworth band-pass with corners `freq/1.3` and `freq·1.3`.
    Amplitude,
}

impl RowFilter {
    /// Pole count of the Butterworth-shaped row filters.
    pub const ORDER: usize = 8;
    /// Ratio between the row frequency and each band edge.
    pub const BAND_FACTOR: f64 = 1.3;

    fn filter_for(&self, freq_hz: f64) -> FreqFilter {
        let band = || BandPass::new(freq_hz / Self::BAND_FACTOR, freq_hz * Self::BAND_FACTOR, Self::ORDER);
        match *self {
            RowFilter::Gaussian {
                alpha,
                reference_hz,
            } => FreqFilter::Gaussian(Gaussian::new(freq_hz, alpha * (freq_hz / reference_hz))),
            RowFilter::Butterworth => FreqFilter::Butterworth(band()),
            RowFilter::Amplitude => FreqFilter::Amplitude(band()),
        }
    }
}

impl Default for RowFilter {
    fn default() -> Self {
        RowFilter::Gaussian {
            alpha: 10.0,
            reference_hz: 1.0,
        }
    }
}

/// Spacing of the frequency rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyAxis {
    /// `fmin + k·Δ`
    #[default]
    Linear,
    /// `10^(log10 fmin + k·Δ)`
    Logarithmic,
}

/// Spectrogram parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramConfig {
    /// Number of overlapping segments.
    pub segments: usize,
    /// Number of frequency rows.
    pub frequencies: usize,
    /// Lowest row frequency; defaults to the FFT frequency resolution.
    pub min_hz: Option<f64>,
    /// Highest row frequency; defaults to Nyquist.
    pub max_hz: Option<f64>,
    /// Row spacing.
    pub axis: FrequencyAxis,
    /// Row filter.
    pub row_filter: RowFilter,
    /// Amplitude mapped to 0 dB in the log matrix.
    pub reference_amplitude: f64,
    /// Keep every n-th time sample of the output.
    pub decimation: usize,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            segments: 16,
            frequencies: 64,
            min_hz: None,
            max_hz: None,
            axis: FrequencyAxis::Linear,
            row_filter: RowFilter::default(),
            reference_amplitude: 1.0,
            decimation: 1,
        }
    }
}

impl SpectrogramConfig {
    /// Check every parameter, listing all problems.
    pub fn validate(&self) -> Result<()> {
        FilterError::from_problems(self.problems())
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.segments == 0 {
            problems.push("segment count must be at least 1".to_string());
        }
        if self.frequencies == 0 {
            problems.push("frequency count must be at least 1".to_string());
        }
        for (name, value) in [("minimum", self.min_hz), ("maximum", self.max_hz)] {
            if let Some(f) = value
                && !(f.is_finite() && f > 0.0)
            {
                problems.push(format!("{name} frequency {f} Hz must be positive"));
            }
        }
        if let (Some(lo), Some(hi)) = (self.min_hz, self.max_hz)
            && lo >= hi
        {
            problems.push(format!("minimum frequency {lo} Hz must be below maximum {hi} Hz"));
        }
        if let RowFilter::Gaussian {
            alpha,
            reference_hz,
        } = self.row_filter
        {
            if !(alpha.is_finite() && alpha > 0.0) {
                problems.push(format!("gaussian alpha {alpha} must be positive"));
            }
            if !(reference_hz.is_finite() && reference_hz > 0.0) {
                problems.push(format!("reference frequency {reference_hz} Hz must be positive"));
            }
        }
        if !(self.reference_amplitude.is_finite() && self.reference_amplitude > 0.0) {
            problems.push(format!(
                "reference amplitude {} must be positive",
                self.reference_amplitude
            ));
        }
        if self.decimation == 0 {
            problems.push("decimation must be at least 1".to_string());
        }
        problems
    }

    /// Row frequencies for a record transformed at `fft_size` points.
    pub fn frequency_axis(&self, fft_size: usize, sample_interval: f64) -> Vec<f64> {
        let fmin = self.min_hz.unwrap_or(1.0 / (fft_size as f64 * sample_interval));
        let fmax = self.max_hz.unwrap_or(0.5 / sample_interval);
        let steps = self.frequencies.saturating_sub(1).max(1) as f64;
        match self.axis {
            FrequencyAxis::Linear => {
                let delta = (fmax - fmin) / steps;
                (0..self.frequencies).map(|k| fmin + k as f64 * delta).collect()
            }
            FrequencyAxis::Logarithmic => {
                let (lo, hi) = (fmin.log10(), fmax.log10());
                let delta = (hi - lo) / steps;
                (0..self.frequencies)
                    .map(|k| 10f64.powf(lo + k as f64 * delta))
                    .collect()
            }
        }
    }
}

/// One segment: the samples it transforms and the samples it writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    pub span: Range<usize>,
    pub owned: Range<usize>,
}

/// Hop `h = ceil(len/n)`; segment `s` spans `[s·h - h/2, (s+1)·h + h/2)`
/// and owns `[s·h, (s+1)·h)`, both clipped to the record.
pub(crate) fn segments(len: usize, count: usize) -> Vec<Segment> {
    if len == 0 || count == 0 {
        return Vec::new();
    }
    let hop = len.div_ceil(count);
    (0..count)
        .map(|s| s * hop)
        .take_while(|&start| start < len)
        .map(|start| Segment {
            span: start.saturating_sub(hop / 2)..(start + hop + hop / 2).min(len),
            owned: start..(start + hop).min(len),
        })
        .collect()
}

/// Time × frequency envelope amplitudes.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    amplitudes: Vec<Vec<f32>>,
    frequencies: Vec<f64>,
    start_time: f64,
    time_step: f64,
    fft_size: usize,
    reference_amplitude: f64,
    log_amplitudes: OnceCell<Vec<Vec<f32>>>,
}

impl Spectrogram {
    /// Compute the spectrogram of `samples` taken every `sample_interval`
    /// seconds, the first at `start_time`.
    pub fn compute(
        samples: &[f32],
        sample_interval: f64,
        start_time: f64,
        config: &SpectrogramConfig,
    ) -> Result<Self> {
        let mut problems = config.problems();
        if !(sample_interval.is_finite() && sample_interval > 0.0) {
            problems.push(format!("sample interval {sample_interval} s must be positive"));
        }
        if config.segments > samples.len() {
            problems.push(format!(
                "{} segments requested for {} samples",
                config.segments,
                samples.len()
            ));
        }
        FilterError::from_problems(problems)?;
        if samples.is_empty() {
            return Err(FilterError::EmptySignal);
        }

        let segments = segments(samples.len(), config.segments);
        let longest = segments.iter().map(|s| s.span.len()).max().unwrap_or(0);
        let fft_size = next_power_of_two(longest);
        let frequencies = config.frequency_axis(fft_size, sample_interval);
        debug!(
            len = samples.len(),
            segments = segments.len(),
            fft_size,
            rows = frequencies.len(),
            "spectrogram"
        );

        let spectra = segments
            .iter()
            .map(|segment| {
                let mut wf = Waveform::new(samples[segment.span.clone()].to_vec(), sample_interval)?;
                wf.cosine_taper(SEGMENT_TAPER_PERCENT);
                Ok(fft_padded(wf.samples(), fft_size))
            })
            .collect::<Result<Vec<_>>>()?;

        let times = samples.len().div_ceil(config.decimation);
        let mut amplitudes = vec![vec![0.0f32; frequencies.len()]; times];
        for (row, &freq) in frequencies.iter().enumerate() {
            let filter = config.row_filter.filter_for(freq);
            for (segment, spectrum) in segments.iter().zip(&spectra) {
                let mut filtered = spectrum.clone();
                filter.apply_checked(sample_interval, &mut filtered);
                let mut quadrature = filtered.clone();
                FreqFilter::Hilbert.apply_checked(sample_interval, &mut quadrature);

                let n = segment.span.len();
                let y = fft_inverse(&filtered, n);
                let mut env = fft_inverse(&quadrature, n);
                envelope(&y, &mut env);

                for i in segment.owned.clone().filter(|i| i % config.decimation == 0) {
                    amplitudes[i / config.decimation][row] = env[i - segment.span.start];
                }
            }
        }

        Ok(Self {
            amplitudes,
            frequencies,
            start_time,
            time_step: sample_interval * config.decimation as f64,
            fft_size,
            reference_amplitude: config.reference_amplitude,
            log_amplitudes: OnceCell::new(),
        })
    }

    /// Amplitudes indexed `[time][frequency]`.
    pub fn amplitudes(&self) -> &[Vec<f32>] {
        &self.amplitudes
    }

    /// Row frequencies in Hz.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Number of output time samples.
    pub fn num_times(&self) -> usize {
        self.amplitudes.len()
    }

    /// Number of frequency rows.
    pub fn num_frequencies(&self) -> usize {
        self.frequencies.len()
    }

    /// Seconds between output time samples.
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Transform length used for every segment.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Time of output sample `index`.
    pub fn time_at(&self, index: usize) -> f64 {
        self.start_time + index as f64 * self.time_step
    }

    /// Amplitude at a time and frequency index.
    pub fn get(&self, time: usize, freq: usize) -> Option<f32> {
        self.amplitudes.get(time).and_then(|row| row.get(freq)).copied()
    }

    /// Largest amplitude in the matrix.
    pub fn max_amplitude(&self) -> f32 {
        self.amplitudes.iter().flatten().copied().fold(0.0, f32::max)
    }

    /// Frequency of the strongest row at `time`.
    pub fn peak_frequency(&self, time: usize) -> Option<f64> {
        let row = self.amplitudes.get(time)?;
        let (index, _) = row.iter().enumerate().max_by(|a, b| a.1.total_cmp(b.1))?;
        self.frequencies.get(index).copied()
    }

    /// `20·log10(max(a, max/1e6) / reference)`, computed on first use.
    pub fn log_amplitudes(&self) -> &[Vec<f32>] {
        self.log_amplitudes.get_or_init(|| {
            let max = f64::from(self.max_amplitude());
            let floor = if max > 0.0 {
                max / LOG_DYNAMIC_RANGE
            } else {
                f64::MIN_POSITIVE
            };
            self.amplitudes
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|&a| (20.0 * (f64::from(a).max(floor) / self.reference_amplitude).log10()) as f32)
                        .collect()
                })
                .collect()
        })
    }
}

impl Waveform {
    /// Spectrogram of the current samples; gap samples count as zero.
    pub fn spectrogram(&mut self, config: &SpectrogramConfig) -> Result<Spectrogram> {
        let gaps = self.gap_window();
        let (dt, lag) = (self.sample_interval(), self.lag_time());
        let samples: Vec<f32> = self
            .samples()
            .iter()
            .map(|&s| if gaps.contains(s) { s } else { 0.0 })
            .collect();
        Spectrogram::compute(&samples, dt, lag, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn sine(freq: f64, len: usize, dt: f64) -> Vec<f32> {
        (0..len)
            .map(|i| (TAU * freq * i as f64 * dt).sin() as f32)
            .collect()
    }

    #[test]
    fn owned_ranges_partition_the_record() {
        for &(len, count) in &[(100, 1), (100, 3), (1000, 8), (10, 6), (7, 7)] {
            let segs = segments(len, count);
            let mut next = 0;
            for s in &segs {
                assert_eq!(s.owned.start, next, "len={len} count={count}");
                assert!(s.span.start <= s.owned.start && s.owned.end <= s.span.end);
                next = s.owned.end;
            }
            assert_eq!(next, len);
        }
    }

    #[test]
    fn segments_overlap_by_half_a_hop() {
        let segs = segments(1000, 4);
        assert_eq!(segs[0].span, 0..375);
        assert_eq!(segs[1].span, 125..625);
        assert_eq!(segs[1].owned, 250..500);
        assert_eq!(segs[3].span, 625..1000);
    }

    #[test]
    fn default_axis_bounds() {
        let config = SpectrogramConfig {
            frequencies: 5,
            ..SpectrogramConfig::default()
        };
        let axis = config.frequency_axis(256, 0.01);
        assert!((axis[0] - 1.0 / 2.56).abs() < 1e-12);
        assert!((axis[4] - 50.0).abs() < 1e-12);
    }

    #[test]
    fn logarithmic_axis_is_geometric() {
        let config = SpectrogramConfig {
            frequencies: 4,
            min_hz: Some(0.1),
            max_hz: Some(100.0),
            axis: FrequencyAxis::Logarithmic,
            ..SpectrogramConfig::default()
        };
        let axis = config.frequency_axis(1024, 0.01);
        for (got, want) in axis.iter().zip([0.1, 1.0, 10.0, 100.0]) {
            assert!((got - want).abs() < 1e-9 * want, "{got} vs {want}");
        }
    }

    #[test]
    fn validation_lists_every_problem() {
        let config = SpectrogramConfig {
            segments: 0,
            frequencies: 0,
            min_hz: Some(10.0),
            max_hz: Some(5.0),
            decimation: 0,
            ..SpectrogramConfig::default()
        };
        match config.validate() {
            Err(FilterError::InvalidSettings(p)) => assert_eq!(p.len(), 4, "{p:?}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn sine_shows_up_in_its_row() {
        let dt = 0.01;
        let config = SpectrogramConfig {
            segments: 8,
            frequencies: 40,
            min_hz: Some(0.5),
            max_hz: Some(20.0),
            ..SpectrogramConfig::default()
        };
        let spec = Spectrogram::compute(&sine(5.0, 2000, dt), dt, 0.0, &config).unwrap();
        assert_eq!(spec.num_times(), 2000);
        assert_eq!(spec.num_frequencies(), 40);
        for t in [500, 1000, 1500] {
            let peak = spec.peak_frequency(t).unwrap();
            assert!((peak - 5.0).abs() < 1e-9, "t={t}: {peak}");
            let a = spec.get(t, 9).unwrap();
            assert!((a - 1.0).abs() < 0.1, "t={t}: {a}");
        }
        assert!(spec.amplitudes().iter().flatten().all(|a| a.is_finite() && *a >= 0.0));
    }

    #[test]
    fn butterworth_rows_and_decimation() {
        let dt = 0.01;
        let config = SpectrogramConfig {
            segments: 4,
            frequencies: 20,
            min_hz: Some(1.0),
            max_hz: Some(20.0),
            row_filter: RowFilter::Butterworth,
            decimation: 10,
            ..SpectrogramConfig::default()
        };
        let spec = Spectrogram::compute(&sine(5.0, 2000, dt), dt, 2.0, &config).unwrap();
        assert_eq!(spec.num_times(), 200);
        assert!((spec.time_step() - 0.1).abs() < 1e-12);
        assert!((spec.time_at(10) - 3.0).abs() < 1e-12);
        let peak = spec.peak_frequency(100).unwrap();
        assert!((peak - 5.0).abs() < 1.5, "{peak}");
    }

    #[test]
    fn log_amplitudes_are_floored() {
        let dt = 0.01;
        let mut samples = sine(5.0, 1024, dt);
        samples[..512].fill(0.0);
        let config = SpectrogramConfig {
            segments: 4,
            frequencies: 10,
            min_hz: Some(1.0),
            max_hz: Some(10.0),
            ..SpectrogramConfig::default()
        };
        let spec = Spectrogram::compute(&samples, dt, 0.0, &config).unwrap();
        let max = f64::from(spec.max_amplitude());
        let floor_db = 20.0 * (max / 1e6).log10();
        let log = spec.log_amplitudes();
        for &v in log.iter().flatten() {
            assert!(v.is_finite());
            assert!(f64::from(v) >= floor_db - 1e-3);
        }
        // second call returns the cached matrix
        assert!(std::ptr::eq(log, spec.log_amplitudes()));
    }

    #[test]
    fn too_many_segments() {
        let config = SpectrogramConfig {
            segments: 20,
            ..SpectrogramConfig::default()
        };
        assert!(Spectrogram::compute(&[0.0; 10], 0.01, 0.0, &config).is_err());
    }

    #[test]
    fn waveform_spectrogram_zeroes_gaps() {
        let dt = 0.01;
        let mut samples = sine(5.0, 1000, dt);
        samples[10] = f32::NAN;
        let mut wf = Waveform::new(samples, dt).unwrap();
        let config = SpectrogramConfig {
            segments: 4,
            frequencies: 8,
            min_hz: Some(1.0),
            max_hz: Some(8.0),
            ..SpectrogramConfig::default()
        };
        let spec = wf.spectrogram(&config).unwrap();
        assert!(spec.amplitudes().iter().flatten().all(|a| a.is_finite()));
    }
}
