//! Single-channel signal container.
//!
//! A [`Waveform`] owns one channel's samples with its timing and unit
//! metadata. Time-domain operations rewrite the samples in one pass and keep
//! the cached extrema current. Frequency-domain filters go through
//! [`Waveform::apply_freq_process`], which leaves the filtered spectrum
//! cached so consecutive filters share a single forward transform.
//!
//! ```rust
//! use seismo_analysis::filters::{BandPass, FreqFilter};
//! use seismo_analysis::{FreqOptions, Waveform};
//!
//! let samples: Vec<f32> = (0..2000).map(|i| (i as f32 * 0.05).sin() + 0.3).collect();
//! let mut wf = Waveform::new(samples, 0.01).unwrap().with_units("cm/sec/sec", "sec");
//! wf.remove_mean_all().unwrap();
//! wf.apply_freq_process(
//!     &FreqFilter::Butterworth(BandPass::new(0.1, 25.0, 4)),
//!     &FreqOptions::new().with_taper(5.0),
//! )
//! .unwrap();
//! wf.apply_freq_process(&FreqFilter::Integrate, &FreqOptions::new().with_inverse(true))
//!     .unwrap();
//! assert_eq!(wf.amplitude_units(), "cm/sec");
//! ```

use crate::error::{FilterError, Result};
use crate::filters::{FreqFilter, UnitChange};
use seismo_core::{Complex64, fft, fft_inverse, next_power_of_two};
use std::f64::consts::PI;
use tracing::debug;

/// Magnitude window outside which a sample is treated as a gap marker.
///
/// Non-finite samples are always gaps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapWindow {
    /// Smallest magnitude that still counts as data.
    pub min: f32,
    /// Largest magnitude that still counts as data.
    pub max: f32,
}

impl GapWindow {
    /// Default upper bound on data magnitudes.
    pub const DEFAULT_MAX: f32 = 1e20;

    /// Create a window accepting magnitudes in `[min, max]`.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// True when `sample` carries data.
    pub fn contains(&self, sample: f32) -> bool {
        let magnitude = sample.abs();
        sample.is_finite() && magnitude >= self.min && magnitude <= self.max
    }
}

impl Default for GapWindow {
    fn default() -> Self {
        Self::new(0.0, Self::DEFAULT_MAX)
    }
}

/// Options for [`Waveform::apply_freq_process`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FreqOptions {
    /// Cosine taper (percent of the length at each end) applied before a
    /// fresh forward transform. Zero disables tapering.
    pub taper_percent: f64,
    /// Transform back to the time domain after filtering.
    pub inverse: bool,
}

impl FreqOptions {
    /// No taper, no inverse transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the taper percentage.
    pub fn with_taper(mut self, percent: f64) -> Self {
        self.taper_percent = percent;
        self
    }

    /// Request an inverse transform after filtering.
    pub fn with_inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    fn problems(&self) -> Vec<String> {
        if (0.0..=50.0).contains(&self.taper_percent) {
            Vec::new()
        } else {
            vec![format!("taper {}% outside [0, 50]%", self.taper_percent)]
        }
    }
}

/// Observable state of the spectrum cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Samples changed since the last transform.
    Dirty,
    /// Samples are current and no spectrum is held.
    CleanNoCache,
    /// A spectrum is held; it describes the current signal.
    CleanWithCachedSpectrum,
}

#[derive(Debug, Clone)]
enum SpectrumState {
    Dirty,
    CleanNoCache,
    /// `samples_stale` is set while filters have changed the spectrum but
    /// the samples have not been transformed back yet.
    CleanWithCachedSpectrum {
        spectrum: Vec<Complex64>,
        samples_stale: bool,
    },
}

#[derive(Debug, Clone)]
struct MeanRemoval {
    mean: f64,
    samples: Vec<f32>,
    extrema: Option<(f32, f32)>,
}

/// Fourier amplitude spectrum `|X(f)|·dt` from DC to Nyquist.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeSpectrum {
    /// Bin frequencies in Hz.
    pub frequencies: Vec<f64>,
    /// Amplitudes in amplitude-units × time-units.
    pub amplitudes: Vec<f64>,
}

/// One channel of samples plus metadata and a spectrum cache.
#[derive(Debug, Clone)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_interval: f64,
    lag_time: f64,
    amplitude_units: String,
    time_units: String,
    gaps: GapWindow,
    extrema: Option<(f32, f32)>,
    state: SpectrumState,
    undo: Option<MeanRemoval>,
}

impl Waveform {
    /// Wrap `samples` taken every `sample_interval` seconds.
    pub fn new(samples: Vec<f32>, sample_interval: f64) -> Result<Self> {
        if !(sample_interval.is_finite() && sample_interval > 0.0) {
            return Err(FilterError::invalid(format!(
                "sample interval {sample_interval} s must be positive"
            )));
        }
        Ok(Self {
            samples,
            sample_interval,
            lag_time: 0.0,
            amplitude_units: String::new(),
            time_units: "sec".to_string(),
            gaps: GapWindow::default(),
            extrema: None,
            state: SpectrumState::CleanNoCache,
            undo: None,
        })
    }

    /// Time of the first sample in seconds.
    pub fn with_lag_time(mut self, lag_time: f64) -> Self {
        self.lag_time = lag_time;
        self
    }

    /// Amplitude and time unit tags, e.g. `"cm/sec/sec"` and `"sec"`.
    pub fn with_units(mut self, amplitude: impl Into<String>, time: impl Into<String>) -> Self {
        self.amplitude_units = amplitude.into();
        self.time_units = time.into();
        self
    }

    /// Replace the gap window.
    pub fn with_gap_window(mut self, gaps: GapWindow) -> Self {
        self.gaps = gaps;
        self.extrema = None;
        self
    }

    /// Number of samples, gaps included.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Seconds between samples.
    pub fn sample_interval(&self) -> f64 {
        self.sample_interval
    }

    /// Time of the first sample in seconds.
    pub fn lag_time(&self) -> f64 {
        self.lag_time
    }

    /// Amplitude unit tag.
    pub fn amplitude_units(&self) -> &str {
        &self.amplitude_units
    }

    /// Time unit tag.
    pub fn time_units(&self) -> &str {
        &self.time_units
    }

    /// Magnitude window for data samples.
    pub fn gap_window(&self) -> GapWindow {
        self.gaps
    }

    /// Time of sample `index` in seconds.
    pub fn time_at(&self, index: usize) -> f64 {
        self.lag_time + index as f64 * self.sample_interval
    }

    /// Length of the spectrum a forward transform produces.
    pub fn fft_size(&self) -> usize {
        next_power_of_two(self.samples.len())
    }

    /// Current samples, transforming a pending filtered spectrum back first.
    pub fn samples(&mut self) -> &[f32] {
        self.sync_samples();
        &self.samples
    }

    /// Consume the waveform and return its current samples.
    pub fn into_samples(mut self) -> Vec<f32> {
        self.sync_samples();
        self.samples
    }

    /// Current cache state.
    pub fn cache_state(&self) -> CacheState {
        match self.state {
            SpectrumState::Dirty => CacheState::Dirty,
            SpectrumState::CleanNoCache => CacheState::CleanNoCache,
            SpectrumState::CleanWithCachedSpectrum { .. } => CacheState::CleanWithCachedSpectrum,
        }
    }

    /// Cached spectrum, if any.
    pub fn spectrum(&self) -> Option<&[Complex64]> {
        match &self.state {
            SpectrumState::CleanWithCachedSpectrum { spectrum, .. } => Some(spectrum),
            _ => None,
        }
    }

    /// True when filtered spectral data has not been transformed back yet.
    pub fn has_pending_spectrum(&self) -> bool {
        matches!(
            self.state,
            SpectrumState::CleanWithCachedSpectrum {
                samples_stale: true,
                ..
            }
        )
    }

    /// Drop a cached spectrum, transforming pending data back first.
    pub fn clear_spectrum(&mut self) {
        self.sync_samples();
        if let SpectrumState::CleanWithCachedSpectrum { .. } = self.state {
            self.state = SpectrumState::CleanNoCache;
        }
    }

    /// Transform pending filtered data back to samples.
    ///
    /// Returns false when there was nothing to transform.
    pub fn inverse_fft(&mut self) -> bool {
        let pending = self.has_pending_spectrum();
        self.sync_samples();
        pending
    }

    fn sync_samples(&mut self) {
        if let SpectrumState::CleanWithCachedSpectrum {
            spectrum,
            samples_stale,
        } = &mut self.state
            && *samples_stale
        {
            let mut filtered = fft_inverse(spectrum, self.samples.len());
            restore_gaps(&mut filtered, &self.samples, self.gaps);
            self.samples = filtered;
            *samples_stale = false;
            self.extrema = scan_extrema(&self.samples, self.gaps);
            debug!(len = self.samples.len(), "inverse transform");
        }
    }

    /// Every time-domain mutation starts here: pending spectral data is
    /// brought back, the undo record is dropped and the cache invalidated.
    fn begin_mutation(&mut self) {
        self.sync_samples();
        self.undo = None;
        self.state = SpectrumState::Dirty;
    }

    /// Forward transform with gap samples read as zero.
    fn forward(&self) -> Vec<Complex64> {
        let gaps = self.gaps;
        let data: Vec<f32> = self
            .samples
            .iter()
            .map(|&s| if gaps.contains(s) { s } else { 0.0 })
            .collect();
        let spectrum = fft(&data);
        debug!(len = self.samples.len(), fft_size = spectrum.len(), "forward transform");
        spectrum
    }

    fn change_units(&mut self, change: UnitChange) {
        if self.amplitude_units.is_empty() {
            return;
        }
        let per = format!("/{}", self.time_units);
        let times = format!("*{}", self.time_units);
        let (strip, append) = match change {
            UnitChange::None => return,
            UnitChange::TimesTime => (per, times),
            UnitChange::PerTime => (times, per),
        };
        if self.amplitude_units.ends_with(&strip) {
            let keep = self.amplitude_units.len() - strip.len();
            self.amplitude_units.truncate(keep);
        } else {
            self.amplitude_units.push_str(&append);
        }
    }

    // ---- extrema and statistics ----

    /// `(min, max)` over data samples; `None` when there are none.
    pub fn extrema(&mut self) -> Option<(f32, f32)> {
        self.sync_samples();
        if self.extrema.is_none() {
            self.extrema = scan_extrema(&self.samples, self.gaps);
        }
        self.extrema
    }

    /// Smallest data value.
    pub fn min(&mut self) -> Option<f32> {
        self.extrema().map(|(lo, _)| lo)
    }

    /// Largest data value.
    pub fn max(&mut self) -> Option<f32> {
        self.extrema().map(|(_, hi)| hi)
    }

    /// Largest absolute data value.
    pub fn abs_peak(&mut self) -> Option<f32> {
        self.extrema().map(|(lo, hi)| lo.abs().max(hi.abs()))
    }

    /// Mean and population variance of the data samples.
    pub fn mean_and_variance(&mut self) -> Option<(f64, f64)> {
        self.sync_samples();
        let gaps = self.gaps;
        let data = || self.samples.iter().filter(move |s| gaps.contains(**s)).map(|&s| f64::from(s));
        let count = data().count();
        if count == 0 {
            return None;
        }
        let mean = data().sum::<f64>() / count as f64;
        let variance = data().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count as f64;
        Some((mean, variance))
    }

    /// Time at which the cumulative squared amplitude first reaches
    /// `fraction` of its total (Husid plot crossing).
    pub fn energy_fraction_time(&mut self, fraction: f64) -> Option<f64> {
        if !(0.0..=1.0).contains(&fraction) {
            return None;
        }
        self.sync_samples();
        let gaps = self.gaps;
        let total: f64 = self
            .samples
            .iter()
            .filter(|s| gaps.contains(**s))
            .map(|&s| f64::from(s) * f64::from(s))
            .sum();
        if total <= 0.0 {
            return None;
        }
        let target = fraction * total;
        let mut accumulated = 0.0;
        for (i, &s) in self.samples.iter().enumerate() {
            if !gaps.contains(s) {
                continue;
            }
            accumulated += f64::from(s) * f64::from(s);
            if accumulated >= target {
                return Some(self.time_at(i));
            }
        }
        None
    }

    /// Time between the `from` and `to` energy fractions, e.g. 0.05 to 0.95.
    pub fn significant_duration(&mut self, from: f64, to: f64) -> Option<f64> {
        Some(self.energy_fraction_time(to)? - self.energy_fraction_time(from)?)
    }

    // ---- time-domain operations ----

    /// Subtract the mean of the data samples timed within
    /// `[start_time, end_time]` from every data sample.
    ///
    /// Returns the removed mean. The previous state can be restored once
    /// with [`Waveform::undo_remove_mean`].
    pub fn remove_mean(&mut self, start_time: f64, end_time: f64) -> Result<f64> {
        if self.samples.is_empty() {
            return Err(FilterError::EmptySignal);
        }
        if start_time.is_nan() || end_time.is_nan() || start_time > end_time {
            return Err(FilterError::invalid(format!(
                "mean window start {start_time} s must not follow end {end_time} s"
            )));
        }
        self.sync_samples();
        let gaps = self.gaps;
        let (sum, count) = self
            .samples
            .iter()
            .enumerate()
            .filter(|&(i, s)| gaps.contains(*s) && (start_time..=end_time).contains(&self.time_at(i)))
            .fold((0.0, 0usize), |(sum, count), (_, &s)| (sum + f64::from(s), count + 1));
        if count == 0 {
            return Err(FilterError::invalid(format!(
                "no data samples between {start_time} s and {end_time} s"
            )));
        }
        let mean = sum / count as f64;

        let snapshot = MeanRemoval {
            mean,
            samples: self.samples.clone(),
            extrema: self.extrema,
        };
        self.begin_mutation();
        for s in self.samples.iter_mut().filter(|s| gaps.contains(**s)) {
            *s = (f64::from(*s) - mean) as f32;
        }
        self.extrema = self
            .extrema
            .map(|(lo, hi)| ((f64::from(lo) - mean) as f32, (f64::from(hi) - mean) as f32));
        self.undo = Some(snapshot);
        debug!(mean, count, "mean removed");
        Ok(mean)
    }

    /// Remove the mean of the whole record.
    pub fn remove_mean_all(&mut self) -> Result<f64> {
        self.remove_mean(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Restore the samples and extrema from before the last mean removal.
    ///
    /// Returns the mean that was removed, or `None` when there is nothing
    /// to undo.
    pub fn undo_remove_mean(&mut self) -> Option<f64> {
        let snapshot = self.undo.take()?;
        self.samples = snapshot.samples;
        self.extrema = snapshot.extrema;
        self.state = SpectrumState::Dirty;
        debug!(mean = snapshot.mean, "mean removal undone");
        Some(snapshot.mean)
    }

    /// Half-cosine ramp over `percent`% of the length at both ends.
    ///
    /// The first and last samples become zero and the sample just inside
    /// each ramp is unchanged. Returns false, leaving the samples alone,
    /// when the ramp would be shorter than 2 samples or longer than half
    /// the record.
    pub fn cosine_taper(&mut self, percent: f64) -> bool {
        let len = self.samples.len();
        let ramp = (len as f64 * percent / 100.0) as usize;
        if ramp < 2 || ramp > len / 2 {
            debug!(percent, ramp, len, "taper skipped");
            return false;
        }
        self.begin_mutation();
        let gaps = self.gaps;
        let mut extrema = None;
        for i in 0..len {
            let s = &mut self.samples[i];
            if !gaps.contains(*s) {
                continue;
            }
            let from_edge = i.min(len - 1 - i);
            if from_edge < ramp {
                let weight = 0.5 * (1.0 - (PI * from_edge as f64 / ramp as f64).cos());
                *s = (f64::from(*s) * weight) as f32;
            }
            widen(&mut extrema, *s);
        }
        self.extrema = extrema;
        true
    }

    /// Running sum `sum += sample·dt` starting from `start_value`.
    pub fn integrate(&mut self, start_value: f64) {
        self.begin_mutation();
        let (gaps, dt) = (self.gaps, self.sample_interval);
        let mut sum = start_value;
        let mut extrema = None;
        for s in self.samples.iter_mut().filter(|s| gaps.contains(**s)) {
            sum += f64::from(*s) * dt;
            *s = sum as f32;
            widen(&mut extrema, *s);
        }
        self.extrema = extrema;
        self.change_units(UnitChange::TimesTime);
    }

    /// First differences divided by dt. The first output uses
    /// `last_value` as its predecessor, or the first data sample (giving
    /// zero) when absent.
    pub fn differentiate(&mut self, last_value: Option<f32>) {
        self.sync_samples();
        let (gaps, dt) = (self.gaps, self.sample_interval);
        let Some(mut previous) = last_value.or_else(|| self.samples.iter().copied().find(|s| gaps.contains(*s)))
        else {
            return;
        };
        self.begin_mutation();
        let mut extrema = None;
        for s in self.samples.iter_mut().filter(|s| gaps.contains(**s)) {
            let current = *s;
            *s = ((f64::from(current) - f64::from(previous)) / dt) as f32;
            previous = current;
            widen(&mut extrema, *s);
        }
        self.extrema = extrema;
        self.change_units(UnitChange::PerTime);
    }

    /// Negate every data sample.
    pub fn invert_polarity(&mut self) {
        self.begin_mutation();
        let gaps = self.gaps;
        for s in self.samples.iter_mut().filter(|s| gaps.contains(**s)) {
            *s = -*s;
        }
        self.extrema = self.extrema.map(|(lo, hi)| (-hi, -lo));
    }

    /// Integrate only the positive or only the negative excursions,
    /// whichever has the larger absolute integral.
    ///
    /// With `peak_only` the comparison is between the largest positive and
    /// the largest negative lobe, and only that lobe is integrated. The
    /// samples become the running integral; the final value is returned.
    pub fn integrate_max_of_pos_neg(&mut self, peak_only: bool) -> f64 {
        self.sync_samples();
        let (gaps, dt) = (self.gaps, self.sample_interval);
        let lobes = lobes(&self.samples, gaps, dt);
        let (positive, range) = if peak_only {
            match lobes.iter().max_by(|a, b| a.area.abs().total_cmp(&b.area.abs())) {
                Some(lobe) => (lobe.area > 0.0, lobe.start..lobe.end),
                None => (true, 0..0),
            }
        } else {
            let pos: f64 = lobes.iter().filter(|l| l.area > 0.0).map(|l| l.area).sum();
            let neg: f64 = lobes.iter().filter(|l| l.area < 0.0).map(|l| l.area).sum();
            (pos >= -neg, 0..self.samples.len())
        };

        self.begin_mutation();
        let mut sum = 0.0;
        let mut extrema = None;
        for (i, s) in self.samples.iter_mut().enumerate() {
            if !gaps.contains(*s) {
                continue;
            }
            let v = f64::from(*s);
            let matches = if positive { v > 0.0 } else { v < 0.0 };
            if matches && range.contains(&i) {
                sum += v * dt;
            }
            *s = sum as f32;
            widen(&mut extrema, *s);
        }
        self.extrema = extrema;
        self.change_units(UnitChange::TimesTime);
        debug!(positive, peak_only, integral = sum, "one-sided integral");
        sum
    }

    /// Set every gap sample to zero; returns how many there were.
    pub fn zero_gaps(&mut self) -> usize {
        self.sync_samples();
        let gaps = self.gaps;
        let count = self.samples.iter().filter(|s| !gaps.contains(**s)).count();
        if count == 0 {
            return 0;
        }
        self.begin_mutation();
        for s in self.samples.iter_mut().filter(|s| !gaps.contains(**s)) {
            *s = 0.0;
        }
        self.extrema = scan_extrema(&self.samples, gaps);
        count
    }

    // ---- frequency domain ----

    /// Filter the signal in the frequency domain.
    ///
    /// The forward transform (after the optional taper) is redone only when
    /// the samples changed, no spectrum is cached, or the filter needs fresh
    /// input. Without `inverse` the filtered spectrum stays cached for the
    /// next filter and the samples are brought back lazily.
    ///
    /// Every check runs before anything is written: on error the waveform
    /// is unchanged.
    pub fn apply_freq_process(&mut self, filter: &FreqFilter, options: &FreqOptions) -> Result<()> {
        if self.samples.is_empty() {
            return Err(FilterError::EmptySignal);
        }
        let mut problems = options.problems();
        if let Err(FilterError::InvalidSettings(filter_problems)) = filter.check_settings() {
            problems.extend(filter_problems);
        }
        FilterError::from_problems(problems)?;
        if let Err(err) = filter.check_spectrum(self.fft_size(), self.sample_interval) {
            tracing::warn!(filter = filter.name(), %err, "spectrum rejected");
            return Err(err);
        }
        for warning in filter.warnings() {
            tracing::warn!(filter = filter.name(), "{warning}");
        }

        let rebuild = filter.needs_pre_process()
            || !matches!(self.state, SpectrumState::CleanWithCachedSpectrum { .. });
        if rebuild {
            self.sync_samples();
            if options.taper_percent > 0.0 {
                self.cosine_taper(options.taper_percent);
            }
        }
        let original = filter.post_process_changes_samples().then(|| self.samples.clone());
        let mut spectrum = match std::mem::replace(&mut self.state, SpectrumState::Dirty) {
            SpectrumState::CleanWithCachedSpectrum { spectrum, .. } if !rebuild => {
                debug!(filter = filter.name(), "reusing cached spectrum");
                spectrum
            }
            _ => self.forward(),
        };

        filter.apply_checked(self.sample_interval, &mut spectrum);
        self.undo = None;
        self.state = SpectrumState::CleanWithCachedSpectrum {
            spectrum,
            samples_stale: true,
        };
        self.change_units(filter.unit_change());

        if options.inverse || original.is_some() {
            self.sync_samples();
        }
        if let Some(original) = original {
            filter.post_process(&original, &mut self.samples);
            restore_gaps(&mut self.samples, &original, self.gaps);
            self.state = SpectrumState::Dirty;
            self.extrema = scan_extrema(&self.samples, self.gaps);
        }
        Ok(())
    }

    /// Fourier amplitude spectrum of the current signal, through the cache.
    pub fn amplitude_spectrum(&mut self) -> Result<AmplitudeSpectrum> {
        if self.samples.is_empty() {
            return Err(FilterError::EmptySignal);
        }
        if !matches!(self.state, SpectrumState::CleanWithCachedSpectrum { .. }) {
            self.state = SpectrumState::CleanWithCachedSpectrum {
                spectrum: self.forward(),
                samples_stale: false,
            };
        }
        let dt = self.sample_interval;
        let spectrum = self.spectrum().ok_or(FilterError::EmptySignal)?;
        let n = spectrum.len();
        let df = 1.0 / (n as f64 * dt);
        let (frequencies, amplitudes) = spectrum[..=n / 2]
            .iter()
            .enumerate()
            .map(|(k, bin)| (k as f64 * df, bin.norm() * dt))
            .unzip();
        Ok(AmplitudeSpectrum {
            frequencies,
            amplitudes,
        })
    }
}

fn widen(extrema: &mut Option<(f32, f32)>, v: f32) {
    *extrema = Some(match *extrema {
        Some((lo, hi)) => (lo.min(v), hi.max(v)),
        None => (v, v),
    });
}

/// Put the gap markers of `source` back at their indices in `target`.
fn restore_gaps(target: &mut [f32], source: &[f32], gaps: GapWindow) {
    for (t, &s) in target.iter_mut().zip(source) {
        if !gaps.contains(s) {
            *t = s;
        }
    }
}

fn scan_extrema(samples: &[f32], gaps: GapWindow) -> Option<(f32, f32)> {
    let mut extrema = None;
    for &s in samples.iter().filter(|s| gaps.contains(**s)) {
        widen(&mut extrema, s);
    }
    extrema
}

/// A run of same-signed data samples; gaps inside a run do not break it.
#[derive(Debug, Clone, PartialEq)]
struct Lobe {
    start: usize,
    end: usize,
    area: f64,
}

fn lobes(samples: &[f32], gaps: GapWindow, dt: f64) -> Vec<Lobe> {
    let mut lobes = Vec::new();
    let mut current: Option<Lobe> = None;
    for (i, &s) in samples.iter().enumerate() {
        if !gaps.contains(s) {
            continue;
        }
        let v = f64::from(s);
        match &mut current {
            Some(lobe) if v != 0.0 && lobe.area.signum() == v.signum() => {
                lobe.area += v * dt;
                lobe.end = i + 1;
            }
            _ => {
                lobes.extend(current.take());
                if v != 0.0 {
                    current = Some(Lobe {
                        start: i,
                        end: i + 1,
                        area: v * dt,
                    });
                }
            }
        }
    }
    lobes.extend(current);
    lobes
}
