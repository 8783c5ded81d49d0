//! Pipeline file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use seismo_analysis::{FrequencyAxis, GapWindow, ProcessingStep, RowFilter, SpectrogramConfig};

use crate::error::ConfigError;
use crate::step::StepConfig;
use crate::validation::{ValidationResult, validate_pipeline};

/// Processing pipeline for strong-motion records.
///
/// Pipelines are stored as TOML files holding an ordered list of steps and,
/// optionally, the gap window of the input and spectrogram parameters.
///
/// # TOML Format
///
/// ```toml
/// name = "velocity"
/// description = "Band-passed velocity"
/// amplitude_units = "cm/sec/sec"
///
/// [gaps]
/// min = 0.0
/// max = 1e20
///
/// [[steps]]
/// op = "remove_mean"
///
/// [[steps]]
/// op = "butterworth"
/// low_hz = 0.1
/// high_hz = 25.0
/// poles = 4
/// taper = 5.0
///
/// [[steps]]
/// op = "integrate"
/// inverse = true
///
/// [spectrogram]
/// segments = 32
/// axis = "log"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Name of the pipeline.
    pub name: String,

    /// Optional description of the pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Units of the input samples, when the input format carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude_units: Option<String>,

    /// Magnitudes counted as data rather than gaps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gaps: Option<GapConfig>,

    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<StepConfig>,

    /// Spectrogram parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectrogram: Option<SpectrogramSection>,
}

/// Gap window table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GapConfig {
    /// Smallest data magnitude.
    #[serde(default)]
    pub min: f32,
    /// Largest data magnitude.
    #[serde(default = "default_gap_max")]
    pub max: f32,
}

fn default_gap_max() -> f32 {
    GapWindow::DEFAULT_MAX
}

impl From<GapConfig> for GapWindow {
    fn from(gaps: GapConfig) -> Self {
        GapWindow::new(gaps.min, gaps.max)
    }
}

/// Row spacing as written in a pipeline file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisConfig {
    /// Evenly spaced rows.
    #[default]
    Linear,
    /// Logarithmically spaced rows.
    #[serde(alias = "logarithmic")]
    Log,
}

/// Row filter kind as written in a pipeline file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RowFilterKind {
    /// Gaussian window scaled with frequency.
    #[default]
    Gaussian,
    /// Butterworth band around each row.
    Butterworth,
    /// Power Butterworth band around each row.
    Amplitude,
}

/// `[spectrogram]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpectrogramSection {
    /// Number of overlapping segments.
    #[serde(default = "default_segments")]
    pub segments: usize,
    /// Number of frequency rows.
    #[serde(default = "default_frequencies")]
    pub frequencies: usize,
    /// Lowest row frequency in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_hz: Option<f64>,
    /// Highest row frequency in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hz: Option<f64>,
    /// Row spacing.
    #[serde(default)]
    pub axis: AxisConfig,
    /// Row filter.
    #[serde(default)]
    pub filter: RowFilterKind,
    /// Gaussian bandwidth control at `reference_hz`.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Frequency at which `alpha` applies unscaled.
    #[serde(default = "default_reference_hz")]
    pub reference_hz: f64,
    /// Amplitude mapped to 0 dB.
    #[serde(default = "default_reference_amplitude")]
    pub reference_amplitude: f64,
    /// Keep every n-th output time.
    #[serde(default = "default_decimation")]
    pub decimation: usize,
}

fn default_segments() -> usize {
    SpectrogramConfig::default().segments
}

fn default_frequencies() -> usize {
    SpectrogramConfig::default().frequencies
}

fn default_alpha() -> f64 {
    10.0
}

fn default_reference_hz() -> f64 {
    1.0
}

fn default_reference_amplitude() -> f64 {
    1.0
}

fn default_decimation() -> usize {
    1
}

impl Default for SpectrogramSection {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            frequencies: default_frequencies(),
            min_hz: None,
            max_hz: None,
            axis: AxisConfig::default(),
            filter: RowFilterKind::default(),
            alpha: default_alpha(),
            reference_hz: default_reference_hz(),
            reference_amplitude: default_reference_amplitude(),
            decimation: default_decimation(),
        }
    }
}

impl SpectrogramSection {
    /// Convert to analysis parameters.
    pub fn to_config(&self) -> SpectrogramConfig {
        SpectrogramConfig {
            segments: self.segments,
            frequencies: self.frequencies,
            min_hz: self.min_hz,
            max_hz: self.max_hz,
            axis: match self.axis {
                AxisConfig::Linear => FrequencyAxis::Linear,
                AxisConfig::Log => FrequencyAxis::Logarithmic,
            },
            row_filter: match self.filter {
                RowFilterKind::Gaussian => RowFilter::Gaussian {
                    alpha: self.alpha,
                    reference_hz: self.reference_hz,
                },
                RowFilterKind::Butterworth => RowFilter::Butterworth,
                RowFilterKind::Amplitude => RowFilter::Amplitude,
            },
            reference_amplitude: self.reference_amplitude,
            decimation: self.decimation,
        }
    }

    /// Every problem with these parameters.
    pub fn problems(&self) -> Vec<String> {
        match self.to_config().validate() {
            Ok(()) => Vec::new(),
            Err(seismo_analysis::FilterError::InvalidSettings(found)) => found,
            Err(other) => vec![other.to_string()],
        }
    }
}

impl PipelineConfig {
    /// Create a new empty pipeline.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            amplitude_units: None,
            gaps: None,
            steps: Vec::new(),
            spectrogram: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the input amplitude units.
    pub fn with_amplitude_units(mut self, units: impl Into<String>) -> Self {
        self.amplitude_units = Some(units.into());
        self
    }

    /// Set the gap window.
    pub fn with_gaps(mut self, gaps: GapConfig) -> Self {
        self.gaps = Some(gaps);
        self
    }

    /// Append a step.
    pub fn with_step(mut self, step: StepConfig) -> Self {
        self.steps.push(step);
        self
    }

    /// Append several steps.
    pub fn with_steps(mut self, steps: impl IntoIterator<Item = StepConfig>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Set the spectrogram table.
    pub fn with_spectrogram(mut self, section: SpectrogramSection) -> Self {
        self.spectrogram = Some(section);
        self
    }

    /// Load a pipeline from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let pipeline: PipelineConfig = toml::from_str(&content)?;
        Ok(pipeline)
    }

    /// Load a pipeline from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the pipeline to a TOML file, creating missing directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the pipeline to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the pipeline has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check every step and table.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_pipeline(self)
    }

    /// Validate, then convert to runnable steps.
    pub fn to_steps(&self) -> Result<Vec<ProcessingStep>, ConfigError> {
        self.validate()?;
        Ok(self.steps.iter().map(StepConfig::to_step).collect())
    }

    /// Gap window for the input; the default window when none is set.
    pub fn gap_window(&self) -> GapWindow {
        self.gaps.map(GapWindow::from).unwrap_or_default()
    }

    /// Spectrogram parameters; defaults when the table is absent.
    pub fn spectrogram_config(&self) -> SpectrogramConfig {
        self.spectrogram
            .as_ref()
            .map_or_else(SpectrogramConfig::default, SpectrogramSection::to_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seismo_analysis::{FreqFilter, FreqOptions};

    #[test]
    fn minimal_toml() {
        let pipeline = PipelineConfig::from_toml("name = \"empty\"").unwrap();
        assert_eq!(pipeline.name, "empty");
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.gap_window(), GapWindow::default());
        assert_eq!(pipeline.spectrogram_config(), SpectrogramConfig::default());
    }

    #[test]
    fn full_toml() {
        let pipeline = PipelineConfig::from_toml(
            r#"
            name = "custom"
            amplitude_units = "g"

            [gaps]
            max = 5.0

            [[steps]]
            op = "taper"
            percent = 2.5

            [[steps]]
            op = "hilbert"
            inverse = true

            [spectrogram]
            segments = 8
            axis = "log"
            filter = "butterworth"
            "#,
        )
        .unwrap();
        assert_eq!(pipeline.amplitude_units.as_deref(), Some("g"));
        assert_eq!(pipeline.gap_window(), GapWindow::new(0.0, 5.0));
        assert_eq!(
            pipeline.to_steps().unwrap(),
            vec![
                ProcessingStep::Taper { percent: 2.5 },
                ProcessingStep::Filter {
                    filter: FreqFilter::Hilbert,
                    options: FreqOptions::new().with_inverse(true),
                },
            ]
        );
        let config = pipeline.spectrogram_config();
        assert_eq!(config.segments, 8);
        assert_eq!(config.frequencies, 64);
        assert_eq!(config.axis, FrequencyAxis::Logarithmic);
        assert_eq!(config.row_filter, RowFilter::Butterworth);
    }

    #[test]
    fn roundtrip() {
        let pipeline = PipelineConfig::new("rt")
            .with_description("round trip")
            .with_gaps(GapConfig { min: 0.5, max: 100.0 })
            .with_steps([
                StepConfig::RemoveMean {
                    start: Some(0.0),
                    end: Some(4.0),
                },
                StepConfig::Envelope { taper: 5.0 },
            ])
            .with_spectrogram(SpectrogramSection {
                min_hz: Some(0.2),
                ..SpectrogramSection::default()
            });
        let text = pipeline.to_toml().unwrap();
        assert_eq!(PipelineConfig::from_toml(&text).unwrap(), pipeline);
    }

    #[test]
    fn invalid_steps_block_conversion() {
        let pipeline = PipelineConfig::new("bad").with_step(StepConfig::Gaussian {
            center_hz: 0.0,
            alpha: 10.0,
            taper: 0.0,
            inverse: false,
        });
        assert!(matches!(pipeline.to_steps(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn spectrogram_section_problems() {
        let section = SpectrogramSection {
            segments: 0,
            alpha: -1.0,
            ..SpectrogramSection::default()
        };
        assert_eq!(section.problems().len(), 2);
        let butterworth = SpectrogramSection {
            filter: RowFilterKind::Butterworth,
            alpha: -1.0,
            ..SpectrogramSection::default()
        };
        assert!(butterworth.problems().is_empty());
    }
}
