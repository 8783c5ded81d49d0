//! Pipeline validation.
//!
//! Every problem in a pipeline file is collected before any record is
//! touched; several problems are reported together as
//! [`ValidationError::Multiple`].
//!
//! # Example
//!
//! ```rust
//! use seismo_config::{PipelineConfig, StepConfig, validate_pipeline};
//!
//! let pipeline = PipelineConfig::new("bad").with_step(StepConfig::Taper { percent: 75.0 });
//! assert!(validate_pipeline(&pipeline).is_err());
//! ```

use crate::pipeline::PipelineConfig;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A step has out-of-range parameters.
    #[error("step {index} ({op}): {reason}")]
    InvalidStep {
        /// Zero-based position of the step.
        index: usize,
        /// Step operation name.
        op: String,
        /// What is wrong.
        reason: String,
    },

    /// The gap window accepts no magnitudes.
    #[error("gap window [{min}, {max}] is empty")]
    InvalidGapWindow {
        /// Lower magnitude bound.
        min: f32,
        /// Upper magnitude bound.
        max: f32,
    },

    /// The spectrogram table has out-of-range parameters.
    #[error("spectrogram: {0}")]
    InvalidSpectrogram(String),

    /// A pipeline without steps does nothing.
    #[error("pipeline '{0}' has no steps")]
    EmptyPipeline(String),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Fold a list of errors into one result.
pub(crate) fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Validate a pipeline: every step, the gap window and the spectrogram
/// table.
pub fn validate_pipeline(pipeline: &PipelineConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();
    if pipeline.steps.is_empty() {
        errors.push(ValidationError::EmptyPipeline(pipeline.name.clone()));
    }
    for (index, step) in pipeline.steps.iter().enumerate() {
        errors.extend(step.problems().into_iter().map(|reason| ValidationError::InvalidStep {
            index,
            op: step.op().to_string(),
            reason,
        }));
    }
    if let Some(gaps) = &pipeline.gaps
        && !(gaps.min >= 0.0 && gaps.min < gaps.max)
    {
        errors.push(ValidationError::InvalidGapWindow {
            min: gaps.min,
            max: gaps.max,
        });
    }
    if let Some(section) = &pipeline.spectrogram {
        errors.extend(section.problems().into_iter().map(ValidationError::InvalidSpectrogram));
    }
    collect(errors)
}
