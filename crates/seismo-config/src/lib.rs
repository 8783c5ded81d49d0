//! Processing-pipeline configuration for strong-motion records.
//!
//! Pipelines are TOML files listing processing steps in order, optionally
//! with the gap window of the input and spectrogram parameters.
//!
//! # Features
//!
//! - **Pipelines**: load, save and convert step lists to analysis steps
//! - **Validation**: every problem in a file reported at once
//! - **Factory Pipelines**: acceleration, velocity and displacement products
//!
//! # Example
//!
//! ```rust
//! use seismo_config::{PipelineConfig, StepConfig};
//!
//! let pipeline = PipelineConfig::new("hilbert")
//!     .with_step(StepConfig::RemoveMean { start: None, end: None })
//!     .with_step(StepConfig::Hilbert { taper: 5.0, inverse: true });
//! let text = pipeline.to_toml().unwrap();
//! assert_eq!(PipelineConfig::from_toml(&text).unwrap(), pipeline);
//! assert_eq!(pipeline.to_steps().unwrap().len(), 2);
//! ```

mod error;
mod pipeline;
mod step;

/// Pipeline validation.
pub mod validation;

/// Built-in pipelines bundled with the library.
pub mod factory_pipelines;

pub use error::ConfigError;
pub use factory_pipelines::{FACTORY_PIPELINE_NAMES, factory_pipelines, get_factory_pipeline, is_factory_pipeline};
pub use pipeline::{AxisConfig, GapConfig, PipelineConfig, RowFilterKind, SpectrogramSection};
pub use step::StepConfig;
pub use validation::{ValidationError, ValidationResult, validate_pipeline};
