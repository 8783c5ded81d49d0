//! Built-in processing pipelines.
//!
//! These are embedded at compile time and always available. Each starts from
//! an acceleration record: mean removal, then a 0.1 to 25 Hz Butterworth
//! band-pass over a 5% taper, then as many integrations as the product needs.

use crate::error::ConfigError;
use crate::pipeline::PipelineConfig;

/// Names of the built-in pipelines.
pub static FACTORY_PIPELINE_NAMES: &[&str] = &["acceleration", "velocity", "displacement"];

static FACTORY_PIPELINES_TOML: &[(&str, &str)] = &[
    ("acceleration", ACCELERATION_PIPELINE),
    ("velocity", VELOCITY_PIPELINE),
    ("displacement", DISPLACEMENT_PIPELINE),
];

const ACCELERATION_PIPELINE: &str = r#"
name = "acceleration"
description = "Mean-removed, band-passed acceleration"

[[steps]]
op = "remove_mean"

[[steps]]
op = "butterworth"
low_hz = 0.1
high_hz = 25.0
poles = 4
taper = 5.0
inverse = true
"#;

const VELOCITY_PIPELINE: &str = r#"
name = "velocity"
description = "Band-passed acceleration integrated once"

[[steps]]
op = "remove_mean"

[[steps]]
op = "butterworth"
low_hz = 0.1
high_hz = 25.0
poles = 4
taper = 5.0

[[steps]]
op = "integrate"
inverse = true
"#;

const DISPLACEMENT_PIPELINE: &str = r#"
name = "displacement"
description = "Band-passed acceleration integrated twice"

[[steps]]
op = "remove_mean"

[[steps]]
op = "butterworth"
low_hz = 0.1
high_hz = 25.0
poles = 4
taper = 5.0

[[steps]]
op = "integrate"

[[steps]]
op = "integrate"
inverse = true
"#;

/// Parse every built-in pipeline.
pub fn factory_pipelines() -> Vec<PipelineConfig> {
    FACTORY_PIPELINES_TOML
        .iter()
        .filter_map(|(_, toml)| PipelineConfig::from_toml(toml).ok())
        .collect()
}

/// Look up a built-in pipeline by name, ignoring case.
///
/// # Example
///
/// ```rust
/// use seismo_config::get_factory_pipeline;
///
/// let velocity = get_factory_pipeline("Velocity").unwrap();
/// assert_eq!(velocity.steps.len(), 3);
/// assert!(get_factory_pipeline("jerk").is_err());
/// ```
pub fn get_factory_pipeline(name: &str) -> Result<PipelineConfig, ConfigError> {
    let name_lower = name.to_lowercase();
    FACTORY_PIPELINES_TOML
        .iter()
        .find(|(pipeline_name, _)| *pipeline_name == name_lower)
        .ok_or_else(|| ConfigError::PipelineNotFound(name.to_string()))
        .and_then(|(_, toml)| PipelineConfig::from_toml(toml))
}

/// Check if a name refers to a built-in pipeline (case-insensitive).
pub fn is_factory_pipeline(name: &str) -> bool {
    let name_lower = name.to_lowercase();
    FACTORY_PIPELINE_NAMES.iter().any(|n| *n == name_lower)
}
