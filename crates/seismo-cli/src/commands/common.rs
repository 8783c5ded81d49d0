//! Shared CLI helpers used across multiple commands.

use seismo_analysis::Waveform;
use seismo_config::{PipelineConfig, get_factory_pipeline};
use std::path::{Path, PathBuf};

/// Load a pipeline by factory name or TOML path.
pub fn load_pipeline(name: &str) -> anyhow::Result<PipelineConfig> {
    if let Ok(pipeline) = get_factory_pipeline(name) {
        return Ok(pipeline);
    }

    let path = PathBuf::from(name);
    if path.exists() {
        return PipelineConfig::load(&path).map_err(|e| anyhow::anyhow!("{}", e));
    }

    anyhow::bail!(
        "Pipeline '{}' not found. Use 'seismo pipelines list' to see built-in pipelines.",
        name
    )
}

/// Read a record, one channel or the mixdown of all of them.
pub fn read_record(path: &Path, channel: Option<usize>) -> anyhow::Result<Waveform> {
    let waveform = match channel {
        Some(channel) => seismo_io::read_waveform_channel(path, channel)?,
        None => seismo_io::read_waveform(path)?,
    };
    Ok(waveform)
}

/// One-line summary of a record's amplitude statistics.
pub fn describe(waveform: &mut Waveform) -> String {
    let units = if waveform.amplitude_units().is_empty() {
        String::new()
    } else {
        format!(" {}", waveform.amplitude_units())
    };
    let peak = waveform.abs_peak().unwrap_or(0.0);
    let (mean, variance) = waveform.mean_and_variance().unwrap_or((0.0, 0.0));
    format!(
        "peak {:.6e}{units}, mean {:.6e}{units}, rms about mean {:.6e}{units}",
        peak,
        mean,
        variance.sqrt()
    )
}
