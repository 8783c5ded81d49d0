//! Spectrogram command.

use crate::commands::common::{load_pipeline, read_record};
use clap::{Args, ValueEnum};
use seismo_analysis::export::export_spectrogram_csv;
use seismo_analysis::{FrequencyAxis, RowFilter, SpectrogramConfig};
use std::path::PathBuf;

/// Row filter choice.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RowFilterArg {
    /// Gaussian window
    Gaussian,
    /// Butterworth band
    Butterworth,
    /// Power Butterworth band
    Amplitude,
}

#[derive(Args)]
pub struct SpectrogramArgs {
    /// Input WAV record
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output CSV file
    #[arg(short, long)]
    output: PathBuf,

    /// Pipeline whose steps run first and whose [spectrogram] table is used
    #[arg(short, long)]
    pipeline: Option<String>,

    /// Analyse a single channel instead of the mixdown
    #[arg(short, long)]
    channel: Option<usize>,

    /// Number of overlapping segments
    #[arg(long)]
    segments: Option<usize>,

    /// Number of frequency rows
    #[arg(long)]
    frequencies: Option<usize>,

    /// Lowest row frequency in Hz
    #[arg(long)]
    min_hz: Option<f64>,

    /// Highest row frequency in Hz
    #[arg(long)]
    max_hz: Option<f64>,

    /// Space rows logarithmically
    #[arg(long)]
    log_axis: bool,

    /// Row filter
    #[arg(long, value_enum)]
    filter: Option<RowFilterArg>,

    /// Keep every n-th output time
    #[arg(long)]
    decimation: Option<usize>,

    /// Write dB relative to the reference amplitude
    #[arg(long)]
    db: bool,
}

fn apply_overrides(args: &SpectrogramArgs, mut config: SpectrogramConfig) -> SpectrogramConfig {
    if let Some(segments) = args.segments {
        config.segments = segments;
    }
    if let Some(frequencies) = args.frequencies {
        config.frequencies = frequencies;
    }
    if args.min_hz.is_some() {
        config.min_hz = args.min_hz;
    }
    if args.max_hz.is_some() {
        config.max_hz = args.max_hz;
    }
    if args.log_axis {
        config.axis = FrequencyAxis::Logarithmic;
    }
    match args.filter {
        Some(RowFilterArg::Gaussian) if !matches!(config.row_filter, RowFilter::Gaussian { .. }) => {
            config.row_filter = RowFilter::default();
        }
        Some(RowFilterArg::Butterworth) => config.row_filter = RowFilter::Butterworth,
        Some(RowFilterArg::Amplitude) => config.row_filter = RowFilter::Amplitude,
        _ => {}
    }
    if let Some(decimation) = args.decimation {
        config.decimation = decimation;
    }
    config
}

/// Run the spectrogram command.
pub fn run(args: SpectrogramArgs) -> anyhow::Result<()> {
    let pipeline = args.pipeline.as_deref().map(load_pipeline).transpose()?;

    println!("Reading {}...", args.input.display());
    let mut waveform = read_record(&args.input, args.channel)?;
    let mut config = SpectrogramConfig::default();
    if let Some(pipeline) = &pipeline {
        waveform = waveform.with_gap_window(pipeline.gap_window());
        println!("Running pipeline '{}'...", pipeline.name);
        waveform.run(&pipeline.to_steps()?)?;
        config = pipeline.spectrogram_config();
    }
    let config = apply_overrides(&args, config);

    let spectrogram = waveform.spectrogram(&config)?;
    println!(
        "  {} times x {} frequencies ({:.4} to {:.4} Hz), FFT size {}",
        spectrogram.num_times(),
        spectrogram.num_frequencies(),
        spectrogram.frequencies().first().copied().unwrap_or(0.0),
        spectrogram.frequencies().last().copied().unwrap_or(0.0),
        spectrogram.fft_size()
    );
    println!("  Max amplitude: {:.6e}", spectrogram.max_amplitude());

    export_spectrogram_csv(&spectrogram, &args.output, args.db)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: SpectrogramArgs,
    }

    fn parse(extra: &[&str]) -> SpectrogramArgs {
        let mut argv = vec!["seismo", "in.wav", "-o", "out.csv"];
        argv.extend_from_slice(extra);
        Wrapper::parse_from(argv).args
    }

    #[test]
    fn overrides_replace_pipeline_values() {
        let base = SpectrogramConfig {
            segments: 4,
            min_hz: Some(0.5),
            ..SpectrogramConfig::default()
        };
        let config = apply_overrides(
            &parse(&["--segments", "32", "--log-axis", "--filter", "butterworth"]),
            base,
        );
        assert_eq!(config.segments, 32);
        assert_eq!(config.min_hz, Some(0.5));
        assert_eq!(config.axis, FrequencyAxis::Logarithmic);
        assert_eq!(config.row_filter, RowFilter::Butterworth);
    }

    #[test]
    fn gaussian_keeps_configured_bandwidth() {
        let base = SpectrogramConfig {
            row_filter: RowFilter::Gaussian {
                alpha: 40.0,
                reference_hz: 2.0,
            },
            ..SpectrogramConfig::default()
        };
        let config = apply_overrides(&parse(&["--filter", "gaussian"]), base.clone());
        assert_eq!(config, base);
    }
}
