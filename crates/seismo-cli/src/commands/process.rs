//! File-based pipeline processing command.

use crate::commands::common::{describe, load_pipeline, read_record};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use seismo_analysis::export::{export_spectrum_csv, export_waveform_csv};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV record
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (32-bit float)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Built-in pipeline name or pipeline TOML file
    #[arg(short, long, default_value = "acceleration")]
    pipeline: String,

    /// Process a single channel instead of the mixdown
    #[arg(short, long)]
    channel: Option<usize>,

    /// Amplitude units of the input (overrides the pipeline)
    #[arg(long)]
    units: Option<String>,

    /// Also write the result as time,amplitude CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Also write the Fourier amplitude spectrum of the result as CSV
    #[arg(long, value_name = "FILE")]
    fas: Option<PathBuf>,
}

/// Run the process command.
pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let pipeline = load_pipeline(&args.pipeline)?;
    let steps = pipeline.to_steps()?;

    println!("Reading {}...", args.input.display());
    let units = args
        .units
        .clone()
        .or_else(|| pipeline.amplitude_units.clone())
        .unwrap_or_default();
    let mut waveform = read_record(&args.input, args.channel)?
        .with_units(units, "sec")
        .with_gap_window(pipeline.gap_window());
    println!(
        "  {} samples, dt {} s, {:.2}s",
        waveform.len(),
        waveform.sample_interval(),
        waveform.len() as f64 * waveform.sample_interval()
    );
    let before = describe(&mut waveform);

    println!("Running pipeline '{}' ({} step(s))...", pipeline.name, steps.len());
    let pb = ProgressBar::new(steps.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );
    for step in &steps {
        pb.set_message(step.name());
        if let Err(err) = waveform.apply_step(step) {
            pb.abandon_with_message("failed");
            anyhow::bail!("step '{}' failed: {}", step.name(), err);
        }
        pb.inc(1);
    }
    waveform.inverse_fft();
    pb.finish_with_message("done");

    println!("\nStats:");
    println!("  Input:  {before}");
    println!("  Output: {}", describe(&mut waveform));
    if let Some(duration) = waveform.significant_duration(0.05, 0.95) {
        println!("  Significant duration (5-95%): {duration:.3} s");
    }

    println!("\nWriting {}...", args.output.display());
    seismo_io::write_waveform(&args.output, &mut waveform)?;

    if let Some(path) = &args.csv {
        export_waveform_csv(&mut waveform, path)?;
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &args.fas {
        let spectrum = waveform.amplitude_spectrum()?;
        export_spectrum_csv(&spectrum, path)?;
        println!("Wrote {}", path.display());
    }
    println!("Done!");

    Ok(())
}
