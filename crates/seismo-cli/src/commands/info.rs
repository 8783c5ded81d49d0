//! Display record metadata and statistics.

use crate::commands::common::describe;
use clap::Args;
use seismo_io::{WavFormat, read_wav_info, read_waveform_channel};

/// Display record information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV record
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)?;

    let format_str = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };

    println!("File:            {}", args.file.display());
    println!("Format:          {} {}-bit", format_str, info.bits_per_sample);
    println!("Channels:        {}", info.channels);
    println!(
        "Sample Rate:     {} Hz (dt {} s)",
        info.sample_rate,
        info.sample_interval()
    );
    println!("Duration:        {:.3}s ({} samples)", info.duration_secs, info.num_frames);

    for channel in 0..usize::from(info.channels) {
        let mut waveform = read_waveform_channel(&args.file, channel)?;
        if waveform.is_empty() {
            continue;
        }
        println!("\nChannel {channel}:");
        println!("  {}", describe(&mut waveform));
        if let Some(duration) = waveform.significant_duration(0.05, 0.95) {
            println!("  Significant duration (5-95%): {duration:.3} s");
        }
        let spectrum = waveform.amplitude_spectrum()?;
        if let Some((freq, amp)) = spectrum
            .frequencies
            .iter()
            .zip(&spectrum.amplitudes)
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(b.1))
        {
            println!("  Dominant frequency: {freq:.4} Hz (FAS {amp:.6e})");
        }
    }

    Ok(())
}
