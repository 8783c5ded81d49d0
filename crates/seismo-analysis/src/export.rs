//! CSV export of analysis results.
//!
//! - Fourier amplitude spectra: `frequency_hz,amplitude`
//! - Spectrograms: header row of frequencies, one row per output time
//! - Waveforms: `time_s,amplitude`

use crate::spectrogram::Spectrogram;
use crate::waveform::{AmplitudeSpectrum, Waveform};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Export an amplitude spectrum.
///
/// # Example
///
/// ```rust,ignore
/// use seismo_analysis::{Waveform, export::export_spectrum_csv};
///
/// let spectrum = waveform.amplitude_spectrum()?;
/// export_spectrum_csv(&spectrum, "fas.csv")?;
/// ```
pub fn export_spectrum_csv(spectrum: &AmplitudeSpectrum, path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);
    writeln!(file, "frequency_hz,amplitude")?;
    for (freq, amp) in spectrum.frequencies.iter().zip(&spectrum.amplitudes) {
        writeln!(file, "{:.6},{:.9e}", freq, amp)?;
    }
    file.flush()
}

/// Read a spectrum written by [`export_spectrum_csv`].
///
/// The header and malformed lines are skipped.
pub fn import_spectrum_csv(path: impl AsRef<Path>) -> std::io::Result<AmplitudeSpectrum> {
    let reader = BufReader::new(std::fs::File::open(path)?);
    let mut frequencies = Vec::new();
    let mut amplitudes = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let mut parts = line.trim().split(',');
        if let (Some(f), Some(a)) = (parts.next(), parts.next())
            && let (Ok(f), Ok(a)) = (f.trim().parse::<f64>(), a.trim().parse::<f64>())
        {
            frequencies.push(f);
            amplitudes.push(a);
        }
    }

    Ok(AmplitudeSpectrum {
        frequencies,
        amplitudes,
    })
}

/// Export a spectrogram, linear or in dB relative to its reference
/// amplitude.
pub fn export_spectrogram_csv(
    spectrogram: &Spectrogram,
    path: impl AsRef<Path>,
    db_scale: bool,
) -> std::io::Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);

    write!(file, "time_s")?;
    for freq in spectrogram.frequencies() {
        write!(file, ",{:.4}", freq)?;
    }
    writeln!(file)?;

    let rows = if db_scale {
        spectrogram.log_amplitudes()
    } else {
        spectrogram.amplitudes()
    };
    for (t, row) in rows.iter().enumerate() {
        write!(file, "{:.6}", spectrogram.time_at(t))?;
        for value in row {
            write!(file, ",{:.6}", value)?;
        }
        writeln!(file)?;
    }

    file.flush()
}

/// Export the current samples of a waveform against time.
pub fn export_waveform_csv(waveform: &mut Waveform, path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);
    writeln!(file, "time_s,amplitude")?;
    let times: Vec<f64> = (0..waveform.len()).map(|i| waveform.time_at(i)).collect();
    for (t, s) in times.iter().zip(waveform.samples()) {
        writeln!(file, "{:.6},{}", t, s)?;
    }
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrogram::SpectrogramConfig;
    use tempfile::NamedTempFile;

    #[test]
    fn spectrum_roundtrip() {
        let spectrum = AmplitudeSpectrum {
            frequencies: vec![0.0, 0.5, 1.0],
            amplitudes: vec![1e-3, 2.5, 0.125],
        };
        let temp = NamedTempFile::new().unwrap();
        export_spectrum_csv(&spectrum, temp.path()).unwrap();
        let loaded = import_spectrum_csv(temp.path()).unwrap();
        assert_eq!(loaded.frequencies, spectrum.frequencies);
        for (a, b) in loaded.amplitudes.iter().zip(&spectrum.amplitudes) {
            assert!((a - b).abs() < 1e-9 * b.abs());
        }
    }

    #[test]
    fn spectrogram_csv_shape() {
        let samples: Vec<f32> = (0..400).map(|i| (i as f32 * 0.3).sin()).collect();
        let config = SpectrogramConfig {
            segments: 2,
            frequencies: 3,
            min_hz: Some(1.0),
            max_hz: Some(10.0),
            decimation: 100,
            ..SpectrogramConfig::default()
        };
        let spec = Spectrogram::compute(&samples, 0.01, 0.0, &config).unwrap();
        let temp = NamedTempFile::new().unwrap();
        export_spectrogram_csv(&spec, temp.path(), true).unwrap();

        let content = std::fs::read_to_string(temp.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "time_s,1.0000,5.5000,10.0000");
        assert_eq!(lines.len(), 1 + 4);
        assert!(lines[2].starts_with("1.000000,"));
        assert_eq!(lines[1].split(',').count(), 4);
    }

    #[test]
    fn waveform_csv() {
        let mut wf = Waveform::new(vec![1.0, -2.0], 0.5).unwrap().with_lag_time(3.0);
        let temp = NamedTempFile::new().unwrap();
        export_waveform_csv(&mut wf, temp.path()).unwrap();
        let content = std::fs::read_to_string(temp.path()).unwrap();
        assert_eq!(content, "time_s,amplitude\n3.000000,1\n3.500000,-2\n");
    }
}
