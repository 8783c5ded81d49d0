//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use seismo_analysis::Waveform;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// WAV encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of channels (components).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Samples per channel.
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Encoding format.
    pub format: WavFormat,
}

impl WavInfo {
    /// Seconds between samples.
    pub fn sample_interval(&self) -> f64 {
        1.0 / f64::from(self.sample_rate)
    }
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.len()) / u64::from(spec.channels);
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample; 32 writes IEEE float, anything else PCM.
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 100,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Decode every sample, interleaved. PCM is scaled to `[-1, 1)`.
fn decode<R: Read>(reader: WavReader<R>) -> Result<(Vec<f32>, WavSpec)> {
    let hound_spec = reader.spec();
    let spec = WavSpec::from(hound_spec);
    let samples = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    debug!(
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        samples = samples.len(),
        "decoded WAV"
    );
    Ok((samples, spec))
}

/// Read a WAV file and return samples as f32 along with the spec.
///
/// Multi-channel files are mixed down to one channel by averaging.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let (samples, spec) = decode(WavReader::open(path)?)?;
    let channels = usize::from(spec.channels);

    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok((mono, spec))
}

/// Read every channel of a WAV file separately.
pub fn read_wav_channels<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f32>>, WavSpec)> {
    let (samples, spec) = decode(WavReader::open(path)?)?;
    let channels = usize::from(spec.channels.max(1));
    let frames = samples.len() / channels;

    let mut split = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (channel, &sample) in split.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
    Ok((split, spec))
}

/// Write samples to a WAV file.
///
/// 32-bit files store the values unchanged; PCM clamps to `[-1, 1)`.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let hound_spec = hound::WavSpec::from(spec);
    let mut writer = WavWriter::create(path, hound_spec)?;

    if spec.bits_per_sample == 32 {
        for &sample in samples {
            writer.write_sample(sample)?;
        }
    } else {
        let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
        for &sample in samples {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }

    writer.finalize()?;
    Ok(())
}

/// WAV sample rate for a sample interval.
///
/// Fails unless `1/dt` is a whole number of hertz within one part per
/// million.
pub fn sample_rate_for(sample_interval: f64) -> Result<u32> {
    let rate = 1.0 / sample_interval;
    let rounded = rate.round();
    if !rate.is_finite() || rounded < 1.0 || rounded > f64::from(u32::MAX) || (rate - rounded).abs() > 1e-6 * rate {
        return Err(Error::UnsupportedSampleInterval(sample_interval));
    }
    Ok(rounded as u32)
}

/// Read a WAV file as a single waveform, mixing channels down.
pub fn read_waveform<P: AsRef<Path>>(path: P) -> Result<Waveform> {
    let (samples, spec) = read_wav(path)?;
    Ok(Waveform::new(samples, 1.0 / f64::from(spec.sample_rate))?)
}

/// Read one channel of a WAV file as a waveform.
pub fn read_waveform_channel<P: AsRef<Path>>(path: P, channel: usize) -> Result<Waveform> {
    let (mut channels, spec) = read_wav_channels(path)?;
    let count = channels.len();
    if channel >= count {
        return Err(Error::ChannelOutOfRange {
            channel,
            channels: count,
        });
    }
    let samples = channels.swap_remove(channel);
    Ok(Waveform::new(samples, 1.0 / f64::from(spec.sample_rate))?)
}

/// Write a waveform's current samples as a 32-bit float mono file.
///
/// Pending spectral work is transformed back first.
pub fn write_waveform<P: AsRef<Path>>(path: P, waveform: &mut Waveform) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: sample_rate_for(waveform.sample_interval())?,
        bits_per_sample: 32,
    };
    write_wav(path, waveform.samples(), spec)
}
