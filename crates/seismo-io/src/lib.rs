//! Record I/O for strong-motion waveforms.
//!
//! Records travel as WAV files: one channel per component, the sample rate
//! giving the sample interval (`dt = 1 / sample_rate`).
//!
//! - [`read_wav`] / [`write_wav`] for raw samples
//! - [`read_wav_channels`] for multi-component records
//! - [`read_waveform`] / [`write_waveform`] for [`seismo_analysis::Waveform`]s
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use seismo_io::{read_waveform, write_waveform};
//!
//! let mut acc = read_waveform("station.wav")?;
//! acc.remove_mean_all()?;
//! write_waveform("station_demeaned.wav", &mut acc)?;
//! ```

mod wav;

pub use wav::{
    WavFormat, WavInfo, WavSpec, read_wav, read_wav_channels, read_wav_info, read_waveform, read_waveform_channel,
    sample_rate_for, write_wav, write_waveform,
};

/// Error types for record I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file holds no channel with this index.
    #[error("channel {channel} out of range: file has {channels} channel(s)")]
    ChannelOutOfRange {
        /// Requested zero-based channel.
        channel: usize,
        /// Channels in the file.
        channels: usize,
    },

    /// A WAV sample rate must be a whole number of samples per second.
    #[error("sample interval {0} s has no integer sample rate")]
    UnsupportedSampleInterval(f64),

    /// The samples do not form a valid record.
    #[error("invalid record: {0}")]
    Record(#[from] seismo_analysis::FilterError),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for record I/O.
pub type Result<T> = std::result::Result<T, Error>;
