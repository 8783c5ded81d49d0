//! Error types for frequency-domain processing.

use thiserror::Error;

/// Errors raised by filters and waveform operations.
///
/// None of these leave a waveform half-mutated: every check runs before the
/// first sample or spectral bin is written.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// One or more parameters are out of range; every problem is listed.
    #[error("invalid filter settings: {}", .0.join("; "))]
    InvalidSettings(Vec<String>),

    /// Target and master spectra cannot be combined.
    #[error(
        "spectrum mismatch: target has {target_len} bins at dt={target_dt}s, master has {master_len} bins at dt={master_dt}s"
    )]
    SpectrumMismatch {
        /// Target spectrum length.
        target_len: usize,
        /// Master spectrum length.
        master_len: usize,
        /// Target sample interval in seconds.
        target_dt: f64,
        /// Master sample interval in seconds.
        master_dt: f64,
    },

    /// The operation needs at least one sample.
    #[error("waveform has no samples")]
    EmptySignal,
}

impl FilterError {
    /// Single-problem settings error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        FilterError::InvalidSettings(vec![msg.into()])
    }

    /// Turn a list of problems into `Ok(())` or an aggregated error.
    pub fn from_problems(problems: Vec<String>) -> Result<()> {
        if problems.is_empty() {
            Ok(())
        } else {
            Err(FilterError::InvalidSettings(problems))
        }
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregated_display() {
        let err = FilterError::InvalidSettings(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "invalid filter settings: a; b");
    }

    #[test]
    fn from_problems() {
        assert!(FilterError::from_problems(Vec::new()).is_ok());
        assert_eq!(
            FilterError::from_problems(vec!["x".into()]),
            Err(FilterError::invalid("x"))
        );
    }

    #[test]
    fn mismatch_display() {
        let err = FilterError::SpectrumMismatch {
            target_len: 1024,
            master_len: 2048,
            target_dt: 0.01,
            master_dt: 0.01,
        };
        assert!(err.to_string().contains("1024 bins"));
    }
}
