//! Small numeric conversions shared by the filter crates.

use std::f64::consts::TAU;

/// Convert decibels to a linear amplitude ratio.
///
/// ```rust
/// use seismo_core::db_to_linear;
///
/// assert!((db_to_linear(20.0) - 10.0).abs() < 1e-12);
/// ```
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// Convert a linear amplitude ratio to decibels (floored at 1e-300).
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    20.0 * linear.max(1e-300).log10()
}

/// Frequency in Hz to angular frequency in rad/s.
#[inline]
pub fn hz_to_omega(freq_hz: f64) -> f64 {
    TAU * freq_hz
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_roundtrip() {
        for &db in &[-60.0, -6.0, 0.0, 3.0, 40.0] {
            assert!((linear_to_db(db_to_linear(db)) - db).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_is_floored() {
        assert!(linear_to_db(0.0).is_finite());
    }

    #[test]
    fn omega() {
        assert!((hz_to_omega(1.0) - TAU).abs() < 1e-15);
    }
}
