//! Filter design specification and its validation pass.

use crate::error::{DesignError, Result};

/// Highest prototype order accepted by the generic (non-resonator) path.
pub const MAX_ORDER: usize = 10;

/// Filter family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Characteristic {
    /// Maximally flat group delay, poles from a fixed table.
    Bessel,
    /// Maximally flat magnitude.
    Butterworth,
    /// Equiripple passband; `ripple_db` must be negative (e.g. `-0.5`).
    Chebyshev {
        /// Passband ripple in dB.
        ripple_db: f64,
    },
    /// Two-pole resonator placed directly in the Z plane.
    ///
    /// `q: None` means infinite Q (an oscillator; band-pass only).
    Resonator {
        /// Quality factor.
        q: Option<f64>,
    },
    /// Proportional-integral: a pole at DC and a zero at the corner.
    ProportionalIntegral,
}

impl Characteristic {
    /// Short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Characteristic::Bessel => "bessel",
            Characteristic::Butterworth => "butterworth",
            Characteristic::Chebyshev { .. } => "chebyshev",
            Characteristic::Resonator { .. } => "resonator",
            Characteristic::ProportionalIntegral => "proportional-integral",
        }
    }
}

/// Response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Pass below the corner.
    Lowpass,
    /// Pass above the corner.
    Highpass,
    /// Pass between two corners (or around a resonator frequency).
    Bandpass,
    /// Reject between two corners (or around a resonator frequency).
    Bandstop,
    /// Unit magnitude, resonator phase only.
    Allpass,
}

impl Response {
    /// Short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Response::Lowpass => "lowpass",
            Response::Highpass => "highpass",
            Response::Bandpass => "bandpass",
            Response::Bandstop => "bandstop",
            Response::Allpass => "allpass",
        }
    }

    fn needs_two_corners(self) -> bool {
        matches!(self, Response::Bandpass | Response::Bandstop)
    }
}

/// S-plane to Z-plane mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mapping {
    /// `z = (2 + s) / (2 - s)`, missing zeros padded at `z = -1`.
    #[default]
    Bilinear,
    /// `z = exp(s)`; corners are never pre-warped.
    MatchedZ,
}

/// Everything one design computation needs.
///
/// ```rust
/// use seismo_design::{Characteristic, DesignSpec, Response};
///
/// let spec = DesignSpec::new(Characteristic::Butterworth, Response::Lowpass, 100.0)
///     .with_order(4)
///     .with_corner(2.0);
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DesignSpec {
    /// Filter family.
    pub characteristic: Characteristic,
    /// Response shape.
    pub response: Response,
    /// Prototype order (1..=10); ignored by resonators and PI designs.
    pub order: usize,
    /// Corner (or resonator centre) frequency in Hz.
    pub corner_hz: f64,
    /// Upper corner in Hz for band-pass/band-stop designs.
    pub upper_corner_hz: Option<f64>,
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Bit `i` keeps the `i`-th left-half-plane prototype pole; `None` keeps all.
    pub pole_mask: Option<u64>,
    /// Pre-warp corners for the bilinear transform.
    pub prewarp: bool,
    /// S-to-Z mapping.
    pub mapping: Mapping,
    /// Extra conjugate zero pair on the unit circle at this frequency (Hz).
    pub extra_zero_hz: Option<f64>,
}

impl DesignSpec {
    /// Order-1 design with corner at a tenth of the sample rate.
    pub fn new(characteristic: Characteristic, response: Response, sample_rate: f64) -> Self {
        Self {
            characteristic,
            response,
            order: 1,
            corner_hz: sample_rate / 10.0,
            upper_corner_hz: None,
            sample_rate,
            pole_mask: None,
            prewarp: true,
            mapping: Mapping::Bilinear,
            extra_zero_hz: None,
        }
    }

    /// Set the prototype order.
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Set a single corner frequency.
    pub fn with_corner(mut self, corner_hz: f64) -> Self {
        self.corner_hz = corner_hz;
        self.upper_corner_hz = None;
        self
    }

    /// Set both band edges.
    pub fn with_band(mut self, low_hz: f64, high_hz: f64) -> Self {
        self.corner_hz = low_hz;
        self.upper_corner_hz = Some(high_hz);
        self
    }

    /// Restrict the prototype poles to a subset.
    pub fn with_pole_mask(mut self, mask: u64) -> Self {
        self.pole_mask = Some(mask);
        self
    }

    /// Disable corner pre-warping.
    pub fn without_prewarp(mut self) -> Self {
        self.prewarp = false;
        self
    }

    /// Choose the S-to-Z mapping.
    pub fn with_mapping(mut self, mapping: Mapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Add a unit-circle zero pair.
    pub fn with_extra_zero(mut self, freq_hz: f64) -> Self {
        self.extra_zero_hz = Some(freq_hz);
        self
    }

    /// Nyquist frequency in Hz.
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Corner(s) as fractions of the sample rate, `(low, high)`.
    ///
    /// Single-corner designs return the same value twice.
    pub fn raw_alphas(&self) -> (f64, f64) {
        let a1 = self.corner_hz / self.sample_rate;
        let a2 = self
            .upper_corner_hz
            .filter(|_| self.response.needs_two_corners() && !self.is_resonator())
            .map_or(a1, |f| f / self.sample_rate);
        (a1, a2)
    }

    /// Whether this is a Z-plane resonator design.
    pub fn is_resonator(&self) -> bool {
        matches!(self.characteristic, Characteristic::Resonator { .. })
    }

    /// Check every constraint and report all violations together.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        let nyquist = self.nyquist();

        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            problems.push(format!("sample rate {} must be positive", self.sample_rate));
        }

        check_frequency("corner", self.corner_hz, nyquist, &mut problems);

        match self.characteristic {
            Characteristic::Resonator { q } => {
                if !matches!(
                    self.response,
                    Response::Bandpass | Response::Bandstop | Response::Allpass
                ) {
                    problems.push(format!(
                        "resonator designs must be bandpass, bandstop or allpass, not {}",
                        self.response.name()
                    ));
                }
                if self.upper_corner_hz.is_some() {
                    problems.push("resonator takes a single centre frequency".to_string());
                }
                match q {
                    Some(q) if !(q.is_finite() && q > 0.0) => {
                        problems.push(format!("resonator Q {q} must be positive"));
                    }
                    None if self.response != Response::Bandpass => {
                        problems.push(format!(
                            "infinite-Q resonator is only defined for bandpass, not {}",
                            self.response.name()
                        ));
                    }
                    _ => {}
                }
            }
            Characteristic::ProportionalIntegral => {
                if self.response != Response::Lowpass {
                    problems.push(format!(
                        "proportional-integral designs take the lowpass response, not {}",
                        self.response.name()
                    ));
                }
            }
            Characteristic::Bessel | Characteristic::Butterworth | Characteristic::Chebyshev { .. } => {
                if !(1..=MAX_ORDER).contains(&self.order) {
                    problems.push(format!("order {} out of range 1..={MAX_ORDER}", self.order));
                }
                if self.response == Response::Allpass {
                    problems.push(format!(
                        "allpass response needs a resonator, not {}",
                        self.characteristic.name()
                    ));
                }
                if let Characteristic::Chebyshev { ripple_db } = self.characteristic
                    && !(ripple_db.is_finite() && ripple_db < 0.0)
                {
                    problems.push(format!("Chebyshev ripple {ripple_db} dB must be negative"));
                }
                if self.response.needs_two_corners() {
                    match self.upper_corner_hz {
                        None => problems.push(format!(
                            "{} response needs an upper corner frequency",
                            self.response.name()
                        )),
                        Some(high) => {
                            check_frequency("upper corner", high, nyquist, &mut problems);
                            if high <= self.corner_hz {
                                problems.push(format!(
                                    "upper corner {high} Hz must exceed lower corner {} Hz",
                                    self.corner_hz
                                ));
                            }
                        }
                    }
                }
                if let Some(mask) = self.pole_mask {
                    let usable = if self.order >= 64 { u64::MAX } else { (1u64 << self.order) - 1 };
                    if mask & usable == 0 {
                        problems.push(format!("pole mask {mask:#x} selects no poles"));
                    }
                }
            }
        }

        if let Some(f) = self.extra_zero_hz {
            check_frequency("extra zero", f, nyquist, &mut problems);
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DesignError::InvalidSpec(problems))
        }
    }
}

fn check_frequency(what: &str, freq: f64, nyquist: f64, problems: &mut Vec<String>) {
    if !(freq.is_finite() && freq > 0.0) {
        problems.push(format!("{what} frequency {freq} Hz must be positive"));
    } else if freq >= nyquist {
        problems.push(format!(
            "{what} frequency {freq} Hz is at or above the Nyquist frequency {nyquist} Hz"
        ));
    }
}

impl std::fmt::Display for DesignSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.characteristic.name(), self.response.name())?;
        match self.characteristic {
            Characteristic::Resonator { q: Some(q) } => write!(f, ", Q {q}")?,
            Characteristic::Resonator { q: None } => write!(f, ", infinite Q")?,
            Characteristic::ProportionalIntegral => {}
            Characteristic::Chebyshev { ripple_db } => {
                write!(f, ", order {}, ripple {ripple_db} dB", self.order)?;
            }
            _ => write!(f, ", order {}", self.order)?,
        }
        match self.upper_corner_hz {
            Some(high) if self.response.needs_two_corners() && !self.is_resonator() => {
                write!(f, ", {}-{} Hz", self.corner_hz, high)?;
            }
            _ => write!(f, ", {} Hz", self.corner_hz)?,
        }
        write!(f, " @ {} Hz", self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problems(spec: &DesignSpec) -> Vec<String> {
        match spec.validate() {
            Err(DesignError::InvalidSpec(p)) => p,
            other => panic!("expected InvalidSpec, got {other:?}"),
        }
    }

    #[test]
    fn valid_lowpass() {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Lowpass, 100.0)
            .with_order(4)
            .with_corner(2.0);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn aggregates_all_violations() {
        let spec = DesignSpec::new(Characteristic::Chebyshev { ripple_db: 0.5 }, Response::Bandpass, 100.0)
            .with_order(12)
            .with_band(30.0, 60.0);
        let p = problems(&spec);
        assert!(p.iter().any(|m| m.contains("order 12")), "{p:?}");
        assert!(p.iter().any(|m| m.contains("ripple")), "{p:?}");
        assert!(p.iter().any(|m| m.contains("Nyquist")), "{p:?}");
        assert_eq!(p.len(), 3, "{p:?}");
    }

    #[test]
    fn band_needs_ordered_corners() {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Bandstop, 100.0)
            .with_order(2)
            .with_band(10.0, 5.0);
        let p = problems(&spec);
        assert!(p[0].contains("must exceed"), "{p:?}");

        let mut spec = spec;
        spec.upper_corner_hz = None;
        assert!(problems(&spec)[0].contains("needs an upper corner"));
    }

    #[test]
    fn corner_at_nyquist_rejected() {
        let spec = DesignSpec::new(Characteristic::Bessel, Response::Highpass, 100.0)
            .with_order(3)
            .with_corner(50.0);
        assert!(problems(&spec)[0].contains("Nyquist"));
    }

    #[test]
    fn resonator_rules() {
        let spec = DesignSpec::new(Characteristic::Resonator { q: None }, Response::Bandstop, 100.0)
            .with_corner(10.0);
        assert!(problems(&spec)[0].contains("infinite-Q"));

        let spec = DesignSpec::new(Characteristic::Resonator { q: Some(-1.0) }, Response::Lowpass, 100.0)
            .with_corner(10.0);
        assert_eq!(problems(&spec).len(), 2);

        let spec = DesignSpec::new(Characteristic::Resonator { q: Some(20.0) }, Response::Allpass, 100.0)
            .with_corner(10.0);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn allpass_needs_resonator() {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Allpass, 100.0).with_order(2);
        assert!(problems(&spec)[0].contains("allpass"));
    }

    #[test]
    fn empty_pole_mask_rejected() {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Lowpass, 100.0)
            .with_order(2)
            .with_corner(5.0)
            .with_pole_mask(0b100);
        assert!(problems(&spec)[0].contains("selects no poles"));
    }

    #[test]
    fn raw_alphas_single_and_band() {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Lowpass, 200.0).with_corner(20.0);
        assert_eq!(spec.raw_alphas(), (0.1, 0.1));
        let spec = spec.with_band(10.0, 40.0);
        // lowpass ignores the upper corner
        assert_eq!(spec.raw_alphas(), (0.05, 0.05));
        let mut spec = spec;
        spec.response = Response::Bandpass;
        assert_eq!(spec.raw_alphas(), (0.05, 0.2));
    }

    #[test]
    fn display() {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Bandpass, 100.0)
            .with_order(4)
            .with_band(0.1, 25.0);
        assert_eq!(spec.to_string(), "butterworth bandpass, order 4, 0.1-25 Hz @ 100 Hz");
    }
}
