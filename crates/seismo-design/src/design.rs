//! Design driver: validation, pole placement, mapping and coefficient
//! extraction.
//!
//! Every call to [`design`] owns a fresh [`DesignContext`], so concurrent
//! designs never share state. The result is an immutable [`FilterDesign`].

use crate::error::{DesignError, DesignWarning, Polynomial, Result};
use crate::spec::{Characteristic, DesignSpec, Response};
use crate::{prototype, resonator, transform};
use seismo_core::{Complex64, PoleZero, evaluate_rational, expand_polynomial, expj};
use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;

/// Imaginary part at or above which an expanded coefficient is rejected.
pub(crate) const REALNESS_TOLERANCE: f64 = 1e-10;

/// Scratch state for a single design computation.
pub(crate) struct DesignContext<'a> {
    pub(crate) spec: &'a DesignSpec,
    /// Corners as fractions of the sample rate.
    pub(crate) raw: (f64, f64),
    /// Pre-warped corners (equal to `raw` when pre-warping is off).
    pub(crate) warped: (f64, f64),
    pub(crate) splane: PoleZero,
    pub(crate) zplane: PoleZero,
    /// Remaining pole-selection bits, consumed one per LHP candidate.
    pub(crate) pole_mask: u64,
    pub(crate) warnings: Vec<DesignWarning>,
}

impl<'a> DesignContext<'a> {
    pub(crate) fn new(spec: &'a DesignSpec) -> Self {
        let raw = spec.raw_alphas();
        Self {
            spec,
            raw,
            warped: raw,
            splane: PoleZero::new(),
            zplane: PoleZero::new(),
            pole_mask: spec.pole_mask.unwrap_or(u64::MAX),
            warnings: Vec::new(),
        }
    }
}

/// A finished digital filter.
///
/// The recurrence is
///
/// ```text
/// y[n] = Σ x_coeffs[k]·x[n-nz+k] + Σ y_coeffs[k]·y[n-np+k]
/// ```
///
/// with the input pre-scaled by `1 / |reference_gain()|`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDesign {
    /// Specification the design was built from.
    pub spec: DesignSpec,
    /// Raw corners as fractions of the sample rate.
    pub raw_alphas: (f64, f64),
    /// Corners after pre-warping.
    pub warped_alphas: (f64, f64),
    /// Analog poles and zeros (empty for resonators).
    pub splane: PoleZero,
    /// Digital poles and zeros.
    pub zplane: PoleZero,
    /// Feed-forward coefficients, ascending powers of z (`nz + 1` values).
    pub x_coeffs: Vec<f64>,
    /// Feedback coefficients, ascending powers of z (`np` values).
    pub y_coeffs: Vec<f64>,
    /// Unnormalized gain at z = 1.
    pub dc_gain: Complex64,
    /// Unnormalized gain at the band centre.
    pub fc_gain: Complex64,
    /// Unnormalized gain at z = -1.
    pub hf_gain: Complex64,
    /// Non-fatal conditions met during synthesis.
    pub warnings: Vec<DesignWarning>,
}

/// Synthesize a digital filter from `spec`.
///
/// ```rust
/// use seismo_design::{Characteristic, DesignSpec, Response, design};
///
/// let spec = DesignSpec::new(Characteristic::Butterworth, Response::Lowpass, 100.0)
///     .with_order(4)
///     .with_corner(2.0);
/// let filter = design(&spec).unwrap();
/// assert_eq!(filter.zplane.num_poles(), 4);
/// assert!((filter.response_at(0.0).norm() - 1.0).abs() < 1e-9);
/// ```
pub fn design(spec: &DesignSpec) -> Result<FilterDesign> {
    spec.validate()?;
    let mut ctx = DesignContext::new(spec);

    match spec.characteristic {
        Characteristic::Resonator { q } => {
            resonator::place(&mut ctx, q)?;
        }
        Characteristic::ProportionalIntegral => {
            transform::prewarp(&mut ctx);
            ctx.splane.poles = vec![Complex64::new(0.0, 0.0)];
            ctx.splane.zeros = vec![Complex64::new(-TAU * ctx.warped.0, 0.0)];
            transform::to_z_plane(&mut ctx);
        }
        Characteristic::Bessel | Characteristic::Butterworth | Characteristic::Chebyshev { .. } => {
            prototype::analog_poles(&mut ctx);
            transform::prewarp(&mut ctx);
            transform::normalize(&mut ctx);
            transform::to_z_plane(&mut ctx);
        }
    }

    if let Some(freq) = spec.extra_zero_hz {
        transform::add_extra_zero(&mut ctx, freq / spec.sample_rate);
    }

    tracing::debug!(
        spec = %spec,
        poles = ctx.zplane.num_poles(),
        zeros = ctx.zplane.num_zeros(),
        "filter designed"
    );
    finish(ctx)
}

/// Expand both polynomials, insisting on real coefficients.
pub(crate) fn expand_real(zplane: &PoleZero) -> Result<(Vec<Complex64>, Vec<Complex64>)> {
    let top = expand_polynomial(&zplane.zeros);
    let bot = expand_polynomial(&zplane.poles);
    check_real(&top, Polynomial::Zeros)?;
    check_real(&bot, Polynomial::Poles)?;
    Ok((top, bot))
}

fn check_real(coeffs: &[Complex64], polynomial: Polynomial) -> Result<()> {
    for (power, c) in coeffs.iter().enumerate() {
        if c.im.abs() >= REALNESS_TOLERANCE {
            return Err(DesignError::NonRealCoefficient {
                polynomial,
                power,
                imag: c.im,
            });
        }
    }
    Ok(())
}

fn finish(ctx: DesignContext<'_>) -> Result<FilterDesign> {
    let (top, bot) = expand_real(&ctx.zplane)?;
    let np = ctx.zplane.num_poles();
    let lead = bot[np].re;

    let x_coeffs = top.iter().map(|c| c.re / lead).collect();
    let y_coeffs = bot[..np].iter().map(|c| -(c.re / lead)).collect();

    let theta = PI * (ctx.raw.0 + ctx.raw.1);
    let dc_gain = evaluate_rational(&top, &bot, Complex64::new(1.0, 0.0));
    let fc_gain = evaluate_rational(&top, &bot, expj(theta));
    let hf_gain = evaluate_rational(&top, &bot, Complex64::new(-1.0, 0.0));

    for warning in &ctx.warnings {
        tracing::warn!("{warning}");
    }

    Ok(FilterDesign {
        spec: ctx.spec.clone(),
        raw_alphas: ctx.raw,
        warped_alphas: ctx.warped,
        splane: ctx.splane,
        zplane: ctx.zplane,
        x_coeffs,
        y_coeffs,
        dc_gain,
        fc_gain,
        hf_gain,
        warnings: ctx.warnings,
    })
}

impl FilterDesign {
    /// Gain the recurrence input is divided by.
    pub fn reference_gain(&self) -> Complex64 {
        match (self.spec.characteristic, self.spec.response) {
            (Characteristic::ProportionalIntegral, _) => self.hf_gain,
            (_, Response::Lowpass) => self.dc_gain,
            (_, Response::Highpass) => self.hf_gain,
            (_, Response::Bandpass | Response::Allpass) => self.fc_gain,
            (_, Response::Bandstop) => (self.dc_gain * self.hf_gain).sqrt(),
        }
    }

    /// Normalized complex response at `freq_hz`.
    pub fn response_at(&self, freq_hz: f64) -> Complex64 {
        let z = expj(TAU * freq_hz / self.spec.sample_rate);
        let (top, bot) = (self.zplane.numerator(), self.zplane.denominator());
        let h = evaluate_rational(&top, &bot, z);
        let g = self.reference_gain().norm();
        if g > 0.0 { h / g } else { h }
    }

    /// Normalized magnitude response at `freq_hz`.
    pub fn magnitude_at(&self, freq_hz: f64) -> f64 {
        self.response_at(freq_hz).norm()
    }

    /// Human-readable listing of the design.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        // writing to a String cannot fail
        let _ = self.write_summary(&mut out);
        out
    }

    fn write_summary(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{}", self.spec)?;
        writeln!(out, "raw alpha1    = {:14.10}", self.raw_alphas.0)?;
        writeln!(out, "raw alpha2    = {:14.10}", self.raw_alphas.1)?;
        writeln!(out, "warped alpha1 = {:14.10}", self.warped_alphas.0)?;
        writeln!(out, "warped alpha2 = {:14.10}", self.warped_alphas.1)?;
        for (label, g) in [("dc", self.dc_gain), ("centre", self.fc_gain), ("hf", self.hf_gain)] {
            writeln!(
                out,
                "gain at {label:<6}: mag = {:15.9e}   phase = {:14.10} pi",
                g.norm(),
                g.arg() / PI
            )?;
        }
        writeln!(out)?;

        if !self.splane.poles.is_empty() {
            write_roots(out, "S-plane zeros", &self.splane.zeros)?;
            write_roots(out, "S-plane poles", &self.splane.poles)?;
        }
        write_roots(out, "Z-plane zeros", &self.zplane.zeros)?;
        write_roots(out, "Z-plane poles", &self.zplane.poles)?;

        let nz = self.x_coeffs.len().saturating_sub(1);
        let np = self.y_coeffs.len();
        writeln!(out, "Recurrence relation:")?;
        write!(out, "y[n] = ")?;
        for (i, c) in self.x_coeffs.iter().enumerate() {
            if i > 0 {
                write!(out, "\n     + ")?;
            }
            write!(out, "({c:14.10} * x[n-{}])", nz - i)?;
        }
        writeln!(out)?;
        for (i, c) in self.y_coeffs.iter().enumerate() {
            writeln!(out, "     + ({c:14.10} * y[n-{}])", np - i)?;
        }
        for warning in &self.warnings {
            writeln!(out, "warning: {warning}")?;
        }
        Ok(())
    }
}

fn write_roots(out: &mut String, title: &str, roots: &[Complex64]) -> std::fmt::Result {
    writeln!(out, "{title}:")?;
    for r in roots {
        writeln!(out, "\t{:14.10} + j {:14.10}", r.re, r.im)?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Mapping;

    fn lowpass4() -> FilterDesign {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Lowpass, 100.0)
            .with_order(4)
            .with_corner(2.0);
        design(&spec).unwrap()
    }

    #[test]
    fn butterworth_lowpass_shape() {
        let f = lowpass4();
        assert_eq!(f.zplane.num_poles(), 4);
        assert_eq!(f.zplane.num_zeros(), 4);
        for p in &f.zplane.poles {
            assert!(p.norm() < 1.0);
        }
        for z in &f.zplane.zeros {
            assert!((z - Complex64::new(-1.0, 0.0)).norm() < 1e-12);
        }
        assert_eq!(f.x_coeffs.len(), 5);
        assert_eq!(f.y_coeffs.len(), 4);
        // binomial numerator
        assert_eq!(f.x_coeffs, vec![1.0, 4.0, 6.0, 4.0, 1.0]);
    }

    #[test]
    fn butterworth_corner_is_minus_three_db() {
        let f = lowpass4();
        assert!((f.magnitude_at(0.0) - 1.0).abs() < 1e-9);
        let at_corner = f.magnitude_at(2.0);
        assert!((at_corner - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6, "{at_corner}");
        assert!(f.magnitude_at(20.0) < 1e-4);
    }

    #[test]
    fn highpass_reference_is_nyquist() {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Highpass, 100.0)
            .with_order(3)
            .with_corner(10.0);
        let f = design(&spec).unwrap();
        assert!((f.magnitude_at(50.0) - 1.0).abs() < 1e-9);
        assert!(f.magnitude_at(0.0) < 1e-9);
    }

    #[test]
    fn bandpass_centre_gain_is_unity() {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Bandpass, 100.0)
            .with_order(2)
            .with_band(5.0, 15.0);
        let f = design(&spec).unwrap();
        assert_eq!(f.zplane.num_poles(), 4);
        assert!((f.reference_gain().norm() - f.fc_gain.norm()).abs() < 1e-15);
        // the centre used for the reference gain is the arithmetic mean of the raw corners
        assert!((f.magnitude_at(10.0) - 1.0).abs() < 1e-9);
        assert!(f.magnitude_at(0.0) < 1e-9);
    }

    #[test]
    fn bandstop_rejects_centre() {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Bandstop, 100.0)
            .with_order(2)
            .with_band(8.0, 12.0);
        let f = design(&spec).unwrap();
        let w0 = (f.warped_alphas.0 * f.warped_alphas.1).sqrt();
        // digital notch frequency after un-warping
        let notch = (PI * w0).atan() / PI * 100.0;
        assert!(f.magnitude_at(notch) < 1e-6);
        assert!((f.magnitude_at(0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn proportional_integral_has_pole_at_dc() {
        let spec = DesignSpec::new(Characteristic::ProportionalIntegral, Response::Lowpass, 100.0).with_corner(1.0);
        let f = design(&spec).unwrap();
        assert_eq!(f.zplane.poles, vec![Complex64::new(1.0, 0.0)]);
        assert_eq!(f.dc_gain, Complex64::new(seismo_core::SENTINEL_MAGNITUDE, 0.0));
        assert!((f.magnitude_at(50.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn matched_z_keeps_zero_count() {
        let spec = DesignSpec::new(Characteristic::Bessel, Response::Lowpass, 100.0)
            .with_order(3)
            .with_corner(5.0)
            .with_mapping(Mapping::MatchedZ);
        let f = design(&spec).unwrap();
        assert_eq!(f.zplane.num_poles(), 3);
        assert_eq!(f.zplane.num_zeros(), 0);
        assert_eq!(f.warped_alphas, f.raw_alphas);
        assert_eq!(f.x_coeffs.len(), 1);
    }

    #[test]
    fn extra_zero_notches() {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Lowpass, 100.0)
            .with_order(2)
            .with_corner(10.0)
            .with_extra_zero(25.0);
        let f = design(&spec).unwrap();
        assert_eq!(f.zplane.num_zeros(), 4);
        assert_eq!(f.zplane.num_poles(), 4);
        assert!(f.magnitude_at(25.0) < 1e-9);
    }

    #[test]
    fn invalid_spec_is_reported_before_work() {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Lowpass, 100.0)
            .with_order(0)
            .with_corner(80.0);
        match design(&spec) {
            Err(DesignError::InvalidSpec(p)) => assert_eq!(p.len(), 2, "{p:?}"),
            other => panic!("expected InvalidSpec, got {other:?}"),
        }
    }

    #[test]
    fn non_real_coefficient_detected() {
        let pz = PoleZero::from_roots(vec![], vec![Complex64::new(0.5, 0.5)]);
        match expand_real(&pz) {
            Err(DesignError::NonRealCoefficient { polynomial, power, .. }) => {
                assert_eq!(polynomial, Polynomial::Poles);
                assert_eq!(power, 0);
            }
            other => panic!("expected NonRealCoefficient, got {other:?}"),
        }
    }

    #[test]
    fn realness_bound_is_absolute() {
        let large = [Complex64::new(1.0e3, 0.0), Complex64::new(-2.0e3, 5.0e-10)];
        assert!(matches!(
            check_real(&large, Polynomial::Zeros),
            Err(DesignError::NonRealCoefficient { power: 1, .. })
        ));
        let small = [Complex64::new(1.0, 9.0e-11), Complex64::new(-1.0, -9.0e-11)];
        assert!(check_real(&small, Polynomial::Poles).is_ok());
    }

    #[test]
    fn summary_lists_recurrence() {
        let s = lowpass4().summary();
        assert!(s.starts_with("butterworth lowpass, order 4, 2 Hz @ 100 Hz"));
        assert!(s.contains("Z-plane poles:"));
        assert!(s.contains("x[n-4]"));
        assert!(s.contains("y[n-1]"));
    }
}
